use anyhow::{bail, Context};
use chrono::{Duration, NaiveDate};
use clap::Parser;
use rand::Rng;
use std::path::PathBuf;
use std::sync::Arc;
use stream_outliers::{
    load_table, utils, Config, OutlierAnalyzer, SeriesTable, StdoutReporter, Strategy, TimeWindow,
};
use tracing::{info, warn};

/// Flag streams that behave unlike their peers over a time window
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML config file (CLI flags override its values). Defaults to $CONFIG_FILE,
    /// then config/outlier_scan.toml if it exists
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Input file (.csv, .tsv or .json)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Streams to compare, comma separated (at least 3)
    #[arg(long, value_delimiter = ',')]
    streams: Vec<String>,

    /// Window start (YYYY-MM-DD or full timestamp)
    #[arg(long)]
    start: Option<String>,

    /// Window end (YYYY-MM-DD or full timestamp; a bare date covers the whole day)
    #[arg(long)]
    end: Option<String>,

    /// correlation, volatility or central-tendency
    #[arg(long)]
    strategy: Option<String>,

    /// Fixed threshold instead of mean - std of the scores
    #[arg(long, allow_hyphen_values = true)]
    threshold: Option<f64>,

    /// Write the verdict as JSON
    #[arg(long)]
    json_out: Option<PathBuf>,

    /// Log level
    #[arg(long)]
    log_level: Option<String>,

    /// Analyze generated random-walk streams instead of a file
    #[arg(long)]
    synthetic: bool,
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    // Without --config, fall back to CONFIG_FILE or config/outlier_scan.toml when present.
    let mut config = match &args.config {
        Some(path) => Config::load_layered(path)?,
        None => Config::load()?,
    };
    apply_overrides(&mut config, &args);

    utils::init_from_config(&config.logging)?;

    let strategy: Strategy = config.analysis.strategy.parse()?;

    let table = if args.synthetic {
        info!("Generating synthetic streams");
        generate_synthetic_table()?
    } else {
        let path = config
            .input
            .path
            .as_ref()
            .context("no input file: pass --input, set [input].path, or use --synthetic")?;
        load_table(path).with_context(|| format!("loading {}", path.display()))?
    };

    let streams = if config.analysis.streams.is_empty() {
        warn!("No streams selected, comparing every column");
        table.streams().to_vec()
    } else {
        config.analysis.streams.clone()
    };

    let window = resolve_window(&table, &config)?;
    info!(
        %strategy,
        streams = streams.len(),
        start = %window.start,
        end = %window.end,
        "Running outlier analysis"
    );

    let analyzer = OutlierAnalyzer::new(strategy).with_reporter(Arc::new(StdoutReporter));
    let verdict = analyzer.analyze(&table, &streams, &window, config.analysis.threshold)?;

    info!(
        outliers = verdict.outlier_count(),
        threshold = verdict.threshold(),
        "Analysis complete"
    );

    if let Some(path) = &config.output.json_path {
        let json = serde_json::to_string_pretty(&verdict)?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        println!("Verdict saved to: {}", path.display());
    }

    Ok(())
}

fn apply_overrides(config: &mut Config, args: &Args) {
    if let Some(input) = &args.input {
        config.input.path = Some(input.clone());
    }
    if !args.streams.is_empty() {
        config.analysis.streams = args.streams.clone();
    }
    if let Some(start) = &args.start {
        config.analysis.start = Some(start.clone());
    }
    if let Some(end) = &args.end {
        config.analysis.end = Some(end.clone());
    }
    if let Some(strategy) = &args.strategy {
        config.analysis.strategy = strategy.clone();
    }
    if args.threshold.is_some() {
        config.analysis.threshold = args.threshold;
    }
    if let Some(path) = &args.json_out {
        config.output.json_path = Some(path.clone());
    }
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }
}

/// Window from config bounds, falling back to the table's first/last row.
fn resolve_window(table: &SeriesTable, config: &Config) -> anyhow::Result<TimeWindow> {
    let Some(full) = TimeWindow::covering(table) else {
        bail!("input has no rows");
    };

    let start = config
        .analysis
        .start
        .clone()
        .unwrap_or_else(|| full.start.to_string());
    let end = config
        .analysis
        .end
        .clone()
        .unwrap_or_else(|| full.end.to_string());

    Ok(TimeWindow::parse(&start, &end)?)
}

/// Five random-walk streams at one-minute resolution. `flat` barely moves and
/// `mirror` runs against `base`, so every strategy has something to find.
fn generate_synthetic_table() -> anyhow::Result<SeriesTable> {
    let mut rng = rand::thread_rng();
    let rows: i64 = 240;
    let origin = NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .context("invalid synthetic origin")?;

    let timestamps: Vec<_> = (0..rows).map(|i| origin + Duration::minutes(i)).collect();

    let mut base = Vec::with_capacity(rows as usize);
    let mut level: f64 = 100.0;
    for _ in 0..rows {
        level += rng.gen_range(-1.0..1.0);
        base.push(level);
    }

    let noisy = |rng: &mut rand::rngs::ThreadRng, scale: f64| -> Vec<f64> {
        base.iter().map(|v| v + rng.gen_range(-scale..scale)).collect()
    };

    let peer_a = noisy(&mut rng, 0.3);
    let peer_b = noisy(&mut rng, 0.3);
    let mirror: Vec<f64> = base.iter().map(|v| 200.0 - v).collect();
    let flat: Vec<f64> = (0..rows).map(|_| 100.0 + rng.gen_range(-0.01..0.01)).collect();

    Ok(SeriesTable::new(
        "created_at",
        timestamps,
        vec![
            ("base".to_string(), base),
            ("peer_a".to_string(), peer_a),
            ("peer_b".to_string(), peer_b),
            ("mirror".to_string(), mirror),
            ("flat".to_string(), flat),
        ],
    )?)
}
