use serde::{Deserialize, Serialize};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Used by [`Config::load`] when `CONFIG_FILE` is unset
pub const DEFAULT_CONFIG_PATH: &str = "config/outlier_scan.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Mode identifier, parsed into a `Strategy` at run time
    pub strategy: String,
    #[serde(default)]
    pub streams: Vec<String>,
    /// Window start; omitted means the first row
    pub start: Option<String>,
    /// Window end; omitted means the last row
    pub end: Option<String>,
    /// Fixed threshold; omitted means mean - std of the scores
    pub threshold: Option<f64>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            strategy: "correlation".to_string(),
            streams: Vec::new(),
            start: None,
            end: None,
            threshold: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputConfig {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Write the verdict as JSON here
    pub json_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// "pretty" or "json"
    pub output: String,
    #[serde(default)]
    pub file_path: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            output: "pretty".to_string(),
            file_path: String::new(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Load from `CONFIG_FILE` (or the default path), with `OUTLIER__SECTION__KEY`
    /// environment overrides layered on top. A missing file means defaults plus
    /// environment overrides.
    pub fn load() -> Result<Self> {
        let path = std::env::var("CONFIG_FILE")
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::layered(Path::new(&path), false)
    }

    /// Like [`Config::load`] for an explicit path, which must exist.
    pub fn load_layered<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::layered(path.as_ref(), true)
    }

    fn layered(path: &Path, required: bool) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(required),
            )
            .add_source(
                config::Environment::with_prefix("OUTLIER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("loading config {}", path.display()))?;

        settings
            .try_deserialize()
            .with_context(|| format!("deserializing config {}", path.display()))
    }
}
