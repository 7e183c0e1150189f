//! Server configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional TOML
//! file, then `STOCKCHART_*` environment variables. Command-line flags are
//! applied on top by the server binary.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable prefix, e.g. `STOCKCHART_DATA_PATH`
pub const ENV_PREFIX: &str = "STOCKCHART";

/// Default configuration file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "stockchart.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    pub bind: String,
    /// TCP port
    pub port: u16,
    /// CSV dataset served by `/api/stock-data`
    pub data_path: PathBuf,
    /// Directory served as static files at the root
    pub static_dir: PathBuf,
    /// Positional volume column used when the header names are not recognised
    pub volume_column: usize,
    /// Upper bound on concurrently handled requests
    pub max_concurrent_requests: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 3000,
            data_path: PathBuf::from("public/data/TESLA.csv"),
            static_dir: PathBuf::from("public"),
            volume_column: 5,
            max_concurrent_requests: 64,
        }
    }
}

impl ServerConfig {
    /// Load defaults, then `file` (if it exists), then the environment
    pub fn load(file: Option<&Path>) -> Result<Self, config::ConfigError> {
        let defaults = Self::default();
        let mut builder = config::Config::builder()
            .set_default("bind", defaults.bind)?
            .set_default("port", defaults.port as i64)?
            .set_default("data_path", defaults.data_path.to_string_lossy().into_owned())?
            .set_default("static_dir", defaults.static_dir.to_string_lossy().into_owned())?
            .set_default("volume_column", defaults.volume_column as i64)?
            .set_default(
                "max_concurrent_requests",
                defaults.max_concurrent_requests as i64,
            )?;

        let file = file.unwrap_or(Path::new(DEFAULT_CONFIG_FILE));
        builder = builder.add_source(config::File::from(file).required(false));

        builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// `bind:port` socket address string
    pub fn address(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}
