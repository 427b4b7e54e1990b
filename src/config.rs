// Configuration module for extapi
// Reads from environment variables with sensible defaults

use std::env;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Global configuration instance
static CONFIG: OnceLock<Config> = OnceLock::new();

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Default schema document path (EXTAPI_SCHEMA)
    pub schema_path: PathBuf,

    /// Recognized build configurations for layout queries (EXTAPI_CONFIGS)
    pub build_configs: Vec<String>,

    /// Debounce window for the file watcher in milliseconds (EXTAPI_WATCH_DEBOUNCE_MS)
    pub watch_debounce_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_path: PathBuf::from("extension_api.json"),
            build_configs: vec!["float_32".to_string(), "float_64".to_string()],
            watch_debounce_ms: 300,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Self {
        let mut config = Config::default();

        if let Ok(val) = env::var("EXTAPI_SCHEMA") {
            if !val.trim().is_empty() {
                config.schema_path = PathBuf::from(val);
            }
        }

        if let Ok(val) = env::var("EXTAPI_CONFIGS") {
            let configs: Vec<String> = val
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            if configs.is_empty() {
                eprintln!(
                    "extapi: Warning: EXTAPI_CONFIGS is empty, using default: {}",
                    config.build_configs.join(",")
                );
            } else {
                config.build_configs = configs;
            }
        }

        if let Ok(val) = env::var("EXTAPI_WATCH_DEBOUNCE_MS") {
            if let Ok(parsed) = val.parse() {
                config.watch_debounce_ms = parsed;
            } else {
                eprintln!(
                    "extapi: Warning: Invalid EXTAPI_WATCH_DEBOUNCE_MS value: {}, using default: {}",
                    val, config.watch_debounce_ms
                );
            }
        }

        config
    }

    pub fn recognizes_build_config(&self, name: &str) -> bool {
        self.build_configs.iter().any(|c| c == name)
    }
}

/// Get the global configuration, loading it on first access
pub fn get() -> &'static Config {
    CONFIG.get_or_init(Config::from_env)
}
