// ABOUTME: Configuration management for the orderflow application
// ABOUTME: Handles loading and merging configuration from files and environment variables

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::rules::RulePolicy;
use crate::stock::Sku;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root directory holding the suite folders.
    #[serde(default = "default_orders_root")]
    pub orders_root: PathBuf,

    /// Retries after the first attempt for each task.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default)]
    pub rules: RulePolicy,

    /// Initial stock levels per unit; units not listed use built-in seeds.
    #[serde(default)]
    pub stock: HashMap<Sku, i64>,

    #[serde(default)]
    pub alerts: AlertsConfig,

    /// Injected latency before each task.
    #[serde(with = "humantime_serde", default)]
    pub task_delay: Option<Duration>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AlertsConfig {
    #[serde(default)]
    pub write_unflagged_success: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

fn default_orders_root() -> PathBuf {
    PathBuf::from("orders")
}

fn default_max_retries() -> u32 {
    2
}

impl Default for Config {
    fn default() -> Self {
        Self {
            orders_root: default_orders_root(),
            max_retries: default_max_retries(),
            rules: RulePolicy::default(),
            stock: HashMap::new(),
            alerts: AlertsConfig::default(),
            task_delay: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file path or default locations
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p,
            None => Self::find_config_file(),
        };

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            let mut config: Config = serde_yaml::from_str(&contents)?;
            config.merge_env()?;
            Ok(config)
        } else {
            let mut config = Config::default();
            config.merge_env()?;
            Ok(config)
        }
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> PathBuf {
        if let Some(home_dir) = dirs::home_dir() {
            let home_config = home_dir.join(".orderflow").join("config.yaml");
            if home_config.exists() {
                return home_config;
            }
        }

        let possible_paths = [
            PathBuf::from("orderflow.yaml"),
            PathBuf::from("orderflow.yml"),
            PathBuf::from(".orderflow.yaml"),
            PathBuf::from(".orderflow.yml"),
        ];

        for path in &possible_paths {
            if path.exists() {
                return path.clone();
            }
        }

        PathBuf::from("orderflow.yaml")
    }

    /// Merge environment variables into configuration
    fn merge_env(&mut self) -> Result<()> {
        if let Ok(root) = std::env::var("ORDERFLOW_ROOT") {
            self.orders_root = PathBuf::from(root);
        }
        if let Ok(retries) = std::env::var("ORDERFLOW_MAX_RETRIES") {
            self.max_retries = retries.parse()?;
        }
        if let Ok(threshold) = std::env::var("ORDERFLOW_AMOUNT_THRESHOLD") {
            self.rules.amount_threshold = threshold.parse()?;
        }
        if let Ok(days) = std::env::var("ORDERFLOW_DUE_WITHIN_DAYS") {
            self.rules.due_within_days = days.parse()?;
        }
        if let Ok(level) = std::env::var("ORDERFLOW_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("ORDERFLOW_LOG_FORMAT") {
            self.logging.format = format;
        }

        Ok(())
    }
}
