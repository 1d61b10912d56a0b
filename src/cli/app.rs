// ABOUTME: Main application orchestration for the orderflow CLI
// ABOUTME: Coordinates between CLI arguments, configuration, and command execution

use anyhow::Result;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use super::commands;
use super::{Args, Commands, Config};

pub struct App {
    config: Config,
}

impl App {
    /// Create a new application instance
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Initialize logging based on configuration
    pub fn init_logging(&self, verbose: bool, no_color: bool) -> Result<()> {
        let log_level = if verbose {
            "debug"
        } else {
            &self.config.logging.level
        };

        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

        match self.config.logging.format.as_str() {
            "compact" => {
                tracing_subscriber::fmt()
                    .compact()
                    .with_env_filter(env_filter)
                    .with_ansi(!no_color)
                    .with_target(false)
                    .init();
            }
            _ => {
                tracing_subscriber::fmt()
                    .with_env_filter(env_filter)
                    .with_ansi(!no_color)
                    .with_target(false)
                    .init();
            }
        }

        debug!("Logging initialized with level: {}", log_level);
        Ok(())
    }

    /// Run the application with parsed arguments
    pub async fn run(&mut self, args: Args) -> Result<()> {
        self.init_logging(args.verbose, args.no_color)?;

        info!("Starting orderflow v{}", env!("CARGO_PKG_VERSION"));
        debug!("Configuration loaded from: {:?}", args.config);

        match args.command {
            Commands::Run {
                suite,
                root,
                retries,
                threshold,
                due_within,
                task_delay,
            } => {
                commands::run_workflow(
                    suite,
                    root,
                    retries,
                    threshold,
                    due_within,
                    task_delay,
                    &self.config,
                )
                .await
            }

            Commands::Validate { suite, root } => {
                commands::validate_workflow(suite, root, &self.config).await
            }
        }
    }

    /// Create application from command line arguments
    pub async fn from_args() -> Result<Self> {
        let args = Args::parse_args();
        let config = Config::load(args.config.clone())?;
        Ok(Self::new(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_app_creation() {
        let config = Config::default();
        let app = App::new(config);
        assert_eq!(app.config.max_retries, 2);
    }

    #[test]
    fn test_config_file_loading() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("orderflow.yaml");

        let config_content = r#"
max_retries: 5
logging:
  level: debug
  format: compact
"#;

        fs::write(&config_path, config_content).unwrap();

        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "compact");
    }
}
