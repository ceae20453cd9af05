use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::app::App;
use crate::config::{self, AppConfig, HandlerPolicy};
use crate::error::Result;
use crate::logging::{self, Level};

#[derive(Parser, Debug)]
#[command(name = "applog", version, about = "Policy-driven application logging")]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (defaults to ~/.applog/applog.json)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the application over HTTP
    Serve {
        /// Start in debug mode regardless of config
        #[arg(long)]
        debug: bool,
        /// Override LOGGER_HANDLER_POLICY
        #[arg(long)]
        policy: Option<String>,
    },
    /// Emit a single record through the application logger
    Emit {
        level: Level,
        message: String,
        #[arg(long)]
        debug: bool,
    },
    /// Show version information
    Version,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Validate configuration
    Validate,
}

fn load(cli: &Cli) -> Result<AppConfig> {
    match &cli.config {
        Some(path) => config::load_config_from_path(path),
        None => config::load_config(),
    }
}

/// Run the CLI application.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Serve { debug, policy }) => {
            let mut config = load(&cli)?;
            config.debug |= *debug;
            if let Some(policy) = policy {
                config.logger_handler_policy = HandlerPolicy::from(policy.as_str());
            }
            let app = Arc::new(App::from_config("applog", config));
            logging::init_app_logging(&app)?;
            crate::server::start_server(app).await
        }
        Some(Commands::Emit { level, message, debug }) => {
            let mut config = load(&cli)?;
            config.debug |= *debug;
            let app = App::from_config("applog", config);
            app.logger().log(*level, message)
        }
        Some(Commands::Version) => {
            println!("applog {}", crate::VERSION);
            Ok(())
        }
        Some(Commands::Config { action }) => {
            logging::init_logging(cli.verbose);
            let config = load(&cli)?;
            match action {
                ConfigAction::Show => {
                    println!("{}", serde_json::to_string_pretty(&config)?);
                }
                ConfigAction::Validate => {
                    if let HandlerPolicy::Unrecognized(other) = &config.logger_handler_policy {
                        tracing::warn!(
                            "LOGGER_HANDLER_POLICY {:?} is not one of never/debug/production/always; no handlers will be attached",
                            other
                        );
                    }
                    println!("config ok");
                }
            }
            Ok(())
        }
        None => {
            println!("applog {}: run with --help for usage", crate::VERSION);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_serve_flags() {
        let cli = Cli::try_parse_from(["applog", "serve", "--debug", "--policy", "production"]).unwrap();
        match cli.command {
            Some(Commands::Serve { debug, policy }) => {
                assert!(debug);
                assert_eq!(policy.as_deref(), Some("production"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn parses_emit_level() {
        let cli = Cli::try_parse_from(["applog", "emit", "error", "disk full"]).unwrap();
        match cli.command {
            Some(Commands::Emit { level, message, debug }) => {
                assert_eq!(level, Level::Error);
                assert_eq!(message, "disk full");
                assert!(!debug);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn rejects_unknown_level() {
        assert!(Cli::try_parse_from(["applog", "emit", "loud", "x"]).is_err());
    }

    #[test]
    fn global_config_flag() {
        let cli = Cli::try_parse_from(["applog", "config", "show", "--config", "/tmp/a.yaml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/a.yaml")));
    }
}
