use std::path::PathBuf;

use agreement_mock::config::{ConfigStore, MockConfig, DEFAULT_CONFIG_FILE};
use agreement_mock::operation::Operation;
use agreement_mock::store::MockStore;
use agreement_mock::transport::{create_transport, GraphQlRequest, GraphQlResponse};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    #[clap(short, long, global = true)]
    log_level: Option<String>,
    /// JSON file holding the persisted mock settings
    #[clap(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the mock schema over HTTP
    #[cfg(feature = "server")]
    Serve {
        #[clap(short, long, default_value = "8080")]
        port: u16,
        #[clap(long)]
        cors_origin: Option<String>,
    },
    /// Run one GraphQL document and print the response
    Exec {
        file: PathBuf,
        #[clap(long)]
        variables: Option<String>,
        #[clap(long)]
        operation_name: Option<String>,
        /// Used when mocks are disabled
        #[clap(long, default_value = "http://localhost:8080/graphql")]
        endpoint: String,
    },
    Config {
        #[clap(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    Show,
    Enable {
        #[clap(short, long)]
        delay: Option<u64>,
    },
    Disable,
    Delay {
        millis: u64,
    },
    ErrorsOn {
        #[clap(short, long, default_value = "0.1")]
        rate: f64,
    },
    ErrorsOff,
    /// Make one operation always fail with a message
    Fail {
        operation: Operation,
        message: String,
    },
    Unfail {
        operation: Operation,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    setup_logging(&args.log_level);

    let config_store = ConfigStore::new(&args.config);

    match args.command {
        #[cfg(feature = "server")]
        Commands::Serve { port, cors_origin } => {
            let config = config_store.load()?;
            info!("Starting server on port {}", port);
            agreement_mock::server::start_server(port, config, cors_origin.as_deref()).await?;
        }
        Commands::Exec {
            file,
            variables,
            operation_name,
            endpoint,
        } => {
            let query = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let mut request = GraphQlRequest::new(query);
            if let Some(variables) = variables {
                request = request.variables(
                    serde_json::from_str(&variables).context("--variables is not valid JSON")?,
                );
            }
            if let Some(name) = operation_name {
                request = request.operation_name(name);
            }

            let config = config_store.load()?;
            let store = MockStore::seeded()?.into_shared();
            let transport = create_transport(config, store, &endpoint)?;

            match transport.request(request).await {
                Ok(response) => println!("{}", serde_json::to_string_pretty(&response)?),
                Err(e) => {
                    let envelope = GraphQlResponse::from_error(&e);
                    println!("{}", serde_json::to_string_pretty(&envelope)?);
                    bail!("request failed with {}", e.error_code());
                }
            }
        }
        Commands::Config { command } => {
            let config = run_config_command(&config_store, command)?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

fn run_config_command(store: &ConfigStore, command: ConfigCommands) -> Result<MockConfig> {
    info!("Config command {:?} on {}", command, store.path().display());

    let config = match command {
        ConfigCommands::Show => store.load()?,
        ConfigCommands::Enable { delay } => store.update(|c| {
            c.enable_mocks();
            if let Some(delay) = delay {
                c.set_delay(delay);
            }
        })?,
        ConfigCommands::Disable => store.update(MockConfig::disable_mocks)?,
        ConfigCommands::Delay { millis } => store.update(|c| c.set_delay(millis))?,
        ConfigCommands::ErrorsOn { rate } => store.update(|c| c.enable_errors(rate))?,
        ConfigCommands::ErrorsOff => store.update(MockConfig::disable_errors)?,
        ConfigCommands::Fail { operation, message } => {
            store.update(|c| c.set_specific_error(operation.field_name(), message))?
        }
        ConfigCommands::Unfail { operation } => store.update(|c| {
            c.clear_specific_error(operation.field_name());
        })?,
    };

    Ok(config)
}

fn setup_logging(log_level: &Option<String>) {
    let log_level = match log_level
        .as_ref()
        .unwrap_or(&"info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!("tower_http=warn,{}", log_level)))
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_command(args: &[&str]) -> Option<ConfigCommands> {
        let args = ["agreement-mock", "config"].iter().chain(args);
        match Cli::try_parse_from(args).ok()?.command {
            Commands::Config { command } => Some(command),
            _ => None,
        }
    }

    #[test]
    fn test_fail_and_unfail_reject_unknown_operations() {
        assert!(config_command(&["fail", "createAgrement", "down"]).is_none());
        assert!(config_command(&["unfail", "createAgrement"]).is_none());
    }

    #[test]
    fn test_fail_then_unfail_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("mock.json"));

        let fail = config_command(&["fail", "createAgreement", "Failed to create agreement"]).unwrap();
        let config = run_config_command(&store, fail).unwrap();
        assert_eq!(
            config.error_config.specific_errors.get("createAgreement").map(String::as_str),
            Some("Failed to create agreement")
        );

        let unfail = config_command(&["unfail", "createAgreement"]).unwrap();
        let config = run_config_command(&store, unfail).unwrap();
        assert!(config.error_config.specific_errors.is_empty());
    }
}
