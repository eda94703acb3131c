mod auth_commands;
mod config_commands;

use std::path::PathBuf;

use {
    clap::{Parser, Subcommand},
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "forcelink", about = "Forcelink, a Salesforce OAuth2 login gateway")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Path to a TOML config file. Defaults to `forcelink.toml` in the user config dir.
    #[arg(long, global = true, env = "FORCELINK_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the gateway server.
    Gateway {
        /// Overrides `server.bind`.
        #[arg(long)]
        bind: Option<String>,
        /// Overrides `server.port`.
        #[arg(long)]
        port: Option<u16>,
    },
    /// Connected-app diagnostics.
    Auth {
        #[command(subcommand)]
        action: auth_commands::AuthAction,
    },
    /// Configuration management.
    Config {
        #[command(subcommand)]
        action: config_commands::ConfigAction,
    },
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "forcelink starting");

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Gateway { bind, port } => {
            let config = forcelink_config::load(config_path)?;
            let bind = bind.unwrap_or_else(|| config.server.bind.clone());
            let port = port.unwrap_or(config.server.port);
            forcelink_gateway::start_gateway(&config, &bind, port).await
        },
        Commands::Auth { action } => auth_commands::handle_auth(action, config_path).await,
        Commands::Config { action } => config_commands::handle_config(action, config_path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_flags_are_optional() {
        let cli = Cli::try_parse_from(["forcelink", "gateway"]).unwrap();
        assert!(matches!(cli.command, Commands::Gateway {
            bind: None,
            port: None
        }));

        let cli =
            Cli::try_parse_from(["forcelink", "gateway", "--bind", "0.0.0.0", "--port", "8080"])
                .unwrap();
        match cli.command {
            Commands::Gateway { bind, port } => {
                assert_eq!(bind.as_deref(), Some("0.0.0.0"));
                assert_eq!(port, Some(8080));
            },
            _ => panic!("expected gateway command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "forcelink",
            "config",
            "check",
            "--config",
            "/tmp/forcelink.toml",
            "--json-logs",
        ])
        .unwrap();
        assert!(cli.json_logs);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/forcelink.toml")));
    }

    #[test]
    fn test_rejects_invalid_port() {
        assert!(Cli::try_parse_from(["forcelink", "gateway", "--port", "99999"]).is_err());
    }
}
