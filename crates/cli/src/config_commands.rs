use std::path::Path;

use {anyhow::Result, clap::Subcommand, tracing::info};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration with secrets redacted.
    Show,
    /// Validate the configuration and exit non-zero on failure.
    Check,
}

pub fn handle_config(action: ConfigAction, config_path: Option<&Path>) -> Result<()> {
    let config = forcelink_config::load(config_path)?;
    match action {
        ConfigAction::Show => {
            println!("{}", serde_json::to_string_pretty(&config.redacted())?);
        },
        ConfigAction::Check => {
            info!(
                client_id = %config.salesforce.client_id,
                callback_url = %config.salesforce.callback_url,
                "configuration is valid"
            );
            println!("Configuration OK");
        },
    }
    Ok(())
}
