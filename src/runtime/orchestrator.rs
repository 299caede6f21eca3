use anyhow::Result;
use colored::Colorize;
use tracing::{debug, info};

use crate::{
    app::{load_config, load_config_file, AppContext, Config},
    cli::{handle_command, Cli},
};

/// Main runtime orchestrator
pub struct Orchestrator {
    cli: Cli,
    config: Config,
}

impl Orchestrator {
    /// Create a new orchestrator from CLI args
    pub fn new(cli: Cli) -> Result<Self> {
        // Load configuration
        let mut config = if let Some(config_path) = &cli.config {
            load_config_file(config_path)?
        } else {
            match load_config() {
                Ok(cfg) => cfg,
                Err(e) => {
                    eprintln!("{} Failed to load config: {}. Using defaults.", "Warning:".yellow(), e);
                    Config::default()
                }
            }
        };

        // CLI flags override every file and environment layer
        if let Some(url) = &cli.api_url {
            config.api.base_url = url.clone();
        }
        if cli.ephemeral {
            config.storage.ephemeral = true;
        }

        Ok(Self { cli, config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Restore the session, then run the requested command
    ///
    /// Returns `false` when the command ended in a reported error.
    pub async fn run(self) -> Result<bool> {
        debug!("Using backend at {}", self.config.api.base_url);
        let context = AppContext::new(self.config)?;

        // nothing may be routed or attributed before this resolves
        let state = context.start().await;
        info!("Session ready: {:?}", state.phase());

        handle_command(&self.cli.command, &context, self.cli.output_format).await
    }
}
