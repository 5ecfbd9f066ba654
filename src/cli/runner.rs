//! CLI runner - executes commands

use crate::catalog::{discover, Catalog};
use crate::cli::commands::{Cli, Commands};
use crate::config::TapConfig;
use crate::engine::{SyncContext, SyncEngine};
use crate::error::{Error, Result};
use crate::http::GraphqlClient;
use crate::loader::SchemaSet;
use crate::output::MessageWriter;
use crate::shop::fetch_shop;
use crate::state::StateManager;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Discover => self.discover().await,
            Commands::Sync {
                catalog,
                state_output,
            } => {
                self.sync(catalog.as_deref(), state_output.as_deref())
                    .await
            }
        }
    }

    /// Load configuration
    fn load_config(&self) -> Result<TapConfig> {
        // Inline config takes precedence
        if let Some(json_str) = &self.cli.config_json {
            return TapConfig::from_json(json_str);
        }
        if let Some(path) = &self.cli.config {
            return TapConfig::from_file(path);
        }
        Err(Error::config(
            "No configuration provided (use --config or --config-json)",
        ))
    }

    /// Load state
    fn load_state(&self) -> Result<StateManager> {
        // Inline state takes precedence
        if let Some(state_json) = &self.cli.state_json {
            return StateManager::from_json(state_json);
        }
        if let Some(path) = &self.cli.state {
            let contents = fs::read_to_string(path).map_err(|_| Error::FileNotFound {
                path: path.display().to_string(),
            })?;
            return StateManager::from_json(&contents);
        }
        Ok(StateManager::in_memory())
    }

    /// Discovered catalog, or the one given on the command line
    fn load_catalog(&self, path: Option<&Path>) -> Result<Catalog> {
        if let Some(path) = path {
            let contents = fs::read_to_string(path).map_err(|_| Error::FileNotFound {
                path: path.display().to_string(),
            })?;
            return serde_json::from_str(&contents)
                .map_err(|e| Error::config(format!("Invalid catalog JSON: {e}")));
        }

        let schemas = SchemaSet::load(self.cli.schemas_dir.as_deref())?;
        let mut catalog = discover(&schemas.schemas, &schemas.refs)?;
        catalog.select_all();
        Ok(catalog)
    }

    fn has_config(&self) -> bool {
        self.cli.config_json.is_some() || self.cli.config.is_some()
    }

    /// Print the catalog. With a config, the token is checked first.
    async fn discover(&self) -> Result<()> {
        if self.has_config() {
            let client = GraphqlClient::from_config(&self.load_config()?)?;
            info!("Checking token in discover mode");
            fetch_shop(&client).await?;
        } else {
            debug!("No config given, discovering offline");
        }

        let schemas = SchemaSet::load(self.cli.schemas_dir.as_deref())?;
        let catalog = discover(&schemas.schemas, &schemas.refs)?;
        println!("{}", serde_json::to_string_pretty(&catalog)?);
        Ok(())
    }

    /// Run a sync
    async fn sync(&self, catalog: Option<&Path>, state_output: Option<&Path>) -> Result<()> {
        let config = self.load_config()?;
        let catalog = self.load_catalog(catalog)?;
        let mut state = self.load_state()?;
        if let Some(path) = state_output {
            state = state.with_output(path);
        }

        let client = GraphqlClient::from_config(&config)?;
        info!("Syncing from {}", client.endpoint());

        let mut ctx = SyncContext::new(config, catalog, state);
        let mut engine = SyncEngine::new(Arc::new(client), MessageWriter::stdout());
        let stats = engine.run(&mut ctx).await?;

        info!(
            records = stats.records_emitted,
            skipped = stats.records_skipped,
            pages = stats.pages_fetched,
            streams = stats.streams_synced,
            failed = stats.streams_failed,
            duration_ms = stats.duration_ms,
            "Sync complete"
        );
        Ok(())
    }
}
