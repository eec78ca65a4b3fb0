use is_terminal::IsTerminal;
use std::path::PathBuf;

use anyhow::{Context, Result};
use healthlens_client::AnalyticsClient;
use healthlens_types::QuerySelection;
use tokio::runtime::Runtime;

use crate::config::Config;
use crate::types::OutputFormat;

/// Everything a handler needs besides its own arguments
pub struct HandlerContext {
    pub data_dir: PathBuf,
    pub config: Config,
    pub format: OutputFormat,
}

impl HandlerContext {
    pub fn new(data_dir: PathBuf, config: Config, format: OutputFormat) -> Self {
        Self {
            data_dir,
            config,
            format,
        }
    }

    pub fn client(&self) -> Result<AnalyticsClient> {
        let client = AnalyticsClient::new(self.config.client_options())?;
        tracing::debug!(base_url = client.base_url(), "analytics client ready");
        Ok(client)
    }

    pub fn runtime(&self) -> Result<Runtime> {
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .context("Failed to start async runtime")
    }

    /// Colors only for plain output on a terminal
    pub fn color(&self) -> bool {
        self.format == OutputFormat::Plain && std::io::stdout().is_terminal()
    }

    /// Initial selection: explicit metric, then the configured default
    pub fn selection(&self, metric: Option<String>, decompose: bool) -> QuerySelection {
        let mut selection = match metric.or_else(|| self.config.default_metric.clone()) {
            Some(metric) => QuerySelection::new(metric),
            None => QuerySelection::default(),
        };
        selection.set_decompose(decompose);
        selection
    }
}
