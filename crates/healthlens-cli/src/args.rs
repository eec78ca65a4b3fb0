use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::types::{LogLevel, OutputFormat};

#[derive(Parser)]
#[command(name = "healthlens")]
#[command(about = "Explore health-export analytics from the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Data directory holding config.toml and logs
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    /// Analytics service base URL (overrides config and HEALTHLENS_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[arg(long, default_value = "plain", global = true)]
    pub format: OutputFormat,

    #[arg(long, default_value = "warn", global = true)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Upload an Apple Health export.xml to the analytics service
    Upload {
        /// Path to export.xml
        file: PathBuf,
    },

    /// Show metric summaries and correlations
    Insights,

    /// Fetch one metric's time series, optionally decomposed
    Timeseries {
        /// Metric identifier (see `healthlens metrics`)
        #[arg(long)]
        metric: Option<String>,

        /// Inclusive start date, passed to the service as typed
        #[arg(long)]
        start_date: Option<String>,

        /// Inclusive end date, passed to the service as typed
        #[arg(long)]
        end_date: Option<String>,

        /// Include trend/seasonal/residual components
        #[arg(long)]
        decompose: bool,
    },

    /// List the metrics the dashboard can chart
    Metrics,

    /// Interactive dashboard
    Dashboard {
        /// Upload this export before loading insights
        #[arg(long)]
        upload: Option<PathBuf>,

        /// Initially selected metric
        #[arg(long)]
        metric: Option<String>,

        /// Start with decomposition enabled
        #[arg(long)]
        decompose: bool,
    },

    /// Show the effective configuration
    Config {
        /// Write a default config.toml if none exists
        #[arg(long)]
        init: bool,
    },
}
