use std::path::Path;

use anyhow::Result;

use super::args::{Cli, Commands};
use super::handlers::{self, HandlerContext};
use crate::config::{CONFIG_FILE, Config, resolve_data_dir};
use crate::logging;

pub fn run(cli: Cli) -> Result<()> {
    let data_dir = resolve_data_dir(cli.data_dir.as_deref())?;

    let Some(command) = cli.command else {
        show_guidance(&data_dir);
        return Ok(());
    };

    // The dashboard owns the terminal, so its logs go to a file
    let _log_guard = match &command {
        Commands::Dashboard { .. } => {
            Some(logging::init_file(cli.log_level, &data_dir.join("logs"))?)
        }
        _ => {
            logging::init_stderr(cli.log_level);
            None
        }
    };

    let config = Config::load_from(&data_dir.join(CONFIG_FILE))?.with_api_override(cli.api_url);
    let ctx = HandlerContext::new(data_dir, config, cli.format);

    match command {
        Commands::Upload { file } => handlers::upload::handle(&ctx, &file),

        Commands::Insights => handlers::insights::handle(&ctx),

        Commands::Timeseries {
            metric,
            start_date,
            end_date,
            decompose,
        } => {
            let mut selection = ctx.selection(metric, decompose);
            selection.set_start_date(start_date.unwrap_or_default());
            selection.set_end_date(end_date.unwrap_or_default());
            handlers::timeseries::handle(&ctx, selection)
        }

        Commands::Metrics => handlers::metrics::handle(ctx.format),

        Commands::Dashboard {
            upload,
            metric,
            decompose,
        } => {
            let selection = ctx.selection(metric, decompose);
            handlers::dashboard::handle(&ctx, selection, upload)
        }

        Commands::Config { init } => handlers::config::handle(&ctx, init),
    }
}

fn show_guidance(data_dir: &Path) {
    let config_exists = data_dir.join(CONFIG_FILE).exists();

    println!("healthlens - Health export analytics in the terminal\n");

    if !config_exists {
        println!("Get started:");
        println!("  healthlens config --init                 # Write a default config");
        println!("  healthlens upload export.xml             # Load an Apple Health export\n");
    }

    println!("Quick commands:");
    println!("  healthlens dashboard                     # Interactive dashboard");
    println!("  healthlens insights                      # Summaries and correlations");
    println!("  healthlens timeseries --metric HeartRate # One metric as a table");
    println!("  healthlens metrics                       # Metrics you can chart\n");

    println!("For more commands:");
    println!("  healthlens --help");
}
