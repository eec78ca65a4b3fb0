use std::io::Write;

use anyhow::Result;

use super::HandlerContext;
use crate::config::{CONFIG_FILE, Config};
use crate::types::OutputFormat;

pub fn handle(ctx: &HandlerContext, init: bool) -> Result<()> {
    let config_path = ctx.data_dir.join(CONFIG_FILE);
    let mut out = std::io::stdout().lock();

    if init {
        if config_path.exists() {
            writeln!(out, "Config already exists: {}", config_path.display())?;
        } else {
            Config::default().save_to(&config_path)?;
            writeln!(out, "Wrote {}", config_path.display())?;
        }
        return Ok(());
    }

    match ctx.format {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "data_dir": ctx.data_dir,
                "config_file": config_path,
                "config_file_exists": config_path.exists(),
                "config": ctx.config,
            });
            serde_json::to_writer_pretty(&mut out, &value)?;
            writeln!(out)?;
        }
        OutputFormat::Plain | OutputFormat::Csv => {
            let status = if config_path.exists() {
                ""
            } else {
                " (not found, using defaults)"
            };
            writeln!(out, "Data directory: {}", ctx.data_dir.display())?;
            writeln!(out, "Config file:    {}{}", config_path.display(), status)?;
            writeln!(out)?;
            write!(out, "{}", toml::to_string_pretty(&ctx.config)?)?;
        }
    }
    Ok(())
}
