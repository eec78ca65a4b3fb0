use std::io::Write;
use std::path::Path;

use anyhow::Result;
use owo_colors::OwoColorize;

use super::HandlerContext;
use crate::types::OutputFormat;

pub fn handle(ctx: &HandlerContext, file: &Path) -> Result<()> {
    let client = ctx.client()?;
    let runtime = ctx.runtime()?;

    let response = runtime.block_on(client.upload(file))?;
    tracing::info!(records = response.records_loaded, "export uploaded");

    let mut out = std::io::stdout().lock();
    match ctx.format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &response)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(out);
            writer.write_record(["status", "records_loaded", "message"])?;
            writer.write_record([
                response.status.as_str(),
                response.records_loaded.to_string().as_str(),
                response.message.as_str(),
            ])?;
            writer.flush()?;
        }
        OutputFormat::Plain if ctx.color() => {
            writeln!(out, "{}", response.summary().green())?;
        }
        OutputFormat::Plain => {
            writeln!(out, "{}", response.summary())?;
        }
    }
    Ok(())
}
