use anyhow::Result;

use crate::presentation::console::write_metrics;
use crate::types::OutputFormat;

pub fn handle(format: OutputFormat) -> Result<()> {
    let mut out = std::io::stdout().lock();
    write_metrics(&mut out, format)
}
