use std::path::PathBuf;

use anyhow::Result;
use healthlens_client::validate_export_file;
use healthlens_types::QuerySelection;

use super::HandlerContext;
use crate::presentation::tui;

pub fn handle(ctx: &HandlerContext, selection: QuerySelection, upload: Option<PathBuf>) -> Result<()> {
    // Reject a bad path before the terminal switches screens
    if let Some(path) = &upload {
        validate_export_file(path)?;
    }

    let client = ctx.client()?;
    let runtime = ctx.runtime()?;

    tracing::info!(
        base_url = client.base_url(),
        metric = selection.metric(),
        "dashboard starting"
    );
    tui::run(client, runtime.handle().clone(), selection, upload)
}
