use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use healthlens_engine::{Dashboard, RequestState};
use healthlens_types::QuerySelection;

use super::HandlerContext;
use crate::presentation::console::{SeriesTable, write_table};
use crate::presentation::tui::charts::TerminalCharts;
use crate::services::QueryService;

const WAIT_STEP: Duration = Duration::from_millis(250);

/// Run one query through the same dashboard the TUI uses, then print the
/// composed panels as a table
pub fn handle(ctx: &HandlerContext, selection: QuerySelection) -> Result<()> {
    let runtime = ctx.runtime()?;
    let client = Arc::new(ctx.client()?);
    let service = QueryService::new(client, runtime.handle().clone());
    let mut dashboard = Dashboard::new(TerminalCharts::new());

    service.submit(&mut dashboard, &selection)?;
    while dashboard.state().is_loading() {
        service.wait_next(&mut dashboard, WAIT_STEP);
    }

    if let RequestState::Error(message) = dashboard.state() {
        anyhow::bail!("{}", message);
    }

    let table = SeriesTable::from_layout(dashboard.layout());
    dashboard.teardown();

    let Some(table) = table else {
        anyhow::bail!("No data returned for {}", selection.metric());
    };

    let mut out = std::io::stdout().lock();
    write_table(&mut out, &table, ctx.format)
}
