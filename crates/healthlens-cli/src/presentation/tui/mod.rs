//! Interactive dashboard.
//!
//! One thread owns the [`App`]: it draws, reads keys, applies background
//! completions and ticks the toast clock. Network calls run on the tokio
//! runtime and report back over channels.

pub mod app;
pub mod charts;
pub mod terminal;
pub mod views;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event};
use healthlens_client::AnalyticsClient;
use healthlens_engine::PanelLayout;
use healthlens_types::QuerySelection;
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
};
use tokio::runtime::Handle;

use crate::services::QueryService;
use terminal::TerminalSession;
pub use app::{App, AppEvent, DataPhase, Focus, FollowUp};
use views::{
    ChartPanelView, InsightsView, PlaceholderView, QueryFormView, StatusBarView, ToastView,
};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Run the dashboard until the user quits
pub fn run(
    client: AnalyticsClient,
    runtime: Handle,
    selection: QuerySelection,
    upload: Option<PathBuf>,
) -> Result<()> {
    let client = Arc::new(client);
    let (tx, rx) = mpsc::channel();

    let queries = QueryService::new(Arc::clone(&client), runtime.clone());
    let phase = if upload.is_some() {
        DataPhase::Uploading
    } else {
        DataPhase::LoadingInsights
    };
    let mut app = App::new(selection, queries, phase);

    match upload {
        Some(path) => spawn_upload(&client, &runtime, &tx, path),
        None => spawn_insights(&client, &runtime, &tx),
    }

    let mut session = TerminalSession::enter()?;
    let result = event_loop(
        session.terminal_mut(),
        &mut app,
        &rx,
        &client,
        &runtime,
        &tx,
    );

    app.shutdown();
    drop(session);
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<AnalyticsClient>,
    rx: &Receiver<AppEvent>,
    client: &Arc<AnalyticsClient>,
    runtime: &Handle,
    tx: &Sender<AppEvent>,
) -> Result<()> {
    loop {
        terminal.draw(|f| render(f, app))?;

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }

        while let Ok(app_event) = rx.try_recv() {
            if let Some(FollowUp::LoadInsights) = app.handle_event(app_event) {
                spawn_insights(client, runtime, tx);
            }
        }

        app.tick(Instant::now());

        if app.should_quit() {
            break;
        }
    }

    Ok(())
}

fn spawn_upload(
    client: &Arc<AnalyticsClient>,
    runtime: &Handle,
    tx: &Sender<AppEvent>,
    path: PathBuf,
) {
    let client = Arc::clone(client);
    let tx = tx.clone();
    runtime.spawn(async move {
        let result = client.upload(&path).await;
        let _ = tx.send(AppEvent::Uploaded(result));
    });
}

fn spawn_insights(client: &Arc<AnalyticsClient>, runtime: &Handle, tx: &Sender<AppEvent>) {
    let client = Arc::clone(client);
    let tx = tx.clone();
    runtime.spawn(async move {
        let result = client.fetch_insights().await;
        let _ = tx.send(AppEvent::Insights(result));
    });
}

fn render<S>(f: &mut Frame, app: &App<S>)
where
    S: healthlens_client::TimeSeriesSource + 'static,
{
    let size = f.area();

    let insights = InsightsView::new(app.phase());
    let insights_height = insights.height().min(size.height / 2);

    // [Insights | Query form | Time series | Status bar]
    let chunks = Layout::vertical([
        Constraint::Length(insights_height),
        Constraint::Length(3),
        Constraint::Min(8),
        Constraint::Length(3),
    ])
    .split(size);

    f.render_widget(insights, chunks[0]);
    f.render_widget(
        QueryFormView::new(
            app.selection(),
            app.focus(),
            app.state().is_loading(),
            app.can_query(),
        ),
        chunks[1],
    );
    render_series_area(f, app, chunks[2]);
    f.render_widget(
        StatusBarView::new(
            app.state(),
            app.dashboard().charts().live_count(),
            app.notice(),
        ),
        chunks[3],
    );

    if let Some(toast) = app.toast() {
        let view = ToastView::new(&toast.message);
        let area = view.area(size);
        f.render_widget(view, area);
    }
}

fn render_series_area<S>(f: &mut Frame, app: &App<S>, area: Rect)
where
    S: healthlens_client::TimeSeriesSource + 'static,
{
    let layout = app.dashboard().layout();
    let panels = match layout {
        PanelLayout::Panels(panels) => panels,
        placeholder => {
            f.render_widget(PlaceholderView::new(placeholder), area);
            return;
        }
    };

    let cursor = (app.focus() == Focus::Charts).then_some(app.cursor);

    let areas: Vec<Rect> = if panels.len() > 1 {
        let rows = Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);
        let decomposed = panels.len() - 1;
        let columns = Layout::horizontal(vec![
            Constraint::Ratio(1, decomposed as u32);
            decomposed
        ])
        .split(rows[1]);
        std::iter::once(rows[0])
            .chain(columns.iter().copied())
            .collect()
    } else {
        vec![area]
    };

    for (spec, panel_area) in panels.iter().zip(areas) {
        if let Some(chart) = app.chart(spec.id) {
            f.render_widget(ChartPanelView::new(chart, cursor), panel_area);
        }
    }
}
