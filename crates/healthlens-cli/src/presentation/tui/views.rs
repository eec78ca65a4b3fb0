//! Dashboard widgets.

use healthlens_engine::{PROGRESS_TEXT, PROMPT_TEXT, PanelLayout, RequestState};
use healthlens_types::{InsightsData, Metric, QuerySelection, humanize};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Axis, Block, Borders, Chart, Clear, Dataset, GraphType, LegendPosition, Paragraph, Widget,
        Wrap,
    },
};

use super::app::{DataPhase, Focus};
use super::charts::PreparedChart;

fn rgb(color: healthlens_engine::Rgb) -> Color {
    Color::Rgb(color.0, color.1, color.2)
}

fn key_hint(key: &'static str) -> Span<'static> {
    Span::styled(key, Style::default().fg(Color::Yellow))
}

/// Metric picker, date range, decompose toggle and the analyze button
pub struct QueryFormView<'a> {
    selection: &'a QuerySelection,
    focus: Focus,
    loading: bool,
    enabled: bool,
}

impl<'a> QueryFormView<'a> {
    pub fn new(selection: &'a QuerySelection, focus: Focus, loading: bool, enabled: bool) -> Self {
        Self {
            selection,
            focus,
            loading,
            enabled,
        }
    }

    fn field(&self, field: Focus, text: String) -> Span<'static> {
        let style = if self.focus == field {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default().fg(Color::White)
        };
        Span::styled(text, style)
    }
}

impl Widget for QueryFormView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let metric = match self.selection.metric().parse::<Metric>() {
            Ok(metric) => metric.label(),
            Err(_) => humanize(self.selection.metric()),
        };
        let date = |value: &str| {
            if value.is_empty() {
                "YYYY-MM-DD".to_string()
            } else {
                format!("{:<10}", value)
            }
        };
        let check = if self.selection.decompose() { "[x]" } else { "[ ]" };

        let button = if self.loading {
            Span::styled(" Loading... ", Style::default().fg(Color::DarkGray))
        } else if self.enabled {
            Span::styled(
                " Analyze ",
                Style::default().fg(Color::Black).bg(Color::Cyan),
            )
        } else {
            Span::styled(" Analyze ", Style::default().fg(Color::DarkGray))
        };

        let line = Line::from(vec![
            Span::raw("Metric "),
            self.field(Focus::Metric, format!("< {} >", metric)),
            Span::raw("  Start "),
            self.field(Focus::StartDate, date(self.selection.start_date())),
            Span::raw("  End "),
            self.field(Focus::EndDate, date(self.selection.end_date())),
            Span::raw("  "),
            self.field(Focus::Decompose, format!("{} Decompose", check)),
            Span::raw("   "),
            button,
        ]);

        Paragraph::new(line)
            .block(Block::default().title("Query").borders(Borders::ALL))
            .render(area, buf);
    }
}

/// Summary statistics and correlations for the loaded export
pub struct InsightsView<'a> {
    phase: &'a DataPhase,
}

/// Correlation pairs are laid out in this many columns when sizing the pane
const CORRELATION_COLUMNS: usize = 2;

impl<'a> InsightsView<'a> {
    pub fn new(phase: &'a DataPhase) -> Self {
        Self { phase }
    }

    /// Rows needed to show every summary entry, borders included
    pub fn height(&self) -> u16 {
        match self.phase {
            DataPhase::Ready(insights) => {
                let correlation_rows = insights.correlations.len().div_ceil(CORRELATION_COLUMNS);
                let rows = insights.summary.len().max(correlation_rows).max(1);
                // header row plus top and bottom border
                u16::try_from(rows + 3).unwrap_or(u16::MAX)
            }
            DataPhase::Failed(_) => 4,
            DataPhase::Uploading | DataPhase::LoadingInsights => 3,
        }
    }
}

impl Widget for InsightsView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default().title("Insights").borders(Borders::ALL);

        let insights = match self.phase {
            DataPhase::Ready(insights) => insights,
            DataPhase::Uploading => {
                Paragraph::new("Uploading export...")
                    .block(block)
                    .render(area, buf);
                return;
            }
            DataPhase::LoadingInsights => {
                Paragraph::new("Loading insights...")
                    .block(block)
                    .render(area, buf);
                return;
            }
            DataPhase::Failed(message) => {
                Paragraph::new(Span::styled(
                    message.as_str(),
                    Style::default().fg(Color::Red),
                ))
                .wrap(Wrap { trim: true })
                .block(block)
                .render(area, buf);
                return;
            }
        };

        let inner = block.inner(area);
        block.render(area, buf);

        let [summary, correlations] =
            Layout::horizontal([Constraint::Length(52), Constraint::Min(0)]).areas(inner);

        Paragraph::new(summary_lines(insights)).render(summary, buf);
        render_correlations(insights, correlations, buf);
    }
}

/// Correlations flow top to bottom, then into the next column
fn render_correlations(insights: &InsightsData, area: Rect, buf: &mut Buffer) {
    let [header, body] = Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);

    Paragraph::new(Span::styled(
        "Correlations",
        Style::default().add_modifier(Modifier::BOLD),
    ))
    .render(header, buf);

    let rows = body.height as usize;
    let entries = correlation_lines(insights);
    if rows == 0 || entries.is_empty() {
        return;
    }

    let columns: Vec<&[Line<'static>]> = entries.chunks(rows).collect();
    let areas = Layout::horizontal(vec![
        Constraint::Ratio(1, columns.len() as u32);
        columns.len()
    ])
    .split(body);

    for (column, column_area) in columns.into_iter().zip(areas.iter()) {
        Paragraph::new(column.to_vec()).render(*column_area, buf);
    }
}

fn summary_lines(insights: &InsightsData) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        format!("{:<20}{:>10}{:>10}{:>10}", "Summary", "mean", "min", "max"),
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    for (name, s) in &insights.summary {
        lines.push(Line::from(format!(
            "{:<20}{:>10.2}{:>10.2}{:>10.2}",
            humanize(name),
            s.mean,
            s.min,
            s.max
        )));
    }
    lines
}

fn correlation_lines(insights: &InsightsData) -> Vec<Line<'static>> {
    let mut lines = Vec::with_capacity(insights.correlations.len());
    for (pair, value) in &insights.correlations {
        let style = if InsightsData::is_strong(*value) {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::raw(format!("{:<34}", humanize(pair))),
            Span::styled(format!("{:>8.2}", value), style),
        ]));
    }
    lines
}

/// Centered text for the prompt, progress and error placeholders
pub struct PlaceholderView<'a> {
    layout: &'a PanelLayout,
}

impl<'a> PlaceholderView<'a> {
    pub fn new(layout: &'a PanelLayout) -> Self {
        Self { layout }
    }
}

impl Widget for PlaceholderView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (text, style) = match self.layout {
            PanelLayout::Prompt => (PROMPT_TEXT, Style::default().fg(Color::Gray)),
            PanelLayout::Progress => (PROGRESS_TEXT, Style::default().fg(Color::Yellow)),
            PanelLayout::Message(msg) => (msg.as_str(), Style::default().fg(Color::Red)),
            PanelLayout::Panels(_) => ("", Style::default()),
        };

        let block = Block::default().title("Time Series").borders(Borders::ALL);
        let inner = block.inner(area);
        block.render(area, buf);

        let rows = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .split(inner);

        Paragraph::new(Span::styled(text, style))
            .alignment(Alignment::Center)
            .render(rows[1], buf);
    }
}

/// One bound chart panel with an optional cursor readout
pub struct ChartPanelView<'a> {
    chart: &'a PreparedChart,
    cursor: Option<usize>,
}

impl<'a> ChartPanelView<'a> {
    pub fn new(chart: &'a PreparedChart, cursor: Option<usize>) -> Self {
        Self { chart, cursor }
    }
}

impl Widget for ChartPanelView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chart = self.chart;
        let cursor = self.cursor.filter(|i| *i < chart.len());

        let mut block = Block::default()
            .title(chart.title.as_str())
            .borders(Borders::ALL);
        if let Some(i) = cursor {
            block = block.title_bottom(chart.readout(i).join("   "));
        }

        // Points stay alive for the render call below
        let cursor_points: Vec<[(f64, f64); 1]> = match cursor {
            Some(i) => chart
                .series
                .iter()
                .filter_map(|s| s.values.get(i).copied().flatten().map(|v| [(i as f64, v)]))
                .collect(),
            None => Vec::new(),
        };

        let mut datasets = Vec::with_capacity(chart.series.len() * 2 + cursor_points.len());
        for s in &chart.series {
            let color = rgb(s.style.color);
            let marker = if s.style.dashed {
                Marker::Dot
            } else {
                Marker::Braille
            };
            let graph_type = if s.style.fill {
                GraphType::Bar
            } else {
                GraphType::Line
            };
            datasets.push(
                Dataset::default()
                    .name(s.label.as_str())
                    .marker(marker)
                    .graph_type(graph_type)
                    .style(Style::default().fg(color))
                    .data(&s.points),
            );
            if s.style.point_radius > 0 {
                datasets.push(
                    Dataset::default()
                        .marker(Marker::Dot)
                        .graph_type(GraphType::Scatter)
                        .style(Style::default().fg(color))
                        .data(&s.points),
                );
            }
        }
        for point in &cursor_points {
            datasets.push(
                Dataset::default()
                    .marker(Marker::Block)
                    .graph_type(GraphType::Scatter)
                    .style(Style::default().fg(Color::Yellow))
                    .data(point),
            );
        }

        let axis_style = Style::default().fg(Color::DarkGray);
        Chart::new(datasets)
            .block(block)
            .legend_position(Some(LegendPosition::TopRight))
            .x_axis(
                Axis::default()
                    .style(axis_style)
                    .bounds(chart.x_bounds)
                    .labels(chart.x_labels.iter().map(String::as_str)),
            )
            .y_axis(
                Axis::default()
                    .style(axis_style)
                    .bounds(chart.y_bounds)
                    .labels(chart.y_labels.iter().map(String::as_str)),
            )
            .render(area, buf);
    }
}

/// Bottom status bar: request state, live charts, key hints
pub struct StatusBarView<'a> {
    state: &'a RequestState,
    live_charts: usize,
    notice: Option<&'a str>,
}

impl<'a> StatusBarView<'a> {
    pub fn new(state: &'a RequestState, live_charts: usize, notice: Option<&'a str>) -> Self {
        Self {
            state,
            live_charts,
            notice,
        }
    }
}

impl Widget for StatusBarView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default().borders(Borders::ALL);
        let inner = block.inner(area);
        block.render(area, buf);

        let chunks =
            Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)]).split(inner);

        let state_color = match self.state {
            RequestState::Idle => Color::Gray,
            RequestState::Loading => Color::Yellow,
            RequestState::Success(_) => Color::Green,
            RequestState::Error(_) => Color::Red,
        };

        let mut status = vec![
            Span::styled(self.state.name(), Style::default().fg(state_color)),
            Span::raw(format!(" | charts: {}", self.live_charts)),
        ];
        if let RequestState::Success(result) = self.state {
            status.push(Span::raw(format!(" | points: {}", result.points.len())));
        }
        if let Some(notice) = self.notice {
            status.push(Span::raw(" | "));
            status.push(Span::styled(notice, Style::default().fg(Color::Yellow)));
        }
        Paragraph::new(Line::from(status)).render(chunks[0], buf);

        let help = Line::from(vec![
            key_hint("[Tab]"),
            Span::raw("field "),
            key_hint("[←/→]"),
            Span::raw("change "),
            key_hint("[Space]"),
            Span::raw("toggle "),
            key_hint("[Enter]"),
            Span::raw("analyze "),
            key_hint("[Esc]"),
            Span::raw("quit"),
        ]);
        Paragraph::new(help)
            .alignment(Alignment::Right)
            .render(chunks[1], buf);
    }
}

/// Transient upload confirmation, drawn over the top-right corner
pub struct ToastView<'a> {
    message: &'a str,
}

impl<'a> ToastView<'a> {
    pub fn new(message: &'a str) -> Self {
        Self { message }
    }

    pub fn area(&self, screen: Rect) -> Rect {
        let width = (self.message.chars().count() as u16 + 4).min(screen.width);
        let height = 3.min(screen.height);
        Rect {
            x: screen.x + screen.width - width,
            y: screen.y,
            width,
            height,
        }
    }
}

impl Widget for ToastView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);
        Paragraph::new(Span::styled(self.message, Style::default().fg(Color::Green)))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Green)),
            )
            .render(area, buf);
    }
}
