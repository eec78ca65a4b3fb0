// NOTE: Engine layering
//
// Everything in this crate is synchronous and free of I/O. The network call
// happens outside (see the CLI's query service); results come back in as
// plain values tagged with the ticket that requested them.
//
// - reshape:   TimeSeriesResult -> ChartSeries (pure)
// - panel:     RequestState -> PanelLayout (pure)
// - lifecycle: PanelLayout -> live chart objects, one owned slot per panel
// - state:     idle/loading/success/error with generation-based staleness
// - dashboard: the above wired together for a single control thread

pub mod dashboard;
pub mod lifecycle;
pub mod panel;
pub mod reshape;
pub mod state;

pub use dashboard::Dashboard;
pub use lifecycle::{ChartBackend, ChartLifecycle, SurfaceSlot};
pub use panel::{PROGRESS_TEXT, PROMPT_TEXT, PanelId, PanelLayout, PanelSpec, compose};
pub use reshape::{
    ChartSeries, Rgb, SeriesStyle, ShapeMismatch, alignment_report, axis_bounds,
    format_axis_label, format_readout, to_decomposition_series, to_original_series,
};
pub use state::{RequestMachine, RequestState, Resolution, Ticket};
