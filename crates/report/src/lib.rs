pub mod summary;
pub mod display;

pub use summary::{SummaryReport, HIRING_DISPLAY_LIMIT};
pub use display::{render_progress, render_startup, render_summary, NOTHING_TO_ANALYZE};
