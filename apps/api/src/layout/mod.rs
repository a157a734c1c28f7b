// Report layout: declarative template, Helvetica metrics and the flow engine
// that turns a session into positioned pages. CPU-bound work here must run
// inside tokio::task::spawn_blocking when called from a handler.

pub mod engine;
pub mod font_metrics;
pub mod template;

// Re-export the public API consumed by other modules (render, state, main).
pub use font_metrics::{letter_page_config, PageConfig};
pub use template::{weekly_report_template, ReportTemplate};
