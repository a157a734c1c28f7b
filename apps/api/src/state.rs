use std::sync::Arc;

use crate::config::Config;
use crate::layout::{PageConfig, ReportTemplate};
use crate::llm_client::TextGenerator;
use crate::report::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable generation backend. Default: GeminiClient.
    pub generator: Arc<dyn TextGenerator>,
    pub sessions: SessionStore,
    pub config: Config,
    /// Declarative page layout for the weekly report.
    pub template: Arc<ReportTemplate>,
    /// US letter, 1" margins.
    pub page_config: PageConfig,
}
