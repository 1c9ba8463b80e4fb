use std::sync::Arc;

use crate::analysis::service::ResumeAnalyzer;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Extraction, structuring and matching. Immutable; shared across requests.
    pub analyzer: Arc<ResumeAnalyzer>,
}
