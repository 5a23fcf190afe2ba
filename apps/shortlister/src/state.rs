use std::sync::Arc;

use tokio::sync::Mutex;

use crate::analysis::AnalysisService;
use crate::workbench::session::Workbench;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable analysis backend. Default: the Gemini client built in `main`.
    pub analyzer: Arc<dyn AnalysisService>,
    /// The one workbench this process serves. Never locked across the analysis call.
    pub workbench: Arc<Mutex<Workbench>>,
}

impl AppState {
    pub fn new(analyzer: Arc<dyn AnalysisService>) -> Self {
        Self {
            analyzer,
            workbench: Arc::new(Mutex::new(Workbench::new())),
        }
    }
}
