use crate::config::AppConfig;
use crate::service::IncidentService;
use std::sync::Arc;

/// Shared state for the API server: read-only config plus the submission
/// service with its startup-selected backend.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub service: Arc<IncidentService>,
}
