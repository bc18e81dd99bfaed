//! Submission backends for the upstream incident system.

pub mod mock;
pub mod sharepoint;

use crate::config::AppConfig;
use crate::error::Result;
use crate::models::{ApiPayload, ApiResponse};
use crate::validation::MultipartFile;
use std::sync::Arc;
use tracing::info;

/// Common contract for submitting one transformed payload (plus optional
/// attachment) to the incident system. Implemented by the real SharePoint
/// client and the in-process mock; the backend is selected once at startup.
#[async_trait::async_trait]
pub trait SubmissionClient: Send + Sync {
    fn backend_name(&self) -> &'static str;

    async fn submit(
        &self,
        payload: &ApiPayload,
        file: Option<&MultipartFile>,
    ) -> Result<ApiResponse>;
}

/// Create the submission backend configured for this process.
pub fn create_submission_client(config: &AppConfig) -> Result<Arc<dyn SubmissionClient>> {
    if config.debug_mode {
        info!("Debug mode enabled - using mock submission backend");
        Ok(Arc::new(mock::MockSharePointClient::new()))
    } else {
        info!("Production mode - using SharePoint submission backend");
        Ok(Arc::new(sharepoint::SharePointClient::new(config)?))
    }
}
