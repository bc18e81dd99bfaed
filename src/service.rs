//! End-to-end submission workflow: validate, transform, submit.

use crate::clients::SubmissionClient;
use crate::error::{Result, ServiceError};
use crate::models::{FileInfo, IncidentSubmissionRequest, SubmissionResult};
use crate::transform::PayloadTransformer;
use crate::validation::FileValidationService;
use serde_json::json;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub struct IncidentService {
    transformer: PayloadTransformer,
    file_service: FileValidationService,
    client: Arc<dyn SubmissionClient>,
}

impl IncidentService {
    pub fn new(client: Arc<dyn SubmissionClient>) -> Self {
        Self {
            transformer: PayloadTransformer::new(),
            file_service: FileValidationService::new(),
            client,
        }
    }

    /// Run one complete submission attempt under the given correlation id.
    pub async fn submit_incident(
        &self,
        request: &IncidentSubmissionRequest,
        correlation_id: &str,
    ) -> Result<SubmissionResult> {
        info!(
            correlation_id,
            caller = %format!("{} {}", request.user_data.first_name, request.user_data.last_name),
            category = %request.category.name,
            has_file = request.extra_files.is_some(),
            "Starting incident submission"
        );

        // 1. Validate and decode the attachment if present
        let mut multipart_file = None;
        let mut file_info = None;
        if let Some(image) = &request.extra_files {
            let validation = self.file_service.validate_file(image);
            if !validation.is_valid {
                return Err(ServiceError::Validation(validation.errors.join(", ")));
            }
            multipart_file = Some(self.file_service.prepare_multipart_file(image)?);
            file_info = Some(FileInfo {
                filename: image.filename.clone(),
                content_type: image.content_type.clone(),
                size: image.size,
            });
            info!(
                correlation_id,
                filename = %image.filename,
                size = image.size,
                "File validated successfully"
            );
        }

        // 2. Transform to the fixed upstream payload
        let payload = self.transformer.transform(request)?;
        info!(
            correlation_id,
            description = %payload.event_call_desc.chars().take(50).collect::<String>(),
            "Payload transformed"
        );

        // 3. Submit through the configured backend
        let api_response = self
            .client
            .submit(&payload, multipart_file.as_ref())
            .await?;

        info!(
            correlation_id,
            ticket_id = %api_response.data,
            status = %api_response.result_status,
            "Submission successful"
        );

        Ok(SubmissionResult {
            success: true,
            ticket_id: api_response.data,
            correlation_id: correlation_id.to_string(),
            has_file: request.extra_files.is_some(),
            file_info,
            metadata: Some(json!({
                "backend": self.client.backend_name(),
                "upstream_status": api_response.result_status,
                "file_processed": multipart_file.is_some(),
            })),
        })
    }
}

/// Generate a correlation id for one inbound request.
pub fn generate_correlation_id() -> String {
    Uuid::new_v4().to_string()
}
