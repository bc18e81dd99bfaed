//! Client for the NetanyaMuni SharePoint incidents.ashx endpoint.

use crate::config::AppConfig;
use crate::constants::{
    BROWSER_USER_AGENT, COMPLAINTS_PAGE_URL, MUNICIPALITY_ORIGIN, SERVICES_PAGE_URL,
};
use crate::error::{Result, ServiceError};
use crate::models::{ApiPayload, ApiResponse};
use crate::multipart::build_multipart_request;
use crate::validation::MultipartFile;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, ORIGIN, REFERER, USER_AGENT};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{error, info, warn};

/// Response codes that indicate a transient upstream condition worth retrying.
const RETRYABLE_STATUS: [u16; 5] = [429, 500, 502, 503, 504];

pub struct SharePointClient {
    client: reqwest::Client,
    endpoint_url: String,
    max_retries: u32,
    session_warmup: bool,
}

impl SharePointClient {
    pub fn new(config: &AppConfig) -> Result<Self> {
        // Cookie store holds whatever the edge proxy hands out during warmup
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            endpoint_url: config.netanya_endpoint.clone(),
            max_retries: config.max_retries,
            session_warmup: config.session_warmup,
        })
    }

    /// Headers the upstream endpoint expects on every submission POST.
    fn required_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ORIGIN, HeaderValue::from_static(MUNICIPALITY_ORIGIN));
        headers.insert(REFERER, HeaderValue::from_static(COMPLAINTS_PAGE_URL));
        headers.insert(
            "X-Requested-With",
            HeaderValue::from_static("XMLHttpRequest"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/json;odata=verbose"),
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("he-IL,he;q=0.9,en-US,en;q=0.8"),
        );
        headers
    }

    /// Best-effort session warmup: visit the public services page so the edge
    /// proxy populates the cookie jar before the real POST. Failures are
    /// logged and never abort the submission.
    async fn establish_session(&self) {
        info!("Establishing session with upstream site");
        let result = self
            .client
            .get(SERVICES_PAGE_URL)
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .header(
                ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            )
            .header(ACCEPT_LANGUAGE, "he-IL,he;q=0.9,en-US,en;q=0.8")
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                info!(status = %response.status(), "Session established");
            }
            Ok(response) => {
                warn!(status = %response.status(), "Session establishment returned non-success status");
            }
            Err(e) => {
                warn!("Failed to establish session: {e}");
            }
        }
    }

    async fn post_with_retries(
        &self,
        content_type: &str,
        body: Vec<u8>,
    ) -> Result<(StatusCode, String)> {
        let mut attempt: u32 = 0;
        loop {
            let result = self
                .client
                .post(&self.endpoint_url)
                .headers(Self::required_headers())
                .header(reqwest::header::CONTENT_TYPE, content_type)
                .body(body.clone())
                .send()
                .await;

            let retryable = match &result {
                Ok(response) => RETRYABLE_STATUS.contains(&response.status().as_u16()),
                // Timeouts and connection failures are transient
                Err(e) => e.is_timeout() || e.is_connect(),
            };

            if retryable && attempt < self.max_retries {
                let delay = Duration::from_secs(1u64 << attempt.min(5));
                attempt += 1;
                warn!(
                    attempt,
                    max_retries = self.max_retries,
                    delay_secs = delay.as_secs(),
                    "Transient upstream failure, retrying"
                );
                tokio::time::sleep(delay).await;
                continue;
            }

            let response = result.map_err(|e| ServiceError::Submission {
                message: format!("Network error: {e}"),
            })?;
            let status = response.status();
            let text = response.text().await.map_err(|e| ServiceError::Submission {
                message: format!("Failed to read upstream response body: {e}"),
            })?;
            return Ok((status, text));
        }
    }
}

/// Parse and classify an upstream HTTP response.
///
/// Non-200 HTTP status is a transport failure; a well-formed body with
/// `ResultCode != 200` or an "ERROR" result status is a business failure and
/// carries the upstream code and description.
pub fn parse_upstream_response(status: StatusCode, body: &str) -> Result<ApiResponse> {
    if status != StatusCode::OK {
        error!(%status, "HTTP error response from upstream");
        let preview: String = body.chars().take(200).collect();
        return Err(ServiceError::Submission {
            message: format!("HTTP {}: {}", status.as_u16(), preview),
        });
    }

    let response: ApiResponse = serde_json::from_str(body)
        .map_err(|e| ServiceError::InvalidUpstreamResponse(format!("invalid JSON: {e}")))?;

    classify_response(response)
}

/// Apply the business-failure rule shared by the real and mock backends.
pub fn classify_response(response: ApiResponse) -> Result<ApiResponse> {
    if response.result_code != 200 || response.result_status.to_uppercase().contains("ERROR") {
        return Err(ServiceError::UpstreamRejected {
            code: response.result_code,
            description: response.error_description,
        });
    }
    Ok(response)
}

#[async_trait::async_trait]
impl super::SubmissionClient for SharePointClient {
    fn backend_name(&self) -> &'static str {
        "sharepoint"
    }

    async fn submit(
        &self,
        payload: &ApiPayload,
        file: Option<&MultipartFile>,
    ) -> Result<ApiResponse> {
        if self.session_warmup {
            self.establish_session().await;
        }

        let multipart = build_multipart_request(payload, file)?;

        info!(
            caller = %format!("{} {}", payload.caller_first_name, payload.caller_last_name),
            street = %format!("{} {}", payload.street_desc, payload.house_number),
            with_file = file.is_some(),
            body_size = multipart.body.len(),
            endpoint = %self.endpoint_url,
            "Submitting incident to SharePoint"
        );

        let (status, body) = self
            .post_with_retries(&multipart.content_type, multipart.body)
            .await?;

        let api_response = parse_upstream_response(status, &body)?;

        info!(
            ticket_id = %api_response.data,
            status = %api_response.result_status,
            "SharePoint submission successful"
        );

        Ok(api_response)
    }
}
