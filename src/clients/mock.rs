//! In-process mock of the SharePoint backend for debug mode.

use crate::clients::sharepoint::classify_response;
use crate::error::Result;
use crate::models::{ApiPayload, ApiResponse};
use crate::validation::MultipartFile;
use chrono::{Datelike, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use tracing::info;

/// Generates ticket IDs in the upstream format `NETANYA-YYYY-NNNNNN`.
///
/// The six-digit number is a millisecond timestamp captured at construction
/// plus a monotonically advancing counter, so concurrent requests never
/// receive the same ticket within a process lifetime.
#[derive(Debug)]
pub struct MockTicketGenerator {
    base_ms: u64,
    counter: AtomicU64,
}

impl Default for MockTicketGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTicketGenerator {
    pub fn new() -> Self {
        Self {
            base_ms: Utc::now().timestamp_millis() as u64,
            counter: AtomicU64::new(0),
        }
    }

    pub fn generate_ticket_id(&self) -> String {
        let current_year = Utc::now().year();
        let counter = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        let unique_number = (self.base_ms + counter) % 1_000_000;
        format!("NETANYA-{}-{:06}", current_year, unique_number)
    }
}

/// Simulated error returned instead of a ticket when configured.
#[derive(Debug, Clone)]
struct SimulatedError {
    code: i64,
    message: String,
}

/// Mock submission backend: same contract as the real client, no network I/O.
#[derive(Debug, Default)]
pub struct MockSharePointClient {
    ticket_generator: MockTicketGenerator,
    simulated_error: RwLock<Option<SimulatedError>>,
}

impl MockSharePointClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the mock to answer every submission with a success ticket.
    pub fn simulate_success(&self) {
        *self.simulated_error.write().expect("error mode lock") = None;
        info!("Mock backend configured for success simulation");
    }

    /// Configure the mock to answer every submission with a fixed error.
    pub fn simulate_error(&self, code: i64, message: impl Into<String>) {
        let message = message.into();
        info!(code, %message, "Mock backend configured for error simulation");
        *self.simulated_error.write().expect("error mode lock") =
            Some(SimulatedError { code, message });
    }
}

#[async_trait::async_trait]
impl super::SubmissionClient for MockSharePointClient {
    fn backend_name(&self) -> &'static str {
        "mock"
    }

    async fn submit(
        &self,
        payload: &ApiPayload,
        file: Option<&MultipartFile>,
    ) -> Result<ApiResponse> {
        info!(
            caller = %format!("{} {}", payload.caller_first_name, payload.caller_last_name),
            description = %payload.event_call_desc.chars().take(50).collect::<String>(),
            has_file = file.is_some(),
            "Mock SharePoint submission"
        );

        let simulated = self.simulated_error.read().expect("error mode lock").clone();
        let response = match simulated {
            Some(error) => ApiResponse::error(error.code, error.message),
            None => {
                let ticket_id = self.ticket_generator.generate_ticket_id();
                info!(%ticket_id, "Mock successful submission");
                ApiResponse::success(ticket_id)
            }
        };

        // Same business-failure classification as the real backend
        classify_response(response)
    }
}
