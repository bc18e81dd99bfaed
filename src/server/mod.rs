//! Inbound HTTP API surface.

pub mod handlers;
pub mod router;
pub mod state;

pub use router::app_router;
pub use state::AppState;
