use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File validation failed: {0}")]
    Validation(String),

    #[error("Transformation failed: {0}")]
    Transformation(String),

    #[error("Submission failed: {message}")]
    Submission { message: String },

    #[error("Upstream rejected submission (code {code}): {description}")]
    UpstreamRejected { code: i64, description: String },

    #[error("Invalid upstream response: {0}")]
    InvalidUpstreamResponse(String),

    #[error("Environment variable error: {0}")]
    Env(#[from] std::env::VarError),
}

impl ServiceError {
    /// Business failures carrying a 4xx upstream code are client-fixable and
    /// map to 422 at the API boundary; everything else maps to 500.
    pub fn is_validation_like(&self) -> bool {
        match self {
            ServiceError::Validation(_) => true,
            ServiceError::UpstreamRejected { code, .. } => (400..500).contains(code),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
