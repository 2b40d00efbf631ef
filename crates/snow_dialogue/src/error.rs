//! Service errors and failure classification

use thiserror::Error;

/// Text service errors
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Text service offline: {0}")]
    Offline(String),
}

pub type Result<T> = std::result::Result<T, ServiceError>;

/// Transport failures keep only reqwest's description. The request URL is
/// dropped so credentials and model names never reach logs or
/// classification.
impl From<reqwest::Error> for ServiceError {
    fn from(error: reqwest::Error) -> Self {
        ServiceError::Request(error.without_url().to_string())
    }
}

/// How a failed exchange is reported to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureClass {
    RateLimited,
    ModelUnavailable,
    Unknown,
}

impl FailureClass {
    /// Classify an HTTP status code
    pub fn from_status(status: u16) -> Self {
        match status {
            429 => FailureClass::RateLimited,
            404 => FailureClass::ModelUnavailable,
            _ => FailureClass::Unknown,
        }
    }

    /// Classify from a numeric code embedded in free-form error text
    pub fn classify(error_text: &str) -> Self {
        if error_text.contains("429") {
            FailureClass::RateLimited
        } else if error_text.contains("404") {
            FailureClass::ModelUnavailable
        } else {
            FailureClass::Unknown
        }
    }

    /// The in-character reply shown instead of the error
    pub fn fallback_text(self) -> &'static str {
        match self {
            FailureClass::RateLimited => {
                "Ho ho ho! Too many children are talking to me! Try again in a minute."
            }
            FailureClass::ModelUnavailable => {
                "Ho ho ho! It seems I can't find that model in my magic bag. Please check the model name!"
            }
            FailureClass::Unknown => "Ho ho ho! The North Pole wifi is snowy. Can you repeat that?",
        }
    }
}

impl From<&ServiceError> for FailureClass {
    fn from(error: &ServiceError) -> Self {
        match error {
            ServiceError::Status { status, .. } => FailureClass::from_status(*status),
            ServiceError::Request(text) | ServiceError::InvalidResponse(text) | ServiceError::Offline(text) => {
                FailureClass::classify(text)
            }
        }
    }
}
