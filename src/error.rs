use crate::response::ErrorBody;
use thiserror::Error;

/// Main error type for Pyrus API operations
#[derive(Debug, Error)]
pub enum PyrusError {
    /// Logical error returned by an API endpoint, raised by `Response::into_result`
    #[error("Pyrus API error: {}", .response.describe())]
    Api {
        error_code: Option<String>,
        error: Option<String>,
        response: ErrorBody,
    },

    /// Error status with a body that is not JSON
    #[error("HTTP error {status}: {body}")]
    Http {
        status: u16,
        body: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Upload precondition violated before any I/O
    #[error("file size {size} bytes exceeds the {limit} bytes upload limit")]
    FileTooLarge { size: u64, limit: u64 },

    /// Argument contract violation, detected before building a request
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client error
    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// URL parsing error
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PyrusError {
    /// Create a new API error from an error-shaped response
    pub fn from_error_body(response: ErrorBody) -> Self {
        PyrusError::Api {
            error_code: response.error_code.clone(),
            error: response.error.clone(),
            response,
        }
    }

    /// Create a new HTTP error
    pub fn http(
        status: u16,
        body: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        PyrusError::Http { status, body, source }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        PyrusError::InvalidArgument(message.into())
    }

    /// Check if this error carries the given API error code
    pub fn has_error_code(&self, code: &str) -> bool {
        matches!(self, PyrusError::Api { error_code: Some(c), .. } if c == code)
    }

    /// Get the HTTP status code if this is a transport-level HTTP error
    pub fn status_code(&self) -> Option<u16> {
        match self {
            PyrusError::Http { status, .. } => Some(*status),
            PyrusError::Reqwest(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type for Pyrus operations
pub type Result<T> = std::result::Result<T, PyrusError>;
