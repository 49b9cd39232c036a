//! Error types for Talentgrid

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TalentError>;

#[derive(Error, Debug)]
pub enum TalentError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Identity storage error: {0}")]
    Identity(#[from] IdentityError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl TalentError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            TalentError::InvalidInput(_) => 3,
            TalentError::Api(ApiError::SessionExpired) | TalentError::Api(ApiError::Unauthorized) => 2,
            TalentError::Api(_) => 1,
            TalentError::Config(_) => 1,
            TalentError::Identity(_) => 1,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed identity record: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Failures of a single page request
///
/// Cloneable so that one failure can be recorded in state, published as a
/// notice and returned to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The server answered 401; may be recovered by one token refresh
    #[error("Unauthorized")]
    Unauthorized,

    /// Refresh failed or the retried request was rejected again
    #[error("Session expired")]
    SessionExpired,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other 4xx answer; repeating the request will not help
    #[error("Request rejected {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Whether re-triggering the same request may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Network(_) | ApiError::Server { .. } => true,
            ApiError::Unauthorized
            | ApiError::SessionExpired
            | ApiError::BadRequest(_)
            | ApiError::NotFound(_)
            | ApiError::Rejected { .. }
            | ApiError::Decode(_) => false,
        }
    }

    /// Message shown to the user when no view-specific message applies
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Unauthorized | ApiError::SessionExpired => {
                "Your session has expired. Please sign in again.".to_string()
            }
            ApiError::BadRequest(_) | ApiError::Rejected { .. } => {
                "The request was rejected by the server.".to_string()
            }
            ApiError::NotFound(_) => "The requested data is not available.".to_string(),
            ApiError::Server { .. } | ApiError::Network(_) | ApiError::Decode(_) => {
                "Failed to load data. Scroll again or press n to retry.".to_string()
            }
        }
    }

    /// Map an HTTP status and response body to an error
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 => ApiError::Unauthorized,
            400 => ApiError::BadRequest(body),
            404 => ApiError::NotFound(body),
            402..=499 => ApiError::Rejected {
                status,
                message: body,
            },
            _ => ApiError::Server {
                status,
                message: body,
            },
        }
    }
}
