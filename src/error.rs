use crate::validation::ValidationError;
use thiserror::Error;

// =========================================================
// Error kinds
// =========================================================

/// Coarse classification used by the UI to pick a message or a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 401: session expired or token rejected
    Unauthorized,
    /// The request never got an answer (DNS, CORS, connection refused)
    Offline,
    /// The server answered with a non-2xx status
    Server,
    /// The body did not match the expected shape
    InvalidResponse,
    /// The auth/storage provider rejected the call
    Provider,
    /// Browser storage could not be written
    Storage,
    /// A form was rejected before anything was sent
    Validation,
}

impl ErrorKind {
    pub fn error_code(&self) -> &'static str {
        match self {
            ErrorKind::Unauthorized => "UNAUTHORIZED",
            ErrorKind::Offline => "OFFLINE",
            ErrorKind::Server => "SERVER_ERROR",
            ErrorKind::InvalidResponse => "INVALID_RESPONSE",
            ErrorKind::Provider => "AUTH_PROVIDER_ERROR",
            ErrorKind::Storage => "STORAGE_ERROR",
            ErrorKind::Validation => "VALIDATION_ERROR",
        }
    }
}

// =========================================================
// Storage
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("storage is not available")]
    Unavailable,
    #[error("failed to write '{key}': {reason}")]
    Write { key: String, reason: String },
}

// =========================================================
// API
// =========================================================

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("failed to build request: {0}")]
    RequestBuild(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("session expired (status {status})")]
    Unauthorized { status: u16 },
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("failed to decode response: {0}")]
    Decode(String),
    #[error("unexpected response: {0}")]
    InvalidResponse(String),
    #[error("{0}")]
    Provider(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Unauthorized { .. } => ErrorKind::Unauthorized,
            ApiError::RequestBuild(_) | ApiError::Network(_) => ErrorKind::Offline,
            ApiError::Status { .. } => ErrorKind::Server,
            ApiError::Decode(_) | ApiError::InvalidResponse(_) => ErrorKind::InvalidResponse,
            ApiError::Provider(_) => ErrorKind::Provider,
            ApiError::Storage(_) => ErrorKind::Storage,
            ApiError::Invalid(_) => ErrorKind::Validation,
        }
    }

    /// HTTP status that produced this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { status } | ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Flattened text for page-local alerts.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Unauthorized { .. } => "Your session has expired. Please sign in again.".to_string(),
            ApiError::RequestBuild(_) | ApiError::Network(_) => {
                "Could not reach the server. Check your connection and try again.".to_string()
            }
            ApiError::Provider(msg) => msg.clone(),
            ApiError::Invalid(e) => e.to_string(),
            ApiError::Status { message, .. } if !message.is_empty() => message.clone(),
            _ => "Something went wrong. Please try again.".to_string(),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

// =========================================================
// Session
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The persisted user record exists but does not parse.
    #[error("persisted session is corrupted: {0}")]
    Corrupted(String),
    #[error("no active session")]
    NotAuthenticated,
    /// The reactive owner of the session is gone.
    #[error("session context is no longer available")]
    Disposed,
    #[error("failed to encode user record: {0}")]
    Encode(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
