use thiserror::Error;

/// Errors surfaced by the menu editor and its storage client.
///
/// None of these end the editing session; the tree stays usable and the
/// failed action can be retried.
#[derive(Debug, Error)]
pub enum MenuError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Reorder pending: save or cancel the current ordering first")]
    ReorderPending,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Invalid response payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl MenuError {
    pub fn validation(message: impl Into<String>) -> Self {
        MenuError::Validation(message.into())
    }

    pub fn server(status: u16, message: impl Into<String>) -> Self {
        MenuError::Server {
            status,
            message: message.into(),
        }
    }

    /// Whether trying the same call again could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            MenuError::Network(_) => true,
            MenuError::Server { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Short machine-readable code for JSON output
    pub fn error_code(&self) -> &'static str {
        match self {
            MenuError::Validation(_) => "VALIDATION_ERROR",
            MenuError::ReorderPending => "REORDER_PENDING",
            MenuError::Network(_) => "NETWORK_ERROR",
            MenuError::Unauthorized(_) => "UNAUTHORIZED",
            MenuError::Server { .. } => "SERVER_ERROR",
            MenuError::Decode(_) => "INVALID_RESPONSE",
            MenuError::Config(_) => "CONFIG_ERROR",
        }
    }
}

pub type MenuResult<T> = Result<T, MenuError>;
