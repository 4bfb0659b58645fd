use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unauthorized - session token rejected")]
    Unauthorized,

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Validation endpoint rejected the session")]
    ValidationRejected,

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.chars().count() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let head: String = body.chars().take(MAX_ERROR_BODY_LENGTH).collect();
            format!("{}... (truncated, {} total bytes)", head, body.len())
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied(truncated),
            500..=599 => ApiError::ServerError(truncated),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, truncated)),
        }
    }

    /// The one place API failures are translated to user-facing text.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::InvalidCredentials => "Invalid email or password.".to_string(),
            ApiError::Unauthorized | ApiError::ValidationRejected => {
                "Your session has expired. Please sign in again.".to_string()
            }
            ApiError::AccessDenied(_) => {
                "You do not have permission to perform this action.".to_string()
            }
            ApiError::ServerError(_) => "Server error. Please try again later.".to_string(),
            ApiError::Network(e) if e.is_timeout() => {
                "Connection timed out. Please try again.".to_string()
            }
            ApiError::Network(_) => {
                "Unable to connect to the server. Check your internet connection.".to_string()
            }
            ApiError::InvalidResponse(_) => {
                "Unexpected response from the server. Please try again later.".to_string()
            }
        }
    }
}
