use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("pool API client is not initialized")]
    NotInitialized,
    #[error("could not build the HTTP client: {0}")]
    Client(String),
    #[error("request to the pool API failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("pool API answered {status}: {body}")]
    Status { status: u16, body: String },
    #[error("{0}")]
    Rejected(String),
}

impl ApiError {
    /// Short text suitable for the inline error banner.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { status: 401, .. } => {
                "Your session has expired. Please log in again.".to_string()
            }
            ApiError::Status { status: 403, .. } => {
                "You do not have permission to do that.".to_string()
            }
            ApiError::Status { status: 404, .. } => "The pool was not found.".to_string(),
            ApiError::Status { status, .. } if *status >= 500 => {
                "The pool service is unavailable right now.".to_string()
            }
            ApiError::Status { .. } => "The request was rejected by the pool service.".to_string(),
            ApiError::Transport(_) | ApiError::NotInitialized | ApiError::Client(_) => {
                "Could not reach the pool service.".to_string()
            }
            ApiError::Rejected(message) => message.clone(),
        }
    }
}
