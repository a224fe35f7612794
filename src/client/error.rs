use thiserror::Error;

/// Errors that can occur when talking to the prediction backend
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Prediction backend unavailable at {0}")]
    Unavailable(String),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Request timeout")]
    Timeout,

    #[error("Unexpected response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Classify a transport-level failure
    pub(crate) fn from_transport(error: reqwest::Error, url: &str) -> Self {
        if error.is_timeout() {
            ApiError::Timeout
        } else if error.is_connect() {
            ApiError::Unavailable(url.to_string())
        } else {
            ApiError::Request(error)
        }
    }
}
