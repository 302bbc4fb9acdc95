use axum::http::StatusCode;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum UpstreamError {
    #[error("model responded with status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("Empty response from AI model")]
    Empty,
    #[error("model call timed out after {0:?}")]
    Timeout(std::time::Duration),
    #[error("invalid model response: {0}")]
    Malformed(String),
}

impl UpstreamError {
    pub fn status(&self) -> Option<u16> {
        match self {
            UpstreamError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            UpstreamError::Malformed(err.to_string())
        } else {
            UpstreamError::Transport(err.to_string())
        }
    }
}

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Missing {0}")]
    MissingCredential(&'static str),
    #[error("invalid request: {message}")]
    BadRequest { status: StatusCode, message: String },
}

pub const GENERIC_ERROR_REPLY: &str = "Sorry, I encountered an error. Please try again.";
pub const BUSY_REPLY: &str =
    "I'm currently experiencing high traffic. Please try again in a few moments.";
pub const CONNECTIVITY_REPLY: &str =
    "I'm having connectivity issues. Please check your connection and try again.";
pub const CONFIGURATION_REPLY: &str = "There's a configuration issue. Please contact support.";

pub fn user_message_for(error_text: &str) -> &'static str {
    if error_text.contains("quota") || error_text.contains("rate limit") {
        BUSY_REPLY
    } else if error_text.contains("network") || error_text.contains("connection") {
        CONNECTIVITY_REPLY
    } else if error_text.contains("API key") {
        CONFIGURATION_REPLY
    } else {
        GENERIC_ERROR_REPLY
    }
}

impl ChatError {
    pub fn status(&self) -> StatusCode {
        match self {
            ChatError::MissingCredential(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ChatError::BadRequest { status, .. } => *status,
        }
    }

    /// Configuration errors report themselves verbatim; everything else is classified.
    pub fn user_message(&self) -> String {
        match self {
            ChatError::MissingCredential(_) => self.to_string(),
            other => user_message_for(&other.to_string()).to_string(),
        }
    }
}
