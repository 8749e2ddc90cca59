use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum ParseError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },
    #[error("Failed to send request: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Parse error {code}: {message}")]
    Api {
        status: StatusCode,
        code: i64,
        message: String,
    },
    #[error("Response Status: {}", .status.as_u16())]
    Status { status: StatusCode, body: String },
    #[error("Failed to deserialize response: {0}")]
    Deserialize(#[from] serde_json::Error),
}

impl ParseError {
    pub fn configuration(message: &str) -> Self {
        ParseError::Configuration {
            message: message.to_string(),
        }
    }

    /// Error code reported by the Parse server, if the response carried one.
    pub fn code(&self) -> Option<i64> {
        match self {
            ParseError::Api { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ParseError::Api { status, .. } | ParseError::Status { status, .. } => Some(*status),
            ParseError::Transport(err) => err.status(),
            _ => None,
        }
    }

    /// Builds the error for a non-success response, preferring the Parse
    /// `{"code", "error"}` body when there is one.
    pub(crate) fn from_response(status: StatusCode, body: String) -> Self {
        match serde_json::from_str::<ErrorBody>(&body) {
            Ok(ErrorBody { code, error }) => ParseError::Api {
                status,
                code,
                message: error,
            },
            Err(_) => ParseError::Status { status, body },
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: i64,
    error: String,
}
