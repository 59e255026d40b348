use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("validation failed: {message}")]
    Validation { message: String },

    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus { status: StatusCode, body: String },

    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid api url: {0}")]
    Url(#[from] url::ParseError),

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}
