//! Error types for minify-llm

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    Decode(String),

    #[error("Response contained no completion text")]
    EmptyResponse,
}

pub type Result<T> = std::result::Result<T, LlmError>;
