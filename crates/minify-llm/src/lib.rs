//! LLM-backed compression for minify
//!
//! Sends file content to an OpenAI-compatible chat completion endpoint and
//! falls back to the original text whenever the call fails.

pub mod client;
pub mod compressor;
pub mod error;
pub mod prompt;

pub use client::{ApiSettings, ChatCompletion, ChatMessage, ChatRequest, OpenAiClient};
pub use compressor::{Compressed, CompressionMode, Compressor};
pub use error::{LlmError, Result};
