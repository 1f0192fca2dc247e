//! Text compression with identity fallback

use minify_core::TokenStats;
use minify_tokens::TokenCounter;
use tracing::{debug, warn};

use crate::client::{ApiSettings, ChatCompletion, OpenAiClient};
use crate::error::Result;
use crate::prompt::compression_request;

/// How file content is transformed before it is written
#[derive(Debug, Clone, Default)]
pub enum CompressionMode {
    /// Content is copied unchanged
    #[default]
    PassThrough,
    /// Content is rewritten by a remote chat completion endpoint
    Api(ApiSettings),
}

/// Output of a compression attempt
#[derive(Debug, Clone, PartialEq)]
pub struct Compressed {
    pub text: String,
    pub tokens: TokenStats,
    /// Set when the backend failed and the original text was kept
    pub fallback: Option<String>,
}

impl Compressed {
    fn unchanged(text: &str, tokens: usize, fallback: Option<String>) -> Self {
        Self {
            text: text.to_string(),
            tokens: TokenStats::unchanged(tokens),
            fallback,
        }
    }
}

enum Backend {
    PassThrough,
    Api {
        client: Box<dyn ChatCompletion>,
        model: String,
    },
}

/// Applies the configured compression mode to text.
///
/// `compress` never fails: any backend error is logged and the input is
/// returned untouched, counted with the same encoding on both sides.
pub struct Compressor {
    counter: TokenCounter,
    backend: Backend,
}

impl Compressor {
    pub fn new(mode: &CompressionMode, counter: TokenCounter) -> Result<Self> {
        match mode {
            CompressionMode::PassThrough => Ok(Self::pass_through(counter)),
            CompressionMode::Api(settings) => Ok(Self::with_client(
                OpenAiClient::new(settings)?,
                settings.model.clone(),
                counter,
            )),
        }
    }

    pub fn pass_through(counter: TokenCounter) -> Self {
        Self {
            counter,
            backend: Backend::PassThrough,
        }
    }

    /// API mode backed by an arbitrary chat client
    pub fn with_client(
        client: impl ChatCompletion + 'static,
        model: impl Into<String>,
        counter: TokenCounter,
    ) -> Self {
        Self {
            counter,
            backend: Backend::Api {
                client: Box::new(client),
                model: model.into(),
            },
        }
    }

    pub fn is_api(&self) -> bool {
        matches!(self.backend, Backend::Api { .. })
    }

    pub async fn compress(&self, text: &str) -> Compressed {
        let before = self.counter.count(text);

        let (client, model) = match &self.backend {
            Backend::PassThrough => return Compressed::unchanged(text, before, None),
            Backend::Api { client, model } => (client, model),
        };

        let request = compression_request(model, text);
        debug!(
            "Calling LLM API ({}) with temperature {}",
            model, request.temperature
        );

        match client.complete(&request).await {
            Ok(output) => {
                let after = self.counter.count(&output);
                debug!("LLM compression: {} -> {} tokens", before, after);
                Compressed {
                    text: output,
                    tokens: TokenStats::new(before, after),
                    fallback: None,
                }
            }
            Err(e) => {
                warn!("LLM compression failed, keeping original content: {}", e);
                Compressed::unchanged(text, before, Some(e.to_string()))
            }
        }
    }
}
