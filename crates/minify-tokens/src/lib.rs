//! Token counting using tiktoken

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tiktoken_rs::CoreBPE;

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Unknown token encoding: {0} (expected one of o200k_base, cl100k_base, p50k_base, r50k_base)")]
    UnknownEncoding(String),

    #[error("Failed to load {encoding} encoding: {source}")]
    Load {
        encoding: Encoding,
        #[source]
        source: anyhow::Error,
    },
}

/// Named BPE encodings understood by the counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Encoding {
    /// GPT-4o and the o-series
    #[default]
    O200kBase,
    /// GPT-4, GPT-3.5-turbo
    Cl100kBase,
    P50kBase,
    R50kBase,
}

impl Encoding {
    pub fn name(&self) -> &'static str {
        match self {
            Encoding::O200kBase => "o200k_base",
            Encoding::Cl100kBase => "cl100k_base",
            Encoding::P50kBase => "p50k_base",
            Encoding::R50kBase => "r50k_base",
        }
    }

    fn load(self) -> Result<CoreBPE, TokenError> {
        let bpe = match self {
            Encoding::O200kBase => tiktoken_rs::o200k_base(),
            Encoding::Cl100kBase => tiktoken_rs::cl100k_base(),
            Encoding::P50kBase => tiktoken_rs::p50k_base(),
            Encoding::R50kBase => tiktoken_rs::r50k_base(),
        };
        bpe.map_err(|source| TokenError::Load {
            encoding: self,
            source,
        })
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Encoding {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "o200k_base" => Ok(Encoding::O200kBase),
            "cl100k_base" => Ok(Encoding::Cl100kBase),
            "p50k_base" => Ok(Encoding::P50kBase),
            "r50k_base" => Ok(Encoding::R50kBase),
            _ => Err(TokenError::UnknownEncoding(s.to_string())),
        }
    }
}

/// Token counter bound to a single encoding.
///
/// Cloning is cheap; clones share the loaded BPE tables.
#[derive(Clone)]
pub struct TokenCounter {
    encoding: Encoding,
    bpe: Arc<CoreBPE>,
}

impl TokenCounter {
    /// Load the BPE tables for `encoding`
    pub fn new(encoding: Encoding) -> Result<Self, TokenError> {
        Ok(Self {
            encoding,
            bpe: Arc::new(encoding.load()?),
        })
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Count tokens in `text`
    pub fn count(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }
}

impl fmt::Debug for TokenCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCounter")
            .field("encoding", &self.encoding)
            .finish_non_exhaustive()
    }
}
