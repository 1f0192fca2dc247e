use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Source directory {} does not exist", .0.display())]
    SourceNotFound(PathBuf),

    #[error("File {} does not exist or is not a file", .0.display())]
    FileNotFound(PathBuf),

    #[error("OPENAI_API_KEY environment variable is required for LLM compression")]
    MissingApiKey,

    #[error("Invalid file pattern: {0}")]
    InvalidPattern(String),
}

pub type Result<T> = std::result::Result<T, Error>;
