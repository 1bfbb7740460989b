//! Error types shared across the crate.

use thiserror::Error;

/// Result type alias for directmap operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for directmap operations.
#[derive(Error, Debug)]
pub enum Error {
    /// JSON syntax error from the streaming tokenizer, with the byte offset
    /// at which the offending input was read.
    #[error("JSON syntax error at byte {position}: {message}")]
    Syntax { position: usize, message: String },

    /// Event stream violated the stack discipline (e.g. a close event with
    /// nothing open). Fatal for the conversion in progress.
    #[error("Structural error: {0}")]
    Structure(String),

    /// A derived IRI was not valid.
    #[error("Invalid IRI: {0}")]
    InvalidIri(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// RDF store error.
    #[error("Store error: {0}")]
    Store(String),

    /// HTTP client error.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Orchestration server returned something the client cannot work with.
    #[error("Orchestrator error: {0}")]
    Orchestrator(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn syntax(position: usize, message: impl Into<String>) -> Self {
        Error::Syntax { position, message: message.into() }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Http(err.to_string())
    }
}

impl From<oxigraph::store::StorageError> for Error {
    fn from(err: oxigraph::store::StorageError) -> Self {
        Error::Store(err.to_string())
    }
}

impl From<oxigraph::model::IriParseError> for Error {
    fn from(err: oxigraph::model::IriParseError) -> Self {
        Error::InvalidIri(err.to_string())
    }
}
