//! Error types for webmforge-media.

use std::io;
use thiserror::Error;

/// Result type for webmforge-media operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for webmforge-media operations.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The data does not start with an EBML header.
    #[error("Not an EBML document")]
    NotEbml,

    /// Malformed EBML structure.
    #[error("Invalid EBML: {0}")]
    InvalidEbml(String),

    /// Buffer too small for operation.
    #[error("Buffer underflow: need {need} bytes, have {have}")]
    BufferUnderflow { need: usize, have: usize },

    /// No duration element could be located.
    #[error("Duration element not found")]
    DurationNotFound,

    /// Unsupported feature or encoding.
    #[error("Unsupported: {0}")]
    Unsupported(String),
}

impl Error {
    /// Create an invalid EBML error.
    pub fn invalid_ebml(msg: impl Into<String>) -> Self {
        Self::InvalidEbml(msg.into())
    }

    /// Create an unsupported error.
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }
}
