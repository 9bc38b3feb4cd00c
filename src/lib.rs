//! webmforge - tagged audio to size-limited WebM uploads
//!
//! This library crate exposes the core functionality for integration testing.

pub mod config;
pub mod encode;
pub mod error;
pub mod images;
pub mod pipeline;
pub mod probe;
pub mod prompt;

pub use error::ConvertError;
