//! Errors raised while converting one track.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    /// Not one or two positional inputs.
    #[error("Expected 1 or 2 input files, got {got}")]
    InputCount { got: usize },

    /// Two inputs given and neither has an audio extension.
    #[error("None of the inputs is an audio file")]
    NoAudioInput,

    #[error("Could not determine the duration of {path:?}")]
    MissingDuration { path: PathBuf },

    /// No cover available and the user chose to stop.
    #[error("Aborted: no cover image")]
    CoverDeclined,

    #[error("Encoder produced no output at {path:?}")]
    NoOutput { path: PathBuf },

    #[error(transparent)]
    Encoder(#[from] webmforge_av::Error),

    #[error(transparent)]
    Media(#[from] webmforge_media::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid size limits: {0}")]
    InvalidConstraint(String),

    #[error("Invalid scale range: min side {min} must be below max side {max}")]
    InvalidScaleRange { min: u32, max: u32 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
