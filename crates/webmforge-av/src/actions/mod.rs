//! Media processing actions.
//!
//! - Encoding audio (plus an optional still cover) into the WebM upload profile
//! - Extracting embedded cover pictures from tagged audio

mod cover;
mod encode;

pub use cover::extract_cover;
pub use encode::{EncodeRequest, Encoder, FfmpegEncoder, AUDIO_CODEC, VIDEO_CODEC};
