//! Audio file probing.
//!
//! Duration, tag metadata and embedded cover pictures are read from
//! `ffprobe`'s JSON output.

mod ffprobe;
mod types;

pub use ffprobe::probe_with_ffprobe;
pub use types::*;

use crate::Result;
use std::path::Path;

/// Probe an audio file with the `ffprobe` found on PATH.
pub fn probe(path: &Path) -> Result<AudioInfo> {
    let ffprobe = crate::tools::require_tool("ffprobe")?;
    probe_with_ffprobe(&ffprobe, path, None)
}
