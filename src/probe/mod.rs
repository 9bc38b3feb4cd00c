//! Probe helpers for the CLI.

pub use webmforge_av::{check_tools, AudioInfo, CoverStream, ToolInfo};

use anyhow::{Context, Result};
use std::path::Path;

use crate::config::EncoderConfig;
use crate::pipeline::{FfmpegTools, MediaTools};

/// Probe `path` with the ffprobe named in `encoder` (or found on PATH).
pub fn probe_file(path: &Path, encoder: &EncoderConfig) -> Result<AudioInfo> {
    let tools = FfmpegTools::from_config(encoder).context("ffprobe is not available")?;
    tools
        .probe(path)
        .with_context(|| format!("Failed to probe {:?}", path))
}
