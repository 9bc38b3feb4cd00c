//! FFprobe-based audio probing.

use super::types::*;
use crate::{Error, Result, ToolCommand};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: FfprobeFormat,
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    format_name: String,
    duration: Option<String>,
    size: Option<String>,
    #[serde(default)]
    tags: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    index: u32,
    codec_type: String,
    codec_name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    duration: Option<String>,
    #[serde(default)]
    disposition: FfprobeDisposition,
    #[serde(default)]
    tags: HashMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
struct FfprobeDisposition {
    #[serde(default)]
    attached_pic: u8,
}

/// Probe an audio file using the ffprobe binary at `ffprobe`, killing it
/// after `timeout` if one is given.
pub fn probe_with_ffprobe(
    ffprobe: &Path,
    path: &Path,
    timeout: Option<Duration>,
) -> Result<AudioInfo> {
    if !path.exists() {
        return Err(Error::file_not_found(path));
    }

    let output = ToolCommand::new(ffprobe.to_path_buf())
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .timeout(timeout)
        .execute_checked()?;

    let ff_output: FfprobeOutput = serde_json::from_str(&output.stdout)
        .map_err(|e| Error::parse_error("ffprobe", e.to_string()))?;

    Ok(parse_ffprobe_output(path, ff_output))
}

fn parse_ffprobe_output(path: &Path, output: FfprobeOutput) -> AudioInfo {
    let audio_stream = output.streams.iter().find(|s| s.codec_type == "audio");

    // Some muxers only report the duration on the stream.
    let duration = parse_duration(output.format.duration.as_deref())
        .or_else(|| audio_stream.and_then(|s| parse_duration(s.duration.as_deref())));

    // Vorbis comments in Ogg live on the stream, everything else on the format.
    let lookup = |key: &str| {
        tag(&output.format.tags, key).or_else(|| audio_stream.and_then(|s| tag(&s.tags, key)))
    };
    let tags = AudioTags {
        title: lookup("title"),
        artist: lookup("artist"),
    };

    let cover = output
        .streams
        .iter()
        .find(|s| s.codec_type == "video" && s.disposition.attached_pic == 1)
        .map(|s| CoverStream {
            index: s.index,
            codec: s.codec_name.clone().unwrap_or_default(),
            width: s.width.unwrap_or(0),
            height: s.height.unwrap_or(0),
        });

    AudioInfo {
        file_path: path.to_path_buf(),
        file_size: output.format.size.and_then(|s| s.parse().ok()).unwrap_or(0),
        container: output.format.format_name,
        duration,
        tags,
        cover,
    }
}

fn parse_duration(value: Option<&str>) -> Option<Duration> {
    let secs = value?.parse::<f64>().ok()?;
    if secs.is_finite() && secs >= 0.0 {
        Some(Duration::from_secs_f64(secs))
    } else {
        None
    }
}

/// Case-insensitive tag lookup; ID3 keys are lowercase, Vorbis comments are
/// usually uppercase.
fn tag(tags: &HashMap<String, String>, key: &str) -> Option<String> {
    tags.iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, v)| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
