//! Embedded cover extraction.

use crate::probe::CoverStream;
use crate::{Error, Result, ToolCommand};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Write the embedded picture `cover` of `audio` to `dest`.
///
/// JPEG/PNG-style pictures are stream-copied; anything else is re-encoded by
/// ffmpeg into the format implied by `dest`'s extension.
pub fn extract_cover(
    ffmpeg: &Path,
    audio: &Path,
    cover: &CoverStream,
    dest: &Path,
    timeout: Option<Duration>,
) -> Result<PathBuf> {
    #[cfg(feature = "tracing")]
    tracing::debug!(
        "Extracting cover stream {} ({}) from {:?} to {:?}",
        cover.index,
        cover.codec,
        audio,
        dest
    );

    let mut cmd = ToolCommand::new(ffmpeg.to_path_buf());
    cmd.timeout(timeout)
        .args(["-hide_banner", "-nostdin", "-y", "-i"])
        .arg(audio)
        .arg("-map")
        .arg(format!("0:{}", cover.index))
        .args(["-frames:v", "1"]);

    if cover.copyable() {
        cmd.args(["-c", "copy"]);
    }

    cmd.arg(dest);
    cmd.execute_checked()?;

    if !dest.exists() {
        return Err(Error::tool_failed(
            "ffmpeg",
            format!("cover extraction produced no file at {}", dest.display()),
        ));
    }

    Ok(dest.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_cover_missing_binary() {
        let cover = CoverStream {
            index: 1,
            codec: "mjpeg".to_string(),
            width: 10,
            height: 10,
        };
        let err = extract_cover(
            Path::new("nonexistent_ffmpeg_12345"),
            Path::new("/music/song.mp3"),
            &cover,
            Path::new("/music/song-image.jpg"),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, Error::ToolNotFound { .. }));
    }
}
