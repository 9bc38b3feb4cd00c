//! Sorting positional inputs into audio and cover.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::ConvertError;

/// Positional inputs sorted into the audio track and an optional cover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inputs {
    pub audio: PathBuf,
    pub image: Option<PathBuf>,
}

/// Sort one or two paths into [`Inputs`].
///
/// A single path is always the audio. With two, the one with an audio
/// extension is the audio and the other the image, in either order.
pub fn classify_inputs(paths: &[PathBuf], config: &Config) -> Result<Inputs, ConvertError> {
    match paths {
        [audio] => Ok(Inputs {
            audio: audio.clone(),
            image: None,
        }),
        [first, second] => {
            let is_audio = |p: &Path| config.is_audio(p);
            if is_audio(first) {
                Ok(Inputs {
                    audio: first.clone(),
                    image: Some(second.clone()),
                })
            } else if is_audio(second) {
                Ok(Inputs {
                    audio: second.clone(),
                    image: Some(first.clone()),
                })
            } else {
                Err(ConvertError::NoAudioInput)
            }
        }
        _ => Err(ConvertError::InputCount { got: paths.len() }),
    }
}
