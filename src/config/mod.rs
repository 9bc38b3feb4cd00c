//! Configuration loading and validation.

mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::encode::SizeConstraint;
use crate::images::ScaleRange;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    expand_paths(&mut config);
    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = ["./webmforge.toml", "~/.config/webmforge/config.toml"];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

fn expand_paths(config: &mut Config) {
    for path in [
        &mut config.encoder.ffmpeg_path,
        &mut config.encoder.ffprobe_path,
    ]
    .into_iter()
    .flatten()
    {
        if let Some(s) = path.to_str() {
            *path = PathBuf::from(shellexpand::tilde(s).as_ref());
        }
    }
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    SizeConstraint::try_from(&config.limits).context("Invalid [limits]")?;

    ScaleRange::new(config.image.min_side, config.image.max_side).context("Invalid [image]")?;

    if config.limits.max_duration_secs == 0 {
        anyhow::bail!("max_duration_secs must be greater than 0");
    }

    if config.audio_extensions.is_empty() {
        anyhow::bail!("audio_extensions cannot be empty");
    }

    for (name, path) in [
        ("ffmpeg_path", &config.encoder.ffmpeg_path),
        ("ffprobe_path", &config.encoder.ffprobe_path),
    ] {
        if let Some(path) = path {
            if !path.exists() {
                tracing::warn!("{} does not exist: {:?}", name, path);
            }
        }
    }

    Ok(())
}
