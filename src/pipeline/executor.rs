//! Audio + cover to size-capped WebM, start to finish.

use std::path::{Path, PathBuf};

use tracing::{debug, info};
use webmforge_av::{AudioInfo, CoverStream, EncodeRequest, Encoder, Workspace};
use webmforge_media::{cap_duration_file, DurationPatch};

use super::inputs::{classify_inputs, Inputs};
use super::tools::MediaTools;
use crate::config::Config;
use crate::encode::{estimate_bitrate, BitrateEstimate, EncodeController, EncodeReport, SizeConstraint};
use crate::error::ConvertError;
use crate::images::{image_dimensions, plan_scale, resize_image, ScaleRange};
use crate::prompt::Resolver;

/// Everything a successful conversion produced.
#[derive(Debug, Clone)]
pub struct ConvertReport {
    pub title: String,
    pub duration_secs: f64,
    pub estimate: BitrateEstimate,
    pub encode: EncodeReport,
    /// Set when the container's duration header was capped.
    pub duration_patch: Option<DurationPatch>,
    /// Cover image passed to the encoder, if any.
    pub cover: Option<PathBuf>,
    /// Derived files removed after encoding.
    pub cleaned_up: Vec<PathBuf>,
}

impl ConvertReport {
    pub fn output(&self) -> &Path {
        &self.encode.result.output
    }
}

/// Runs one conversion: classify, probe, prepare the cover, encode within
/// the size limit, patch the duration header.
pub struct Converter<'a> {
    config: &'a Config,
    tools: &'a dyn MediaTools,
    encoder: &'a dyn Encoder,
    constraint: SizeConstraint,
    range: ScaleRange,
}

struct Prepared {
    title: String,
    duration_secs: f64,
    estimate: BitrateEstimate,
    encode: EncodeReport,
    duration_patch: Option<DurationPatch>,
    cover: Option<PathBuf>,
}

impl<'a> Converter<'a> {
    pub fn new(
        config: &'a Config,
        tools: &'a dyn MediaTools,
        encoder: &'a dyn Encoder,
    ) -> Result<Self, ConvertError> {
        Ok(Self {
            config,
            tools,
            encoder,
            constraint: SizeConstraint::try_from(&config.limits)?,
            range: ScaleRange::new(config.image.min_side, config.image.max_side)?,
        })
    }

    /// Convert `paths` (one audio file, optionally plus a cover image).
    ///
    /// Derived images are removed afterwards whether or not the encode
    /// succeeded. An oversized result is still `Ok`; check
    /// [`EncodeReport::is_within_limit`].
    pub fn convert(
        &self,
        paths: &[PathBuf],
        resolver: &mut dyn Resolver,
    ) -> Result<ConvertReport, ConvertError> {
        let inputs = classify_inputs(paths, self.config)?;
        let mut workspace = Workspace::new(&inputs.audio)?;

        let result = self.run(&inputs, &mut workspace, resolver);

        let cleaned_up = workspace.cleanup();
        for path in &cleaned_up {
            debug!("Removed {}", path.display());
        }

        let prepared = result?;
        Ok(ConvertReport {
            title: prepared.title,
            duration_secs: prepared.duration_secs,
            estimate: prepared.estimate,
            encode: prepared.encode,
            duration_patch: prepared.duration_patch,
            cover: prepared.cover,
            cleaned_up,
        })
    }

    fn run(
        &self,
        inputs: &Inputs,
        workspace: &mut Workspace,
        resolver: &mut dyn Resolver,
    ) -> Result<Prepared, ConvertError> {
        let audio = inputs.audio.as_path();
        let info = self.tools.probe(audio)?;

        let cover = match &inputs.image {
            Some(image) => self.prepare_image(image, workspace)?,
            None => self.prepare_embedded(&info, workspace, resolver)?,
        };

        let duration_secs = match info.duration_secs() {
            Some(secs) => secs,
            None => resolver
                .resolve_missing_duration(audio)
                .ok_or_else(|| ConvertError::MissingDuration {
                    path: audio.to_path_buf(),
                })?,
        };

        let estimate = estimate_bitrate(duration_secs, &self.constraint);
        info!("Bitrate: {}k", estimate.bitrate);

        let title = info.display_title();
        info!("Title: {}", title);

        let mut encode_inputs = vec![audio.to_path_buf()];
        encode_inputs.extend(cover.clone());

        let request = EncodeRequest {
            inputs: encode_inputs,
            title: title.clone(),
            duration_secs,
            bitrate_kbps: estimate.bitrate,
            output: workspace.output_for_title(&title),
        };

        let encode = EncodeController::new(self.encoder, self.constraint).run(&request)?;

        let max_duration = self.config.limits.max_duration_secs;
        let duration_patch = if duration_secs >= max_duration as f64 {
            let patch = cap_duration_file(&encode.result.output, max_duration)?;
            info!(
                "Capped duration header to {}s at offset {} ({:?})",
                max_duration, patch.offset, patch.strategy
            );
            Some(patch)
        } else {
            None
        };

        Ok(Prepared {
            title,
            duration_secs,
            estimate,
            encode,
            duration_patch,
            cover,
        })
    }

    fn needs_resize(&self, width: u32, height: u32) -> bool {
        let side = width.max(height);
        self.config.image.resize
            && (side > self.range.max()
                || (self.config.image.upscale_small && side > 0 && side < self.range.min()))
    }

    /// Resize `image` next to itself as `<stem>-resized.<ext>` if needed.
    fn resize_into(
        &self,
        image: &Path,
        width: u32,
        height: u32,
        workspace: &mut Workspace,
    ) -> Result<Option<PathBuf>, ConvertError> {
        let Some(plan) = plan_scale(width, height, &self.range) else {
            debug!("No integer scale fits {}x{}, keeping it", width, height);
            return Ok(None);
        };

        let dest = resized_path(image);
        resize_image(image, &plan, &dest)?;
        workspace.track(&dest);
        info!("Resized image to {}x{}", plan.width, plan.height);
        Ok(Some(dest))
    }

    fn prepare_image(
        &self,
        image: &Path,
        workspace: &mut Workspace,
    ) -> Result<Option<PathBuf>, ConvertError> {
        if !self.config.image.resize {
            return Ok(Some(image.to_path_buf()));
        }

        let (width, height) = image_dimensions(image)?;
        if !self.needs_resize(width, height) {
            return Ok(Some(image.to_path_buf()));
        }

        let resized = self.resize_into(image, width, height, workspace)?;
        Ok(Some(resized.unwrap_or_else(|| image.to_path_buf())))
    }

    fn prepare_embedded(
        &self,
        info: &AudioInfo,
        workspace: &mut Workspace,
        resolver: &mut dyn Resolver,
    ) -> Result<Option<PathBuf>, ConvertError> {
        let Some(cover) = &info.cover else {
            if resolver.confirm_missing_image(&info.file_path) {
                return Ok(None);
            }
            return Err(ConvertError::CoverDeclined);
        };

        // Unknown dimensions have to be measured from the extracted file.
        let unknown = cover.longer_side() == 0;
        let needs_resize = unknown || self.needs_resize(cover.width, cover.height);

        if !(self.config.image.extract_embedded || (self.config.image.resize && needs_resize)) {
            debug!("Using embedded cover stream {} as is", cover.index);
            return Ok(None);
        }

        let extracted = self.extract(info, cover, workspace)?;

        let (width, height) = if unknown {
            image_dimensions(&extracted)?
        } else {
            (cover.width, cover.height)
        };

        if self.needs_resize(width, height) {
            if let Some(resized) = self.resize_into(&extracted, width, height, workspace)? {
                return Ok(Some(resized));
            }
        }

        Ok(Some(extracted))
    }

    fn extract(
        &self,
        info: &AudioInfo,
        cover: &CoverStream,
        workspace: &mut Workspace,
    ) -> Result<PathBuf, ConvertError> {
        let dest = workspace.derived_file("image", cover.extension());
        workspace.track(&dest);
        let extracted = self.tools.extract_cover(&info.file_path, cover, &dest)?;
        debug!("Extracted cover to {}", extracted.display());
        Ok(extracted)
    }
}

/// `<dir>/<stem>-resized.<ext>` next to `image`.
fn resized_path(image: &Path) -> PathBuf {
    let stem = image
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match image.extension() {
        Some(ext) => format!("{}-resized.{}", stem, ext.to_string_lossy()),
        None => format!("{}-resized.png", stem),
    };
    image.with_file_name(name)
}
