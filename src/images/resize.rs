//! Applying a [`ScalePlan`] to an image file.

use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};

use super::ScalePlan;
use crate::error::ConvertError;

// Light sharpening after the bicubic pass.
const UNSHARPEN_SIGMA: f32 = 0.6;
const UNSHARPEN_THRESHOLD: i32 = 2;

/// Width and height of the image at `path`, read from its header.
pub fn image_dimensions(path: &Path) -> Result<(u32, u32), ConvertError> {
    Ok(image::image_dimensions(path)?)
}

/// Resize `source` to the plan's dimensions and write it to `dest`.
///
/// The output format follows `dest`'s extension. JPEG output drops alpha.
pub fn resize_image(source: &Path, plan: &ScalePlan, dest: &Path) -> Result<(), ConvertError> {
    let img = image::open(source)?;

    tracing::debug!(
        "Resizing {} from {}x{} ({})",
        source.display(),
        img.width(),
        img.height(),
        plan
    );

    let resized = img
        .resize_exact(plan.width, plan.height, FilterType::CatmullRom)
        .unsharpen(UNSHARPEN_SIGMA, UNSHARPEN_THRESHOLD);

    let resized = match ImageFormat::from_path(dest) {
        Ok(ImageFormat::Jpeg) => DynamicImage::ImageRgb8(resized.to_rgb8()),
        _ => resized,
    };

    resized.save(dest)?;
    Ok(())
}
