use std::path::{Path, PathBuf};

use image::{DynamicImage, imageops};

use crate::application::errors::AppError;

/// Resize the background asset to the target canvas and alpha-composite the
/// foreground centered over it, writing the result to `dest` as PNG.
///
/// The foreground keeps its native size; anything hanging over the canvas
/// edge is clipped by the overlay. No other transform is applied.
pub async fn composite_centered(
    background: &Path,
    foreground: &Path,
    dest: &Path,
    width: u32,
    height: u32,
) -> Result<(), AppError> {
    let background = background.to_path_buf();
    let foreground = foreground.to_path_buf();
    let dest = dest.to_path_buf();

    // Decoding and encoding are CPU-bound; keep them off the runtime workers.
    tokio::task::spawn_blocking(move || {
        composite_blocking(&background, &foreground, &dest, width, height)
    })
    .await
    .map_err(|e| AppError::image(format!("composite task failed: {e}")))?
}

fn composite_blocking(
    background: &Path,
    foreground: &Path,
    dest: &Path,
    width: u32,
    height: u32,
) -> Result<(), AppError> {
    let background = image::open(background)
        .map_err(|e| AppError::image(format!("failed to decode background asset: {e}")))?;
    let foreground = image::open(foreground)
        .map_err(|e| AppError::image(format!("failed to decode generated image: {e}")))?
        .to_rgba8();

    let mut canvas = background
        .resize_exact(width, height, imageops::FilterType::Lanczos3)
        .to_rgba8();

    let (fg_width, fg_height) = foreground.dimensions();
    let x = (i64::from(width) - i64::from(fg_width)) / 2;
    let y = (i64::from(height) - i64::from(fg_height)) / 2;

    imageops::overlay(&mut canvas, &foreground, x, y);

    DynamicImage::ImageRgba8(canvas)
        .save_with_format(dest, image::ImageFormat::Png)
        .map_err(|e| AppError::image(format!("failed to write composited image: {e}")))
}
