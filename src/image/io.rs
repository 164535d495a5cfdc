//! Convenience helpers for loading images via the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::image::PixelArray;
use crate::util::{HistMatchError, HistMatchResult};
use std::path::Path;

/// File extensions recognised as images when indexing a directory.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif"];

/// Returns true when `path` carries one of [`IMAGE_EXTENSIONS`] (case-insensitive).
pub fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

/// Creates a pixel array from a decoded image.
///
/// Luma images become grey arrays; everything else is converted to 8-bit RGB
/// and any alpha channel is dropped.
pub fn pixels_from_dynamic_image(img: &image::DynamicImage) -> HistMatchResult<PixelArray> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    if img.color().has_color() {
        let rgb = img.to_rgb8();
        PixelArray::rgb(rgb.into_raw(), width, height)
    } else {
        let grey = img.to_luma8();
        PixelArray::grey(grey.into_raw(), width, height)
    }
}

/// Loads an image from disk.
pub fn load_pixels<P: AsRef<Path>>(path: P) -> HistMatchResult<PixelArray> {
    let img = image::open(path).map_err(|err| HistMatchError::ImageIo {
        reason: err.to_string(),
    })?;
    pixels_from_dynamic_image(&img)
}
