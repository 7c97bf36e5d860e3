//! Source image to PNG conversion
//!
//! Pure bytes-in/bytes-out so it can be tested without the HTTP layer
//! and run on the blocking pool.

use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

/// Decode any supported source image and re-encode it as PNG
pub fn to_png(bytes: &[u8]) -> Result<Vec<u8>, image::ImageError> {
    let decoded = image::load_from_memory(bytes)?;
    encode_png(decoded)
}

fn encode_png(image: DynamicImage) -> Result<Vec<u8>, image::ImageError> {
    // PNG has no floating point sample formats
    let image = match image {
        DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_) => {
            DynamicImage::ImageRgba16(image.to_rgba16())
        }
        other => other,
    };

    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}
