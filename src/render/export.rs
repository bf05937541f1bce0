use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbaImage};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("nothing has been composited yet")]
    EmptySurface,
    #[error("png encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// Lossless RGBA8 PNG of the surface; alpha is kept as-is.
pub fn encode_png(surface: &RgbaImage) -> Result<Vec<u8>, ExportError> {
    let (width, height) = surface.dimensions();
    if width == 0 || height == 0 {
        return Err(ExportError::EmptySurface);
    }
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes).write_image(
        surface.as_raw(),
        width,
        height,
        ExtendedColorType::Rgba8,
    )?;
    Ok(bytes)
}
