use std::{path::Path, sync::Arc};

use anyhow::Context;

use crate::foundation::{
    core::Size,
    error::{SceneError, SceneResult},
};

/// Decoded card art handed to an [`crate::ImageLayer`], in straight-alpha RGBA8.
///
/// The pixel buffer is shared, so cloning a source image is cheap.
#[derive(Clone, Debug)]
pub struct SourceImage {
    pixels: Arc<image::RgbaImage>,
}

impl SourceImage {
    /// Wrap an already decoded RGBA8 image.
    pub fn from_image(img: image::RgbaImage) -> Self {
        Self {
            pixels: Arc::new(img),
        }
    }

    /// Build a source image from raw row-major straight RGBA8 bytes.
    pub fn from_rgba8(width: u32, height: u32, rgba8: Vec<u8>) -> SceneResult<Self> {
        let expected = u64::from(width) * u64::from(height) * 4;
        if rgba8.len() as u64 != expected {
            return Err(SceneError::invalid_source(format!(
                "rgba8 buffer has {} bytes, expected {expected} for {width}x{height}",
                rgba8.len()
            )));
        }
        let img = image::RgbaImage::from_raw(width, height, rgba8).ok_or_else(|| {
            SceneError::invalid_source(format!("rgba8 buffer rejected for {width}x{height}"))
        })?;
        Ok(Self::from_image(img))
    }

    /// Source dimensions.
    pub fn size(&self) -> Size {
        let (width, height) = self.pixels.dimensions();
        Size { width, height }
    }

    /// Borrow the underlying pixels.
    pub fn pixels(&self) -> &image::RgbaImage {
        &self.pixels
    }
}

/// Decode encoded image bytes (PNG, JPEG, ...) and convert to straight RGBA8.
pub fn decode_image(bytes: &[u8]) -> SceneResult<SourceImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| SceneError::invalid_source(format!("decode image from memory: {e}")))?;
    Ok(SourceImage::from_image(dyn_img.to_rgba8()))
}

/// Read and decode an image file.
pub fn open_image(path: &Path) -> SceneResult<SourceImage> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("read image bytes from '{}'", path.display()))?;
    decode_image(&bytes)
}

pub(crate) fn premultiply(px: [u8; 4]) -> [u8; 4] {
    let a = u16::from(px[3]);
    if a == 0 {
        return [0, 0, 0, 0];
    }
    let mul = |c: u8| ((u16::from(c) * a + 127) / 255) as u8;
    [mul(px[0]), mul(px[1]), mul(px[2]), px[3]]
}

pub(crate) fn unpremultiply(px: [u8; 4]) -> [u8; 4] {
    let a = u16::from(px[3]);
    match a {
        0 => [0, 0, 0, 0],
        255 => px,
        _ => {
            let div = |c: u8| ((u16::from(c) * 255 + a / 2) / a).min(255) as u8;
            [div(px[0]), div(px[1]), div(px[2]), px[3]]
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
