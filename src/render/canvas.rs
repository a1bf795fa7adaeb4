use std::{io::Cursor, path::Path};

use anyhow::Context;

use crate::{
    foundation::{
        core::{Offset, Rgba8, Size},
        error::{SceneError, SceneResult},
    },
    render::composite::composite_onto,
};

/// Raster output formats, as understood by the `image` crate.
pub type OutputFormat = image::ImageFormat;

/// Fixed-size straight-alpha RGBA8 pixel buffer that layers paint onto.
#[derive(Clone, Debug)]
pub struct Canvas {
    pixels: image::RgbaImage,
    background: Rgba8,
}

impl Canvas {
    /// Allocate a canvas filled with `background`.
    pub fn new(size: Size, background: Rgba8) -> SceneResult<Self> {
        let size = Size::non_empty(size.width, size.height)?;
        Ok(Self {
            pixels: image::RgbaImage::from_pixel(
                size.width,
                size.height,
                image::Rgba(background.to_array()),
            ),
            background,
        })
    }

    /// Canvas dimensions; fixed for the lifetime of the canvas.
    pub fn size(&self) -> Size {
        let (width, height) = self.pixels.dimensions();
        Size { width, height }
    }

    /// Current fill color.
    pub fn background(&self) -> Rgba8 {
        self.background
    }

    /// Borrow the pixel buffer.
    pub fn pixels(&self) -> &image::RgbaImage {
        &self.pixels
    }

    /// Consume the canvas, returning its pixel buffer.
    pub fn into_pixels(self) -> image::RgbaImage {
        self.pixels
    }

    /// Discard everything painted so far and refill with `background`.
    pub fn reset(&mut self, background: Rgba8) {
        let size = self.size();
        self.pixels =
            image::RgbaImage::from_pixel(size.width, size.height, image::Rgba(background.to_array()));
        self.background = background;
    }

    /// Alpha-composite a straight RGBA8 layer image at `at`, clipped to the canvas.
    pub fn paint(&mut self, layer: &image::RgbaImage, at: Offset) {
        composite_onto(&mut self.pixels, layer, at);
    }

    /// Serialize the canvas in `format`.
    ///
    /// Formats without an alpha channel receive the canvas flattened to RGB.
    pub fn encode(&self, format: OutputFormat) -> SceneResult<Vec<u8>> {
        if !format.writing_enabled() {
            return Err(SceneError::encode(format!(
                "no encoder available for {format:?}"
            )));
        }

        let img = image::DynamicImage::ImageRgba8(self.pixels.clone());
        let img = if matches!(format, OutputFormat::Jpeg) {
            image::DynamicImage::ImageRgb8(img.to_rgb8())
        } else {
            img
        };

        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), format)
            .map_err(|e| SceneError::encode(format!("{format:?}: {e}")))?;
        Ok(buf)
    }

    /// Encode to the format implied by `path`'s extension and write the file.
    pub fn save(&self, path: &Path) -> SceneResult<()> {
        let format = format_from_path(path)?;
        let bytes = self.encode(format)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))
                .map_err(|e| SceneError::encode(format!("{e:#}")))?;
        }
        std::fs::write(path, bytes)
            .with_context(|| format!("write image '{}'", path.display()))
            .map_err(|e| SceneError::encode(format!("{e:#}")))?;
        Ok(())
    }
}

/// Infer an output format from a file extension.
pub fn format_from_path(path: &Path) -> SceneResult<OutputFormat> {
    OutputFormat::from_path(path).map_err(|_| {
        SceneError::encode(format!(
            "unsupported output format for '{}'",
            path.display()
        ))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/canvas.rs"]
mod tests;
