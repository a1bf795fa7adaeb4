use crate::foundation::{
    core::{Rgba8, Size},
    error::SceneResult,
};

/// Measures the pixel bounding box a caption occupies at an integer font size.
pub trait FontMetrics {
    /// Bounding box of `text` set on a single line at `size_px`.
    fn measure(&mut self, text: &str, size_px: u32) -> SceneResult<Size>;
}

/// A font that can both measure and paint single-line captions.
pub trait FontBackend: FontMetrics + std::fmt::Debug {
    /// Paint `text` at `size_px` onto a transparent straight-RGBA8 image sized to its
    /// bounding box, filling glyphs with `color`.
    fn rasterize(&mut self, text: &str, size_px: u32, color: Rgba8)
    -> SceneResult<image::RgbaImage>;
}

impl<M: FontMetrics + ?Sized> FontMetrics for &mut M {
    fn measure(&mut self, text: &str, size_px: u32) -> SceneResult<Size> {
        (**self).measure(text, size_px)
    }
}

impl<M: FontMetrics + ?Sized> FontMetrics for Box<M> {
    fn measure(&mut self, text: &str, size_px: u32) -> SceneResult<Size> {
        (**self).measure(text, size_px)
    }
}
