use image::imageops::{self, FilterType};

use crate::{
    assets::decode::{SourceImage, premultiply, unpremultiply},
    foundation::{
        core::{Frame, Offset, Size},
        error::{SceneError, SceneResult},
    },
    layer::{Layer, Placements, centered},
    render::canvas::Canvas,
};

/// Fraction of the canvas height card art occupies by default.
pub const DEFAULT_CARD_SCALE: f64 = 0.6666;

/// Card art scaled to a fraction of the canvas height and centered on it.
#[derive(Clone, Debug)]
pub struct ImageLayer {
    source: SourceImage,
    scale: f64,
}

impl ImageLayer {
    /// Layer at [`DEFAULT_CARD_SCALE`].
    pub fn new(source: SourceImage) -> Self {
        Self {
            source,
            scale: DEFAULT_CARD_SCALE,
        }
    }

    /// Layer occupying `scale` of the canvas height. `scale` must be finite and > 0.
    pub fn with_scale(source: SourceImage, scale: f64) -> SceneResult<Self> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(SceneError::invalid_dimension(format!(
                "card scale must be finite and > 0 (got {scale})"
            )));
        }
        Ok(Self { source, scale })
    }

    /// The unscaled card art.
    pub fn source(&self) -> &SourceImage {
        &self.source
    }

    /// Fraction of the canvas height.
    pub fn scale(&self) -> f64 {
        self.scale
    }
}

/// Smooth filter when shrinking, nearest-neighbor when enlarging or keeping size.
pub fn resample_filter(source_height: u32, target_height: u32) -> FilterType {
    if target_height < source_height {
        FilterType::Lanczos3
    } else {
        FilterType::Nearest
    }
}

fn resize(src: &image::RgbaImage, size: Size, filter: FilterType) -> image::RgbaImage {
    if filter == FilterType::Nearest {
        return imageops::resize(src, size.width, size.height, filter);
    }

    // Filter in premultiplied space so transparent texels don't bleed color into edges.
    let mut premul = src.clone();
    for px in premul.pixels_mut() {
        px.0 = premultiply(px.0);
    }
    let mut out = imageops::resize(&premul, size.width, size.height, filter);
    for px in out.pixels_mut() {
        px.0 = unpremultiply(px.0);
    }
    out
}

fn to_px(v: f64, axis: &str) -> SceneResult<u32> {
    if !(0.0..=f64::from(u32::MAX)).contains(&v) {
        return Err(SceneError::invalid_dimension(format!(
            "card {axis} {v} does not fit in u32 pixels"
        )));
    }
    Ok(v as u32)
}

/// Part of a `size` layer at `position` that lies on a `canvas` sized canvas, in layer
/// coordinates.
fn visible_part(canvas: Size, position: Offset, size: Size) -> Option<Frame> {
    let x0 = (-position.x).max(0);
    let y0 = (-position.y).max(0);
    let x1 = (i64::from(canvas.width) - position.x).min(i64::from(size.width));
    let y1 = (i64::from(canvas.height) - position.y).min(i64::from(size.height));
    if x0 >= x1 || y0 >= y1 {
        return None;
    }
    Some(Frame {
        position: Offset::new(x0, y0),
        size: Size::new((x1 - x0) as u32, (y1 - y0) as u32),
    })
}

/// Nearest-neighbor resample of `src` to `size`, producing only the `visible` window.
fn nearest_crop(src: &image::RgbaImage, size: Size, visible: Frame) -> image::RgbaImage {
    let (sw, sh) = src.dimensions();
    let x_ratio = f64::from(sw) / f64::from(size.width);
    let y_ratio = f64::from(sh) / f64::from(size.height);
    let sample = |t: i64, ratio: f64, limit: u32| -> u32 {
        (((t as f64) + 0.5) * ratio).floor().min(f64::from(limit - 1)) as u32
    };

    image::RgbaImage::from_fn(visible.size.width, visible.size.height, |x, y| {
        let sx = sample(visible.position.x + i64::from(x), x_ratio, sw);
        let sy = sample(visible.position.y + i64::from(y), y_ratio, sh);
        *src.get_pixel(sx, sy)
    })
}

impl Layer for ImageLayer {
    fn kind(&self) -> &'static str {
        "card"
    }

    fn measure(&self, canvas: Size, _placed: &Placements) -> SceneResult<Size> {
        let src = self.source.size();
        if src.height == 0 {
            return Err(SceneError::invalid_source(format!(
                "card art has zero height ({}x{})",
                src.width, src.height
            )));
        }

        let height = (f64::from(canvas.height) * self.scale).floor();
        let width = (f64::from(src.width) * height / f64::from(src.height)).floor();
        Ok(Size {
            width: to_px(width, "width")?,
            height: to_px(height, "height")?,
        })
    }

    fn position(&self, canvas: Size, size: Size, _placed: &Placements) -> SceneResult<Offset> {
        Ok(Offset {
            x: centered(canvas.width, size.width),
            y: centered(canvas.height, size.height),
        })
    }

    fn render(&mut self, canvas: &mut Canvas, position: Offset, size: Size) -> SceneResult<()> {
        if size.is_empty() {
            return Ok(());
        }

        let src = self.source.size();
        let filter = resample_filter(src.height, size.height);
        tracing::debug!(
            from = ?(src.width, src.height),
            to = ?(size.width, size.height),
            ?filter,
            "resizing card art"
        );

        let Some(visible) = visible_part(canvas.size(), position, size) else {
            return Ok(());
        };

        // Enlarged art can be far bigger than the canvas; sample only what lands on it.
        if filter == FilterType::Nearest && visible.size != size {
            let crop = nearest_crop(self.source.pixels(), size, visible);
            let at = Offset {
                x: position.x + visible.position.x,
                y: position.y + visible.position.y,
            };
            tracing::debug!(x = at.x, y = at.y, "painting visible part of card art");
            canvas.paint(&crop, at);
            return Ok(());
        }

        let resized = if size == src {
            self.source.pixels().clone()
        } else {
            resize(self.source.pixels(), size, filter)
        };

        tracing::debug!(x = position.x, y = position.y, "painting card art");
        canvas.paint(&resized, position);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layer/card.rs"]
mod tests;
