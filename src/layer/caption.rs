use crate::{
    foundation::{
        core::{Offset, Rgba8, Size},
        error::{SceneError, SceneResult},
    },
    layer::{Layer, LayerId, Placements, centered},
    render::canvas::Canvas,
    text::{
        fit::{FitConstraint, FitStrategy, FontFit, fit_font_size},
        metrics::FontBackend,
    },
};

/// Gap between the bottom of the attached layer and the top of its caption.
pub const DEFAULT_CAPTION_MARGIN_PX: u32 = 8;

/// Paint and layout options for a caption.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaptionStyle {
    /// Glyph fill color.
    pub color: Rgba8,
    /// Vertical gap below the attached layer.
    pub margin_px: u32,
    /// Optional width limit applied during font fitting.
    pub max_width_px: Option<u32>,
    /// Font size search.
    pub strategy: FitStrategy,
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self {
            color: Rgba8::BLACK,
            margin_px: DEFAULT_CAPTION_MARGIN_PX,
            max_width_px: None,
            strategy: FitStrategy::Linear,
        }
    }
}

/// A single-line caption sized to the largest font that fits a target pixel height,
/// centered under the layer it is attached to.
///
/// The font is resolved once, at construction. When no size fits, the layer stays in
/// the stack but measures as zero and paints nothing.
#[derive(Debug)]
pub struct TextLayer {
    attached: LayerId,
    caption: String,
    target_height: u32,
    style: CaptionStyle,
    font: Box<dyn FontBackend>,
    fit: Result<FontFit, SceneError>,
}

impl TextLayer {
    /// Caption for `attached` with the default style.
    pub fn new(
        attached: LayerId,
        caption: impl Into<String>,
        target_height: u32,
        font: impl FontBackend + 'static,
    ) -> Self {
        Self::with_style(
            attached,
            caption,
            target_height,
            font,
            CaptionStyle::default(),
        )
    }

    /// Caption for `attached` with an explicit style.
    pub fn with_style(
        attached: LayerId,
        caption: impl Into<String>,
        target_height: u32,
        font: impl FontBackend + 'static,
        style: CaptionStyle,
    ) -> Self {
        let caption = caption.into();
        let mut font: Box<dyn FontBackend> = Box::new(font);
        let constraint = FitConstraint {
            max_height: target_height,
            max_width: style.max_width_px,
        };

        let fit = fit_font_size(font.as_mut(), &caption, constraint, style.strategy);
        match &fit {
            Ok(f) => tracing::debug!(
                caption = caption.as_str(),
                size_px = f.size_px,
                width = f.bbox.width,
                height = f.bbox.height,
                "resolved caption font"
            ),
            Err(e) => tracing::warn!(caption = caption.as_str(), error = %e, "caption left empty"),
        }

        Self {
            attached,
            caption,
            target_height,
            style,
            font,
            fit,
        }
    }

    /// Layer this caption is anchored to.
    pub fn attached(&self) -> LayerId {
        self.attached
    }

    /// Caption text.
    pub fn caption(&self) -> &str {
        &self.caption
    }

    /// Requested maximum glyph box height.
    pub fn target_height(&self) -> u32 {
        self.target_height
    }

    /// Style the caption was built with.
    pub fn style(&self) -> CaptionStyle {
        self.style
    }

    /// Resolved font size and bounding box, if any size fit.
    pub fn fit(&self) -> Option<FontFit> {
        self.fit.as_ref().ok().copied()
    }
}

impl Layer for TextLayer {
    fn kind(&self) -> &'static str {
        "caption"
    }

    fn measure(&self, _canvas: Size, _placed: &Placements) -> SceneResult<Size> {
        Ok(self.fit().map_or(Size::ZERO, |f| f.bbox))
    }

    fn position(&self, _canvas: Size, size: Size, placed: &Placements) -> SceneResult<Offset> {
        let anchor = placed.get(self.attached).ok_or_else(|| {
            SceneError::layout(format!(
                "caption is attached to layer {} which has not been placed",
                self.attached
            ))
        })?;

        Ok(Offset {
            x: anchor.position.x + centered(anchor.size.width, size.width),
            y: anchor.bottom() + i64::from(self.style.margin_px),
        })
    }

    fn render(&mut self, canvas: &mut Canvas, position: Offset, size: Size) -> SceneResult<()> {
        let Some(fit) = self.fit() else {
            return Ok(());
        };
        if size.is_empty() {
            return Ok(());
        }

        let glyphs = self
            .font
            .rasterize(&self.caption, fit.size_px, self.style.color)?;
        tracing::debug!(
            caption = self.caption.as_str(),
            x = position.x,
            y = position.y,
            "painting caption"
        );
        canvas.paint(&glyphs, position);
        Ok(())
    }

    fn unresolved(&self) -> Option<&SceneError> {
        self.fit.as_ref().err()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layer/caption.rs"]
mod tests;
