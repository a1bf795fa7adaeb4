use std::path::Path;

use anyhow::Context;

use crate::{
    assets::decode::unpremultiply,
    foundation::{
        core::{Rgba8, Size},
        error::{SceneError, SceneResult},
    },
    text::metrics::{FontBackend, FontMetrics},
};

/// Font backend built from raw font bytes: Parley shapes and measures, `vello_cpu`
/// rasterizes glyphs.
pub struct ParleyFont {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<Rgba8>,
    family: String,
    font_data: vello_cpu::peniko::FontData,
}

impl std::fmt::Debug for ParleyFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParleyFont")
            .field("family", &self.family)
            .finish_non_exhaustive()
    }
}

impl ParleyFont {
    /// Register a TrueType/OpenType font from its bytes.
    pub fn from_bytes(font_bytes: Vec<u8>) -> SceneResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.clone()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            SceneError::invalid_source("no font families registered from font bytes")
        })?;
        let family = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| SceneError::invalid_source("registered font family has no name"))?
            .to_string();

        let font_data =
            vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0);

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family,
            font_data,
        })
    }

    /// Read and register a font file.
    pub fn open(path: &Path) -> SceneResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read font bytes from '{}'", path.display()))?;
        Self::from_bytes(bytes)
    }

    /// Family name detected from the font data.
    pub fn family(&self) -> &str {
        &self.family
    }

    fn layout(
        &mut self,
        text: &str,
        size_px: u32,
        brush: Rgba8,
    ) -> SceneResult<parley::Layout<Rgba8>> {
        if size_px == 0 {
            return Err(SceneError::invalid_dimension("font size must be > 0"));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px as f32));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<Rgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

fn layout_box(layout: &parley::Layout<Rgba8>) -> Size {
    Size {
        width: layout.width().max(0.0).ceil() as u32,
        height: layout.height().max(0.0).ceil() as u32,
    }
}

impl FontMetrics for ParleyFont {
    fn measure(&mut self, text: &str, size_px: u32) -> SceneResult<Size> {
        let layout = self.layout(text, size_px, Rgba8::BLACK)?;
        Ok(layout_box(&layout))
    }
}

impl FontBackend for ParleyFont {
    fn rasterize(
        &mut self,
        text: &str,
        size_px: u32,
        color: Rgba8,
    ) -> SceneResult<image::RgbaImage> {
        let layout = self.layout(text, size_px, color)?;
        let bbox = layout_box(&layout);
        if bbox.is_empty() {
            return Ok(image::RgbaImage::new(bbox.width, bbox.height));
        }

        let w: u16 = bbox
            .width
            .try_into()
            .map_err(|_| SceneError::invalid_dimension("caption width exceeds u16"))?;
        let h: u16 = bbox
            .height
            .try_into()
            .map_err(|_| SceneError::invalid_dimension("caption height exceeds u16"))?;

        let mut ctx = vello_cpu::RenderContext::new(w, h);
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };

                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));

                let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&self.font_data)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        ctx.flush();

        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        ctx.render_to_pixmap(&mut pixmap);

        let mut straight = pixmap.data_as_u8_slice().to_vec();
        for px in straight.chunks_exact_mut(4) {
            let out = unpremultiply([px[0], px[1], px[2], px[3]]);
            px.copy_from_slice(&out);
        }

        image::RgbaImage::from_raw(bbox.width, bbox.height, straight)
            .ok_or_else(|| SceneError::invalid_dimension("rasterized caption size mismatch"))
    }
}
