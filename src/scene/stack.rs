use std::path::Path;

use crate::{
    foundation::{
        core::{Frame, Rgba8, Size},
        error::{SceneError, SceneResult},
    },
    layer::{Layer, LayerId, Placements},
    render::canvas::{Canvas, OutputFormat},
    scene::report::{LayerDiagnostic, RenderReport, RenderStage},
};

/// An ordered stack of layers over a fixed-size canvas.
///
/// Layers paint in insertion order, so later layers cover earlier ones. A scene renders
/// once; build a fresh scene for each composition.
#[derive(Debug)]
pub struct Scene {
    canvas: Canvas,
    layers: Vec<Box<dyn Layer>>,
    rendered: bool,
}

impl Scene {
    /// Scene with a fully transparent background.
    pub fn new(width: u32, height: u32) -> SceneResult<Self> {
        Self::with_background(width, height, Rgba8::TRANSPARENT)
    }

    /// Scene filled with `background`.
    pub fn with_background(width: u32, height: u32, background: Rgba8) -> SceneResult<Self> {
        Ok(Self {
            canvas: Canvas::new(Size::new(width, height), background)?,
            layers: Vec::new(),
            rendered: false,
        })
    }

    /// Canvas dimensions.
    pub fn size(&self) -> Size {
        self.canvas.size()
    }

    /// Current background color.
    pub fn background(&self) -> Rgba8 {
        self.canvas.background()
    }

    /// Number of layers in the stack.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Whether [`Scene::render_all`] has run.
    pub fn is_rendered(&self) -> bool {
        self.rendered
    }

    /// Borrow the canvas.
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Consume the scene, returning its canvas.
    pub fn into_canvas(self) -> Canvas {
        self.canvas
    }

    /// Replace the background fill. Only allowed before rendering, since refilling the
    /// canvas would erase painted layers.
    pub fn set_background(&mut self, color: Rgba8) -> SceneResult<()> {
        if self.rendered {
            return Err(SceneError::AlreadyRendered);
        }
        self.canvas.reset(color);
        Ok(())
    }

    /// Append a layer on top of the stack and return its handle.
    pub fn add_layer(&mut self, layer: impl Layer + 'static) -> LayerId {
        self.add_boxed_layer(Box::new(layer))
    }

    /// Append an already boxed layer.
    pub fn add_boxed_layer(&mut self, layer: Box<dyn Layer>) -> LayerId {
        let id = LayerId(self.layers.len());
        tracing::debug!(layer = %id, kind = layer.kind(), "added layer");
        self.layers.push(layer);
        id
    }

    /// Measure, position and paint every layer in stack order.
    ///
    /// A layer that fails is skipped and reported in the returned diagnostics. Fails
    /// with [`SceneError::AlreadyRendered`] on a second call.
    #[tracing::instrument(skip(self), fields(layers = self.layers.len()))]
    pub fn render_all(&mut self) -> SceneResult<RenderReport> {
        if self.rendered {
            return Err(SceneError::AlreadyRendered);
        }
        self.rendered = true;

        let canvas_size = self.canvas.size();
        let mut report = RenderReport {
            placements: Placements::with_capacity(self.layers.len()),
            ..RenderReport::default()
        };

        for (index, layer) in self.layers.iter_mut().enumerate() {
            let id = LayerId(index);
            let kind = layer.kind();

            if let Some(e) = layer.unresolved() {
                report.diagnostics.push(LayerDiagnostic {
                    layer: id,
                    kind,
                    stage: RenderStage::Resolve,
                    message: e.to_string(),
                });
            }

            match paint_layer(
                layer.as_mut(),
                &mut self.canvas,
                canvas_size,
                &report.placements,
            ) {
                Ok(Some(frame)) => {
                    tracing::debug!(
                        layer = %id,
                        kind,
                        x = frame.position.x,
                        y = frame.position.y,
                        width = frame.size.width,
                        height = frame.size.height,
                        "painted layer"
                    );
                    report.painted.push(id);
                    report.placements.push(Some(frame));
                }
                Ok(None) => {
                    tracing::debug!(layer = %id, kind, "skipped empty layer");
                    report.placements.push(None);
                }
                Err((_, e)) if e.is_fatal() => return Err(e),
                Err((stage, e)) => {
                    tracing::warn!(layer = %id, kind, %stage, error = %e, "skipped layer");
                    report.diagnostics.push(LayerDiagnostic {
                        layer: id,
                        kind,
                        stage,
                        message: e.to_string(),
                    });
                    report.placements.push(None);
                }
            }
        }

        Ok(report)
    }

    /// Serialize the canvas.
    pub fn encode(&self, format: OutputFormat) -> SceneResult<Vec<u8>> {
        self.canvas.encode(format)
    }

    /// Write the canvas to `path`, inferring the format from its extension.
    pub fn save(&self, path: &Path) -> SceneResult<()> {
        self.canvas.save(path)
    }
}

fn paint_layer(
    layer: &mut dyn Layer,
    canvas: &mut Canvas,
    canvas_size: Size,
    placed: &Placements,
) -> Result<Option<Frame>, (RenderStage, SceneError)> {
    let size = layer
        .measure(canvas_size, placed)
        .map_err(|e| (RenderStage::Measure, e))?;
    if size.is_empty() {
        return Ok(None);
    }

    let position = layer
        .position(canvas_size, size, placed)
        .map_err(|e| (RenderStage::Position, e))?;
    layer
        .render(canvas, position, size)
        .map_err(|e| (RenderStage::Render, e))?;

    Ok(Some(Frame { position, size }))
}

#[cfg(test)]
#[path = "../../tests/unit/scene/stack.rs"]
mod tests;
