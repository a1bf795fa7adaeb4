use crate::{
    foundation::core::Frame,
    layer::{LayerId, Placements},
};

/// Stage of the render walk at which a layer was dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RenderStage {
    /// The layer could not resolve its content when it was built.
    Resolve,
    /// `Layer::measure` failed.
    Measure,
    /// `Layer::position` failed.
    Position,
    /// `Layer::render` failed.
    Render,
}

impl std::fmt::Display for RenderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Resolve => "resolve",
            Self::Measure => "measure",
            Self::Position => "position",
            Self::Render => "render",
        })
    }
}

/// A non-fatal problem with one layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayerDiagnostic {
    /// Offending layer.
    pub layer: LayerId,
    /// `Layer::kind` of the offending layer.
    pub kind: &'static str,
    /// Where in the walk the problem surfaced.
    pub stage: RenderStage,
    /// Rendered error message.
    pub message: String,
}

impl std::fmt::Display for LayerDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} layer {} ({}): {}",
            self.kind, self.layer, self.stage, self.message
        )
    }
}

/// Outcome of [`crate::Scene::render_all`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderReport {
    /// Layers that were painted, in paint order.
    pub painted: Vec<LayerId>,
    /// Layers that were skipped or left empty, and why.
    pub diagnostics: Vec<LayerDiagnostic>,
    /// Resolved geometry of every painted layer.
    pub placements: Placements,
}

impl RenderReport {
    /// `true` when every layer resolved and painted without a diagnostic.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Where `id` was painted, if it was.
    pub fn frame(&self, id: LayerId) -> Option<Frame> {
        self.placements.get(id)
    }
}
