use std::path::Path;

use anyhow::Context;

use crate::{
    foundation::{
        core::{Rgba8, Size},
        error::{SceneError, SceneResult},
    },
    layer::{caption::DEFAULT_CAPTION_MARGIN_PX, card::DEFAULT_CARD_SCALE},
    text::fit::FitStrategy,
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// A complete scene description.
///
/// Layers are listed bottom to top. Asset paths are relative to a root directory
/// supplied when the scene is built (see [`crate::build_scene`]).
pub struct SceneSpec {
    /// Output canvas dimensions.
    pub canvas: Size,
    /// Canvas fill; transparent when omitted.
    #[serde(default)]
    pub background: Rgba8,
    /// Layers in paint order.
    pub layers: Vec<LayerSpec>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
/// One entry in [`SceneSpec::layers`].
pub enum LayerSpec {
    /// Card art scaled to a fraction of the canvas height and centered.
    Card {
        /// Image path relative to the scene root.
        source: String,
        /// Fraction of the canvas height, in `(0, 1]`.
        #[serde(default = "default_card_scale")]
        scale: f64,
    },
    /// Single-line caption centered under an earlier layer.
    Caption {
        /// Index of the layer this caption sits under.
        attach_to: usize,
        /// Caption text.
        text: String,
        /// Maximum glyph box height in pixels.
        height_px: u32,
        /// Font file path relative to the scene root.
        font: String,
        /// Glyph fill color.
        #[serde(default = "default_caption_color")]
        color: Rgba8,
        /// Gap below the attached layer.
        #[serde(default = "default_caption_margin")]
        margin_px: u32,
        /// Optional width limit for font fitting.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_width_px: Option<u32>,
        /// Font size search.
        #[serde(default)]
        search: FitStrategy,
    },
}

fn default_card_scale() -> f64 {
    DEFAULT_CARD_SCALE
}

fn default_caption_color() -> Rgba8 {
    Rgba8::BLACK
}

fn default_caption_margin() -> u32 {
    DEFAULT_CAPTION_MARGIN_PX
}

impl SceneSpec {
    /// Parse a scene description from JSON text. Does not validate.
    pub fn from_json_str(json: &str) -> SceneResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| SceneError::validation(format!("parse scene json: {e}")))
    }

    /// Read and parse a scene description file. Does not validate.
    pub fn from_json_path(path: &Path) -> SceneResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read scene json from '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Check structural invariants without touching the filesystem.
    pub fn validate(&self) -> SceneResult<()> {
        if self.canvas.is_empty() {
            return Err(SceneError::validation("canvas width/height must be > 0"));
        }

        for (index, layer) in self.layers.iter().enumerate() {
            match layer {
                LayerSpec::Card { source, scale } => {
                    validate_rel_source(source, &format!("layer {index} source"))?;
                    if validate_card_scale(*scale).is_err() {
                        return Err(SceneError::validation(format!(
                            "layer {index} scale must be in (0, 1] (got {scale})"
                        )));
                    }
                }
                LayerSpec::Caption {
                    attach_to, font, ..
                } => {
                    validate_rel_source(font, &format!("layer {index} font"))?;
                    if *attach_to >= index {
                        return Err(SceneError::validation(format!(
                            "layer {index} caption must attach to an earlier layer (got {attach_to})"
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}

/// Check that a card scale lies in `(0, 1]`, the range accepted from scene files and
/// the command line.
pub fn validate_card_scale(scale: f64) -> SceneResult<f64> {
    if !scale.is_finite() || scale <= 0.0 || scale > 1.0 {
        return Err(SceneError::validation(format!(
            "card scale must be in (0, 1] (got {scale})"
        )));
    }
    Ok(scale)
}

fn validate_rel_source(source: &str, field: &str) -> SceneResult<()> {
    if source.trim().is_empty() {
        return Err(SceneError::validation(format!("{field} must be non-empty")));
    }
    let s = source.replace('\\', "/");
    if s.starts_with('/') || Path::new(source).is_absolute() {
        return Err(SceneError::validation(format!(
            "{field} must be a relative path"
        )));
    }
    if s.split('/').any(|part| part == "..") {
        return Err(SceneError::validation(format!(
            "{field} must not contain '..'"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/composition/model.rs"]
mod tests;
