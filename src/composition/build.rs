use std::{collections::HashMap, path::Path, sync::Arc};

use anyhow::Context;

use crate::{
    assets::decode::open_image,
    composition::model::{LayerSpec, SceneSpec},
    foundation::error::SceneResult,
    layer::{
        LayerId,
        caption::{CaptionStyle, TextLayer},
        card::ImageLayer,
    },
    scene::stack::Scene,
    text::parley_font::ParleyFont,
};

/// Validate `spec`, load every asset it references from under `root`, and assemble the
/// layer stack.
///
/// All file I/O happens here; rendering the returned scene reads nothing from disk.
/// Each font file is read once even when several captions share it.
#[tracing::instrument(skip(spec), fields(layers = spec.layers.len()))]
pub fn build_scene(spec: &SceneSpec, root: &Path) -> SceneResult<Scene> {
    spec.validate()?;

    let mut scene = Scene::with_background(spec.canvas.width, spec.canvas.height, spec.background)?;
    let mut fonts: HashMap<&str, Arc<[u8]>> = HashMap::new();

    for layer in &spec.layers {
        match layer {
            LayerSpec::Card { source, scale } => {
                let path = root.join(source);
                let art = open_image(&path)?;
                tracing::debug!(
                    source = source.as_str(),
                    width = art.size().width,
                    height = art.size().height,
                    "loaded card art"
                );
                scene.add_layer(ImageLayer::with_scale(art, *scale)?);
            }
            LayerSpec::Caption {
                attach_to,
                text,
                height_px,
                font,
                color,
                margin_px,
                max_width_px,
                search,
            } => {
                let bytes = match fonts.get(font.as_str()) {
                    Some(bytes) => Arc::clone(bytes),
                    None => {
                        let path = root.join(font);
                        let bytes: Arc<[u8]> = std::fs::read(&path)
                            .with_context(|| format!("read font bytes from '{}'", path.display()))?
                            .into();
                        fonts.insert(font.as_str(), Arc::clone(&bytes));
                        bytes
                    }
                };
                let backend = ParleyFont::from_bytes(bytes.to_vec())?;
                let style = CaptionStyle {
                    color: *color,
                    margin_px: *margin_px,
                    max_width_px: *max_width_px,
                    strategy: *search,
                };
                scene.add_layer(TextLayer::with_style(
                    LayerId::from_index(*attach_to),
                    text.as_str(),
                    *height_px,
                    backend,
                    style,
                ));
            }
        }
    }

    Ok(scene)
}

#[cfg(test)]
#[path = "../../tests/unit/composition/build.rs"]
mod tests;
