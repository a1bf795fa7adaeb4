//! Layered card-image compositing.
//!
//! A [`Scene`] is a fixed-size RGBA canvas plus an ordered stack of [`Layer`]s. Rendering
//! walks the stack bottom to top: each layer measures itself against the canvas (and
//! against layers already placed), picks a position, and paints.
//!
//! Two layer kinds ship with the crate:
//! - [`ImageLayer`] scales card art to a fraction of the canvas height, keeping its
//!   aspect ratio, and centers it.
//! - [`TextLayer`] picks the largest integer font size whose rendered caption fits a
//!   target pixel height and centers the caption under another layer.
//!
//! Scenes can be assembled in code or described in JSON ([`SceneSpec`]) and built with
//! [`build_scene`], which front-loads all file I/O.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod composition;
mod foundation;
mod layer;
pub mod logging;
mod render;
mod scene;
mod text;

pub use assets::decode::{SourceImage, decode_image, open_image};
pub use composition::{
    build::build_scene,
    model::{LayerSpec, SceneSpec, validate_card_scale},
};
pub use foundation::{
    core::{Frame, Offset, Rgba8, Size},
    error::{SceneError, SceneResult},
};
pub use layer::{
    Layer, LayerId, Placements,
    caption::{CaptionStyle, DEFAULT_CAPTION_MARGIN_PX, TextLayer},
    card::{DEFAULT_CARD_SCALE, ImageLayer, resample_filter},
};
pub use render::canvas::{Canvas, OutputFormat, format_from_path};
pub use scene::{
    report::{LayerDiagnostic, RenderReport, RenderStage},
    stack::Scene,
};
pub use text::{
    fit::{FitConstraint, FitStrategy, FontFit, MAX_FONT_SIZE_PX, fit_font_size},
    metrics::{FontBackend, FontMetrics},
    parley_font::ParleyFont,
};
