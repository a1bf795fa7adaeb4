use crate::{
    foundation::{
        core::Size,
        error::{SceneError, SceneResult},
    },
    text::metrics::FontMetrics,
};

/// Upper bound on probed font sizes. Metrics that never outgrow the target (an empty
/// caption, for instance) resolve to this size instead of scanning forever.
pub const MAX_FONT_SIZE_PX: u32 = 2048;

/// How the largest fitting font size is searched for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitStrategy {
    /// Probe 1, 2, 3, ... and stop at the first size that no longer fits.
    #[default]
    Linear,
    /// Double until a size overflows, then binary search between the last fit and it.
    /// Returns the same size as [`FitStrategy::Linear`] for monotonic metrics.
    Bisect,
}

/// The box a caption must fit inside.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FitConstraint {
    /// Maximum measured height in pixels.
    pub max_height: u32,
    /// Optional maximum measured width in pixels.
    pub max_width: Option<u32>,
}

impl FitConstraint {
    /// Height-only constraint.
    pub fn height(max_height: u32) -> Self {
        Self {
            max_height,
            max_width: None,
        }
    }

    /// Constrain both axes.
    pub fn boxed(max_width: u32, max_height: u32) -> Self {
        Self {
            max_height,
            max_width: Some(max_width),
        }
    }

    /// Whether a measured bounding box satisfies this constraint.
    pub fn admits(self, bbox: Size) -> bool {
        bbox.height <= self.max_height && self.max_width.is_none_or(|w| bbox.width <= w)
    }
}

/// A resolved font size and the caption's bounding box at that size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FontFit {
    /// Largest integer size that fits.
    pub size_px: u32,
    /// Measured bounding box at `size_px`.
    pub bbox: Size,
}

/// Find the largest integer font size whose measured box for `text` fits `constraint`.
///
/// Fails with [`SceneError::FontResolution`] when size 1 already overflows.
#[tracing::instrument(level = "debug", skip(metrics, constraint), fields(max_height = constraint.max_height))]
pub fn fit_font_size<M: FontMetrics + ?Sized>(
    metrics: &mut M,
    text: &str,
    constraint: FitConstraint,
    strategy: FitStrategy,
) -> SceneResult<FontFit> {
    let fit = match strategy {
        FitStrategy::Linear => fit_linear(metrics, text, constraint)?,
        FitStrategy::Bisect => fit_bisect(metrics, text, constraint)?,
    };

    fit.ok_or_else(|| SceneError::FontResolution {
        text: text.to_string(),
        target_height: constraint.max_height,
    })
}

fn fit_linear<M: FontMetrics + ?Sized>(
    metrics: &mut M,
    text: &str,
    constraint: FitConstraint,
) -> SceneResult<Option<FontFit>> {
    let mut best = None;
    let mut size_px = 1;
    loop {
        let bbox = probe(metrics, text, size_px)?;
        if !constraint.admits(bbox) {
            break;
        }
        best = Some(FontFit { size_px, bbox });
        if size_px == MAX_FONT_SIZE_PX {
            break;
        }
        size_px += 1;
    }
    Ok(best)
}

fn fit_bisect<M: FontMetrics + ?Sized>(
    metrics: &mut M,
    text: &str,
    constraint: FitConstraint,
) -> SceneResult<Option<FontFit>> {
    let bbox = probe(metrics, text, 1)?;
    if !constraint.admits(bbox) {
        return Ok(None);
    }

    let mut lo = FontFit { size_px: 1, bbox };
    let mut hi = None;
    while hi.is_none() && lo.size_px < MAX_FONT_SIZE_PX {
        let size_px = (lo.size_px * 2).min(MAX_FONT_SIZE_PX);
        let bbox = probe(metrics, text, size_px)?;
        if constraint.admits(bbox) {
            lo = FontFit { size_px, bbox };
        } else {
            hi = Some(size_px);
        }
    }

    if let Some(mut hi) = hi {
        while hi - lo.size_px > 1 {
            let mid = lo.size_px + (hi - lo.size_px) / 2;
            let bbox = probe(metrics, text, mid)?;
            if constraint.admits(bbox) {
                lo = FontFit { size_px: mid, bbox };
            } else {
                hi = mid;
            }
        }
    }
    Ok(Some(lo))
}

fn probe<M: FontMetrics + ?Sized>(metrics: &mut M, text: &str, size_px: u32) -> SceneResult<Size> {
    let bbox = metrics.measure(text, size_px)?;
    tracing::debug!(
        text,
        size_px,
        width = bbox.width,
        height = bbox.height,
        "measured caption"
    );
    Ok(bbox)
}

#[cfg(test)]
#[path = "../../tests/unit/text/fit.rs"]
mod tests;
