/// Convenience result type used across cardscene.
pub type SceneResult<T> = Result<T, SceneError>;

/// Top-level error taxonomy used by compositing APIs.
#[derive(thiserror::Error, Debug)]
pub enum SceneError {
    /// Zero or oversized canvas/layer dimensions.
    #[error("invalid dimension: {0}")]
    InvalidDimension(String),

    /// Source image that cannot be scaled or whose buffer is malformed.
    #[error("invalid source image: {0}")]
    InvalidSourceImage(String),

    /// No integer font size >= 1 keeps the caption within its target box.
    #[error("no font size fits {text:?} within {target_height}px")]
    FontResolution {
        /// Caption that was being fitted.
        text: String,
        /// Target height in pixels.
        target_height: u32,
    },

    /// Unsupported output format or failure while serializing the canvas.
    #[error("encode error: {0}")]
    Encode(String),

    /// A layer could not be positioned relative to the canvas or its attachment.
    #[error("layout error: {0}")]
    Layout(String),

    /// The canvas was already painted; a new scene is required.
    #[error("scene already rendered")]
    AlreadyRendered,

    /// Invalid scene description data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SceneError {
    /// Build a [`SceneError::InvalidDimension`] value.
    pub fn invalid_dimension(msg: impl Into<String>) -> Self {
        Self::InvalidDimension(msg.into())
    }

    /// Build a [`SceneError::InvalidSourceImage`] value.
    pub fn invalid_source(msg: impl Into<String>) -> Self {
        Self::InvalidSourceImage(msg.into())
    }

    /// Build a [`SceneError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`SceneError::Layout`] value.
    pub fn layout(msg: impl Into<String>) -> Self {
        Self::Layout(msg.into())
    }

    /// Build a [`SceneError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Whether this error aborts a whole composition rather than a single layer.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Encode(_) | Self::AlreadyRendered | Self::Validation(_)
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
