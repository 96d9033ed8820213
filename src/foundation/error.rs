/// Convenience result type used across the renderer.
pub type RenderResult<T> = Result<T, RenderError>;

/// Top-level error taxonomy used by the render pipeline.
///
/// Every error is local to a single render call. Nothing is retried: rendering is a pure function
/// of its input, so the same input fails the same way.
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    /// Missing or malformed snapshot field. Raised before any drawing.
    #[error("parse error: {0}")]
    Parse(String),

    /// A piece or highlight addresses a square outside its board, or a highlight references an
    /// absent board under [`crate::AbsentBoardPolicy::Reject`].
    #[error("bounds error: {0}")]
    Bounds(String),

    /// The output raster cannot be allocated (empty, too large, or invalid geometry).
    #[error("canvas error: {0}")]
    Canvas(String),

    /// Sprite table or sprite file problems, raised while preparing the atlas.
    #[error("asset error: {0}")]
    Asset(String),

    /// Failures while encoding the finished raster.
    #[error("encode error: {0}")]
    Encode(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RenderError {
    /// Build a [`RenderError::Parse`] value.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Build a [`RenderError::Bounds`] value.
    pub fn bounds(msg: impl Into<String>) -> Self {
        Self::Bounds(msg.into())
    }

    /// Build a [`RenderError::Canvas`] value.
    pub fn canvas(msg: impl Into<String>) -> Self {
        Self::Canvas(msg.into())
    }

    /// Build a [`RenderError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`RenderError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
