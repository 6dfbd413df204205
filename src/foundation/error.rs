/// Convenience result type used across Cardpress.
pub type CardpressResult<T> = Result<T, CardpressError>;

/// Top-level error taxonomy used by batch-level APIs.
///
/// Per-card render failures are *not* errors at this level; they travel as
/// [`RenderError`] values inside render outcomes so a bad card never aborts
/// the batch.
#[derive(thiserror::Error, Debug)]
pub enum CardpressError {
    /// Invalid user-provided configuration or catalog data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while loading or decoding fonts and layer assets.
    #[error("asset error: {0}")]
    Asset(String),

    /// Internal pipeline invariant broken (e.g. registry out of sync).
    #[error("pipeline error: {0}")]
    Pipeline(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CardpressError {
    /// Build a [`CardpressError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CardpressError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`CardpressError::Pipeline`] value.
    pub fn pipeline(msg: impl Into<String>) -> Self {
        Self::Pipeline(msg.into())
    }
}

/// Per-card render failure.
///
/// Both kinds are non-fatal to the batch: the driver tallies them and moves
/// on to the next card. No partial image is ever produced for a failed card.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The base illustration for the card's texture key is not in the store.
    #[error("missing base texture '{key}'")]
    MissingTexture {
        /// Texture key the card referenced.
        key: String,
    },

    /// The card's frame code is not in the variant table.
    #[error("unknown frame variant {frame}")]
    UnknownFrame {
        /// Offending frame code.
        frame: i32,
    },
}
