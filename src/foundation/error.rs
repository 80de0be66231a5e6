/// Convenience result type used across reelsmith.
pub type ReelResult<T> = Result<T, ReelError>;

/// Top-level error taxonomy used by the assembly pipeline.
///
/// Callers decide recoverability by variant: [`ReelError::Media`] is swallowed per asset by the
/// timeline builder and the bed mixer, [`ReelError::Unavailable`] signals a missing capability the
/// caller is expected to fall back from, and [`ReelError::Encode`] is always terminal.
#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// Invalid configuration or request data.
    #[error("validation error: {0}")]
    Validation(String),

    /// A required external capability (tool, font, model) is absent or failed.
    #[error("unavailable: {0}")]
    Unavailable(String),

    /// A single media asset failed to open, probe or decode.
    #[error("media error: {0}")]
    Media(String),

    /// Encoding or output finalization failed.
    #[error("encode error: {0}")]
    Encode(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelError {
    /// Build a [`ReelError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ReelError::Unavailable`] value.
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Build a [`ReelError::Media`] value.
    pub fn media(msg: impl Into<String>) -> Self {
        Self::Media(msg.into())
    }

    /// Build a [`ReelError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`ReelError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
