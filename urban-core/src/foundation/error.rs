/// Convenience result type used across the engine.
pub type UrbanResult<T> = Result<T, UrbanError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum UrbanError {
    /// Invalid caller-provided parameters.
    #[error("validation error: {0}")]
    Validation(String),

    /// Input image bytes could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// A font source could not be read or contained no usable face.
    #[error("font error: {0}")]
    Font(String),

    /// Errors raised while building or blending layers.
    #[error("render error: {0}")]
    Render(String),

    /// Errors while encoding the final image.
    #[error("encode error: {0}")]
    Encode(String),

    /// Invalid or unreadable engine configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl UrbanError {
    /// Build a [`UrbanError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`UrbanError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`UrbanError::Font`] value.
    pub fn font(msg: impl Into<String>) -> Self {
        Self::Font(msg.into())
    }

    /// Build a [`UrbanError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`UrbanError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`UrbanError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
