/// Convenience result type used across clipmask.
pub type ClipMaskResult<T> = Result<T, ClipMaskError>;

/// Top-level error taxonomy for the checked entry points and the image pipeline.
///
/// The per-pixel kernels never fail; errors only come from validating buffers,
/// options, and the resources the pipeline builds around the kernels.
#[derive(thiserror::Error, Debug)]
pub enum ClipMaskError {
    /// Caller-provided buffers, dimensions or options are inconsistent.
    #[error("validation error: {0}")]
    Validation(String),

    /// Failures while setting up or running a masking pass (thread pools etc).
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Errors when serializing or deserializing options.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ClipMaskError {
    /// Build a [`ClipMaskError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ClipMaskError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build a [`ClipMaskError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
