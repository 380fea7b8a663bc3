/// Convenience result type used across scrollscrub.
pub type ScrubResult<T> = Result<T, ScrubError>;

/// Top-level error taxonomy.
///
/// Runtime failures inside the controller (a missing frame, a surface that cannot be painted) are
/// logged and absorbed; these errors only reach callers from construction, configuration and the
/// lower-level building blocks.
#[derive(thiserror::Error, Debug)]
pub enum ScrubError {
    /// Invalid user-provided configuration or arguments.
    #[error("validation error: {0}")]
    Validation(String),

    /// A frame asset could not be fetched or decoded.
    #[error("asset error: {0}")]
    Asset(String),

    /// Errors while sizing a surface or drawing into it.
    #[error("render error: {0}")]
    Render(String),

    /// The host page rejected or could not answer a request.
    #[error("host error: {0}")]
    Host(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScrubError {
    /// Build a [`ScrubError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ScrubError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`ScrubError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`ScrubError::Host`] value.
    pub fn host(msg: impl Into<String>) -> Self {
        Self::Host(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
