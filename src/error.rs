//! Error handling for pipeview
//!
//! This module defines custom error types and a Result alias for use
//! throughout the crate.

use thiserror::Error;

/// Main error type for pipeview operations
#[derive(Error, Debug)]
pub enum PipeViewError {
    /// Errors raised by the WebSocket transport
    #[error("Transport error: {0}")]
    Transport(#[from] tungstenite::Error),

    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors related to channel communication
    #[error("Channel error: {0}")]
    Channel(String),

    /// Errors related to wire message encoding/decoding
    #[error("Wire error: {0}")]
    Wire(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<PipeViewError>,
    },
}

impl PipeViewError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        PipeViewError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// Result type alias for pipeview operations
pub type Result<T> = std::result::Result<T, PipeViewError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PipeViewError::Channel("worker hung up".to_string());
        assert_eq!(err.to_string(), "Channel error: worker hung up");
    }

    #[test]
    fn test_error_with_context() {
        let err = PipeViewError::Config("missing endpoint".to_string());
        let with_ctx = err.with_context("Failed to load config");
        assert!(with_ctx.to_string().contains("Failed to load config"));
    }

    #[test]
    fn test_result_ext_context() {
        let res: Result<()> = Err(PipeViewError::Config("bad".to_string()));
        let err = res.context("loading pipeview.toml").unwrap_err();
        assert!(err.to_string().contains("loading pipeview.toml"));
    }
}
