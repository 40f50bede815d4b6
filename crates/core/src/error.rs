//! Error types for Omniboard.

use thiserror::Error;

/// Result type alias using Omniboard's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type covering every layer of the backend.
///
/// The fallback chains treat any error from a model attempt as a signal to
/// advance to the next candidate; the widget services treat any error from a
/// provider as a signal to serve mock data. Only `InvalidRequest` ever
/// surfaces to an HTTP client.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// A provider key is not configured. Reported once at startup; dependent
    /// calls short-circuit without touching the network.
    #[error("API key not configured for {0}")]
    MissingApiKey(&'static str),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    // ========================================================================
    // Remote Call Errors
    // ========================================================================
    /// Connection failure or non-success HTTP status from a provider.
    #[error("Transport error: {0}")]
    Transport(String),

    /// A provider answered, but not in a shape we can use.
    #[error("Unusable response data: {0}")]
    DataShape(String),

    /// A bounded attempt ran out of time.
    #[error("Timeout: {0}")]
    Timeout(String),

    // ========================================================================
    // Request Errors
    // ========================================================================
    /// The caller's input is malformed. Maps to HTTP 400.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    // ========================================================================
    // Generic Errors
    // ========================================================================
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Create a transport error.
    pub fn transport(msg: impl Into<String>) -> Self {
        Error::Transport(msg.into())
    }

    /// Create a data-shape error.
    pub fn data_shape(msg: impl Into<String>) -> Self {
        Error::DataShape(msg.into())
    }

    /// Create a timeout error.
    pub fn timeout(msg: impl Into<String>) -> Self {
        Error::Timeout(msg.into())
    }

    /// Create an invalid-request error.
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Error::InvalidRequest(msg.into())
    }

    /// Create an internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Error::Internal(msg.into())
    }
}
