//! Error types for Hookflow.
//!
//! All errors in Hookflow are represented by the `HookflowError` enum,
//! which provides specific variants for different error categories.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for all Hookflow operations.
///
/// Each variant represents a specific category of error that can occur
/// while creating nodes, running them, or delivering webhooks.
#[derive(Deserialize, Serialize, Error, Debug, Clone, PartialEq)]
pub enum HookflowError {
    /// Configuration parsing or validation errors.
    #[error("{0}")]
    Config(String),

    /// Data conversion errors (JSON, vars, etc.).
    #[error("{0}")]
    Convert(String),

    /// Node definition or params validation errors.
    #[error("{0}")]
    Node(String),

    /// Runtime execution errors.
    #[error("{0}")]
    Runtime(String),

    /// Outbound HTTP delivery errors.
    #[error("{0}")]
    Http(String),

    /// Image tensor conversion or encoding errors.
    #[error("{0}")]
    Image(String),

    /// I/O operation errors.
    #[error("{0}")]
    IoError(String),

    /// Message queue errors.
    #[error("{0}")]
    Queue(String),
}

impl From<HookflowError> for String {
    fn from(val: HookflowError) -> Self {
        val.to_string()
    }
}

impl From<std::io::Error> for HookflowError {
    fn from(error: std::io::Error) -> Self {
        HookflowError::IoError(error.to_string())
    }
}

impl From<serde_json::Error> for HookflowError {
    fn from(error: serde_json::Error) -> Self {
        HookflowError::Convert(error.to_string())
    }
}

impl From<jsonschema::ValidationError<'_>> for HookflowError {
    fn from(error: jsonschema::ValidationError<'_>) -> Self {
        HookflowError::Node(error.to_string())
    }
}

impl From<reqwest::Error> for HookflowError {
    fn from(error: reqwest::Error) -> Self {
        HookflowError::Http(error.to_string())
    }
}

impl From<image::ImageError> for HookflowError {
    fn from(error: image::ImageError) -> Self {
        HookflowError::Image(error.to_string())
    }
}
