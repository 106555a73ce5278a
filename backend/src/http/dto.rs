//! Data Transfer Objects for the HTTP API.
//!
//! Measurement rows are serialized straight from `crate::api`; only the
//! envelope and health shapes live here.

use serde::{Deserialize, Serialize};

pub use crate::api::{DepthseriesRecord, TimeseriesRecord};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// API version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Always `"error"`
    pub status: String,
    /// Human-readable message
    pub message: String,
}

impl ErrorEnvelope {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
        }
    }
}
