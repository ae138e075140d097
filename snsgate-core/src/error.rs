//! Error types for the SNS gateway

use thiserror::Error;

/// Error returned by the notification service.
///
/// Carries whatever code and message the service reported. The gateway never
/// classifies, retries, or rewraps these; they reach the caller unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}: {message}", code.as_deref().unwrap_or("ServiceError"))]
pub struct ServiceError {
    /// Service error code, e.g. `InvalidParameter`, `NotFound`, `Throttled`.
    pub code: Option<String>,
    /// Human-readable message from the service.
    pub message: String,
}

impl ServiceError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }

    /// Error with a message but no service-assigned code, e.g. a transport
    /// failure that never reached the service.
    pub fn uncoded(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }
}

/// Invalid or missing environment configuration.
///
/// Only produced by explicit validation ([`crate::SnsConfig::validate`]);
/// constructing a gateway never fails on configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing credentials: {0} is empty")]
    MissingCredentials(&'static str),
    #[error("missing region")]
    MissingRegion,
}
