//! Core types for the SNS gateway
//!
//! This crate provides the configuration and error types shared by the
//! gateway facade and its test double.

pub mod config;
pub mod error;

pub use config::SnsConfig;
pub use error::{ConfigError, ServiceError};
