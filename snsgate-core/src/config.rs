//! Connection configuration for the SNS gateway
//!
//! Read once at process start; the resulting SDK configuration backs the one
//! shared client handle for the process lifetime.

use aws_config::meta::region::RegionProviderChain;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::Credentials;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;

fn default_region() -> String {
    "us-east-1".to_string()
}

/// Region and credentials used to construct the shared service client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnsConfig {
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default)]
    pub access_key_id: String,
    #[serde(default)]
    pub secret_access_key: String,
}

impl SnsConfig {
    /// Load configuration from `AWS_REGION`, `AWS_ACCESS_KEY_ID` and
    /// `AWS_SECRET_ACCESS_KEY`.
    ///
    /// Absent credentials default to empty strings rather than failing:
    /// the service rejects them on first use, surfacing as a `ServiceError`
    /// from whichever operation runs first. Callers that prefer fail-fast
    /// can run [`SnsConfig::validate`] themselves.
    pub fn from_env() -> Self {
        let config = Self {
            region: std::env::var("AWS_REGION").unwrap_or_else(|_| default_region()),
            access_key_id: std::env::var("AWS_ACCESS_KEY_ID").unwrap_or_default(),
            secret_access_key: std::env::var("AWS_SECRET_ACCESS_KEY").unwrap_or_default(),
        };

        if config.access_key_id.is_empty() || config.secret_access_key.is_empty() {
            warn!(region = %config.region, "SNS credentials missing; operations will fail at call time");
        }

        config
    }

    /// Check that region and both credential halves are present.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.region.is_empty() {
            return Err(ConfigError::MissingRegion);
        }
        if self.access_key_id.is_empty() {
            return Err(ConfigError::MissingCredentials("AWS_ACCESS_KEY_ID"));
        }
        if self.secret_access_key.is_empty() {
            return Err(ConfigError::MissingCredentials("AWS_SECRET_ACCESS_KEY"));
        }
        Ok(())
    }

    /// Build the SDK configuration the shared client is constructed from.
    pub async fn load(&self) -> SdkConfig {
        let region_provider =
            RegionProviderChain::first_try(Region::new(self.region.clone())).or_default_provider();
        let credentials = Credentials::from_keys(
            self.access_key_id.clone(),
            self.secret_access_key.clone(),
            None,
        );

        aws_config::defaults(BehaviorVersion::latest())
            .credentials_provider(credentials)
            .region(region_provider)
            .load()
            .await
    }
}

impl Default for SnsConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            access_key_id: String::new(),
            secret_access_key: String::new(),
        }
    }
}
