//! Configuration types for the Companies House client.
//!
//! This module provides the configuration used to construct a
//! [`Client`](crate::Client).
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`ClientConfig`]: The immutable configuration shared by every request
//! - [`ClientConfigBuilder`]: A builder for constructing [`ClientConfig`] instances
//! - [`ApiKey`]: A validated API key newtype with masked debug output
//! - [`Endpoint`]: A validated, `https`-only API endpoint
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use companies_house::{ApiKey, ClientConfig};
//!
//! let config = ClientConfig::builder()
//!     .api_key(ApiKey::new("my-api-key").unwrap())
//!     .read_timeout(Duration::from_secs(10))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.open_timeout(), Duration::from_secs(60));
//! ```

mod newtypes;

pub use newtypes::{ApiKey, Endpoint};

use std::sync::Arc;
use std::time::Duration;

use crate::error::ConfigError;
use crate::instrumentation::{Instrumentation, NullInstrumentation};

/// Default open and read timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for the Companies House client.
///
/// # Thread Safety
///
/// `ClientConfig` is `Clone`, `Send`, and `Sync`. Cloning shares the
/// configured instrumentation backend.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    api_key: ApiKey,
    endpoint: Endpoint,
    open_timeout: Duration,
    read_timeout: Duration,
    instrumentation: Arc<dyn Instrumentation>,
    user_agent_prefix: Option<String>,
    validate_company_numbers: bool,
}

impl ClientConfig {
    /// Creates a new builder for constructing a `ClientConfig`.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Returns the API key.
    #[must_use]
    pub const fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    /// Returns the API endpoint.
    #[must_use]
    pub const fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Returns the connection open timeout.
    #[must_use]
    pub const fn open_timeout(&self) -> Duration {
        self.open_timeout
    }

    /// Returns the response read timeout.
    #[must_use]
    pub const fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    /// Returns the instrumentation backend.
    #[must_use]
    pub fn instrumentation(&self) -> &Arc<dyn Instrumentation> {
        &self.instrumentation
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns whether company numbers are validated before requests are sent.
    #[must_use]
    pub const fn validate_company_numbers(&self) -> bool {
        self.validate_company_numbers
    }
}

// Verify ClientConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ClientConfig>();
};

/// Builder for constructing [`ClientConfig`] instances.
///
/// `api_key` is the only required field.
///
/// # Defaults
///
/// - `endpoint`: `https://api.companieshouse.gov.uk`
/// - `open_timeout`, `read_timeout`: 60 seconds
/// - `instrumentation`: [`NullInstrumentation`]
/// - `user_agent_prefix`: `None`
/// - `validate_company_numbers`: `false`
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    api_key: Option<ApiKey>,
    endpoint: Option<Endpoint>,
    open_timeout: Option<Duration>,
    read_timeout: Option<Duration>,
    instrumentation: Option<Arc<dyn Instrumentation>>,
    user_agent_prefix: Option<String>,
    validate_company_numbers: bool,
}

impl ClientConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key (required).
    #[must_use]
    pub fn api_key(mut self, key: ApiKey) -> Self {
        self.api_key = Some(key);
        self
    }

    /// Sets an alternate endpoint.
    #[must_use]
    pub fn endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    /// Sets how long to wait for a connection to open.
    #[must_use]
    pub const fn open_timeout(mut self, timeout: Duration) -> Self {
        self.open_timeout = Some(timeout);
        self
    }

    /// Sets how long to wait for a response once a request is sent.
    #[must_use]
    pub const fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    /// Sets the instrumentation backend that receives one notification per request.
    #[must_use]
    pub fn instrumentation(mut self, instrumentation: Arc<dyn Instrumentation>) -> Self {
        self.instrumentation = Some(instrumentation);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Rejects malformed company numbers before any request is sent.
    #[must_use]
    pub const fn validate_company_numbers(mut self, validate: bool) -> Self {
        self.validate_company_numbers = validate;
        self
    }

    /// Builds the [`ClientConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `api_key` is not set.
    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        let api_key = self
            .api_key
            .ok_or(ConfigError::MissingRequiredField { field: "api_key" })?;

        Ok(ClientConfig {
            api_key,
            endpoint: self.endpoint.unwrap_or_default(),
            open_timeout: self.open_timeout.unwrap_or(DEFAULT_TIMEOUT),
            read_timeout: self.read_timeout.unwrap_or(DEFAULT_TIMEOUT),
            instrumentation: self
                .instrumentation
                .unwrap_or_else(|| Arc::new(NullInstrumentation)),
            user_agent_prefix: self.user_agent_prefix,
            validate_company_numbers: self.validate_company_numbers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instrumentation::BroadcastInstrumentation;

    #[test]
    fn test_builder_requires_api_key() {
        let result = ClientConfigBuilder::new().build();

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField { field: "api_key" })
        ));
    }

    #[test]
    fn test_builder_provides_sensible_defaults() {
        let config = ClientConfig::builder()
            .api_key(ApiKey::new("key").unwrap())
            .build()
            .unwrap();

        assert_eq!(config.endpoint(), &Endpoint::production());
        assert_eq!(config.open_timeout(), Duration::from_secs(60));
        assert_eq!(config.read_timeout(), Duration::from_secs(60));
        assert!(config.user_agent_prefix().is_none());
        assert!(!config.validate_company_numbers());
        assert!(format!("{:?}", config.instrumentation()).contains("NullInstrumentation"));
    }

    #[test]
    fn test_builder_with_all_optional_fields() {
        let broadcast = Arc::new(BroadcastInstrumentation::new(8));
        let config = ClientConfig::builder()
            .api_key(ApiKey::new("key").unwrap())
            .endpoint(Endpoint::new("https://api.example.com:8000").unwrap())
            .open_timeout(Duration::from_secs(1))
            .read_timeout(Duration::from_secs(2))
            .instrumentation(broadcast)
            .user_agent_prefix("MyApp/1.0")
            .validate_company_numbers(true)
            .build()
            .unwrap();

        assert_eq!(config.endpoint().port(), Some(8000));
        assert_eq!(config.open_timeout(), Duration::from_secs(1));
        assert_eq!(config.read_timeout(), Duration::from_secs(2));
        assert_eq!(config.user_agent_prefix(), Some("MyApp/1.0"));
        assert!(config.validate_company_numbers());
        assert!(format!("{:?}", config.instrumentation()).contains("BroadcastInstrumentation"));
    }

    #[test]
    fn test_config_debug_masks_api_key() {
        let config = ClientConfig::builder()
            .api_key(ApiKey::new("el-psy-congroo").unwrap())
            .build()
            .unwrap();

        let debug_str = format!("{config:?}");
        assert!(debug_str.contains("ClientConfig"));
        assert!(!debug_str.contains("el-psy-congroo"));
    }
}
