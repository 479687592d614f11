//! Error types for client configuration.
//!
//! This module contains the errors raised while building a
//! [`ClientConfig`](crate::ClientConfig). Errors raised by API calls live in
//! [`clients::ApiError`](crate::clients::ApiError).
//!
//! # Error Handling
//!
//! All configuration constructors return `Result<T, ConfigError>` to enable
//! fail-fast validation before any network activity happens.
//!
//! # Example
//!
//! ```rust
//! use companies_house::{ApiKey, ConfigError};
//!
//! let result = ApiKey::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyApiKey)));
//! ```

use thiserror::Error;

/// Errors that can occur while configuring a client.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// API key cannot be empty.
    #[error("API key cannot be empty. Please provide a valid Companies House API key.")]
    EmptyApiKey,

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// The endpoint could not be parsed as an absolute URL.
    #[error("Invalid endpoint '{url}'. Please provide an absolute URL (e.g., 'https://api.companieshouse.gov.uk').")]
    InvalidEndpoint {
        /// The invalid URL that was provided.
        url: String,
    },

    /// The endpoint does not use a secure transport.
    #[error("Insecure endpoint '{url}'. HTTP is not supported, the endpoint must use https.")]
    InsecureEndpoint {
        /// The rejected URL.
        url: String,
    },
}
