//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers that validate their contents on
//! construction. Invalid values are rejected with clear error messages.

use std::fmt;

use reqwest::Url;

use crate::error::ConfigError;

/// A validated Companies House API key.
///
/// The key is sent as the username of HTTP Basic authentication with an
/// empty password. Its `Debug` output is masked so it never ends up in logs.
///
/// # Example
///
/// ```rust
/// use companies_house::ApiKey;
///
/// let key = ApiKey::new("my-api-key").unwrap();
/// assert_eq!(key.as_ref(), "my-api-key");
/// assert_eq!(format!("{:?}", key), "ApiKey(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Creates a new validated API key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyApiKey`] if the key is empty.
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();
        if key.is_empty() {
            return Err(ConfigError::EmptyApiKey);
        }
        Ok(Self(key))
    }
}

impl AsRef<str> for ApiKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(*****)")
    }
}

/// A validated API endpoint.
///
/// Only `https` endpoints are accepted. The base path always ends with a
/// slash so that relative resource paths are appended rather than replacing
/// the last segment.
///
/// # Example
///
/// ```rust
/// use companies_house::Endpoint;
///
/// let endpoint = Endpoint::new("https://api.example.com:8000").unwrap();
/// assert_eq!(endpoint.host_name(), Some("api.example.com"));
/// assert_eq!(endpoint.port(), Some(8000));
///
/// assert!(Endpoint::new("http://example.net").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint(Url);

impl Endpoint {
    /// The production Companies House endpoint.
    pub const PRODUCTION: &'static str = "https://api.companieshouse.gov.uk";

    /// Creates a new validated endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEndpoint`] if the URL cannot be parsed or
    /// has no host, and [`ConfigError::InsecureEndpoint`] if its scheme is not
    /// `https`.
    pub fn new(url: impl AsRef<str>) -> Result<Self, ConfigError> {
        let raw = url.as_ref().trim();
        let parsed = Url::parse(raw).map_err(|_| ConfigError::InvalidEndpoint {
            url: raw.to_string(),
        })?;

        if parsed.scheme() != "https" {
            return Err(ConfigError::InsecureEndpoint {
                url: raw.to_string(),
            });
        }

        Self::from_url(parsed, raw)
    }

    /// Returns the production endpoint.
    #[must_use]
    pub fn production() -> Self {
        Self(Url::parse(Self::PRODUCTION).expect("production endpoint is a valid URL"))
    }

    /// Builds an endpoint without the scheme check, for plain-HTTP mock servers.
    #[cfg(test)]
    pub(crate) fn insecure(url: &str) -> Self {
        let parsed = Url::parse(url).unwrap();
        Self::from_url(parsed, url).unwrap()
    }

    fn from_url(mut url: Url, raw: &str) -> Result<Self, ConfigError> {
        if url.host_str().map_or(true, str::is_empty) {
            return Err(ConfigError::InvalidEndpoint {
                url: raw.to_string(),
            });
        }

        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        url.set_query(None);
        url.set_fragment(None);

        Ok(Self(url))
    }

    /// Returns the URL scheme (always `https` outside tests).
    #[must_use]
    pub fn scheme(&self) -> &str {
        self.0.scheme()
    }

    /// Returns the host name of the endpoint.
    #[must_use]
    pub fn host_name(&self) -> Option<&str> {
        self.0.host_str()
    }

    /// Returns the explicit port, if one was given.
    #[must_use]
    pub fn port(&self) -> Option<u16> {
        self.0.port()
    }

    /// Joins a relative resource path onto the endpoint.
    pub(crate) fn join(&self, path: &str) -> Option<Url> {
        self.0.join(path.trim_start_matches('/')).ok()
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self::production()
    }
}

impl AsRef<str> for Endpoint {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}
