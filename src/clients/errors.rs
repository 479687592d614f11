//! Error types for Companies House API calls.
//!
//! Every non-200 response is classified into one [`ApiError`] variant. Errors
//! built from a response carry the original [`RawResponse`], and their
//! message ends with `" - HTTP <status>"`.
//!
//! # Example
//!
//! ```rust,ignore
//! use companies_house::ApiError;
//!
//! match client.company("07495895").await {
//!     Ok(company) => println!("{company}"),
//!     Err(ApiError::NotFound { .. }) => println!("no such company"),
//!     Err(ApiError::RateLimit { response }) => {
//!         println!("slow down, retry after {:?}", response.header("retry-after"));
//!     }
//!     Err(e) => println!("failed: {e} (status {:?})", e.status()),
//! }
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::clients::http_request::ResourceType;

/// A response exactly as received, kept for inspection by callers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
    /// The HTTP status code.
    pub status: u16,
    /// Response headers, keyed by lower-cased name.
    pub headers: HashMap<String, Vec<String>>,
    /// The undecoded response body.
    pub body: String,
}

impl RawResponse {
    /// Creates a response with no headers.
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    /// Returns the first value of a header, looked up case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }
}

/// Errors returned by client calls.
///
/// The variants built from an HTTP response (`Authentication`, `NotFound`,
/// `RateLimit`, `BadGateway`, `Unknown`, `InvalidBody`) expose it through
/// [`ApiError::response`] and [`ApiError::status`].
#[derive(Debug, Error, Clone)]
pub enum ApiError {
    /// The API key was rejected (HTTP 401).
    #[error("Invalid API key{}", http_suffix(.response))]
    Authentication {
        /// The 401 response.
        response: RawResponse,
    },

    /// The requested resource does not exist (HTTP 404).
    #[error(
        "Resource not found - type `{resource_type}`, id `{}`{}",
        or_nil(.resource_id.as_deref()),
        http_suffix(.response)
    )]
    NotFound {
        /// The logical operation that was attempted.
        resource_type: ResourceType,
        /// The identifier that was looked up, when the operation has one.
        resource_id: Option<String>,
        /// The 404 response.
        response: RawResponse,
    },

    /// Too many requests were made (HTTP 429).
    #[error("Rate limit exceeded{}", http_suffix(.response))]
    RateLimit {
        /// The 429 response.
        response: RawResponse,
    },

    /// The service's gateway failed (HTTP 502).
    #[error("Bad gateway error{}", http_suffix(.response))]
    BadGateway {
        /// The 502 response.
        response: RawResponse,
    },

    /// Any other status code.
    #[error("Unknown API response{}", http_suffix(.response))]
    Unknown {
        /// The unexpected response.
        response: RawResponse,
    },

    /// The connection could not be opened, or the response did not arrive in time.
    #[error("Request timed out")]
    Timeout,

    /// A company number failed validation before any request was sent.
    #[error("Company number {number} is invalid")]
    InvalidCompanyNumber {
        /// The rejected number.
        number: String,
    },

    /// A 200 response whose body could not be used.
    #[error("Invalid response body: {reason}{}", http_suffix(.response))]
    InvalidBody {
        /// Why the body was rejected.
        reason: String,
        /// The offending response.
        response: RawResponse,
    },

    /// A list endpoint returned a body that is not a page.
    #[error("Malformed page: {reason}")]
    MalformedPage {
        /// Why the page was rejected.
        reason: String,
    },

    /// A paginated resource stopped returning items before its reported total.
    #[error("Pagination stalled after {received} of {total} items")]
    StalledPagination {
        /// Items gathered before the empty page.
        received: usize,
        /// The total the server reported.
        total: u64,
    },

    /// A path segment was empty or a dot segment, or the path could not be
    /// joined onto the endpoint. Nothing was sent.
    #[error("Invalid request path: {path}")]
    InvalidPath {
        /// The path that was rejected.
        path: String,
    },

    /// Transport failure other than a timeout.
    #[error("Network error: {0}")]
    Network(#[source] Arc<reqwest::Error>),
}

fn http_suffix(response: &RawResponse) -> String {
    format!(" - HTTP {}", response.status)
}

fn or_nil(id: Option<&str>) -> &str {
    id.unwrap_or("nil")
}

impl ApiError {
    /// Returns the response this error was built from, if any.
    #[must_use]
    pub const fn response(&self) -> Option<&RawResponse> {
        match self {
            Self::Authentication { response }
            | Self::NotFound { response, .. }
            | Self::RateLimit { response }
            | Self::BadGateway { response }
            | Self::Unknown { response }
            | Self::InvalidBody { response, .. } => Some(response),
            Self::Timeout
            | Self::InvalidCompanyNumber { .. }
            | Self::MalformedPage { .. }
            | Self::StalledPagination { .. }
            | Self::InvalidPath { .. }
            | Self::Network(_) => None,
        }
    }

    /// Returns the HTTP status of the response this error was built from, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.response().map(|response| response.status)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(Arc::new(error))
        }
    }
}

impl Serialize for ApiError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
