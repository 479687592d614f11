//! Instrumentation of physical requests.
//!
//! Every request that reaches the HTTP layer publishes exactly one
//! notification through the configured [`Instrumentation`] backend, whether
//! it succeeded or failed. All pages of one logical call share the same
//! transaction id.
//!
//! # Backends
//!
//! - [`NullInstrumentation`]: discards notifications (the default)
//! - [`BroadcastInstrumentation`]: in-process publish/subscribe
//! - [`TracingInstrumentation`]: emits notifications as `tracing` events
//!
//! Hosts can implement [`Instrumentation`] to forward notifications to their
//! own metrics or tracing pipeline.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use companies_house::{ApiKey, ClientConfig};
//! use companies_house::instrumentation::BroadcastInstrumentation;
//!
//! let broadcast = Arc::new(BroadcastInstrumentation::new(16));
//! let mut notifications = broadcast.subscribe();
//!
//! let config = ClientConfig::builder()
//!     .api_key(ApiKey::new("my-api-key").unwrap())
//!     .instrumentation(broadcast)
//!     .build()
//!     .unwrap();
//! # let _ = (config, &mut notifications);
//! ```

mod broadcast;
mod logging;

pub use broadcast::BroadcastInstrumentation;
pub use logging::TracingInstrumentation;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::clients::{ApiError, HttpMethod, Query, TransactionId};

/// A sink for request notifications.
///
/// Implementations must be cheap and must not fail; they run inline at the
/// end of every request.
pub trait Instrumentation: Send + Sync + fmt::Debug {
    /// Publishes the notification of one physical request.
    fn publish(
        &self,
        name: &str,
        started_at: DateTime<Utc>,
        ended_at: DateTime<Utc>,
        transaction_id: &TransactionId,
        payload: &NotificationPayload,
    );
}

/// Instrumentation that discards every notification.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullInstrumentation;

impl Instrumentation for NullInstrumentation {
    fn publish(
        &self,
        _name: &str,
        _started_at: DateTime<Utc>,
        _ended_at: DateTime<Utc>,
        _transaction_id: &TransactionId,
        _payload: &NotificationPayload,
    ) {
    }
}

/// What a physical request produced.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The parsed body of a successful response.
    Response(Value),
    /// The error the response was classified as.
    Error(ApiError),
}

/// Details of one physical request.
///
/// Serializes as `{method, path, query, status, response | error}`, with
/// `status` as a number.
#[derive(Clone, Debug, Serialize)]
pub struct NotificationPayload {
    /// Always `get`.
    pub method: HttpMethod,
    /// Path relative to the endpoint.
    pub path: String,
    /// The query parameters that were sent.
    pub query: Query,
    /// The response status code.
    ///
    /// Serialized as a JSON number (e.g. `200`), not as a string.
    pub status: u16,
    /// Either the parsed response or the error.
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl NotificationPayload {
    /// Returns the parsed response body, if the request succeeded.
    #[must_use]
    pub const fn response(&self) -> Option<&Value> {
        match &self.outcome {
            Outcome::Response(body) => Some(body),
            Outcome::Error(_) => None,
        }
    }

    /// Returns the error, if the request failed.
    #[must_use]
    pub const fn error(&self) -> Option<&ApiError> {
        match &self.outcome {
            Outcome::Response(_) => None,
            Outcome::Error(error) => Some(error),
        }
    }
}

/// An owned notification, as delivered to subscribers.
#[derive(Clone, Debug, Serialize)]
pub struct Notification {
    /// Event name, e.g. `companies_house.officers`.
    pub name: String,
    /// When the request started.
    pub started_at: DateTime<Utc>,
    /// When the request finished.
    pub ended_at: DateTime<Utc>,
    /// Correlation id of the logical call.
    pub transaction_id: TransactionId,
    /// Request details and outcome.
    pub payload: NotificationPayload,
}

impl Notification {
    /// Returns how long the request took.
    #[must_use]
    pub fn duration(&self) -> chrono::Duration {
        self.ended_at - self.started_at
    }
}
