//! Execution of single requests against the Companies House API.
//!
//! This module provides the [`HttpClient`] type, which sends one
//! [`Request`] over a [`Connection`], classifies the response and publishes
//! one notification per request that reached the HTTP layer.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;

use crate::clients::connection::Connection;
use crate::clients::errors::ApiError;
use crate::clients::http_request::Request;
use crate::clients::http_response::classify;
use crate::config::{ApiKey, ClientConfig, Endpoint};
use crate::instrumentation::{Instrumentation, NotificationPayload, Outcome};

/// Executes requests for a client.
///
/// The executor never retries and never recovers from an error; every
/// failure is returned to the caller.
///
/// # Notifications
///
/// Once a response has been received, a notification carrying either the
/// parsed body or the error is published before `execute` returns. Timeouts
/// and other transport failures happen before any response exists and are
/// returned without a notification.
#[derive(Debug, Clone)]
pub struct HttpClient {
    api_key: ApiKey,
    endpoint: Endpoint,
    instrumentation: Arc<dyn Instrumentation>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates an executor using the credentials, endpoint and instrumentation of `config`.
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            api_key: config.api_key().clone(),
            endpoint: config.endpoint().clone(),
            instrumentation: Arc::clone(config.instrumentation()),
        }
    }

    /// Returns the endpoint requests are sent to.
    #[must_use]
    pub const fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Sends `request` over `connection` and classifies the response.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Timeout`] or [`ApiError::Network`] for transport
    /// failures, [`ApiError::InvalidPath`] if the path cannot be joined onto
    /// the endpoint, and otherwise the error the response status maps to.
    pub async fn execute(
        &self,
        connection: &Connection,
        request: Request,
    ) -> Result<Value, ApiError> {
        let mut url = self
            .endpoint
            .join(&request.path)
            .ok_or_else(|| ApiError::InvalidPath {
                path: request.path.clone(),
            })?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(request.query.iter());
        }

        tracing::debug!(
            resource = %request.resource_type,
            transaction_id = %request.transaction_id,
            path = %request.path,
            "Sending Companies House request"
        );

        let started_at = Utc::now();
        let response = connection.get(url, &self.api_key).await.map_err(|e| {
            tracing::warn!(
                resource = %request.resource_type,
                transaction_id = %request.transaction_id,
                error = %e,
                "Companies House request failed before a response was received"
            );
            e
        })?;

        let status = response.status;
        let result = classify(
            response,
            request.resource_type,
            request.resource_id.as_deref(),
        );

        let outcome = match &result {
            Ok(body) => Outcome::Response(body.clone()),
            Err(error) => Outcome::Error(error.clone()),
        };
        let payload = NotificationPayload {
            method: request.method,
            path: request.path,
            query: request.query,
            status,
            outcome,
        };

        self.instrumentation.publish(
            &request.resource_type.event_name(),
            started_at,
            Utc::now(),
            &request.transaction_id,
            &payload,
        );

        match &result {
            Ok(_) => tracing::debug!(
                resource = %request.resource_type,
                transaction_id = %request.transaction_id,
                status,
                "Companies House request succeeded"
            ),
            Err(error) => tracing::warn!(
                resource = %request.resource_type,
                transaction_id = %request.transaction_id,
                status,
                error = %error,
                "Companies House request returned an error"
            ),
        }

        result
    }
}
