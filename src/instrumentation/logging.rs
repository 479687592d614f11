//! Instrumentation backed by `tracing` events.

use chrono::{DateTime, Utc};

use super::{Instrumentation, NotificationPayload, Outcome};
use crate::clients::TransactionId;

/// Instrumentation that emits each notification as a `tracing` event.
///
/// Successful requests are logged at `INFO`, failed ones at `WARN`, both
/// under the `companies_house::instrumentation` target. Installing a
/// subscriber is left to the host application.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingInstrumentation;

impl Instrumentation for TracingInstrumentation {
    fn publish(
        &self,
        name: &str,
        started_at: DateTime<Utc>,
        ended_at: DateTime<Utc>,
        transaction_id: &TransactionId,
        payload: &NotificationPayload,
    ) {
        let duration_ms = (ended_at - started_at).num_milliseconds();

        match &payload.outcome {
            Outcome::Response(_) => tracing::info!(
                target: "companies_house::instrumentation",
                event = name,
                transaction_id = %transaction_id,
                method = %payload.method,
                path = %payload.path,
                status = payload.status,
                duration_ms,
                "Request completed"
            ),
            Outcome::Error(error) => tracing::warn!(
                target: "companies_house::instrumentation",
                event = name,
                transaction_id = %transaction_id,
                method = %payload.method,
                path = %payload.path,
                status = payload.status,
                duration_ms,
                error = %error,
                "Request failed"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::{ApiError, HttpMethod, Query, RawResponse};

    #[test]
    fn test_publishes_without_subscriber_installed() {
        let now = Utc::now();
        let payload = NotificationPayload {
            method: HttpMethod::Get,
            path: "company/07495895".to_string(),
            query: Query::new(),
            status: 401,
            outcome: Outcome::Error(ApiError::Authentication {
                response: RawResponse::new(401, ""),
            }),
        };

        TracingInstrumentation.publish(
            "companies_house.company",
            now,
            now,
            &TransactionId::from("RANDOM0001"),
            &payload,
        );
    }
}
