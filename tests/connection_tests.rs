//! Integration tests for connection lifecycle and transport failures.
//!
//! These tests run against local TCP sockets only; no request reaches the
//! real API.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use companies_house::clients::TransactionId;
use companies_house::instrumentation::{Instrumentation, NotificationPayload};
use companies_house::{ApiError, ApiKey, Client, ClientConfig, Endpoint};
use tokio::net::TcpListener;

/// Records the name of every published notification.
#[derive(Debug, Default)]
struct Recorder {
    names: Mutex<Vec<String>>,
}

impl Instrumentation for Recorder {
    fn publish(
        &self,
        name: &str,
        _started_at: DateTime<Utc>,
        _ended_at: DateTime<Utc>,
        _transaction_id: &TransactionId,
        _payload: &NotificationPayload,
    ) {
        self.names.lock().unwrap().push(name.to_string());
    }
}

fn local_client(port: u16, recorder: Arc<Recorder>) -> Client {
    let config = ClientConfig::builder()
        .api_key(ApiKey::new("el-psy-congroo").unwrap())
        .endpoint(Endpoint::new(format!("https://127.0.0.1:{port}")).unwrap())
        .open_timeout(Duration::from_millis(100))
        .read_timeout(Duration::from_millis(100))
        .instrumentation(recorder)
        .build()
        .unwrap();
    Client::new(config)
}

#[tokio::test]
async fn test_silent_server_times_out_without_notification() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    // Accept connections and never answer.
    let server = tokio::spawn(async move {
        let mut sockets = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            sockets.push(socket);
        }
    });

    let recorder = Arc::new(Recorder::default());
    let client = local_client(port, Arc::clone(&recorder));

    let error = client.company("07495895").await.unwrap_err();
    assert!(matches!(error, ApiError::Timeout), "got {error:?}");
    assert_eq!(error.to_string(), "Request timed out");
    assert!(recorder.names.lock().unwrap().is_empty());

    let error = client.officers("07495895").await.unwrap_err();
    assert!(matches!(error, ApiError::Timeout), "got {error:?}");
    assert!(recorder.names.lock().unwrap().is_empty());

    server.abort();
}

#[tokio::test]
async fn test_refused_connection_is_network_error() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    };

    let recorder = Arc::new(Recorder::default());
    let client = local_client(port, Arc::clone(&recorder));

    let error = client.company("07495895").await.unwrap_err();
    assert!(
        matches!(error, ApiError::Network(_) | ApiError::Timeout),
        "got {error:?}"
    );
    assert!(error.status().is_none());
    assert!(recorder.names.lock().unwrap().is_empty());
}

#[test]
fn test_connection_uses_configured_timeouts() {
    let config = ClientConfig::builder()
        .api_key(ApiKey::new("key").unwrap())
        .open_timeout(Duration::from_secs(7))
        .read_timeout(Duration::from_secs(9))
        .build()
        .unwrap();
    let client = Client::new(config);

    let connection = client.connection().unwrap();
    assert_eq!(connection.open_timeout(), Duration::from_secs(7));
    assert_eq!(connection.read_timeout(), Duration::from_secs(9));
    assert!(!connection.is_started());
    assert!(connection.user_agent().starts_with("companies-house-rust v"));
}

#[test]
fn test_end_connection_zero_one_or_many_times() {
    tokio_test::block_on(async {
        // Never opened.
        let client = Client::from_api_key("key").unwrap();
        client.end_connection();

        // Opened once.
        let client = Client::from_api_key("key").unwrap();
        client.connection().unwrap();
        client.end_connection();

        // Closed repeatedly, then reopened.
        let client = Client::from_api_key("key").unwrap();
        client.connection().unwrap();
        for _ in 0..3 {
            client.end_connection();
        }
        let connection = client.connection().unwrap();
        assert!(!connection.is_started());
    });
}

#[tokio::test]
async fn test_concurrent_calls_share_one_client() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let server = tokio::spawn(async move {
        let mut sockets = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            sockets.push(socket);
        }
    });

    let recorder = Arc::new(Recorder::default());
    let client = Arc::new(local_client(port, Arc::clone(&recorder)));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let client = Arc::clone(&client);
            tokio::spawn(async move { client.company("07495895").await })
        })
        .collect();

    for handle in handles {
        let result = handle.await.unwrap();
        assert!(matches!(result, Err(ApiError::Timeout)));
    }
    client.end_connection();

    server.abort();
}
