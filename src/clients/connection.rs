//! The network connection used by a client.
//!
//! A [`Connection`] wraps one `reqwest` client configured with the open and
//! read timeouts. Its internal pool never runs two requests over the same
//! socket at once. [`ConnectionSlot`] holds the connection of one
//! [`Client`](crate::Client): it is created lazily on first use, at most once
//! even when several tasks race, and can be closed any number of times.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::Url;

use crate::clients::errors::{ApiError, RawResponse};
use crate::config::{ApiKey, ClientConfig};

/// Crate version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// A persistent HTTPS handle.
///
/// Cloning is cheap and shares the underlying pool.
#[derive(Clone, Debug)]
pub struct Connection {
    client: reqwest::Client,
    user_agent: String,
    open_timeout: Duration,
    read_timeout: Duration,
    started: Arc<AtomicBool>,
}

impl Connection {
    /// Opens a connection with the timeouts and user agent of `config`.
    ///
    /// Sockets are established lazily by the first request.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Network`] if the TLS backend cannot be initialised.
    pub fn open(config: &ClientConfig) -> Result<Self, ApiError> {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let user_agent = format!("{user_agent_prefix}companies-house-rust v{SDK_VERSION}");

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .user_agent(user_agent.clone())
            .connect_timeout(config.open_timeout())
            .timeout(config.open_timeout() + config.read_timeout())
            .build()?;

        Ok(Self {
            client,
            user_agent,
            open_timeout: config.open_timeout(),
            read_timeout: config.read_timeout(),
            started: Arc::new(AtomicBool::new(false)),
        })
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

    /// Returns the `User-Agent` sent with every request.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Returns `true` once a request over this connection has received a response.
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }

    /// Sends an authenticated GET and reads the whole response.
    ///
    /// The API key is the Basic auth username; the password is empty.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Timeout`] when the open or read timeout expires and
    /// [`ApiError::Network`] for any other transport failure. HTTP error
    /// statuses are not errors at this level.
    pub async fn get(&self, url: Url, api_key: &ApiKey) -> Result<RawResponse, ApiError> {
        let res = self
            .client
            .get(url)
            .basic_auth(api_key.as_ref(), Some(""))
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        self.started.store(true, Ordering::Release);

        let status = res.status().as_u16();
        let headers = Self::parse_response_headers(res.headers());
        let body = res.text().await?;

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }
}

/// Lazily-created connection owned by one client.
#[derive(Debug, Default)]
pub struct ConnectionSlot {
    connection: Mutex<Option<Connection>>,
}

impl ConnectionSlot {
    /// Creates an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current connection, opening one if none exists.
    ///
    /// # Errors
    ///
    /// Propagates the error of [`Connection::open`].
    pub fn get_or_open(&self, config: &ClientConfig) -> Result<Connection, ApiError> {
        let mut slot = self
            .connection
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(connection) = slot.as_ref() {
            return Ok(connection.clone());
        }

        let connection = Connection::open(config)?;
        tracing::debug!(
            open_timeout = ?connection.open_timeout(),
            read_timeout = ?connection.read_timeout(),
            "Opened Companies House connection"
        );
        *slot = Some(connection.clone());
        Ok(connection)
    }

    /// Returns `true` if a connection is currently held.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.connection
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Closes the connection, if one is held.
    ///
    /// Requests already in flight keep their own handle and finish normally.
    /// Returns `true` if a started connection was closed; closing an empty
    /// slot is a no-op.
    pub fn close(&self) -> bool {
        let closed = self
            .connection
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        match closed {
            Some(connection) if connection.is_started() => {
                tracing::debug!("Closed Companies House connection");
                true
            }
            _ => false,
        }
    }
}
