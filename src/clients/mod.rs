//! HTTP client types for Companies House API communication.
//!
//! This module provides the layers between a [`rest::Client`] method and the
//! network.
//!
//! # Overview
//!
//! - [`Request`]: one physical GET, with its [`Query`], [`ResourceType`] and [`TransactionId`]
//! - [`Connection`]: the persistent HTTPS handle, held lazily by a [`ConnectionSlot`]
//! - [`HttpClient`]: executes a request, classifies the response and publishes a notification
//! - [`classify`]: maps a [`RawResponse`] to a JSON body or an [`ApiError`]
//! - [`PageEnvelope`]: the body of one page of a list resource
//! - [`rest::Client`]: the resource-shaped client
//!
//! # Retry Behavior
//!
//! Nothing is retried. Rate limiting (429) and gateway failures (502) are
//! returned to the caller, whose response carries any `Retry-After` header.

mod connection;
mod errors;
mod http_client;
mod http_request;
mod http_response;
pub mod rest;

pub use connection::{Connection, ConnectionSlot, SDK_VERSION};
pub use errors::{ApiError, RawResponse};
pub use http_client::HttpClient;
pub use http_request::{
    HttpMethod, Query, Request, ResourceType, TransactionId, EVENT_NAMESPACE,
};
pub use http_response::{classify, PageEnvelope};

pub use rest::{Client, CompanySearchOptions};
