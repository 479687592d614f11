//! # Companies House API Rust Client
//!
//! A Rust client for the UK Companies House REST API, providing type-safe
//! configuration, typed errors, transparent pagination and request
//! instrumentation.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`ClientConfig`] and [`ClientConfigBuilder`]
//! - Validated newtypes for the API key and endpoint
//! - One [`Client`] method per Companies House resource
//! - Transparent gathering of every page of list resources
//! - A typed error for every failure class via [`ApiError`]
//! - One notification per physical request through a pluggable
//!   [`instrumentation::Instrumentation`] backend
//! - Offline validation of company registration numbers via [`RegistrationNumber`]
//!
//! ## Quick Start
//!
//! ```rust
//! use std::time::Duration;
//! use companies_house::{ApiKey, Client, ClientConfig};
//!
//! let config = ClientConfig::builder()
//!     .api_key(ApiKey::new("your-api-key").unwrap())
//!     .read_timeout(Duration::from_secs(10))
//!     .build()
//!     .unwrap();
//!
//! let client = Client::new(config);
//! assert_eq!(client.endpoint().as_ref(), "https://api.companieshouse.gov.uk/");
//! ```
//!
//! ## Making API Requests
//!
//! ```rust,no_run
//! use companies_house::{ApiError, Client, CompanySearchOptions};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::from_api_key("your-api-key")?;
//!
//! // A single resource
//! let company = client.company("07495895").await?;
//!
//! // Every page of a list resource
//! let officers = client.officers("07495895").await?;
//!
//! // A single page of search results
//! let options = CompanySearchOptions {
//!     items_per_page: Some(5),
//!     ..CompanySearchOptions::default()
//! };
//! let results = client.company_search("acme", options).await?;
//!
//! match client.company("00000000").await {
//!     Err(ApiError::NotFound { .. }) => println!("no such company"),
//!     other => println!("{other:?}"),
//! }
//!
//! client.end_connection();
//! # let _ = (company, officers, results);
//! # Ok(())
//! # }
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration is instance-based and passed explicitly
//! - **Fail-fast validation**: All newtypes validate on construction
//! - **Thread-safe**: All types are `Send + Sync`
//! - **Async-first**: Designed for use with Tokio async runtime
//! - **No retries**: Every error is returned to the caller unchanged

pub mod clients;
pub mod config;
pub mod error;
pub mod instrumentation;
mod registration_number;

// Re-export public types at crate root for convenience
pub use config::{ApiKey, ClientConfig, ClientConfigBuilder, Endpoint};
pub use error::ConfigError;
pub use registration_number::RegistrationNumber;

// Re-export client types
pub use clients::{ApiError, Client, CompanySearchOptions, RawResponse};
