//! The Companies House REST client.
//!
//! This module provides the [`Client`] built on top of the
//! [`HttpClient`](crate::clients::HttpClient) executor, with one method per
//! Companies House resource.
//!
//! # Pagination
//!
//! List resources (officers, persons with significant control, PSC
//! statements, filing history and charges) are returned in full. The client
//! requests consecutive pages with `start_index` set to the number of items
//! received so far, until the `total_results` reported by the latest page is
//! reached. When a page omits `total_results`, its own item count is used,
//! which ends the loop after that page.
//!
//! All pages of one call share a transaction id, so their notifications can
//! be correlated. An error on any page is returned as is and the items
//! gathered so far are discarded.

mod client;
mod pagination;

pub use client::{Client, CompanySearchOptions};
pub use pagination::PageAccumulator;
