//! Accumulation of paginated results.

use serde_json::Value;

use crate::clients::errors::ApiError;
use crate::clients::http_response::PageEnvelope;

/// Collects the items of consecutive pages in encounter order.
///
/// The next request starts at [`offset`](Self::offset), which advances by
/// the number of items each page delivered. Gathering is complete once the
/// collected item count reaches the total reported by the latest page.
#[derive(Debug, Default)]
pub struct PageAccumulator {
    items: Vec<Value>,
    offset: u64,
}

impl PageAccumulator {
    /// Creates an empty accumulator starting at offset zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the `start_index` of the next page to request.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.offset
    }

    /// Adds a page and reports whether all items have been gathered.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::StalledPagination`] if the page is empty while the
    /// reported total has not been reached, since requesting the same offset
    /// again would never finish.
    pub fn absorb(&mut self, page: PageEnvelope) -> Result<bool, ApiError> {
        let total = page.total();
        let received = page.items.len();

        self.items.extend(page.items);
        self.offset += received as u64;

        if self.items.len() as u64 >= total {
            return Ok(true);
        }
        if received == 0 {
            return Err(ApiError::StalledPagination {
                received: self.items.len(),
                total,
            });
        }
        Ok(false)
    }

    /// Returns the gathered items.
    #[must_use]
    pub fn into_items(self) -> Vec<Value> {
        self.items
    }
}
