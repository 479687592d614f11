//! Response classification for the Companies House client.
//!
//! [`classify`] turns a [`RawResponse`] into either a parsed JSON body or a
//! typed [`ApiError`]. [`PageEnvelope`] describes the body of list
//! endpoints.

use serde::Deserialize;
use serde_json::Value;

use crate::clients::errors::{ApiError, RawResponse};
use crate::clients::http_request::ResourceType;

/// Classifies a response by status code.
///
/// | Status | Result |
/// |---|---|
/// | 200 | the body parsed as JSON |
/// | 401 | [`ApiError::Authentication`] |
/// | 404 | [`ApiError::NotFound`] |
/// | 429 | [`ApiError::RateLimit`] |
/// | 502 | [`ApiError::BadGateway`] |
/// | other | [`ApiError::Unknown`] |
///
/// # Errors
///
/// Returns the error matching the status code, or
/// [`ApiError::InvalidBody`] for a 200 response that is not valid JSON.
///
/// # Example
///
/// ```rust
/// use companies_house::clients::{classify, ApiError, RawResponse, ResourceType};
///
/// let body = classify(RawResponse::new(200, r#"{"company": "data"}"#), ResourceType::Company, None);
/// assert_eq!(body.unwrap(), serde_json::json!({"company": "data"}));
///
/// let error = classify(RawResponse::new(429, ""), ResourceType::Company, None).unwrap_err();
/// assert!(matches!(error, ApiError::RateLimit { .. }));
/// ```
pub fn classify(
    response: RawResponse,
    resource_type: ResourceType,
    resource_id: Option<&str>,
) -> Result<Value, ApiError> {
    match response.status {
        200 => serde_json::from_str(&response.body).map_err(|e| ApiError::InvalidBody {
            reason: e.to_string(),
            response,
        }),
        401 => Err(ApiError::Authentication { response }),
        404 => Err(ApiError::NotFound {
            resource_type,
            resource_id: resource_id.map(String::from),
            response,
        }),
        429 => Err(ApiError::RateLimit { response }),
        502 => Err(ApiError::BadGateway { response }),
        _ => Err(ApiError::Unknown { response }),
    }
}

/// The body of one page of a list endpoint.
///
/// Missing `items` are treated as an empty page; a missing `total_results`
/// defaults to the number of items on the page.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct PageEnvelope {
    /// The items on this page, in server order.
    #[serde(default)]
    pub items: Vec<Value>,
    /// The total number of items across all pages.
    #[serde(default)]
    pub total_results: Option<u64>,
    /// The offset this page starts at.
    #[serde(default)]
    pub start_index: Option<u64>,
    /// The page size the server used.
    #[serde(default)]
    pub items_per_page: Option<u64>,
}

impl PageEnvelope {
    /// Reads a page from a parsed response body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MalformedPage`] if the body is not an object or its
    /// fields have the wrong types.
    pub fn from_value(body: Value) -> Result<Self, ApiError> {
        serde_json::from_value(body).map_err(|e| ApiError::MalformedPage {
            reason: e.to_string(),
        })
    }

    /// Returns the total item count, falling back to the items on this page.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total_results.unwrap_or(self.items.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn classify_status(status: u16) -> Result<Value, ApiError> {
        classify(
            RawResponse::new(status, ""),
            ResourceType::Officers,
            Some("07495895"),
        )
    }

    #[test]
    fn test_success_parses_json() {
        let body = classify(
            RawResponse::new(200, r#"{"company": "data"}"#),
            ResourceType::Company,
            Some("07495895"),
        )
        .unwrap();
        assert_eq!(body, json!({"company": "data"}));
    }

    #[test]
    fn test_success_with_invalid_json_is_invalid_body() {
        let error = classify(
            RawResponse::new(200, "<html>"),
            ResourceType::Company,
            None,
        )
        .unwrap_err();
        assert!(matches!(error, ApiError::InvalidBody { .. }));
        assert_eq!(error.status(), Some(200));
    }

    #[test]
    fn test_error_statuses_map_to_kinds() {
        assert!(matches!(
            classify_status(401),
            Err(ApiError::Authentication { .. })
        ));
        assert!(matches!(classify_status(429), Err(ApiError::RateLimit { .. })));
        assert!(matches!(classify_status(502), Err(ApiError::BadGateway { .. })));
        assert!(matches!(classify_status(342), Err(ApiError::Unknown { .. })));
        assert!(matches!(classify_status(500), Err(ApiError::Unknown { .. })));
        assert!(matches!(classify_status(201), Err(ApiError::Unknown { .. })));
    }

    #[test]
    fn test_not_found_carries_resource() {
        let error = classify_status(404).unwrap_err();
        assert_eq!(
            error.to_string(),
            "Resource not found - type `officers`, id `07495895` - HTTP 404"
        );
        assert_eq!(error.status(), Some(404));
    }

    #[test]
    fn test_page_envelope_reads_fields() {
        let page = PageEnvelope::from_value(json!({
            "items_per_page": 1,
            "total_results": 2,
            "start_index": 0,
            "items": ["item1"],
        }))
        .unwrap();

        assert_eq!(page.items, vec![json!("item1")]);
        assert_eq!(page.total(), 2);
        assert_eq!(page.start_index, Some(0));
    }

    #[test]
    fn test_page_envelope_total_defaults_to_item_count() {
        let page = PageEnvelope::from_value(json!({"items": ["a", "b", "c"]})).unwrap();
        assert_eq!(page.total(), 3);

        let page = PageEnvelope::from_value(json!({"etag": "x"})).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total(), 0);
    }

    #[test]
    fn test_page_envelope_rejects_non_objects() {
        let error = PageEnvelope::from_value(json!(["item1"])).unwrap_err();
        assert!(matches!(error, ApiError::MalformedPage { .. }));

        let error = PageEnvelope::from_value(json!({"items": "nope"})).unwrap_err();
        assert!(matches!(error, ApiError::MalformedPage { .. }));
    }
}
