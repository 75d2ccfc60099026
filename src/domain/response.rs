use crate::error::{PayoutError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct BatchHeader {
    pub payout_batch_id: String,
    pub batch_status: String,
}

/// A HATEOAS link returned alongside the created batch.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct LinkDescription {
    pub rel: String,
    pub href: String,
    pub method: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct PayoutBatchResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub batch_header: BatchHeader,
    #[serde(default)]
    pub links: Vec<LinkDescription>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct PayoutBatchResponse {
    pub status_code: u16,
    pub result: PayoutBatchResult,
}

impl PayoutBatchResponse {
    /// Validates a success body against the typed result.
    pub fn from_json(status_code: u16, result: Value) -> Result<Self> {
        let result = serde_json::from_value(result).map_err(|e| {
            PayoutError::MalformedResponse {
                status_code,
                reason: e.to_string(),
            }
        })?;
        Ok(Self {
            status_code,
            result,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct ErrorDetail {
    pub location: Option<String>,
    pub field: Option<String>,
    pub issue: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct ErrorBody {
    name: Option<String>,
    message: Option<String>,
    debug_id: Option<String>,
    information_link: Option<String>,
    #[serde(default)]
    details: Vec<ErrorDetail>,
}

/// Structured error returned by the payouts API for a non-2xx answer.
///
/// Every field is optional because error bodies vary by failure class. `raw`
/// keeps the body exactly as received.
#[derive(Debug, PartialEq, Clone)]
pub struct ApiError {
    pub status_code: u16,
    pub debug_id: Option<String>,
    pub name: Option<String>,
    pub message: Option<String>,
    pub information_link: Option<String>,
    pub details: Vec<ErrorDetail>,
    pub raw: Value,
}

impl ApiError {
    pub fn from_json(status_code: u16, raw: Value) -> Self {
        let body: ErrorBody = serde_json::from_value(raw.clone()).unwrap_or_default();
        Self {
            status_code,
            debug_id: body.debug_id,
            name: body.name,
            message: body.message,
            information_link: body.information_link,
            details: body.details,
            raw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_body_deserialization() {
        let body = json!({
            "status": "SUCCESS",
            "batch_header": {"payout_batch_id": "B1", "batch_status": "PENDING"},
            "links": [{"rel": "self", "href": "http://x", "method": "GET"}]
        });

        let response = PayoutBatchResponse::from_json(201, body).unwrap();
        assert_eq!(response.status_code, 201);
        assert_eq!(response.result.status.as_deref(), Some("SUCCESS"));
        assert_eq!(response.result.batch_header.payout_batch_id, "B1");
        assert_eq!(response.result.links[0].method, "GET");
    }

    #[test]
    fn test_success_body_without_optional_fields() {
        let body = json!({
            "batch_header": {"payout_batch_id": "B2", "batch_status": "SUCCESS"}
        });

        let response = PayoutBatchResponse::from_json(201, body).unwrap();
        assert!(response.result.status.is_none());
        assert!(response.result.links.is_empty());
    }

    #[test]
    fn test_missing_batch_header_is_malformed() {
        let body = json!({"status": "SUCCESS", "links": []});

        let err = PayoutBatchResponse::from_json(201, body).unwrap_err();
        assert!(matches!(
            err,
            PayoutError::MalformedResponse {
                status_code: 201,
                ..
            }
        ));
    }

    #[test]
    fn test_non_object_success_body_is_malformed() {
        let err = PayoutBatchResponse::from_json(200, json!("created")).unwrap_err();
        assert!(err.is_api_failure());
    }

    #[test]
    fn test_error_body_fields() {
        let body = json!({
            "name": "VALIDATION_ERROR",
            "message": "Invalid amount",
            "debug_id": "D1",
            "information_link": "http://doc",
            "details": [{"location": "body", "field": "items[0].amount.value", "issue": "INVALID_STRING"}]
        });

        let error = ApiError::from_json(400, body.clone());
        assert_eq!(error.status_code, 400);
        assert_eq!(error.debug_id.as_deref(), Some("D1"));
        assert_eq!(error.name.as_deref(), Some("VALIDATION_ERROR"));
        assert_eq!(error.details.len(), 1);
        assert_eq!(
            error.details[0].field.as_deref(),
            Some("items[0].amount.value")
        );
        assert_eq!(error.raw, body);
    }

    #[test]
    fn test_unstructured_error_body_keeps_raw() {
        let error = ApiError::from_json(503, json!("Service Unavailable"));
        assert!(error.debug_id.is_none());
        assert!(error.details.is_empty());
        assert_eq!(error.raw, json!("Service Unavailable"));
    }
}
