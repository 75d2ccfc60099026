use super::payout::PayoutBatchRequest;
use crate::error::{PayoutError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

pub const PAYOUTS_PATH: &str = "/v1/payments/payouts";
pub const MAX_BATCH_ITEMS: usize = 15_000;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum HttpMethod {
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Post => f.write_str("POST"),
        }
    }
}

/// A request handed to a [`PayoutHttpClient`]. Authentication is the client's concern.
#[derive(Debug, PartialEq, Clone)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: BTreeMap<String, String>,
    pub body: Value,
}

impl ApiRequest {
    /// Builds the create-batch call for `request`.
    pub fn payouts_post(request: &PayoutBatchRequest) -> Result<Self> {
        match request.items.len() {
            0 => {
                return Err(PayoutError::InvalidRequest(
                    "payout batch has no items".to_string(),
                ));
            }
            n if n > MAX_BATCH_ITEMS => {
                return Err(PayoutError::InvalidRequest(format!(
                    "payout batch has {n} items, at most {MAX_BATCH_ITEMS} are accepted"
                )));
            }
            _ => {}
        }

        let body = serde_json::to_value(request)
            .map_err(|e| PayoutError::InvalidRequest(e.to_string()))?;
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());

        Ok(Self {
            method: HttpMethod::Post,
            path: PAYOUTS_PATH.to_string(),
            headers,
            body,
        })
    }
}

/// A 2xx answer with its decoded JSON body (`Value::Null` when empty).
#[derive(Debug, PartialEq, Clone)]
pub struct HttpResponse {
    pub status_code: u16,
    pub result: Value,
}

#[derive(Error, Debug, PartialEq, Clone)]
pub enum ClientError {
    #[error("HTTP {status_code}")]
    Http { status_code: u16, result: Value },
    #[error("{0}")]
    Transport(String),
}

#[async_trait]
pub trait PayoutHttpClient: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> std::result::Result<HttpResponse, ClientError>;
}

pub type PayoutClientBox = Box<dyn PayoutHttpClient>;
