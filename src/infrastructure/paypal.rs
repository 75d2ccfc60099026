use crate::config::ClientConfig;
use crate::domain::ports::{ApiRequest, ClientError, HttpMethod, HttpResponse, PayoutHttpClient};
use crate::error::{PayoutError, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde_json::Value;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, instrument};

pub const TOKEN_PATH: &str = "/v1/oauth2/token";
const REFRESH_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: Instant,
}

impl AccessToken {
    fn is_fresh(&self, now: Instant) -> bool {
        now + REFRESH_MARGIN < self.expires_at
    }
}

/// PayPal REST client authenticating with OAuth2 client credentials.
///
/// The access token is cached and shared by every call made through this
/// client; it is refreshed shortly before it expires. Nothing is retried.
pub struct PayPalHttpClient {
    http: reqwest::Client,
    config: ClientConfig,
    token: RwLock<Option<AccessToken>>,
}

impl PayPalHttpClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PayoutError::Config(format!("cannot build HTTP client: {e}")))?;

        Ok(Self {
            http,
            config,
            token: RwLock::new(None),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    async fn access_token(&self) -> std::result::Result<String, ClientError> {
        if let Some(token) = self.token.read().await.as_ref()
            && token.is_fresh(Instant::now())
        {
            return Ok(token.value.clone());
        }

        let mut cached = self.token.write().await;
        // another caller may have refreshed while we waited for the write lock
        if let Some(token) = cached.as_ref()
            && token.is_fresh(Instant::now())
        {
            return Ok(token.value.clone());
        }

        debug!(base_url = %self.config.base_url, "Requesting OAuth2 access token");
        let response = self
            .http
            .post(self.url(TOKEN_PATH))
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(transport_error)?;

        let (status_code, result) = read_body(response).await?;
        if !is_success(status_code) {
            return Err(ClientError::Http {
                status_code,
                result,
            });
        }

        let granted: TokenResponse = serde_json::from_value(result)
            .map_err(|e| ClientError::Transport(format!("invalid token response: {e}")))?;
        debug!(expires_in = granted.expires_in, "Access token granted");

        let expires_at = Instant::now()
            .checked_add(Duration::from_secs(granted.expires_in))
            .ok_or_else(|| {
                ClientError::Transport(
                    "invalid token response: expires_in out of range".to_string(),
                )
            })?;
        let token = AccessToken {
            value: granted.access_token,
            expires_at,
        };
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }
}

#[async_trait]
impl PayoutHttpClient for PayPalHttpClient {
    #[instrument(skip_all, fields(method = %request.method, path = %request.path))]
    async fn execute(&self, request: ApiRequest) -> std::result::Result<HttpResponse, ClientError> {
        let token = self.access_token().await?;

        let url = self.url(&request.path);
        let mut builder = match request.method {
            HttpMethod::Post => self.http.post(url).json(&request.body),
        };
        // `json` already sets Content-Type and `header` appends
        for (name, value) in request
            .headers
            .iter()
            .filter(|(name, _)| !name.eq_ignore_ascii_case(CONTENT_TYPE.as_str()))
        {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder
            .bearer_auth(token)
            .send()
            .await
            .map_err(transport_error)?;
        let (status_code, result) = read_body(response).await?;
        debug!(status_code, "Received response");

        if is_success(status_code) {
            Ok(HttpResponse {
                status_code,
                result,
            })
        } else {
            Err(ClientError::Http {
                status_code,
                result,
            })
        }
    }
}

fn is_success(status_code: u16) -> bool {
    (200..300).contains(&status_code)
}

fn transport_error(error: reqwest::Error) -> ClientError {
    if error.is_timeout() {
        ClientError::Transport(format!("request timed out: {error}"))
    } else if error.is_connect() {
        ClientError::Transport(format!("connection failed: {error}"))
    } else {
        ClientError::Transport(error.to_string())
    }
}

/// Reads the body as JSON, falling back to a string for non-JSON payloads.
async fn read_body(
    response: reqwest::Response,
) -> std::result::Result<(u16, Value), ClientError> {
    let status_code = response.status().as_u16();
    let text = response.text().await.map_err(transport_error)?;
    let result = if text.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).unwrap_or(Value::String(text))
    };
    Ok((status_code, result))
}
