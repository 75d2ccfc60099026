use crate::domain::ports::{ApiRequest, ClientError, HttpResponse, PayoutHttpClient};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;

type Outcome = Result<HttpResponse, ClientError>;

/// A payouts client that answers from a script instead of the network.
///
/// Scripted outcomes are returned in order; the last one repeats. Every request
/// is recorded so callers can inspect what would have been sent. Clones share
/// the same script and request log.
#[derive(Default, Clone)]
pub struct ScriptedPayoutClient {
    outcomes: Arc<RwLock<VecDeque<Outcome>>>,
    requests: Arc<RwLock<Vec<ApiRequest>>>,
}

impl ScriptedPayoutClient {
    /// Creates a client with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// # Panics
    ///
    /// Panics if the client was cloned before scripting finished.
    fn push(mut self, outcome: Outcome) -> Self {
        Arc::get_mut(&mut self.outcomes)
            .expect("script outcomes before cloning the client")
            .get_mut()
            .push_back(outcome);
        self
    }

    pub fn respond_ok(self, status_code: u16, result: Value) -> Self {
        self.push(Ok(HttpResponse {
            status_code,
            result,
        }))
    }

    pub fn respond_err(self, status_code: u16, result: Value) -> Self {
        self.push(Err(ClientError::Http {
            status_code,
            result,
        }))
    }

    pub fn fail_transport(self, reason: &str) -> Self {
        self.push(Err(ClientError::Transport(reason.to_string())))
    }

    /// Requests received so far, oldest first.
    pub async fn requests(&self) -> Vec<ApiRequest> {
        self.requests.read().await.clone()
    }
}

#[async_trait]
impl PayoutHttpClient for ScriptedPayoutClient {
    async fn execute(&self, request: ApiRequest) -> Outcome {
        self.requests.write().await.push(request);

        let mut outcomes = self.outcomes.write().await;
        if outcomes.len() > 1
            && let Some(outcome) = outcomes.pop_front()
        {
            return outcome;
        }
        outcomes
            .front()
            .cloned()
            .unwrap_or_else(|| Err(ClientError::Transport("no scripted response".to_string())))
    }
}
