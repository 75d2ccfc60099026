use crate::domain::payout::{PayoutBatchRequest, build_payload};
use crate::domain::ports::{ApiRequest, ClientError, PayoutClientBox};
use crate::domain::response::{ApiError, PayoutBatchResponse};
use crate::error::{PayoutError, Result};
use crate::interfaces::console::report_writer::ReportWriter;
use std::io::Write;
use tracing::{info, warn};

/// Drives the create-batch sample against an injected payouts client.
///
/// `PayoutBatchSample` owns the client and the report sink. Calls are awaited
/// one at a time; the client is reused between them.
pub struct PayoutBatchSample<W: Write> {
    client: PayoutClientBox,
    report: ReportWriter<W>,
}

impl<W: Write> PayoutBatchSample<W> {
    /// Creates a new `PayoutBatchSample`.
    ///
    /// # Arguments
    ///
    /// * `client` - The payouts API client.
    /// * `sink` - Where outcome reports are written.
    pub fn new(client: PayoutClientBox, sink: W) -> Self {
        Self {
            client,
            report: ReportWriter::new(sink),
        }
    }

    /// See [`build_payload`].
    pub fn build_payload(&self, inject_validation_failure: bool) -> PayoutBatchRequest {
        build_payload(inject_validation_failure)
    }

    /// Submits `request` as a new payout batch.
    ///
    /// On success the outcome is reported only when `verbose` is set. Failures
    /// are always reported before being returned.
    pub async fn submit_payout(
        &mut self,
        request: &PayoutBatchRequest,
        verbose: bool,
    ) -> Result<PayoutBatchResponse> {
        if !request.has_well_formed_amounts() {
            warn!(
                sender_batch_id = %request.sender_batch_header.sender_batch_id,
                "Batch contains malformed amounts, expecting remote validation to fail"
            );
        }

        let api_request = ApiRequest::payouts_post(request)?;
        info!(
            sender_batch_id = %request.sender_batch_header.sender_batch_id,
            items = request.items.len(),
            "Submitting payout batch"
        );

        let outcome = match self.client.execute(api_request).await {
            Ok(response) => PayoutBatchResponse::from_json(response.status_code, response.result),
            Err(ClientError::Http {
                status_code,
                result,
            }) => Err(PayoutError::Api(ApiError::from_json(status_code, result))),
            Err(ClientError::Transport(reason)) => return Err(PayoutError::Transport(reason)),
        };

        match outcome {
            Ok(response) => {
                info!(
                    status_code = response.status_code,
                    payout_batch_id = %response.result.batch_header.payout_batch_id,
                    "Payout batch created"
                );
                if verbose {
                    self.report.write_success(&response)?;
                    self.report.flush()?;
                }
                Ok(response)
            }
            Err(error) => {
                if let PayoutError::Api(api) = &error {
                    warn!(
                        status_code = api.status_code,
                        debug_id = api.debug_id.as_deref().unwrap_or_default(),
                        "Payout batch rejected"
                    );
                } else {
                    warn!(%error, "Payout batch response could not be read");
                }
                self.report.write_failure(&error)?;
                self.report.flush()?;
                Err(error)
            }
        }
    }

    /// Creates a well-formed five-item batch.
    ///
    /// API failures are reported and swallowed (`Ok(None)`); any other error propagates.
    pub async fn create_payouts(&mut self, verbose: bool) -> Result<Option<PayoutBatchResponse>> {
        let request = build_payload(false);
        self.run(&request, verbose).await
    }

    /// Creates a batch whose amounts are malformed, showing how validation
    /// failures are reported.
    pub async fn create_payouts_failure(
        &mut self,
        verbose: bool,
    ) -> Result<Option<PayoutBatchResponse>> {
        let request = build_payload(true);
        self.run(&request, verbose).await
    }

    async fn run(
        &mut self,
        request: &PayoutBatchRequest,
        verbose: bool,
    ) -> Result<Option<PayoutBatchResponse>> {
        match self.submit_payout(request, verbose).await {
            Ok(response) => Ok(Some(response)),
            Err(e) if e.is_api_failure() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Consumes the sample and returns the report sink.
    pub fn into_sink(self) -> W {
        self.report.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::in_memory::ScriptedPayoutClient;
    use serde_json::json;

    fn success_client() -> ScriptedPayoutClient {
        ScriptedPayoutClient::new().respond_ok(
            201,
            json!({
                "status": "SUCCESS",
                "batch_header": {"payout_batch_id": "B1", "batch_status": "PENDING"},
                "links": [{"rel": "self", "href": "http://x", "method": "GET"}]
            }),
        )
    }

    fn validation_error_client() -> ScriptedPayoutClient {
        ScriptedPayoutClient::new().respond_err(
            400,
            json!({
                "debug_id": "D1",
                "name": "VALIDATION_ERROR",
                "message": "Invalid amount",
                "information_link": "http://doc",
                "details": [{
                    "location": "body",
                    "field": "items[0].amount.value",
                    "issue": "INVALID_STRING"
                }]
            }),
        )
    }

    #[tokio::test]
    async fn test_submit_payout_success_report() {
        let client = success_client();
        let mut sample = PayoutBatchSample::new(Box::new(client.clone()), Vec::new());

        let request = sample.build_payload(false);
        let response = sample.submit_payout(&request, true).await.unwrap();
        assert_eq!(response.status_code, 201);
        assert_eq!(response.result.batch_header.payout_batch_id, "B1");

        let out = String::from_utf8(sample.into_sink()).unwrap();
        assert!(out.contains("Status Code: 201"));
        assert!(out.contains("Payout Batch ID: B1"));
        assert!(out.contains("Payout Batch Status: PENDING"));
        let link_lines: Vec<&str> = out.lines().filter(|l| l.contains("Call Type")).collect();
        assert_eq!(link_lines.len(), 1);
        assert!(link_lines[0].contains("self"));
        assert!(link_lines[0].contains("GET"));

        let sent = client.requests().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].path, "/v1/payments/payouts");
        assert_eq!(
            sent[0].body["sender_batch_header"]["sender_batch_id"],
            request.sender_batch_header.sender_batch_id.as_str()
        );
    }

    #[tokio::test]
    async fn test_submit_payout_quiet_on_success() {
        let mut sample = PayoutBatchSample::new(Box::new(success_client()), Vec::new());

        let request = sample.build_payload(false);
        sample.submit_payout(&request, false).await.unwrap();

        assert!(sample.into_sink().is_empty());
    }

    #[tokio::test]
    async fn test_submit_payout_returns_api_error() {
        let mut sample = PayoutBatchSample::new(Box::new(validation_error_client()), Vec::new());

        let request = sample.build_payload(true);
        let err = sample.submit_payout(&request, false).await.unwrap_err();

        match err {
            PayoutError::Api(api) => {
                assert_eq!(api.status_code, 400);
                assert_eq!(api.debug_id.as_deref(), Some("D1"));
            }
            other => panic!("unexpected error: {other}"),
        }
        // failures are reported even when not verbose
        let out = String::from_utf8(sample.into_sink()).unwrap();
        assert!(out.contains("Debug Id: D1"));
    }

    #[tokio::test]
    async fn test_create_payouts_failure_swallows_api_error() {
        let mut sample = PayoutBatchSample::new(Box::new(validation_error_client()), Vec::new());

        let outcome = sample.create_payouts_failure(true).await.unwrap();
        assert!(outcome.is_none());

        let out = String::from_utf8(sample.into_sink()).unwrap();
        assert!(out.contains("Status Code: 400"));
        assert!(out.contains("Debug Id: D1"));
        assert!(out.contains("Name: VALIDATION_ERROR"));
        assert!(out.contains("Message: Invalid amount"));
        assert!(out.contains("Information link: http://doc"));
        let detail_lines: Vec<&str> = out
            .lines()
            .filter(|l| l.contains("Error Field"))
            .collect();
        assert_eq!(detail_lines.len(), 1);
        assert!(detail_lines[0].contains("items[0].amount.value"));
        assert!(detail_lines[0].contains("INVALID_STRING"));
    }

    #[tokio::test]
    async fn test_malformed_success_body() {
        let client = ScriptedPayoutClient::new().respond_ok(201, json!({"status": "SUCCESS"}));
        let mut sample = PayoutBatchSample::new(Box::new(client), Vec::new());

        let request = sample.build_payload(false);
        let err = sample.submit_payout(&request, true).await.unwrap_err();
        assert!(matches!(
            err,
            PayoutError::MalformedResponse {
                status_code: 201,
                ..
            }
        ));

        let outcome = sample.create_payouts(true).await;
        assert!(matches!(outcome, Ok(None)));
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let client = ScriptedPayoutClient::new().fail_transport("connection refused");
        let mut sample = PayoutBatchSample::new(Box::new(client), Vec::new());

        let err = sample.create_payouts(true).await.unwrap_err();
        assert!(matches!(err, PayoutError::Transport(_)));
        assert!(sample.into_sink().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_request_never_reaches_client() {
        let client = success_client();
        let mut sample = PayoutBatchSample::new(Box::new(client.clone()), Vec::new());

        let mut request = sample.build_payload(false);
        request.items.clear();
        let err = sample.submit_payout(&request, true).await.unwrap_err();

        assert!(matches!(err, PayoutError::InvalidRequest(_)));
        assert!(client.requests().await.is_empty());
    }
}
