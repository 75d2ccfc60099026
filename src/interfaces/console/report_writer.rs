use crate::domain::response::{ApiError, PayoutBatchResponse};
use crate::error::{PayoutError, Result};
use std::io::Write;

/// Renders payout outcomes as human-readable lines.
///
/// Writes to any `Write` sink (e.g. Stdout or an in-memory buffer).
pub struct ReportWriter<W: Write> {
    sink: W,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    /// Reports a created batch: headline fields, one line per link, then the full result as JSON.
    pub fn write_success(&mut self, response: &PayoutBatchResponse) -> Result<()> {
        let result = &response.result;
        writeln!(self.sink, "Status Code: {}", response.status_code)?;
        writeln!(
            self.sink,
            "Status: {}",
            result.status.as_deref().unwrap_or_default()
        )?;
        writeln!(
            self.sink,
            "Payout Batch ID: {}",
            result.batch_header.payout_batch_id
        )?;
        writeln!(
            self.sink,
            "Payout Batch Status: {}",
            result.batch_header.batch_status
        )?;
        writeln!(self.sink, "Links:")?;
        for link in &result.links {
            writeln!(
                self.sink,
                "\t{}: {}\tCall Type: {}",
                link.rel, link.href, link.method
            )?;
        }
        let dump = serde_json::to_string(result)?;
        writeln!(self.sink, "{dump}")?;
        Ok(())
    }

    /// Reports a failed call. Optional fields are omitted when absent.
    pub fn write_failure(&mut self, error: &PayoutError) -> Result<()> {
        match error {
            PayoutError::Api(api) => self.write_api_error(api),
            PayoutError::MalformedResponse {
                status_code,
                reason,
            } => {
                writeln!(self.sink, "Status Code: {status_code}")?;
                writeln!(self.sink, "Malformed response: {reason}")?;
                Ok(())
            }
            other => {
                writeln!(self.sink, "Error: {other}")?;
                Ok(())
            }
        }
    }

    fn write_api_error(&mut self, api: &ApiError) -> Result<()> {
        writeln!(self.sink, "Status Code: {}", api.status_code)?;
        if let Some(debug_id) = &api.debug_id {
            writeln!(self.sink, "Debug Id: {debug_id}")?;
        }
        if let Some(name) = &api.name {
            writeln!(self.sink, "Name: {name}")?;
        }
        if let Some(message) = &api.message {
            writeln!(self.sink, "Message: {message}")?;
        }
        if let Some(link) = &api.information_link {
            writeln!(self.sink, "Information link: {link}")?;
        }
        writeln!(self.sink, "Response: {}", api.raw)?;
        if !api.details.is_empty() {
            writeln!(self.sink, "Details:")?;
            for detail in &api.details {
                writeln!(
                    self.sink,
                    "\tError Location: {}\tError Field: {}\tError Issue: {}",
                    detail.location.as_deref().unwrap_or_default(),
                    detail.field.as_deref().unwrap_or_default(),
                    detail.issue.as_deref().unwrap_or_default()
                )?;
            }
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.sink.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}
