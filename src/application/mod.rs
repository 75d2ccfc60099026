//! Application layer orchestrating the payout sample.
//!
//! This module defines `PayoutBatchSample`, which builds a batch, submits it
//! through an injected `PayoutHttpClient` and reports the outcome.

pub mod sample;
