use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const SENDER_BATCH_ID_PREFIX: &str = "Test_sdk_";
pub const SAMPLE_ITEM_COUNT: usize = 5;
pub const VALID_AMOUNT: &str = "1.00";
pub const MALFORMED_AMOUNT: &str = "1.0.0";
pub const CURRENCY_USD: &str = "USD";

/// How the receiver of every item in the batch is identified.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecipientType {
    Email,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct SenderBatchHeader {
    pub recipient_type: RecipientType,
    pub email_message: String,
    pub note: String,
    pub sender_batch_id: String,
    pub email_subject: String,
}

/// A currency amount as sent on the wire.
///
/// The value is kept as a string so that malformed values can still be
/// submitted and rejected by the remote validator.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Amount {
    pub currency: String,
    pub value: String,
}

impl Amount {
    pub fn usd(value: &str) -> Self {
        Self {
            currency: CURRENCY_USD.to_string(),
            value: value.to_string(),
        }
    }

    pub fn decimal(&self) -> Option<Decimal> {
        Decimal::from_str(&self.value).ok()
    }

    /// True when the value parses as a decimal with at most two fractional digits.
    pub fn is_well_formed(&self) -> bool {
        self.decimal().is_some_and(|value| value.scale() <= 2)
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct PayoutItem {
    pub note: String,
    pub amount: Amount,
    pub receiver: String,
    pub sender_item_id: String,
}

/// Body of a `POST /v1/payments/payouts` call.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct PayoutBatchRequest {
    pub sender_batch_header: SenderBatchHeader,
    pub items: Vec<PayoutItem>,
}

impl PayoutBatchRequest {
    pub fn has_well_formed_amounts(&self) -> bool {
        self.items.iter().all(|item| item.amount.is_well_formed())
    }
}

/// Generates a sender batch id that the API will not treat as a duplicate.
pub fn generate_sender_batch_id() -> String {
    let mut token = [0u8; 6];
    rand::thread_rng().fill(&mut token);
    format!("{SENDER_BATCH_ID_PREFIX}{}", STANDARD.encode(token))
}

/// Builds the five-item sample batch.
///
/// With `inject_validation_failure` every item carries [`MALFORMED_AMOUNT`]
/// instead of [`VALID_AMOUNT`]; nothing else changes apart from the freshly
/// generated sender batch id.
pub fn build_payload(inject_validation_failure: bool) -> PayoutBatchRequest {
    let value = if inject_validation_failure {
        MALFORMED_AMOUNT
    } else {
        VALID_AMOUNT
    };

    let items = (1..=SAMPLE_ITEM_COUNT)
        .map(|n| PayoutItem {
            note: "Your 1$ Payout!".to_string(),
            amount: Amount::usd(value),
            receiver: format!("payout-sdk-{n}@paypal.com"),
            sender_item_id: format!("Test_txn_{n}"),
        })
        .collect();

    PayoutBatchRequest {
        sender_batch_header: SenderBatchHeader {
            recipient_type: RecipientType::Email,
            email_message: "SDK payouts test txn".to_string(),
            note: "Enjoy your Payout!!".to_string(),
            sender_batch_id: generate_sender_batch_id(),
            email_subject: "This is a test transaction from SDK".to_string(),
        },
        items,
    }
}
