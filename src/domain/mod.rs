//! Domain layer: the payout batch wire records and the port to the payouts API.

pub mod payout;
pub mod ports;
pub mod response;
