//! License issuance (vendor side) and verification (deployed side).

pub mod issue;
pub mod verify;
