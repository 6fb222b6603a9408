//! Wire types and the license key text format.

pub mod activation;
pub mod key_format;
pub mod models;
