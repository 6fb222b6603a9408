//! Cryptographic primitives for license signing and verification.

pub mod keys;
pub mod signature;
