//! Shared test helpers.

#![allow(dead_code)]

use chrono::NaiveDate;
use deskwarden::crypto::keys::KeyPair;
use deskwarden::LicenseData;
use ed25519_dalek::SigningKey;

/// Fixed-seed vendor key pair: `(signing key, private PEM, public PEM)`.
pub fn vendor_keys() -> (SigningKey, String, String) {
    keys_from_seed(1)
}

/// A second, unrelated key pair.
pub fn other_keys() -> (SigningKey, String, String) {
    keys_from_seed(200)
}

fn keys_from_seed(start: u8) -> (SigningKey, String, String) {
    let mut seed = [0u8; 32];
    for (i, b) in seed.iter_mut().enumerate() {
        *b = start.wrapping_add(i as u8);
    }
    let pair = KeyPair::from_signing_key(SigningKey::from_bytes(&seed));
    let private_pem = pair.private_key_pem().unwrap();
    let public_pem = pair.public_key_pem().unwrap();
    (pair.signing_key().clone(), private_pem, public_pem)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// License valid until 2099 with the given seats.
pub fn license(max_users: u32) -> LicenseData {
    LicenseData {
        company_name: "Adventure Works".to_string(),
        contact_email: "helpdesk@adventure-works.test".to_string(),
        expiration_date: date(2099, 12, 31),
        max_users,
        features: ["cmdb".to_string(), "sla".to_string()].into_iter().collect(),
    }
}

/// Public half of [`vendor_keys`], as compiled into the application.
pub const VENDOR_PUBLIC_KEY_PEM: &str = "-----BEGIN PUBLIC KEY-----\n\
MCowBQYDK2VwAyEAebVWLo/mVPlAeLES6KmLp5AfhTrmlb7X4OORC60ElmQ=\n\
-----END PUBLIC KEY-----\n";

pub fn config() -> deskwarden::DeskwardenConfig {
    deskwarden::DeskwardenConfig {
        app_name: "servicedesk/2.4.0",
        public_key_pem: VENDOR_PUBLIC_KEY_PEM,
        store_namespace: "deskwarden-it",
        user_agent_product: "servicedesk",
        api_base_url: "https://desk.example.com",
        request_timeout: std::time::Duration::from_secs(5),
    }
}
