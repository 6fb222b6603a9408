mod common;

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Utc};
use common::{date, license, other_keys, vendor_keys};
use deskwarden::crypto::signature::sign_b64;
use deskwarden::policy::license::{evaluate_status, is_expired_at, LicenseStatus};
use deskwarden::protocol::key_format::{format_key, strip_key};
use deskwarden::protocol::models::LicenseEnvelope;
use deskwarden::{generate_license_key, verify_license_key, LicenseData, LicenseVerifier, SystemClock};

const B64_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

fn envelope_of(key: &str) -> LicenseEnvelope {
    let bytes = STANDARD.decode(strip_key(key)).unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn reencode(envelope: &LicenseEnvelope) -> String {
    format_key(&STANDARD.encode(serde_json::to_vec(envelope).unwrap()))
}

fn flip(c: u8) -> u8 {
    let pos = B64_ALPHABET.iter().position(|b| *b == c).unwrap();
    B64_ALPHABET[(pos + 1) % B64_ALPHABET.len()]
}

fn utc(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

// ── Round trip ───────────────────────────────────────────────────

#[test]
fn round_trip_preserves_fields() {
    let (_, private_pem, public_pem) = vendor_keys();
    let variants = vec![
        license(1),
        license(500),
        LicenseData {
            company_name: "Société Générale d'Équipement".to_string(),
            contact_email: "it@sge.test".to_string(),
            expiration_date: date(2030, 2, 28),
            max_users: 7,
            features: Default::default(),
        },
    ];

    for data in variants {
        let key = generate_license_key(&data, &private_pem).unwrap();
        let outcome = verify_license_key(&key, &public_pem);
        assert!(outcome.valid, "{:?}", outcome.error);
        assert_eq!(outcome.data.as_ref(), Some(&data));
        assert!(outcome.error.is_none());
    }
}

#[test]
fn free_text_fields_may_be_empty() {
    let (_, private_pem, public_pem) = vendor_keys();
    let mut data = license(1);
    data.company_name = String::new();
    data.contact_email = String::new();

    let key = generate_license_key(&data, &private_pem).unwrap();
    let outcome = verify_license_key(&key, &public_pem);
    assert!(outcome.valid, "{:?}", outcome.error);
    assert_eq!(outcome.data, Some(data));
}

#[test]
fn regrouped_and_wrapped_key_still_verifies() {
    let (_, private_pem, public_pem) = vendor_keys();
    let key = generate_license_key(&license(5), &private_pem).unwrap();
    let wrapped: String = key
        .split('-')
        .collect::<Vec<_>>()
        .chunks(8)
        .map(|c| c.join("-"))
        .collect::<Vec<_>>()
        .join("\n");
    assert!(verify_license_key(&wrapped, &public_pem).valid);
}

// ── Tamper detection ─────────────────────────────────────────────

#[test]
fn flipping_any_data_character_invalidates() {
    let (_, private_pem, public_pem) = vendor_keys();
    let key = generate_license_key(&license(5), &private_pem).unwrap();
    let original = envelope_of(&key);

    for i in 0..original.data.len() {
        let mut bytes = original.data.clone().into_bytes();
        if bytes[i] == b'=' {
            continue;
        }
        bytes[i] = flip(bytes[i]);
        let tampered = LicenseEnvelope {
            data: String::from_utf8(bytes).unwrap(),
            signature: original.signature.clone(),
        };

        let outcome = verify_license_key(&reencode(&tampered), &public_pem);
        assert!(!outcome.valid, "flip at {} accepted", i);
        assert!(outcome.data.is_none());
        assert!(outcome.error.is_some());
    }
}

#[test]
fn editing_decoded_claims_invalidates() {
    let (_, private_pem, public_pem) = vendor_keys();
    let key = generate_license_key(&license(5), &private_pem).unwrap();
    let mut envelope = envelope_of(&key);

    let claims = String::from_utf8(STANDARD.decode(&envelope.data).unwrap()).unwrap();
    let forged = claims.replace("\"users\":5", "\"users\":9");
    assert_ne!(claims, forged);
    envelope.data = STANDARD.encode(forged.as_bytes());

    let outcome = verify_license_key(&reencode(&envelope), &public_pem);
    assert!(!outcome.valid);
}

#[test]
fn flipping_signature_invalidates() {
    let (_, private_pem, public_pem) = vendor_keys();
    let key = generate_license_key(&license(5), &private_pem).unwrap();
    let mut envelope = envelope_of(&key);

    let mut sig = envelope.signature.into_bytes();
    sig[10] = flip(sig[10]);
    envelope.signature = String::from_utf8(sig).unwrap();

    assert!(!verify_license_key(&reencode(&envelope), &public_pem).valid);
}

// ── Wrong key ────────────────────────────────────────────────────

#[test]
fn key_signed_by_other_vendor_rejected() {
    let (_, private_a, _) = vendor_keys();
    let (_, _, public_b) = other_keys();

    let key = generate_license_key(&license(5), &private_a).unwrap();
    let outcome = verify_license_key(&key, &public_b);
    assert!(!outcome.valid);
    assert_eq!(
        outcome.error.as_deref(),
        Some("License signature verification failed")
    );
}

#[test]
fn verifier_built_from_pem() {
    let (signing, private_pem, public_pem) = vendor_keys();
    let verifier = LicenseVerifier::from_pem(&public_pem).unwrap();
    assert_eq!(verifier.public_key(), &signing.verifying_key());

    let key = generate_license_key(&license(3), &private_pem).unwrap();
    assert!(verifier.verify(&key).valid);
}

// ── Failure reporting ────────────────────────────────────────────

#[test]
fn malformed_inputs_never_panic() {
    let (_, _, public_pem) = vendor_keys();
    let long_junk = "A-".repeat(20_000);
    let inputs = [
        "",
        "-",
        "    ",
        "ABCD-EFGH-IJK",
        "ÀÉÎÕ-ÜÇ",
        "e30=",
        "bnVsbA==",
        long_junk.as_str(),
    ];
    for input in inputs {
        let outcome = verify_license_key(input, &public_pem);
        assert!(!outcome.valid, "{:?} accepted", input);
        assert!(outcome.error.is_some());
    }
}

#[test]
fn malformed_private_key_fails_loudly() {
    let (_, _, public_pem) = vendor_keys();
    assert!(generate_license_key(&license(5), &public_pem).is_err());
    assert!(generate_license_key(&license(5), "").is_err());
}

// ── Expiry boundary ──────────────────────────────────────────────

#[test]
fn expiry_boundary_is_exclusive() {
    let exp = date(2027, 4, 1);
    assert!(!is_expired_at(exp, utc("2027-03-31T23:59:59Z")));
    assert!(!is_expired_at(exp, utc("2027-04-01T00:00:00Z")));
    assert!(is_expired_at(exp, utc("2027-04-01T00:00:00.001Z")));
    assert!(is_expired_at(exp, utc("2027-04-02T00:00:00Z")));
}

#[test]
fn signed_timestamp_expiry_is_refused() {
    let (signing, _, public_pem) = vendor_keys();
    let claims = r#"{"company":"Adventure Works","email":"helpdesk@adventure-works.test","expires":"2027-06-30T18:00:00Z","users":5,"features":[]}"#;
    let envelope = LicenseEnvelope {
        data: STANDARD.encode(claims),
        signature: sign_b64(claims.as_bytes(), &signing).unwrap(),
    };

    let outcome = verify_license_key(&reencode(&envelope), &public_pem);
    assert!(!outcome.valid);
    assert!(outcome.data.is_none());
}

#[test]
fn verification_ignores_expiry() {
    let (_, private_pem, public_pem) = vendor_keys();
    let mut data = license(5);
    data.expiration_date = date(2001, 1, 1);

    let key = generate_license_key(&data, &private_pem).unwrap();
    let outcome = verify_license_key(&key, &public_pem);
    assert!(outcome.valid);

    let status = evaluate_status(Some(&outcome), &SystemClock);
    assert_eq!(
        status,
        LicenseStatus::Expired {
            expired_on: date(2001, 1, 1)
        }
    );
}
