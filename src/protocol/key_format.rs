//! Human-transport formatting of license keys.
//!
//! The encoded envelope is split into dash-separated groups of four
//! characters for copy/paste. Grouping carries no meaning and is removed
//! before decoding.

use crate::DeskwardenError;

/// Characters per dash-separated group.
pub const GROUP_LEN: usize = 4;

/// Upper bound on a stripped license key.
pub const MAX_KEY_LEN: usize = 16 * 1024;

/// Split an encoded key into dash-separated groups.
pub fn format_key(encoded: &str) -> String {
    let mut out = String::with_capacity(encoded.len() + encoded.len() / GROUP_LEN);
    for (i, ch) in encoded.chars().enumerate() {
        if i > 0 && i % GROUP_LEN == 0 {
            out.push('-');
        }
        out.push(ch);
    }
    out
}

/// Remove group separators and any whitespace picked up in transport.
pub fn strip_key(formatted: &str) -> String {
    formatted
        .chars()
        .filter(|c| *c != '-' && !c.is_ascii_whitespace())
        .collect()
}

/// Check that a stripped key is plausible padded base64 before decoding.
pub fn check_structure(stripped: &str) -> Result<(), DeskwardenError> {
    if stripped.is_empty() {
        return Err(DeskwardenError::MalformedKey("license key is empty".to_string()));
    }
    if stripped.len() > MAX_KEY_LEN {
        return Err(DeskwardenError::MalformedKey(format!(
            "license key is {} characters, limit is {}",
            stripped.len(),
            MAX_KEY_LEN
        )));
    }
    if stripped.len() % 4 != 0 {
        return Err(DeskwardenError::MalformedKey(format!(
            "license key length {} is not a multiple of 4",
            stripped.len()
        )));
    }
    if let Some(bad) = stripped
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '+' || *c == '/' || *c == '='))
    {
        return Err(DeskwardenError::MalformedKey(format!(
            "unexpected character {:?} in license key",
            bad
        )));
    }

    let body = stripped.trim_end_matches('=');
    let padding = stripped.len() - body.len();
    if padding > 2 || body.contains('=') {
        return Err(DeskwardenError::MalformedKey(
            "padding may only appear at the end of the license key".to_string(),
        ));
    }
    Ok(())
}
