//! Cryptographic utilities for webhook verification.
//!
//! Polar signs webhooks following the Standard Webhooks scheme:
//!
//! - `webhook-id`: unique message id
//! - `webhook-timestamp`: Unix seconds
//! - `webhook-signature`: space-separated `v1,<base64 HMAC-SHA256>` entries
//!
//! The signed content is `{webhook-id}.{webhook-timestamp}.{body}`.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Maximum allowed distance between the signed timestamp and now.
pub const WEBHOOK_TOLERANCE_SECONDS: i64 = 5 * 60;

/// Prefix of base64-encoded Standard Webhooks secrets.
const WHSEC_PREFIX: &str = "whsec_";

/// Signature scheme version this module produces and accepts.
const SIGNATURE_VERSION: &str = "v1";

/// Why a webhook signature was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    /// A required header was absent.
    #[error("missing header: {0}")]
    MissingHeader(&'static str),

    /// `webhook-timestamp` is not an integer.
    #[error("invalid timestamp")]
    InvalidTimestamp,

    /// The timestamp is too old or too far in the future.
    #[error("timestamp outside tolerance")]
    TimestampOutOfTolerance,

    /// No signature entry matched.
    #[error("signature mismatch")]
    Mismatch,
}

/// Derive the HMAC key from a configured secret.
///
/// `whsec_`-prefixed secrets carry base64 key material. Any other secret
/// (Polar's own format) is used as raw UTF-8 bytes.
fn webhook_key(secret: &str) -> Vec<u8> {
    secret
        .strip_prefix(WHSEC_PREFIX)
        .and_then(|encoded| BASE64.decode(encoded).ok())
        .unwrap_or_else(|| secret.as_bytes().to_vec())
}

/// Compute the base64 HMAC-SHA256 signature of a webhook message.
///
/// # Panics
///
/// This function will never panic in practice. The `expect` call is guarded by
/// the invariant that HMAC-SHA256 accepts keys of any size per RFC 2104.
#[must_use]
pub fn sign_webhook(secret: &str, msg_id: &str, timestamp: i64, body: &[u8]) -> String {
    // INVARIANT: HMAC-SHA256 accepts keys of any size per RFC 2104.
    let mut mac = HmacSha256::new_from_slice(&webhook_key(secret))
        .expect("HMAC-SHA256 accepts any key size");
    mac.update(msg_id.as_bytes());
    mac.update(b".");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(body);

    BASE64.encode(mac.finalize().into_bytes())
}

/// Build a full `webhook-signature` header value.
#[must_use]
pub fn signature_header(secret: &str, msg_id: &str, timestamp: i64, body: &[u8]) -> String {
    format!(
        "{SIGNATURE_VERSION},{}",
        sign_webhook(secret, msg_id, timestamp, body)
    )
}

/// Verify a Standard Webhooks signature.
///
/// `now` is the current Unix time in seconds.
///
/// # Errors
///
/// Returns a [`SignatureError`] describing the first check that failed.
pub fn verify_webhook(
    secret: &str,
    msg_id: &str,
    timestamp: &str,
    signatures: &str,
    body: &[u8],
    now: i64,
) -> Result<(), SignatureError> {
    let ts: i64 = timestamp
        .trim()
        .parse()
        .map_err(|_| SignatureError::InvalidTimestamp)?;

    if now.abs_diff(ts) > WEBHOOK_TOLERANCE_SECONDS.unsigned_abs() {
        return Err(SignatureError::TimestampOutOfTolerance);
    }

    let expected = sign_webhook(secret, msg_id, ts, body);

    let matched = signatures
        .split_whitespace()
        .filter_map(|entry| entry.split_once(','))
        .filter(|(version, _)| *version == SIGNATURE_VERSION)
        .any(|(_, sig)| constant_time_eq(sig, &expected));

    if matched {
        Ok(())
    } else {
        Err(SignatureError::Mismatch)
    }
}

/// Constant-time string comparison to prevent timing attacks.
///
/// Only the length check short-circuits; equal-length inputs are compared
/// byte by byte without early exit.
#[must_use]
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "polar_whs_test_secret";
    const NOW: i64 = 1_700_000_000;

    #[test]
    fn signature_is_deterministic() {
        let a = sign_webhook(SECRET, "msg_1", NOW, b"{}");
        let b = sign_webhook(SECRET, "msg_1", NOW, b"{}");
        assert_eq!(a, b);
        // SHA256 = 32 bytes = 44 base64 chars
        assert_eq!(a.len(), 44);
    }

    #[test]
    fn valid_signature_accepted() {
        let header = signature_header(SECRET, "msg_1", NOW, b"{\"a\":1}");
        assert_eq!(
            verify_webhook(SECRET, "msg_1", &NOW.to_string(), &header, b"{\"a\":1}", NOW),
            Ok(())
        );
    }

    #[test]
    fn any_matching_entry_accepted() {
        let good = signature_header(SECRET, "msg_1", NOW, b"body");
        let header = format!("v1,bm90LWl0 {good}");
        assert!(verify_webhook(SECRET, "msg_1", &NOW.to_string(), &header, b"body", NOW).is_ok());
    }

    #[test]
    fn tampered_body_rejected() {
        let header = signature_header(SECRET, "msg_1", NOW, b"original");
        assert_eq!(
            verify_webhook(SECRET, "msg_1", &NOW.to_string(), &header, b"tampered", NOW),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn wrong_secret_rejected() {
        let header = signature_header("other", "msg_1", NOW, b"body");
        assert_eq!(
            verify_webhook(SECRET, "msg_1", &NOW.to_string(), &header, b"body", NOW),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn wrong_version_rejected() {
        let sig = sign_webhook(SECRET, "msg_1", NOW, b"body");
        let header = format!("v1a,{sig}");
        assert_eq!(
            verify_webhook(SECRET, "msg_1", &NOW.to_string(), &header, b"body", NOW),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn stale_timestamp_rejected() {
        let ts = NOW - WEBHOOK_TOLERANCE_SECONDS - 1;
        let header = signature_header(SECRET, "msg_1", ts, b"body");
        assert_eq!(
            verify_webhook(SECRET, "msg_1", &ts.to_string(), &header, b"body", NOW),
            Err(SignatureError::TimestampOutOfTolerance)
        );
    }

    #[test]
    fn extreme_timestamps_rejected() {
        for ts in [i64::MIN, i64::MAX] {
            assert_eq!(
                verify_webhook(SECRET, "msg_1", &ts.to_string(), "v1,abc", b"{}", NOW),
                Err(SignatureError::TimestampOutOfTolerance)
            );
        }
    }

    #[test]
    fn garbage_timestamp_rejected() {
        assert_eq!(
            verify_webhook(SECRET, "msg_1", "yesterday", "v1,abc", b"body", NOW),
            Err(SignatureError::InvalidTimestamp)
        );
    }

    #[test]
    fn whsec_secret_is_base64_key() {
        // "c2VjcmV0" is base64 for "secret"
        assert_eq!(
            sign_webhook("whsec_c2VjcmV0", "m", NOW, b"x"),
            sign_webhook("secret", "m", NOW, b"x")
        );
    }

    #[test]
    fn constant_time_eq_equal_strings() {
        assert!(constant_time_eq("abc", "abc"));
        assert!(constant_time_eq("", ""));
    }

    #[test]
    fn constant_time_eq_different_strings() {
        assert!(!constant_time_eq("abc", "abd"));
        assert!(!constant_time_eq("abc", "ab"));
        assert!(!constant_time_eq("abc", "ABC"));
    }
}
