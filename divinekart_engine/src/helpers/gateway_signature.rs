//! Keyed-signature verification for gateway payment confirmations.
//!
//! Two callers share this code and must behave identically:
//! * the client payment-confirmation endpoint, which signs `"{gateway_order_ref}|{gateway_payment_ref}"`, and
//! * the webhook route, which signs the raw request body bytes.
//!
//! The payload is always the exact byte sequence the gateway signed. Never re-serialize a parsed body before
//! verifying; whitespace or key-ordering differences will break the signature.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Hex-encoded HMAC-SHA256 of `payload` under `secret`.
pub fn hmac_sha256_hex(secret: &str, payload: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any size");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

/// Check a caller-supplied hex signature against the expected HMAC of `payload`. The comparison runs in constant
/// time via [`Mac::verify_slice`]; a signature that is not valid hex can never match.
pub fn verify_signature(secret: &str, payload: &[u8], supplied: &str) -> bool {
    let supplied = match hex::decode(supplied) {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any size");
    mac.update(payload);
    mac.verify_slice(&supplied).is_ok()
}

/// The canonical payload for client payment confirmations.
pub fn confirmation_payload(gateway_order_ref: &str, gateway_payment_ref: &str) -> String {
    format!("{gateway_order_ref}|{gateway_payment_ref}")
}
