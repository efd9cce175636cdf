mod gateway_signature;

pub use gateway_signature::{confirmation_payload, hmac_sha256_hex, verify_signature};
