use dk_common::Secret;
use log::*;

const DEFAULT_API_BASE: &str = "https://api.razorpay.com/v1";

#[derive(Debug, Clone)]
pub struct RazorpayConfig {
    /// The public key id, shared with the storefront frontend so it can open the payment widget.
    pub key_id: String,
    pub key_secret: Secret<String>,
    pub api_base: String,
}

impl Default for RazorpayConfig {
    fn default() -> Self {
        Self { key_id: String::default(), key_secret: Secret::default(), api_base: DEFAULT_API_BASE.into() }
    }
}

impl RazorpayConfig {
    pub fn new_from_env_or_default() -> Self {
        let key_id = std::env::var("DK_RAZORPAY_KEY_ID").unwrap_or_else(|_| {
            warn!("💳️ DK_RAZORPAY_KEY_ID is not set. Online payments will be disabled.");
            String::default()
        });
        let key_secret = Secret::new(std::env::var("DK_RAZORPAY_KEY_SECRET").unwrap_or_else(|_| {
            warn!("💳️ DK_RAZORPAY_KEY_SECRET is not set. Online payments will be disabled.");
            String::default()
        }));
        let api_base = std::env::var("DK_RAZORPAY_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.into());
        Self { key_id, key_secret, api_base }
    }

    /// True when both credentials are present. Checked once at startup; an unconfigured gateway is surfaced to
    /// callers as a `NotConfigured` outcome rather than a silent no-op.
    pub fn is_configured(&self) -> bool {
        !self.key_id.is_empty() && !self.key_secret.reveal().is_empty()
    }
}
