//! Bridges the `razorpay_tools` REST client onto the engine's [`PaymentGateway`] trait.

use divinekart_engine::traits::{GatewayError, GatewayTransaction, NewGatewayTransaction, PaymentGateway};
use log::*;
use razorpay_tools::{
    data_objects::{GatewayOrderNotes, NewGatewayOrder},
    RazorpayApi,
    RazorpayConfig,
};

use crate::errors::ServerError;

/// The concrete payment gateway used in production. Constructed once at startup; when the Razorpay credentials
/// are absent the adapter still exists but reports itself unconfigured, and every transaction attempt surfaces
/// [`GatewayError::NotConfigured`].
#[derive(Clone)]
pub struct RazorpayGateway {
    api: Option<RazorpayApi>,
    key_id: String,
}

impl RazorpayGateway {
    pub fn new(config: RazorpayConfig) -> Result<Self, ServerError> {
        if !config.is_configured() {
            warn!("💳️ Razorpay credentials are not configured. Online payments are disabled.");
            return Ok(Self { api: None, key_id: String::default() });
        }
        let key_id = config.key_id.clone();
        let api = RazorpayApi::new(config).map_err(|e| ServerError::InitializeError(e.to_string()))?;
        info!("💳️ Razorpay gateway configured with key {key_id}");
        Ok(Self { api: Some(api), key_id })
    }
}

impl PaymentGateway for RazorpayGateway {
    fn is_configured(&self) -> bool {
        self.api.is_some()
    }

    fn key_id(&self) -> &str {
        &self.key_id
    }

    async fn create_transaction(&self, tx: NewGatewayTransaction) -> Result<GatewayTransaction, GatewayError> {
        let api = self.api.as_ref().ok_or(GatewayError::NotConfigured)?;
        let order = NewGatewayOrder {
            amount: tx.amount.value(),
            currency: tx.currency,
            receipt: tx.receipt.clone(),
            notes: GatewayOrderNotes { order_id: tx.receipt, customer_email: tx.customer_email },
        };
        let created = api.create_order(order).await.map_err(|e| {
            if e.is_rejection() {
                GatewayError::Rejected(e.to_string())
            } else {
                GatewayError::Unavailable(e.to_string())
            }
        })?;
        Ok(GatewayTransaction { reference: created.id, amount: created.amount, currency: created.currency })
    }
}
