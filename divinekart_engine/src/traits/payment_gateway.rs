use dk_common::Money;
use thiserror::Error;

/// The external online-payment processor, as the order flow sees it.
///
/// The concrete client lives in its own crate; checkout only needs to open a transaction and to know the publishable
/// key for the frontend widget. There is exactly one gateway per deployment. An unconfigured gateway must be
/// detectable up front so that checkout can fail fast with [`GatewayError::NotConfigured`] instead of degrading to a
/// silent no-op.
#[allow(async_fn_in_trait)]
pub trait PaymentGateway {
    fn is_configured(&self) -> bool;

    /// The publishable key id handed to the frontend.
    fn key_id(&self) -> &str;

    /// Open a gateway transaction for `tx.amount`, tagged with the storefront order id for later correlation.
    /// This is called *before* the order is persisted; on failure no order record exists at all.
    async fn create_transaction(&self, tx: NewGatewayTransaction) -> Result<GatewayTransaction, GatewayError>;
}

/// Parameters for opening a gateway transaction. `amount` is carried as [`Money`] (already minor-currency units).
#[derive(Debug, Clone)]
pub struct NewGatewayTransaction {
    pub amount: Money,
    pub currency: String,
    /// The storefront order id, passed to the gateway as the transaction receipt.
    pub receipt: String,
    pub customer_email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayTransaction {
    /// The gateway's transaction identifier; stored on the order as `gateway_order_ref` and used as the
    /// idempotency key for all later reconciliation.
    pub reference: String,
    pub amount: i64,
    pub currency: String,
}

#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("Online payments are not configured on this server")]
    NotConfigured,
    #[error("The payment gateway could not be reached: {0}")]
    Unavailable(String),
    #[error("The payment gateway rejected the transaction: {0}")]
    Rejected(String),
}
