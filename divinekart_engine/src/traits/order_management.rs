use thiserror::Error;

use crate::{
    db_types::{NewOrder, Order, OrderId},
    order_objects::{ModifyOrderRequest, OrderQueryFilter},
};

/// Order persistence behaviour for a storefront backend.
///
/// The store is a keyed record store: orders are addressed by `order_id` (public identity) or by
/// `gateway_order_ref` (reconciliation identity), never by the storage primary key. The one hard concurrency
/// requirement is that [`Self::mark_paid_by_gateway_ref`] be a single atomic conditional update — the payment
/// confirmation endpoint and the gateway webhook race each other for the same row, and the idempotence of that
/// statement is the entire retry-safety mechanism. A read-then-write pair must never be substituted.
#[allow(async_fn_in_trait)]
pub trait OrderManagement {
    /// Persist a fully priced order. The order must not exist yet; `gateway_order_ref` is unique across all rows.
    async fn insert_order(&self, order: NewOrder) -> Result<Order, OrderApiError>;

    async fn fetch_order_by_order_id(&self, order_id: &OrderId) -> Result<Option<Order>, OrderApiError>;

    async fn fetch_order_by_gateway_ref(&self, gateway_order_ref: &str) -> Result<Option<Order>, OrderApiError>;

    /// Atomically set `payment_status = Paid` plus the gateway payment fields on the order matching
    /// `gateway_order_ref`, returning the updated row. `None` means no order matches (yet) — an expected race with
    /// webhook delivery, not a defect. Re-invocation with the same arguments is a no-op update to the same values.
    async fn mark_paid_by_gateway_ref(
        &self,
        gateway_order_ref: &str,
        gateway_payment_ref: Option<String>,
        gateway_signature: Option<String>,
    ) -> Result<Option<Order>, OrderApiError>;

    /// Orders matching the filter, newest first, with the filter's pagination applied.
    async fn fetch_orders(&self, query: &OrderQueryFilter) -> Result<Vec<Order>, OrderApiError>;

    /// Total number of orders matching the filter, ignoring pagination.
    async fn count_orders(&self, query: &OrderQueryFilter) -> Result<i64, OrderApiError>;

    /// Apply an allow-listed field update. Changing `new_shipping` recomputes the stored total as
    /// `subtotal + tax + shipping` in the same statement.
    async fn update_order(&self, order_id: &OrderId, update: ModifyOrderRequest)
        -> Result<Option<Order>, OrderApiError>;

    /// Remove an order outright. Returns `false` if no such order existed.
    async fn delete_order(&self, order_id: &OrderId) -> Result<bool, OrderApiError>;

    /// Closes the database connection.
    async fn close(&mut self) -> Result<(), OrderApiError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Error)]
pub enum OrderApiError {
    #[error("Internal database error: {0}")]
    DatabaseError(String),
    #[error("Cannot insert order, since it already exists: {0}")]
    OrderAlreadyExists(OrderId),
    #[error("Could not encode order document: {0}")]
    EncodingError(String),
    #[error("The requested order change would result in a no-op.")]
    ModificationNoOp,
}

impl From<sqlx::Error> for OrderApiError {
    fn from(e: sqlx::Error) -> Self {
        OrderApiError::DatabaseError(e.to_string())
    }
}
