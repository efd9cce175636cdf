use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{Order, OrderId},
    order_objects::{ModifyOrderRequest, OrderQueryFilter, OrderResult, PaginationInfo},
    traits::{OrderApiError, OrderManagement},
};

/// Read and administrative access to placed orders. Authorization (whose orders a caller may see or change) is
/// decided by the server layer; this API only scopes queries by the filter it is handed.
pub struct AccountApi<B> {
    db: B,
}

impl<B> Debug for AccountApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AccountApi")
    }
}

impl<B> AccountApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> AccountApi<B>
where B: OrderManagement
{
    /// A page of orders matching the filter, newest first, with the pagination envelope.
    pub async fn search_orders(&self, filter: OrderQueryFilter) -> Result<OrderResult, OrderApiError> {
        let orders = self.db.fetch_orders(&filter).await?;
        let total = self.db.count_orders(&filter).await?;
        trace!("📦️ Order search returned {} of {total} orders", orders.len());
        Ok(OrderResult { orders, pagination: PaginationInfo::new(filter.pagination, total) })
    }

    pub async fn fetch_order(&self, order_id: &OrderId) -> Result<Option<Order>, OrderApiError> {
        self.db.fetch_order_by_order_id(order_id).await
    }

    /// Apply an allow-listed update. Returns `None` if the order does not exist.
    pub async fn update_order(
        &self,
        order_id: &OrderId,
        update: ModifyOrderRequest,
    ) -> Result<Option<Order>, OrderApiError> {
        if update.is_empty() {
            debug!("📦️ No fields to update for order {order_id}. Update request skipped.");
            return Err(OrderApiError::ModificationNoOp);
        }
        self.db.update_order(order_id, update).await
    }

    pub async fn delete_order(&self, order_id: &OrderId) -> Result<bool, OrderApiError> {
        let deleted = self.db.delete_order(order_id).await?;
        if deleted {
            info!("📦️ Order {order_id} deleted");
        }
        Ok(deleted)
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}
