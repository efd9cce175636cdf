use std::{collections::HashMap, fmt::Debug};

use dk_common::{Money, STORE_CURRENCY_CODE};
use log::*;

use crate::{
    api::errors::OrderFlowError,
    db_types::{LineItem, NewOrder, Order, OrderId, PaymentMethod, PaymentStatus},
    order_objects::{
        CartItem,
        CheckoutNotes,
        CheckoutPrefill,
        CheckoutRequest,
        CheckoutResult,
        GatewayCheckout,
    },
    traits::{NewGatewayTransaction, OrderManagement, PaymentGateway, ProductCatalog},
};

/// Flat tax rate applied to the item subtotal, in percent.
pub const TAX_RATE_PERCENT: u32 = 7;

/// `OrderFlowApi` owns the checkout and payment-reconciliation flows: server-side pricing, order construction,
/// gateway transaction initiation, and the idempotent payment-status transition fed by both the client
/// confirmation endpoint and the gateway webhook.
pub struct OrderFlowApi<B> {
    db: B,
}

impl<B> Debug for OrderFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi")
    }
}

impl<B> OrderFlowApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> OrderFlowApi<B>
where B: OrderManagement + ProductCatalog
{
    /// Re-derive authoritative line items from the catalog for a client-submitted item list.
    ///
    /// Every distinct product reference must resolve; a single unknown reference fails the whole set, because
    /// silently dropping items from a priced order is a correctness hazard. Client-submitted prices never enter
    /// this function.
    pub async fn resolve_line_items(&self, items: &[CartItem]) -> Result<Vec<LineItem>, OrderFlowError> {
        if items.is_empty() {
            return Err(OrderFlowError::EmptyOrder);
        }
        for item in items {
            if item.quantity < 1 {
                return Err(OrderFlowError::InvalidQuantity {
                    product_id: item.id.clone(),
                    quantity: item.quantity,
                });
            }
        }
        let mut ids = items.iter().map(|i| i.id.clone()).collect::<Vec<_>>();
        ids.sort();
        ids.dedup();
        let products = self.db.fetch_products_by_ids(&ids).await?;
        if products.len() != ids.len() {
            warn!("🛒️ Checkout referenced {} distinct products but only {} resolved", ids.len(), products.len());
            return Err(OrderFlowError::UnknownProduct);
        }
        let by_id = products.into_iter().map(|p| (p.id.clone(), p)).collect::<HashMap<_, _>>();
        let line_items = items
            .iter()
            .map(|item| {
                // resolve_line_items verified membership above
                let product = &by_id[&item.id];
                LineItem {
                    product_id: product.id.clone(),
                    name: product.name.clone(),
                    unit_price: product.price,
                    quantity: item.quantity,
                    image_url: product.image_url.clone(),
                }
            })
            .collect();
        Ok(line_items)
    }

    /// Run a checkout to completion.
    ///
    /// Cash-on-delivery orders are persisted immediately with `Paid` status. Online-payment orders open a gateway
    /// transaction *first* and are only persisted once the gateway reference exists — an online order without a
    /// reference could never be reconciled. A gateway failure therefore aborts checkout with no partial record
    /// left behind.
    pub async fn place_order<G: PaymentGateway>(
        &self,
        user_id: i64,
        req: CheckoutRequest,
        gateway: &G,
    ) -> Result<CheckoutResult, OrderFlowError> {
        if req.shipping.is_negative() {
            return Err(OrderFlowError::InvalidShipping);
        }
        let items = self.resolve_line_items(&req.items).await?;
        let subtotal: Money = items.iter().map(LineItem::line_total).sum();
        let tax = subtotal.percent(TAX_RATE_PERCENT);
        let total = subtotal + tax + req.shipping;
        let order_id = OrderId::generate();
        debug!("🛒️ Order {order_id} priced at {total} ({} items, subtotal {subtotal}, tax {tax})", items.len());

        match req.payment_method {
            PaymentMethod::CashOnDelivery => {
                let order = self
                    .db
                    .insert_order(NewOrder {
                        order_id,
                        user_id,
                        customer: req.customer,
                        items,
                        subtotal,
                        tax,
                        shipping: req.shipping,
                        total,
                        payment_method: PaymentMethod::CashOnDelivery,
                        payment_status: PaymentStatus::Paid,
                        gateway_order_ref: None,
                        notes: req.notes,
                    })
                    .await?;
                info!("🛒️ COD order {} placed for user #{user_id}", order.order_id);
                Ok(CheckoutResult { order, gateway: None })
            },
            PaymentMethod::OnlinePayment => {
                let tx = gateway
                    .create_transaction(NewGatewayTransaction {
                        amount: total,
                        currency: STORE_CURRENCY_CODE.to_string(),
                        receipt: order_id.as_str().to_string(),
                        customer_email: req.customer.email.clone(),
                    })
                    .await?;
                let order = self
                    .db
                    .insert_order(NewOrder {
                        order_id,
                        user_id,
                        customer: req.customer.clone(),
                        items,
                        subtotal,
                        tax,
                        shipping: req.shipping,
                        total,
                        payment_method: PaymentMethod::OnlinePayment,
                        payment_status: PaymentStatus::Unpaid,
                        gateway_order_ref: Some(tx.reference.clone()),
                        notes: req.notes,
                    })
                    .await?;
                info!("🛒️ Online order {} placed for user #{user_id} (gateway ref {})", order.order_id, tx.reference);
                let checkout = GatewayCheckout {
                    key: gateway.key_id().to_string(),
                    amount: tx.amount,
                    currency: tx.currency,
                    transaction_ref: tx.reference,
                    name: "Order Payment".to_string(),
                    description: format!("Payment for {}", order.order_id.as_str()),
                    prefill: CheckoutPrefill {
                        name: req.customer.name,
                        email: req.customer.email,
                        contact: req.customer.phone,
                    },
                    notes: CheckoutNotes { order_id: order.order_id.as_str().to_string() },
                };
                Ok(CheckoutResult { order, gateway: Some(checkout) })
            },
        }
    }

    /// Bring an order's payment state up to date with the gateway's record.
    ///
    /// Both the client confirmation endpoint and the webhook funnel into this call; neither path has any ordering
    /// guarantee relative to the other, and either may be retried. Idempotence comes from the backend's atomic
    /// conditional update keyed on `gateway_order_ref`. `Ok(None)` means no matching order exists — expected when
    /// the gateway notifies before the checkout response has even been returned, so it is reported to the caller
    /// rather than raised.
    pub async fn reconcile_payment(
        &self,
        gateway_order_ref: &str,
        gateway_payment_ref: Option<&str>,
        gateway_signature: Option<&str>,
    ) -> Result<Option<Order>, OrderFlowError> {
        let updated = self
            .db
            .mark_paid_by_gateway_ref(
                gateway_order_ref,
                gateway_payment_ref.map(String::from),
                gateway_signature.map(String::from),
            )
            .await?;
        match &updated {
            Some(order) => {
                info!("🔄️ Order {} reconciled as Paid (gateway ref {gateway_order_ref})", order.order_id);
            },
            None => {
                info!("🔄️ No order matches gateway ref {gateway_order_ref} yet. The gateway may retry later.");
            },
        }
        Ok(updated)
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}
