//! Wire shapes for the Razorpay REST API and webhook deliveries.

use serde::{Deserialize, Serialize};

//--------------------------------------   Order creation   ----------------------------------------------------------

/// Request body for `POST /orders`. `amount` is in minor currency units (paise).
#[derive(Debug, Clone, Serialize)]
pub struct NewGatewayOrder {
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
    pub notes: GatewayOrderNotes,
}

/// Correlation metadata attached to the gateway transaction. The gateway echoes these back on every webhook
/// delivery, which is what lets support staff match stray transactions to storefront orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayOrderNotes {
    pub order_id: String,
    pub customer_email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub receipt: Option<String>,
    pub status: String,
}

//--------------------------------------   Webhook events   ----------------------------------------------------------

/// A webhook delivery, tagged by the `event` field. Only the variants the storefront reconciles against are
/// modelled; every other event type deserializes to [`WebhookEvent::Other`] and is accepted without action, so new
/// gateway event types never break ingestion.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event")]
pub enum WebhookEvent {
    #[serde(rename = "payment.captured")]
    PaymentCaptured { payload: PaymentCapturedPayload },
    #[serde(rename = "order.paid")]
    OrderPaid { payload: OrderPaidPayload },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentCapturedPayload {
    pub payment: EntityWrapper<PaymentEntity>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderPaidPayload {
    pub order: EntityWrapper<OrderEntity>,
    #[serde(default)]
    pub payment: Option<EntityWrapper<PaymentEntity>>,
}

/// Razorpay nests every payload object under an `entity` key.
#[derive(Debug, Clone, Deserialize)]
pub struct EntityWrapper<T> {
    pub entity: T,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentEntity {
    pub id: String,
    pub order_id: String,
    #[serde(default)]
    pub amount: i64,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderEntity {
    pub id: String,
    #[serde(default)]
    pub amount: i64,
    #[serde(default)]
    pub receipt: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// The identifiers a reconcilable event carries. `payment_ref` can be absent on `order.paid` deliveries that omit
/// the payment entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRefs {
    pub gateway_order_ref: String,
    pub gateway_payment_ref: Option<String>,
}

impl WebhookEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::PaymentCaptured { .. } => "payment.captured",
            Self::OrderPaid { .. } => "order.paid",
            Self::Other => "other",
        }
    }

    /// Extract the reconciliation identifiers for this event, or `None` for event types the storefront ignores.
    pub fn payment_refs(&self) -> Option<PaymentRefs> {
        match self {
            Self::PaymentCaptured { payload } => {
                let payment = &payload.payment.entity;
                Some(PaymentRefs {
                    gateway_order_ref: payment.order_id.clone(),
                    gateway_payment_ref: Some(payment.id.clone()),
                })
            },
            Self::OrderPaid { payload } => Some(PaymentRefs {
                gateway_order_ref: payload.order.entity.id.clone(),
                gateway_payment_ref: payload.payment.as_ref().map(|p| p.entity.id.clone()),
            }),
            Self::Other => None,
        }
    }
}
