use std::fmt::Display;

use chrono::{DateTime, Utc};
use dk_common::Money;
use divinekart_engine::{
    db_types::{FulfillmentStatus, PaymentStatus, Role, User},
    order_objects::ModifyOrderRequest,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }

    pub fn failure<S: Display>(message: S) -> Self {
        Self { success: false, message: message.to_string() }
    }
}

/// The user fields that are safe to return to clients. The password hash never leaves the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self { id: user.id, name: user.name, email: user.email, role: user.role }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    pub token: String,
    pub user: PublicUser,
}

/// `PATCH /orders/{order_id}` body. This is the entire allow-list of mutable order fields; anything else sent by
/// the client is ignored at deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateOrderParams {
    #[serde(default)]
    pub status: Option<FulfillmentStatus>,
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
    #[serde(default)]
    pub delivery_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub shipping: Option<Money>,
}

impl From<UpdateOrderParams> for ModifyOrderRequest {
    fn from(params: UpdateOrderParams) -> Self {
        Self {
            new_status: params.status,
            new_payment_status: params.payment_status,
            new_delivery_date: params.delivery_date,
            new_notes: params.notes,
            new_shipping: params.shipping,
        }
    }
}

/// The acknowledgement the gateway expects from a webhook delivery.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WebhookAck {
    pub received: bool,
}

impl WebhookAck {
    pub fn received() -> Self {
        Self { received: true }
    }
}
