//! Request/response objects for the order flow and order query APIs.

use chrono::{DateTime, Utc};
use dk_common::Money;
use serde::{Deserialize, Serialize};

use crate::db_types::{Customer, FulfillmentStatus, Order, PaymentMethod, PaymentStatus};

//--------------------------------------      CheckoutRequest      ---------------------------------------------------
/// A client-submitted checkout. Note that there is no price field on [`CartItem`]: unit prices are always
/// re-derived from the catalog, and anything else the client sends is discarded at deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub customer: Customer,
    pub payment_method: PaymentMethod,
    pub items: Vec<CartItem>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Shipping charge in minor currency units (paise). Defaults to free shipping.
    #[serde(default)]
    pub shipping: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    pub id: String,
    pub quantity: i64,
}

//--------------------------------------      CheckoutResult       ---------------------------------------------------
/// The outcome of a successful checkout. `gateway` is populated for online payments only and carries everything
/// the frontend needs to open the payment widget.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutResult {
    pub order: Order,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway: Option<GatewayCheckout>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GatewayCheckout {
    pub key: String,
    pub amount: i64,
    pub currency: String,
    pub transaction_ref: String,
    pub name: String,
    pub description: String,
    pub prefill: CheckoutPrefill,
    pub notes: CheckoutNotes,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckoutPrefill {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckoutNotes {
    pub order_id: String,
}

//--------------------------------------    PaymentConfirmation    ---------------------------------------------------
/// The client's post-payment confirmation call. The signature is the gateway's HMAC over
/// `"{gateway_order_ref}|{gateway_payment_ref}"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentConfirmation {
    pub gateway_order_ref: String,
    pub gateway_payment_ref: String,
    pub signature: String,
}

//--------------------------------------        Pagination         ---------------------------------------------------
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    10
}

pub const MAX_PAGE_SIZE: u32 = 100;

impl Default for Pagination {
    fn default() -> Self {
        Self { page: default_page(), limit: default_limit() }
    }
}

impl Pagination {
    pub fn is_valid(&self) -> bool {
        self.page >= 1 && self.limit >= 1 && self.limit <= MAX_PAGE_SIZE
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.limit)
    }
}

//--------------------------------------      OrderQueryFilter     ---------------------------------------------------
/// Filter for order listings. `user_id = None` means "all users" and is only reachable through admin routes.
#[derive(Debug, Clone, Default)]
pub struct OrderQueryFilter {
    pub user_id: Option<i64>,
    pub payment_status: Option<PaymentStatus>,
    pub pagination: Pagination,
}

impl OrderQueryFilter {
    pub fn for_user(user_id: i64) -> Self {
        Self { user_id: Some(user_id), ..Default::default() }
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = pagination;
        self
    }
}

//--------------------------------------       OrderResult         ---------------------------------------------------
#[derive(Debug, Clone, Serialize)]
pub struct OrderResult {
    pub orders: Vec<Order>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaginationInfo {
    pub page: u32,
    pub limit: u32,
    pub total: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationInfo {
    pub fn new(pagination: Pagination, total: i64) -> Self {
        let limit = i64::from(pagination.limit);
        let total_pages = (total + limit - 1) / limit;
        Self {
            page: pagination.page,
            limit: pagination.limit,
            total,
            total_pages,
            has_next: i64::from(pagination.page) < total_pages,
            has_prev: pagination.page > 1,
        }
    }
}

//--------------------------------------    ModifyOrderRequest     ---------------------------------------------------
/// The allow-list of mutable order fields. Everything else on an order is immutable after creation; in particular
/// line items and computed prices can never be touched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModifyOrderRequest {
    #[serde(default)]
    pub new_status: Option<FulfillmentStatus>,
    #[serde(default)]
    pub new_payment_status: Option<PaymentStatus>,
    #[serde(default)]
    pub new_delivery_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub new_notes: Option<String>,
    #[serde(default)]
    pub new_shipping: Option<Money>,
}

impl ModifyOrderRequest {
    pub fn is_empty(&self) -> bool {
        self.new_status.is_none()
            && self.new_payment_status.is_none()
            && self.new_delivery_date.is_none()
            && self.new_notes.is_none()
            && self.new_shipping.is_none()
    }
}
