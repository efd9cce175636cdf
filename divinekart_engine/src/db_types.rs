use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use dk_common::Money;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
#[cfg(feature = "sqlite")]
use sqlx::{sqlite::SqliteRow, Row};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct ConversionError(String);

//--------------------------------------        OrderId        -------------------------------------------------------
/// The public, human-shareable order identifier. This is *not* the storage primary key; it is generated once at
/// checkout and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl OrderId {
    /// Generate a fresh, globally unique order id.
    pub fn generate() -> Self {
        Self(format!("ORD-{}", Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for OrderId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

//--------------------------------------     PaymentMethod     -------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// Collected by the courier at fulfilment. Orders with this method are recorded as `Paid` at creation.
    #[serde(rename = "Cash on Delivery", alias = "COD", alias = "CashOnDelivery")]
    CashOnDelivery,
    #[serde(rename = "Online Payment", alias = "Online", alias = "OnlinePayment")]
    OnlinePayment,
}

impl Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::CashOnDelivery => write!(f, "Cash on Delivery"),
            PaymentMethod::OnlinePayment => write!(f, "Online Payment"),
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "COD" | "Cash on Delivery" | "CashOnDelivery" => Ok(Self::CashOnDelivery),
            "Online" | "Online Payment" | "OnlinePayment" => Ok(Self::OnlinePayment),
            s => Err(ConversionError(format!("Invalid payment method: {s}"))),
        }
    }
}

impl From<String> for PaymentMethod {
    fn from(value: String) -> Self {
        value.parse().unwrap_or(PaymentMethod::OnlinePayment)
    }
}

//--------------------------------------     PaymentStatus     -------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum PaymentStatus {
    /// Only reachable for online-payment orders that have not been reconciled yet.
    Unpaid,
    Paid,
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Unpaid => write!(f, "Unpaid"),
            PaymentStatus::Paid => write!(f, "Paid"),
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Unpaid" => Ok(Self::Unpaid),
            "Paid" => Ok(Self::Paid),
            s => Err(ConversionError(format!("Invalid payment status: {s}"))),
        }
    }
}

//--------------------------------------   FulfillmentStatus   -------------------------------------------------------
/// Fulfilment progress, independent of payment state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum FulfillmentStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl Display for FulfillmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FulfillmentStatus::Pending => write!(f, "Pending"),
            FulfillmentStatus::Processing => write!(f, "Processing"),
            FulfillmentStatus::Shipped => write!(f, "Shipped"),
            FulfillmentStatus::Delivered => write!(f, "Delivered"),
            FulfillmentStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

impl FromStr for FulfillmentStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Processing" => Ok(Self::Processing),
            "Shipped" => Ok(Self::Shipped),
            "Delivered" => Ok(Self::Delivered),
            "Cancelled" => Ok(Self::Cancelled),
            s => Err(ConversionError(format!("Invalid fulfillment status: {s}"))),
        }
    }
}

//--------------------------------------         Role          -------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum Role {
    Customer,
    Admin,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Customer => write!(f, "Customer"),
            Role::Admin => write!(f, "Admin"),
        }
    }
}

impl FromStr for Role {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Customer" => Ok(Self::Customer),
            "Admin" => Ok(Self::Admin),
            s => Err(ConversionError(format!("Invalid role: {s}"))),
        }
    }
}

//--------------------------------------       Customer        -------------------------------------------------------
/// Contact details snapshotted onto the order at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
}

//--------------------------------------       LineItem        -------------------------------------------------------
/// One order line, priced from the catalog at checkout. Prices here are immutable once the order is persisted;
/// later catalog changes never touch placed orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: String,
    pub name: String,
    pub unit_price: Money,
    pub quantity: i64,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl LineItem {
    pub fn line_total(&self) -> Money {
        self.unit_price * self.quantity
    }
}

//--------------------------------------        Product        -------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: Money,
    #[serde(default)]
    pub image_url: Option<String>,
}

//--------------------------------------         User          -------------------------------------------------------
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

//--------------------------------------        NewOrder       -------------------------------------------------------
/// A fully priced order, ready for insertion. For online payment the gateway reference must already be present;
/// an online order is never persisted without one.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub order_id: OrderId,
    pub user_id: i64,
    pub customer: Customer,
    pub items: Vec<LineItem>,
    pub subtotal: Money,
    pub tax: Money,
    pub shipping: Money,
    pub total: Money,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub gateway_order_ref: Option<String>,
    pub notes: Option<String>,
}

//--------------------------------------         Order         -------------------------------------------------------
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: i64,
    pub order_id: OrderId,
    pub user_id: i64,
    pub customer: Customer,
    pub items: Vec<LineItem>,
    pub subtotal: Money,
    pub tax: Money,
    pub shipping: Money,
    pub total: Money,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub gateway_order_ref: Option<String>,
    pub gateway_payment_ref: Option<String>,
    pub gateway_signature: Option<String>,
    pub status: FulfillmentStatus,
    pub delivery_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// `customer` and `items` are stored as JSON documents, so the row conversion is spelled out rather than derived.
#[cfg(feature = "sqlite")]
impl<'r> FromRow<'r, SqliteRow> for Order {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let customer: String = row.try_get("customer")?;
        let customer = serde_json::from_str(&customer)
            .map_err(|e| sqlx::Error::ColumnDecode { index: "customer".into(), source: Box::new(e) })?;
        let items: String = row.try_get("items")?;
        let items = serde_json::from_str(&items)
            .map_err(|e| sqlx::Error::ColumnDecode { index: "items".into(), source: Box::new(e) })?;
        Ok(Self {
            id: row.try_get("id")?,
            order_id: row.try_get("order_id")?,
            user_id: row.try_get("user_id")?,
            customer,
            items,
            subtotal: row.try_get("subtotal")?,
            tax: row.try_get("tax")?,
            shipping: row.try_get("shipping")?,
            total: row.try_get("total")?,
            payment_method: row.try_get("payment_method")?,
            payment_status: row.try_get("payment_status")?,
            gateway_order_ref: row.try_get("gateway_order_ref")?,
            gateway_payment_ref: row.try_get("gateway_payment_ref")?,
            gateway_signature: row.try_get("gateway_signature")?,
            status: row.try_get("status")?,
            delivery_date: row.try_get("delivery_date")?,
            notes: row.try_get("notes")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}
