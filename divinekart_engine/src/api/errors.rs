use thiserror::Error;

use crate::traits::{CatalogApiError, GatewayError, OrderApiError};

#[derive(Debug, Clone, Error)]
pub enum OrderFlowError {
    #[error("Items must be a non-empty list")]
    EmptyOrder,
    #[error("Invalid quantity {quantity} for product {product_id}")]
    InvalidQuantity { product_id: String, quantity: i64 },
    #[error("One or more products not found")]
    UnknownProduct,
    #[error("Shipping amount cannot be negative")]
    InvalidShipping,
    #[error(transparent)]
    GatewayError(#[from] GatewayError),
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<OrderApiError> for OrderFlowError {
    fn from(e: OrderApiError) -> Self {
        OrderFlowError::DatabaseError(e.to_string())
    }
}

impl From<CatalogApiError> for OrderFlowError {
    fn from(e: CatalogApiError) -> Self {
        OrderFlowError::DatabaseError(e.to_string())
    }
}
