use thiserror::Error;

use crate::db_types::Product;

/// Read access to the product catalog. Catalog management itself is out of scope; the order flow only ever needs a
/// batch lookup so it can price line items in one round trip.
#[allow(async_fn_in_trait)]
pub trait ProductCatalog {
    /// Fetch every product whose id appears in `ids`. Unknown ids are simply absent from the result; callers that
    /// care (the pricing resolver does) must compare counts.
    async fn fetch_products_by_ids(&self, ids: &[String]) -> Result<Vec<Product>, CatalogApiError>;

    /// Insert or replace a catalog entry. Used by seeding and tests.
    async fn upsert_product(&self, product: &Product) -> Result<(), CatalogApiError>;
}

#[derive(Debug, Clone, Error)]
pub enum CatalogApiError {
    #[error("Internal database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for CatalogApiError {
    fn from(e: sqlx::Error) -> Self {
        CatalogApiError::DatabaseError(e.to_string())
    }
}
