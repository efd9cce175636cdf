//! `SqliteDatabase` is a concrete implementation of a DivineKart storefront backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the [`crate::traits`]
//! module.
use std::fmt::Debug;

use sqlx::SqlitePool;

use super::db::{new_pool, orders, products, users};
use crate::{
    db_types::{NewOrder, NewUser, Order, OrderId, Product, User},
    order_objects::{ModifyOrderRequest, OrderQueryFilter},
    traits::{AuthApiError, CatalogApiError, OrderApiError, OrderManagement, ProductCatalog, UserManagement},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl OrderManagement for SqliteDatabase {
    async fn insert_order(&self, order: NewOrder) -> Result<Order, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        orders::insert_order(order, &mut conn).await
    }

    async fn fetch_order_by_order_id(&self, order_id: &OrderId) -> Result<Option<Order>, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order_by_order_id(order_id, &mut conn).await?;
        Ok(order)
    }

    async fn fetch_order_by_gateway_ref(&self, gateway_order_ref: &str) -> Result<Option<Order>, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order_by_gateway_ref(gateway_order_ref, &mut conn).await?;
        Ok(order)
    }

    async fn mark_paid_by_gateway_ref(
        &self,
        gateway_order_ref: &str,
        gateway_payment_ref: Option<String>,
        gateway_signature: Option<String>,
    ) -> Result<Option<Order>, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        orders::mark_paid_by_gateway_ref(
            gateway_order_ref,
            gateway_payment_ref.as_deref(),
            gateway_signature.as_deref(),
            &mut conn,
        )
        .await
    }

    async fn fetch_orders(&self, query: &OrderQueryFilter) -> Result<Vec<Order>, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        let result = orders::fetch_orders(query, &mut conn).await?;
        Ok(result)
    }

    async fn count_orders(&self, query: &OrderQueryFilter) -> Result<i64, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        let count = orders::count_orders(query, &mut conn).await?;
        Ok(count)
    }

    async fn update_order(
        &self,
        order_id: &OrderId,
        update: ModifyOrderRequest,
    ) -> Result<Option<Order>, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        orders::update_order(order_id, update, &mut conn).await
    }

    async fn delete_order(&self, order_id: &OrderId) -> Result<bool, OrderApiError> {
        let mut conn = self.pool.acquire().await?;
        orders::delete_order(order_id, &mut conn).await
    }

    async fn close(&mut self) -> Result<(), OrderApiError> {
        self.pool.close().await;
        Ok(())
    }
}

impl ProductCatalog for SqliteDatabase {
    async fn fetch_products_by_ids(&self, ids: &[String]) -> Result<Vec<Product>, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        let products = products::fetch_products_by_ids(ids, &mut conn).await?;
        Ok(products)
    }

    async fn upsert_product(&self, product: &Product) -> Result<(), CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        products::upsert_product(product, &mut conn).await?;
        Ok(())
    }
}

impl UserManagement for SqliteDatabase {
    async fn create_user(&self, user: NewUser) -> Result<User, AuthApiError> {
        let mut conn = self.pool.acquire().await?;
        users::insert_user(user, &mut conn).await
    }

    async fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>, AuthApiError> {
        let mut conn = self.pool.acquire().await?;
        let user = users::fetch_user_by_email(email, &mut conn).await?;
        Ok(user)
    }

    async fn fetch_user_by_id(&self, id: i64) -> Result<Option<User>, AuthApiError> {
        let mut conn = self.pool.acquire().await?;
        let user = users::fetch_user_by_id(id, &mut conn).await?;
        Ok(user)
    }
}
