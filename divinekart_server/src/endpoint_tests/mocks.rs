use chrono::{TimeZone, Utc};
use dk_common::Money;
use divinekart_engine::{
    db_types::{
        Customer,
        FulfillmentStatus,
        LineItem,
        NewOrder,
        NewUser,
        Order,
        OrderId,
        PaymentMethod,
        PaymentStatus,
        Product,
        Role,
        User,
    },
    order_objects::{ModifyOrderRequest, OrderQueryFilter},
    traits::{
        AuthApiError,
        CatalogApiError,
        GatewayError,
        GatewayTransaction,
        NewGatewayTransaction,
        OrderApiError,
        OrderManagement,
        PaymentGateway,
        ProductCatalog,
        UserManagement,
    },
};
use mockall::mock;

mock! {
    pub Storefront {}
    impl OrderManagement for Storefront {
        async fn insert_order(&self, order: NewOrder) -> Result<Order, OrderApiError>;
        async fn fetch_order_by_order_id(&self, order_id: &OrderId) -> Result<Option<Order>, OrderApiError>;
        async fn fetch_order_by_gateway_ref(&self, gateway_order_ref: &str) -> Result<Option<Order>, OrderApiError>;
        async fn mark_paid_by_gateway_ref(&self, gateway_order_ref: &str, gateway_payment_ref: Option<String>, gateway_signature: Option<String>) -> Result<Option<Order>, OrderApiError>;
        async fn fetch_orders(&self, query: &OrderQueryFilter) -> Result<Vec<Order>, OrderApiError>;
        async fn count_orders(&self, query: &OrderQueryFilter) -> Result<i64, OrderApiError>;
        async fn update_order(&self, order_id: &OrderId, update: ModifyOrderRequest) -> Result<Option<Order>, OrderApiError>;
        async fn delete_order(&self, order_id: &OrderId) -> Result<bool, OrderApiError>;
        async fn close(&mut self) -> Result<(), OrderApiError>;
    }
    impl ProductCatalog for Storefront {
        async fn fetch_products_by_ids(&self, ids: &[String]) -> Result<Vec<Product>, CatalogApiError>;
        async fn upsert_product(&self, product: &Product) -> Result<(), CatalogApiError>;
    }
    impl UserManagement for Storefront {
        async fn create_user(&self, user: NewUser) -> Result<User, AuthApiError>;
        async fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>, AuthApiError>;
        async fn fetch_user_by_id(&self, id: i64) -> Result<Option<User>, AuthApiError>;
    }
}

/// A scripted gateway for checkout endpoint tests.
pub struct FakeGateway {
    failure: Option<GatewayError>,
}

impl FakeGateway {
    pub fn ok() -> Self {
        Self { failure: None }
    }

    pub fn failing(failure: GatewayError) -> Self {
        Self { failure: Some(failure) }
    }
}

impl PaymentGateway for FakeGateway {
    fn is_configured(&self) -> bool {
        true
    }

    fn key_id(&self) -> &str {
        "rzp_test_fake"
    }

    async fn create_transaction(&self, tx: NewGatewayTransaction) -> Result<GatewayTransaction, GatewayError> {
        if let Some(failure) = &self.failure {
            return Err(failure.clone());
        }
        Ok(GatewayTransaction { reference: "order_9A33XWu170gUtm".into(), amount: tx.amount.value(), currency: tx.currency })
    }
}

pub fn sample_user(id: i64, role: Role) -> User {
    User {
        id,
        name: "Jane Shopper".to_string(),
        email: "jane@example.com".to_string(),
        password_hash: "$argon2id$unused".to_string(),
        role,
        created_at: Utc.with_ymd_and_hms(2024, 2, 29, 13, 30, 0).unwrap(),
    }
}

pub fn sample_product(id: &str, price: i64) -> Product {
    Product { id: id.to_string(), name: format!("Product {id}"), price: Money::from(price), image_url: None }
}

pub fn sample_order(user_id: i64) -> Order {
    Order {
        id: 1,
        order_id: OrderId("ORD-0000001".into()),
        user_id,
        customer: Customer {
            name: "Jane Shopper".to_string(),
            email: "jane@example.com".to_string(),
            phone: None,
        },
        items: vec![LineItem {
            product_id: "P1".to_string(),
            name: "Product P1".to_string(),
            unit_price: Money::from(10_000),
            quantity: 2,
            image_url: None,
        }],
        subtotal: Money::from(20_000),
        tax: Money::from(1_400),
        shipping: Money::from(0),
        total: Money::from(21_400),
        payment_method: PaymentMethod::OnlinePayment,
        payment_status: PaymentStatus::Unpaid,
        gateway_order_ref: Some("order_9A33XWu170gUtm".to_string()),
        gateway_payment_ref: None,
        gateway_signature: None,
        status: FulfillmentStatus::Pending,
        delivery_date: None,
        notes: None,
        created_at: Utc.with_ymd_and_hms(2024, 2, 29, 13, 30, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2024, 2, 29, 13, 30, 0).unwrap(),
    }
}

pub fn paid_order(user_id: i64) -> Order {
    Order {
        payment_status: PaymentStatus::Paid,
        gateway_payment_ref: Some("pay_29QQoUBi66xm2f".to_string()),
        ..sample_order(user_id)
    }
}
