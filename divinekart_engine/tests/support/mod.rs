pub mod prepare_env;

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use dk_common::Money;
use divinekart_engine::{
    db_types::{Customer, NewUser, Product, Role, User},
    traits::{GatewayError, GatewayTransaction, NewGatewayTransaction, PaymentGateway, ProductCatalog, UserManagement},
    SqliteDatabase,
};

/// An in-memory stand-in for the payment gateway. Hands out sequential transaction references, or fails every
/// call when constructed with [`FakeGateway::failing`].
#[derive(Clone)]
pub struct FakeGateway {
    counter: Arc<AtomicU64>,
    failure: Option<GatewayError>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self { counter: Arc::new(AtomicU64::new(0)), failure: None }
    }

    pub fn failing(failure: GatewayError) -> Self {
        Self { counter: Arc::new(AtomicU64::new(0)), failure: Some(failure) }
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
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        Ok(GatewayTransaction {
            reference: format!("order_fake{n:04}"),
            amount: tx.amount.value(),
            currency: tx.currency,
        })
    }
}

pub async fn seed_user(db: &SqliteDatabase, email: &str) -> User {
    db.create_user(NewUser {
        name: "Test Shopper".to_string(),
        email: email.to_string(),
        password_hash: "unused-in-these-tests".to_string(),
        role: Role::Customer,
    })
    .await
    .expect("Error creating test user")
}

pub async fn seed_product(db: &SqliteDatabase, id: &str, price: i64) {
    db.upsert_product(&Product {
        id: id.to_string(),
        name: format!("Product {id}"),
        price: Money::from(price),
        image_url: Some(format!("https://cdn.example.com/{id}.jpg")),
    })
    .await
    .expect("Error seeding product");
}

pub fn test_customer() -> Customer {
    Customer {
        name: "Jane Shopper".to_string(),
        email: "jane@example.com".to_string(),
        phone: Some("+911234567890".to_string()),
    }
}
