//! DivineKart storefront engine
//!
//! This library contains the core logic for the storefront backend: order placement with server-authoritative
//! pricing, payment-gateway transaction initiation, signed payment confirmation, webhook reconciliation, and user
//! registration/login. It is provider-agnostic.
//!
//! The library is divided into two main sections:
//! 1. Database management and control ([`mod@sqlite`]). SQLite is the supported backend. You should never need to
//!    access the database directly. Instead, use the public APIs, which are generic over the behaviour traits in
//!    [`mod@traits`]. The exception is the data types used in the database, defined in [`mod@db_types`], which are
//!    public.
//! 2. The engine public APIs ([`mod@api`]): the order flow (checkout, reconciliation), order queries and
//!    administrative updates, and registration/login. The payment gateway itself is behind the
//!    [`traits::PaymentGateway`] trait so that server code and tests decide the concrete client.

pub mod db_types;
pub mod helpers;
pub mod order_objects;
pub mod traits;

mod api;
#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;

pub use api::{
    account_api::AccountApi,
    auth_api::{AuthApi, LoginRequest, RegisterRequest},
    errors::OrderFlowError,
    order_flow_api::{OrderFlowApi, TAX_RATE_PERCENT},
};
