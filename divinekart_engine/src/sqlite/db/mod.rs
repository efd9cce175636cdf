//! # SQLite database methods
//!
//! This module contains "low-level" SQLite database interactions.
//!
//! All these interactions are maintained by simple functions (rather than stateful structs) that accept a
//! `&mut SqliteConnection` argument. Callers can obtain a connection from a pool, or create an atomic transaction
//! as the need arises and call through to the functions without any other changes.
use std::str::FromStr;

use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    Error as SqlxError, SqlitePool,
};

pub mod orders;
pub mod products;
pub mod users;

pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, SqlxError> {
    let opts = SqliteConnectOptions::from_str(url)?.journal_mode(SqliteJournalMode::Delete);
    let pool = SqlitePoolOptions::new().max_connections(max_connections).connect_with(opts).await?;
    Ok(pool)
}
