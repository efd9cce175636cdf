use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewUser, User},
    traits::AuthApiError,
};

/// Inserts a new user. The unique index on `email` is the arbiter of duplicate registrations, so two concurrent
/// registrations for the same address cannot both succeed.
pub async fn insert_user(user: NewUser, conn: &mut SqliteConnection) -> Result<User, AuthApiError> {
    let inserted: User = sqlx::query_as(
        r#"
            INSERT INTO users (name, email, password_hash, role) VALUES ($1, $2, $3, $4)
            RETURNING *;
        "#,
    )
    .bind(user.name)
    .bind(user.email)
    .bind(user.password_hash)
    .bind(user.role)
    .fetch_one(conn)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(de) if de.is_unique_violation() => AuthApiError::EmailTaken,
        _ => AuthApiError::from(e),
    })?;
    debug!("📝️ User #{} created", inserted.id);
    Ok(inserted)
}

pub async fn fetch_user_by_email(email: &str, conn: &mut SqliteConnection) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as("SELECT * FROM users WHERE email = $1").bind(email).fetch_optional(conn).await?;
    Ok(user)
}

pub async fn fetch_user_by_id(id: i64, conn: &mut SqliteConnection) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as("SELECT * FROM users WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(user)
}
