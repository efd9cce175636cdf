use thiserror::Error;

use crate::db_types::{NewUser, User};

/// Identity storage for registration and login.
#[allow(async_fn_in_trait)]
pub trait UserManagement {
    /// Create a user. Email uniqueness is enforced by the store; a duplicate email yields
    /// [`AuthApiError::EmailTaken`].
    async fn create_user(&self, user: NewUser) -> Result<User, AuthApiError>;

    async fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>, AuthApiError>;

    async fn fetch_user_by_id(&self, id: i64) -> Result<Option<User>, AuthApiError>;
}

#[derive(Debug, Clone, Error)]
pub enum AuthApiError {
    #[error("Internal database error: {0}")]
    DatabaseError(String),
    #[error("{0}")]
    ValidationError(String),
    #[error("Email already registered")]
    EmailTaken,
    /// Deliberately indistinguishable for unknown email and wrong password.
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("User account not found")]
    UserNotFound,
    #[error("Could not hash password: {0}")]
    PasswordHashError(String),
}

impl From<sqlx::Error> for AuthApiError {
    fn from(e: sqlx::Error) -> Self {
        AuthApiError::DatabaseError(e.to_string())
    }
}
