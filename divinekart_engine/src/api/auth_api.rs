use std::fmt::Debug;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use log::*;
use serde::{Deserialize, Serialize};

use crate::{
    db_types::{NewUser, Role, User},
    traits::{AuthApiError, UserManagement},
};

const PASSWORD_SPECIAL_CHARS: &str = "@$!%*?&";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Registration and login over a [`UserManagement`] store. Token issuance is the server's concern; this API only
/// owns credential validation and hashing.
pub struct AuthApi<B> {
    db: B,
}

impl<B> Debug for AuthApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AuthApi")
    }
}

impl<B> AuthApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> AuthApi<B>
where B: UserManagement
{
    /// Create a new customer account. The email is normalised to lowercase; uniqueness is enforced by the store's
    /// unique index, so a concurrent duplicate registration loses cleanly with [`AuthApiError::EmailTaken`].
    pub async fn register(&self, req: RegisterRequest) -> Result<User, AuthApiError> {
        let name = req.name.trim().to_string();
        let email = req.email.trim().to_lowercase();
        validate_name(&name)?;
        validate_email(&email)?;
        validate_password(&req.password)?;
        let password_hash = hash_password(&req.password)?;
        let user = self.db.create_user(NewUser { name, email, password_hash, role: Role::Customer }).await?;
        info!("👤️ Registered user #{} ({})", user.id, user.email);
        Ok(user)
    }

    /// Authenticate a user by email and password. Unknown email and wrong password produce the same error, so the
    /// response does not reveal which accounts exist.
    pub async fn login(&self, req: LoginRequest) -> Result<User, AuthApiError> {
        let email = req.email.trim().to_lowercase();
        if email.is_empty() || req.password.is_empty() {
            return Err(AuthApiError::ValidationError("Email and password are required".to_string()));
        }
        let user = self.db.fetch_user_by_email(&email).await?.ok_or(AuthApiError::InvalidCredentials)?;
        if !verify_password(&req.password, &user.password_hash) {
            debug!("👤️ Failed login attempt for {email}");
            return Err(AuthApiError::InvalidCredentials);
        }
        debug!("👤️ User #{} logged in", user.id);
        Ok(user)
    }

    pub async fn fetch_user(&self, id: i64) -> Result<User, AuthApiError> {
        self.db.fetch_user_by_id(id).await?.ok_or(AuthApiError::UserNotFound)
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}

fn validate_name(name: &str) -> Result<(), AuthApiError> {
    if name.is_empty() || name.chars().count() > 100 {
        return Err(AuthApiError::ValidationError("Name must be between 1 and 100 characters".to_string()));
    }
    let valid = name.chars().all(|c| c.is_alphanumeric() || matches!(c, ' ' | '.' | '\'' | '-'));
    if !valid {
        return Err(AuthApiError::ValidationError("Name contains invalid characters".to_string()));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), AuthApiError> {
    let err = || AuthApiError::ValidationError("Invalid email format".to_string());
    if email.is_empty() || email.chars().any(char::is_whitespace) {
        return Err(err());
    }
    let (local, domain) = email.split_once('@').ok_or_else(err)?;
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(err());
    }
    let valid_domain = domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.');
    if !valid_domain {
        return Err(err());
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), AuthApiError> {
    let long_enough = password.chars().count() >= 8;
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| PASSWORD_SPECIAL_CHARS.contains(c));
    if long_enough && has_lower && has_upper && has_digit && has_special {
        Ok(())
    } else {
        Err(AuthApiError::ValidationError(
            "Password must be at least 8 characters long and contain at least one uppercase letter, one lowercase \
             letter, one number, and one special character (@$!%*?&)"
                .to_string(),
        ))
    }
}

pub fn hash_password(password: &str) -> Result<String, AuthApiError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthApiError::PasswordHashError(e.to_string()))?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed) => Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok(),
        Err(e) => {
            error!("👤️ Stored password hash could not be parsed: {e}");
            false
        },
    }
}
