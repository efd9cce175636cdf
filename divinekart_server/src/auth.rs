//! Access-token issuance and verification.
//!
//! Tokens are HS256 JWTs carrying the user id, email and role. They are issued on registration and login, and are
//! presented back in the `Authorization: Bearer` header. The [`crate::middleware::JwtAuthMiddlewareFactory`]
//! validates the token and stashes the claims in the request extensions, from where the [`JwtClaims`] extractor
//! hands them to route handlers.

use std::future::{ready, Ready};

use actix_web::{dev::Payload, FromRequest, HttpMessage, HttpRequest};
use chrono::{Duration, Utc};
use divinekart_engine::db_types::{Role, User};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::{
    config::AuthConfig,
    errors::{AuthError, ServerError},
};

pub const TOKEN_EXPIRY_HOURS: i64 = 48;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// The user's storage id.
    pub sub: i64,
    pub email: String,
    pub role: Role,
    pub exp: i64,
}

impl JwtClaims {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl FromRequest for JwtClaims {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let claims = req
            .extensions()
            .get::<JwtClaims>()
            .cloned()
            .ok_or(ServerError::AuthenticationError(AuthError::MissingToken));
        ready(claims)
    }
}

pub struct TokenIssuer {
    key: EncodingKey,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        Self { key: EncodingKey::from_secret(config.jwt_secret.reveal().as_bytes()) }
    }

    /// Issue a new access token for the given user.
    pub fn issue_token(&self, user: &User) -> Result<String, ServerError> {
        let claims = JwtClaims {
            sub: user.id,
            email: user.email.clone(),
            role: user.role,
            exp: (Utc::now() + Duration::hours(TOKEN_EXPIRY_HOURS)).timestamp(),
        };
        encode(&Header::default(), &claims, &self.key)
            .map_err(|e| ServerError::Unspecified(format!("Could not serialize access token. {e}")))
    }
}

#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
}

impl TokenVerifier {
    pub fn new(config: &AuthConfig) -> Self {
        Self { key: DecodingKey::from_secret(config.jwt_secret.reveal().as_bytes()) }
    }

    pub fn decode(&self, token: &str) -> Result<JwtClaims, AuthError> {
        let data = decode::<JwtClaims>(token, &self.key, &Validation::default())
            .map_err(|e| AuthError::ValidationError(e.to_string()))?;
        Ok(data.claims)
    }
}

/// Extract the bearer token from an `Authorization` header value.
pub fn extract_bearer_token(header: &str) -> Option<&str> {
    header.strip_prefix("Bearer ").map(str::trim).filter(|t| !t.is_empty())
}
