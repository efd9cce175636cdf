use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use divinekart_engine::{
    traits::{AuthApiError, GatewayError, OrderApiError},
    OrderFlowError,
};
use log::error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Payload deserialization error")]
    CouldNotDeserializePayload,
    #[error("{0}")]
    ValidationError(String),
    #[error("Invalid payment signature")]
    SignatureMismatch,
    #[error("Online payments are not configured on this server")]
    PaymentsNotConfigured,
    #[error("The payment gateway could not be reached. {0}")]
    GatewayUnavailable(String),
    #[error("The payment gateway rejected the transaction. {0}")]
    GatewayRejected(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("Authentication Error. {0}")]
    AuthenticationError(#[from] AuthError),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("Insufficient Permissions. {0}")]
    InsufficientPermissions(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::CouldNotDeserializePayload => StatusCode::BAD_REQUEST,
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::SignatureMismatch => StatusCode::BAD_REQUEST,
            Self::PaymentsNotConfigured => StatusCode::BAD_REQUEST,
            Self::GatewayUnavailable(_) => StatusCode::BAD_GATEWAY,
            Self::GatewayRejected(_) => StatusCode::BAD_GATEWAY,
            Self::AuthenticationError(e) => match e {
                AuthError::MissingToken => StatusCode::UNAUTHORIZED,
                AuthError::ValidationError(_) => StatusCode::UNAUTHORIZED,
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            },
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::InsufficientPermissions(_) => StatusCode::FORBIDDEN,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "success": false, "message": self.to_string() }).to_string())
    }
}

#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("No access token provided.")]
    MissingToken,
    #[error("Access token is invalid. {0}")]
    ValidationError(String),
    #[error("Invalid email or password")]
    InvalidCredentials,
}

impl From<OrderFlowError> for ServerError {
    fn from(e: OrderFlowError) -> Self {
        match e {
            OrderFlowError::EmptyOrder
            | OrderFlowError::InvalidQuantity { .. }
            | OrderFlowError::UnknownProduct
            | OrderFlowError::InvalidShipping => Self::ValidationError(e.to_string()),
            OrderFlowError::GatewayError(GatewayError::NotConfigured) => Self::PaymentsNotConfigured,
            OrderFlowError::GatewayError(GatewayError::Unavailable(msg)) => {
                // An order with no way to pay for it must never be created silently
                error!("💻️ Payment gateway unavailable during checkout: {msg}");
                Self::GatewayUnavailable(msg)
            },
            OrderFlowError::GatewayError(GatewayError::Rejected(msg)) => {
                error!("💻️ Payment gateway rejected a checkout transaction: {msg}");
                Self::GatewayRejected(msg)
            },
            OrderFlowError::DatabaseError(msg) => Self::BackendError(msg),
        }
    }
}

impl From<AuthApiError> for ServerError {
    fn from(e: AuthApiError) -> Self {
        match e {
            AuthApiError::ValidationError(msg) => Self::ValidationError(msg),
            AuthApiError::EmailTaken => Self::ValidationError(e.to_string()),
            AuthApiError::InvalidCredentials => Self::AuthenticationError(AuthError::InvalidCredentials),
            AuthApiError::UserNotFound => Self::NoRecordFound(e.to_string()),
            AuthApiError::DatabaseError(msg) => Self::BackendError(msg),
            AuthApiError::PasswordHashError(msg) => Self::BackendError(msg),
        }
    }
}

impl From<OrderApiError> for ServerError {
    fn from(e: OrderApiError) -> Self {
        match e {
            OrderApiError::ModificationNoOp => Self::ValidationError(e.to_string()),
            OrderApiError::OrderAlreadyExists(_) => Self::ValidationError(e.to_string()),
            OrderApiError::DatabaseError(msg) => Self::BackendError(msg),
            OrderApiError::EncodingError(msg) => Self::BackendError(msg),
        }
    }
}
