use thiserror::Error;

#[derive(Debug, Error)]
pub enum RazorpayApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Invalid REST response: {0}")]
    RestResponseError(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("Query failed. Error {status}. {message}")]
    QueryError { status: u16, message: String },
}

impl RazorpayApiError {
    /// Gateway-side rejections (4xx) are distinguished from availability problems so that checkout can report them
    /// differently.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::QueryError { status, .. } if (400..500).contains(status))
    }
}
