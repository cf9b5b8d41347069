//! Seller transport error types.

/// Errors from asking a seller for its catalog.
///
/// None of these abort an aggregation: a seller that fails is treated the
/// same as one that never answered.
#[derive(Debug, thiserror::Error)]
pub enum MarketError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Reply body could not be decoded
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// Seller returned an error status code
    #[error("seller error {status}: {message}")]
    Status { status: u16, message: String },

    /// Reply belongs to another conversation
    #[error("unexpected conversation id {0:?}")]
    WrongConversation(String),

    /// Seller answered with something other than an agreement
    #[error("seller {seller} answered {performative}")]
    NotAgreed {
        seller: String,
        performative: super::Performative,
    },

    /// Seller endpoint could not be configured
    #[error("invalid seller configuration: {0}")]
    Config(String),
}
