//! # Error Types Module
//!
//! This module defines the error types used throughout the storefront bot.
//! Validation errors are recovered locally by re-prompting the user, lookup
//! failures are surfaced as user-visible messages, transport failures are
//! logged, and configuration failures stop the process before it starts.

use thiserror::Error;

/// Rejected user input during checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Phone number did not match "optional leading plus, 10-15 digits"
    #[error("invalid phone number")]
    Phone,
    /// Shipping address was blank or shorter than the minimum length
    #[error("invalid shipping address")]
    Address,
}

/// Failure reported by the messaging gateway
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The Telegram Bot API request failed
    #[error("telegram request failed: {0}")]
    Request(#[from] teloxide::RequestError),
}

/// Top-level error type for bot operations
#[derive(Debug, Error)]
pub enum BotError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("transport error: {0}")]
    Transport(#[from] GatewayError),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type BotResult<T> = Result<T, BotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_formatting() {
        let err = BotError::NotFound("product p9".to_string());
        assert_eq!(err.to_string(), "not found: product p9");

        let err = BotError::from(ValidationError::Phone);
        assert_eq!(err.to_string(), "validation error: invalid phone number");

        let io = std::io::Error::other("connection reset");
        let err = BotError::from(GatewayError::from(teloxide::RequestError::from(
            std::sync::Arc::new(io),
        )));
        assert_eq!(
            err.to_string(),
            "transport error: telegram request failed: An I/O error: connection reset"
        );
    }
}
