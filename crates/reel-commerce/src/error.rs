//! Commerce error types.

use thiserror::Error;

/// Errors that can occur in cart and pricing operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Cart entry references no purchasable item.
    #[error("Cart entry has an empty product reference")]
    EmptyProductRef,

    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Unrecognized currency code.
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,
}
