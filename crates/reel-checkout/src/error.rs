//! Synchronization and checkout error types.
//!
//! Every variant here is user-visible: the hosting view renders these as
//! notifications and leaves local state in its last-known-good form. None
//! of them propagate as panics.

use crate::ports::ApiError;
use reel_commerce::error::CommerceError;
use reel_commerce::ids::PaymentRef;
use thiserror::Error;

/// Errors from reconciling the local cart against the remote resource.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The remote cart could not be fetched. The local cart is left
    /// untouched.
    #[error("failed to load cart: {0}")]
    Fetch(#[source] ApiError),

    /// A remote record could not be mapped to a cart entry.
    #[error("failed to read cart record: {0}")]
    BadRecord(#[source] CommerceError),

    /// A remote cart entry could not be removed.
    #[error("failed to remove cart item: {0}")]
    Remove(#[source] ApiError),
}

/// Errors from the checkout flow.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// No session credential; checkout is refused before any side effect.
    #[error("sign in to check out")]
    NotAuthenticated,

    /// Nothing selected; checkout is refused before any side effect.
    #[error("select at least one item to check out")]
    EmptySelection,

    /// The selection could not be priced.
    #[error("could not price the selection: {0}")]
    Amount(#[from] CommerceError),

    /// The provider reported the payment as not completed. No money moved,
    /// no record was created, and the cart is untouched.
    #[error("payment was not completed")]
    PaymentFailed,

    /// The provider dialog was closed before completing. Distinguished from
    /// [`CheckoutError::PaymentFailed`] for messaging only.
    #[error("payment window was closed before the payment completed")]
    PaymentAbandoned,

    /// The provider reported success but the server confirmation failed:
    /// money likely moved and no record exists. Must be surfaced as
    /// "success but needs follow-up", never as a plain failure.
    #[error("payment {reference} succeeded but could not be recorded; contact support")]
    PaidButUnrecorded {
        /// Provider reference for the support follow-up.
        reference: PaymentRef,
    },
}
