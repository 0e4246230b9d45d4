//! Payment confirmation payload posted to the remote payment resource.

use crate::checkout::PaymentAttempt;
use reel_commerce::cart::CartLineItem;
use reel_commerce::ids::{PaymentRef, UserId};
use serde::{Deserialize, Serialize};

/// One purchased entry, as recorded with the payment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PurchaseDetail {
    /// Cart entry id.
    pub entry_id: String,
    /// The purchased video-CV access grant.
    pub product_ref: String,
    /// Title at purchase time.
    pub title: String,
    /// Unit price in minor units at purchase time.
    pub unit_price_minor: i64,
    /// Quantity purchased.
    pub quantity: i64,
}

impl From<&CartLineItem> for PurchaseDetail {
    fn from(item: &CartLineItem) -> Self {
        Self {
            entry_id: item.id.as_str().to_string(),
            product_ref: item.product_ref.as_str().to_string(),
            title: item.title.clone(),
            unit_price_minor: item.unit_price.amount_minor,
            quantity: item.quantity,
        }
    }
}

/// The record posted to the payment resource after the provider reports a
/// terminal result.
///
/// Purchase details are derived strictly from the attempt's frozen snapshot
/// at the moment of confirmation, never re-read from the live cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentConfirmation {
    /// The buying account.
    pub user_id: String,
    /// ISO currency code of the charge.
    pub currency: String,
    /// Charged total in minor units.
    pub total_minor: i64,
    /// Per-item purchase details.
    pub purchases: Vec<PurchaseDetail>,
    /// Provider reference for this attempt.
    pub reference: String,
    /// Status code: 's' success, 'f' failed, 'a' anything else.
    pub status: char,
    /// Payment-type tag (e.g. "cart").
    pub payment_kind: String,
}

impl PaymentConfirmation {
    /// Build the confirmation from a frozen attempt.
    pub fn from_attempt(
        attempt: &PaymentAttempt,
        user_id: &UserId,
        reference: &PaymentRef,
        status: char,
        payment_kind: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.as_str().to_string(),
            currency: attempt.total().currency.code().to_string(),
            total_minor: attempt.total().amount_minor,
            purchases: attempt.purchases().iter().map(PurchaseDetail::from).collect(),
            reference: reference.as_str().to_string(),
            status,
            payment_kind: payment_kind.into(),
        }
    }
}
