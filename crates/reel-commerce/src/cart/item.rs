//! Cart line item type.

use crate::error::CommerceError;
use crate::ids::{EntryId, ProductRef};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// One entry in the cart: access to a single video CV.
///
/// Display metadata (`title`, `thumbnail_url`, `uploader_label`,
/// `description`) is denormalized for rendering and is not authoritative
/// for pricing. `unit_price` is authoritative at the time the entry was
/// added and may be stale relative to the server price; it is reconciled
/// at checkout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLineItem {
    /// Cart entry identifier. Server-assigned once synchronized;
    /// client-generated transiently before that.
    pub id: EntryId,
    /// The purchasable video-CV access grant.
    pub product_ref: ProductRef,
    /// Title shown in the cart.
    pub title: String,
    /// Thumbnail URL, if any.
    pub thumbnail_url: Option<String>,
    /// Label of the candidate who uploaded the reel.
    pub uploader_label: Option<String>,
    /// Short description.
    pub description: Option<String>,
    /// Price per unit at add time.
    pub unit_price: Money,
    /// Quantity, always >= 1. Observed flows only ever use 1.
    pub quantity: i64,
}

impl CartLineItem {
    /// Create a new line item with quantity 1.
    ///
    /// Returns an error if the product reference is empty.
    pub fn new(
        id: EntryId,
        product_ref: ProductRef,
        title: impl Into<String>,
        unit_price: Money,
    ) -> Result<Self, CommerceError> {
        if product_ref.as_str().is_empty() {
            return Err(CommerceError::EmptyProductRef);
        }
        Ok(Self {
            id,
            product_ref,
            title: title.into(),
            thumbnail_url: None,
            uploader_label: None,
            description: None,
            unit_price,
            quantity: 1,
        })
    }

    /// Set the quantity. Must be >= 1.
    pub fn with_quantity(mut self, quantity: i64) -> Result<Self, CommerceError> {
        if quantity < 1 {
            return Err(CommerceError::InvalidQuantity(quantity));
        }
        self.quantity = quantity;
        Ok(self)
    }

    /// Set the thumbnail URL.
    pub fn with_thumbnail(mut self, url: impl Into<String>) -> Self {
        self.thumbnail_url = Some(url.into());
        self
    }

    /// Set the uploader label.
    pub fn with_uploader(mut self, label: impl Into<String>) -> Self {
        self.uploader_label = Some(label.into());
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Total price for this entry (unit price times quantity).
    pub fn line_total(&self) -> Result<Money, CommerceError> {
        self.unit_price.try_multiply(self.quantity)
    }
}
