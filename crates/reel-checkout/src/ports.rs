//! Ports to the remote collaborators: the cart resource, the payment
//! resource, and the external payment provider.
//!
//! Each port is a trait object so hosts can plug in a real HTTP client and
//! tests can inject fakes. The provider's loosely-typed callback payload is
//! translated into the closed [`ProviderOutcome`] variant at this boundary
//! and never leaks further in.

use crate::checkout::PaymentConfirmation;
use async_trait::async_trait;
use reel_commerce::cart::CartLineItem;
use reel_commerce::error::CommerceError;
use reel_commerce::ids::{EntryId, PaymentRef, ProductRef};
use reel_commerce::money::{Currency, Money};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Bearer credential for the marketplace API.
///
/// Obtained at login; absence or expiry surfaces as [`ApiError::Unauthorized`]
/// and requires a re-login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap a raw bearer token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Get the token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Errors surfaced by the remote cart and payment resources.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Credential missing, invalid, or expired.
    #[error("unauthorized: credential missing or expired")]
    Unauthorized,

    /// Server answered with a non-success status.
    #[error("HTTP error: status {0}")]
    Http(u16),

    /// Request never completed.
    #[error("network error: {0}")]
    Network(String),

    /// Response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),
}

/// One record from the remote cart resource.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemoteCartRecord {
    /// Server-assigned entry id.
    pub id: String,
    /// The purchasable video-CV access grant.
    pub product_ref: String,
    /// Display title.
    pub title: String,
    /// Thumbnail URL, if any.
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    /// Uploader label, if any.
    #[serde(default)]
    pub uploader_label: Option<String>,
    /// Short description, if any.
    #[serde(default)]
    pub description: Option<String>,
    /// Unit price in minor currency units.
    pub unit_price_minor: i64,
    /// ISO currency code.
    pub currency: String,
}

impl RemoteCartRecord {
    /// Convert into a local cart line item.
    pub fn into_line_item(self) -> Result<CartLineItem, CommerceError> {
        let currency = Currency::from_code(&self.currency)
            .ok_or_else(|| CommerceError::UnknownCurrency(self.currency.clone()))?;
        let mut item = CartLineItem::new(
            EntryId::new(self.id),
            ProductRef::new(self.product_ref),
            self.title,
            Money::new(self.unit_price_minor, currency),
        )?;
        item.thumbnail_url = self.thumbnail_url;
        item.uploader_label = self.uploader_label;
        item.description = self.description;
        Ok(item)
    }
}

/// The remote "my cart" resource.
#[async_trait]
pub trait CartApi: Send + Sync {
    /// Fetch the authenticated user's cart records.
    async fn fetch_cart(&self, token: &AccessToken) -> Result<Vec<RemoteCartRecord>, ApiError>;

    /// Remove one entry from the remote cart.
    async fn remove_entry(&self, token: &AccessToken, id: &EntryId) -> Result<(), ApiError>;
}

/// The remote payment-confirmation resource.
#[async_trait]
pub trait PaymentApi: Send + Sync {
    /// Record a completed payment. A non-success response is an error.
    async fn confirm(
        &self,
        token: &AccessToken,
        confirmation: &PaymentConfirmation,
    ) -> Result<(), ApiError>;
}

/// What the payment provider is invoked with.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChargeRequest {
    /// Amount in minor currency units.
    pub amount_minor: i64,
    /// Charge currency.
    pub currency: Currency,
    /// Payer email.
    pub email: String,
    /// Payer name, best-effort. The provider accepts an empty string.
    pub name: String,
    /// Payer phone, best-effort. The provider accepts an empty string.
    pub phone: String,
}

/// Terminal status reported by the provider's completion callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderStatus {
    /// Payment went through.
    Success,
    /// Payment was declined or errored.
    Failed,
    /// Any other status string the provider may emit.
    Other(String),
}

impl ProviderStatus {
    /// Translate the provider's raw status string.
    pub fn from_provider(raw: &str) -> Self {
        match raw {
            "success" => ProviderStatus::Success,
            "failed" => ProviderStatus::Failed,
            other => ProviderStatus::Other(other.to_string()),
        }
    }

    /// Status code recorded with the payment confirmation.
    pub fn code(&self) -> char {
        match self {
            ProviderStatus::Success => 's',
            ProviderStatus::Failed => 'f',
            ProviderStatus::Other(_) => 'a',
        }
    }
}

/// Outcome of one provider handoff.
///
/// The provider either calls back with a reference and a status, or the
/// user closes the dialog without a terminal callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderOutcome {
    /// The provider ran to completion and reported a result.
    Completed {
        /// Provider reference identifying this attempt.
        reference: PaymentRef,
        /// Reported status.
        status: ProviderStatus,
    },
    /// The dialog was closed before completing.
    Dismissed,
}

/// The external payment provider.
///
/// The handoff suspends until the user completes or cancels the provider's
/// dialog; its duration is user-controlled and unbounded.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Hand the charge off to the provider and wait for its outcome.
    async fn collect(&self, request: &ChargeRequest) -> ProviderOutcome;
}
