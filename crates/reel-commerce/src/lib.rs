//! Cart domain types and logic for the ReelCart video-CV marketplace.
//!
//! This crate provides the session-local half of the purchase pipeline:
//!
//! - **Money**: minor-unit amounts with checked arithmetic
//! - **Cart**: line items, the cart store, durable-storage port
//! - **Selection**: the set of entries chosen for a checkout attempt
//!
//! # Example
//!
//! ```rust
//! use reel_commerce::prelude::*;
//!
//! let mut store = CartStore::new(Box::new(MemoryStorage::default()));
//! let item = CartLineItem::new(
//!     EntryId::new("entry-1"),
//!     ProductRef::new("vcv-42"),
//!     "Backend engineer reel",
//!     Money::new(150_000, Currency::NGN),
//! ).unwrap();
//! store.add_item(item).unwrap();
//!
//! let mut selection = CheckoutSelection::default();
//! selection.select_all(store.items());
//! let total = selection.total(store.items(), Currency::NGN).unwrap();
//! assert_eq!(total.amount_minor, 150_000);
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    pub use crate::cart::{
        CartLineItem, CartStore, CheckoutSelection, MemoryStorage, StorageError, StoragePort,
        CART_STORAGE_KEY,
    };
}
