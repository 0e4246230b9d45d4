//! Shopping cart module.
//!
//! Contains the line item type, the cart store, its durable-storage port,
//! and the checkout selection.

mod item;
mod selection;
mod storage;
mod store;

pub use item::CartLineItem;
pub use selection::CheckoutSelection;
pub use storage::{MemoryStorage, StorageError, StoragePort};
pub use store::{CartStore, CART_STORAGE_KEY};
