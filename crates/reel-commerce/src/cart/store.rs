//! Cart store: single source of truth for cart contents in a session.

use crate::cart::{CartLineItem, StorageError, StoragePort};
use crate::error::CommerceError;
use crate::ids::EntryId;
use tracing::{debug, warn};

/// Storage key the cart snapshot is persisted under.
pub const CART_STORAGE_KEY: &str = "reelcart.cart";

/// Holds the authoritative list of cart entries for the current session.
///
/// All mutation goes through the store's own operations; collaborators
/// (the synchronizer, the checkout flow) read `items()` and issue commands,
/// they never touch the sequence directly. Mutations always succeed in
/// memory; persistence through the storage port is best-effort, since the
/// remote cart resource is the real authority.
pub struct CartStore {
    items: Vec<CartLineItem>,
    storage: Box<dyn StoragePort>,
}

impl CartStore {
    /// Create a store, hydrating from the storage port.
    ///
    /// A missing or unreadable snapshot yields an empty cart; it is never
    /// an error.
    pub fn new(storage: Box<dyn StoragePort>) -> Self {
        let items = match Self::hydrate(storage.as_ref()) {
            Ok(items) => items,
            Err(err) => {
                warn!(error = %err, "failed to hydrate cart from storage, starting empty");
                Vec::new()
            }
        };
        Self { items, storage }
    }

    fn hydrate(storage: &dyn StoragePort) -> Result<Vec<CartLineItem>, StorageError> {
        match storage.get(CART_STORAGE_KEY)? {
            Some(snapshot) => Ok(serde_json::from_str(&snapshot)?),
            None => Ok(Vec::new()),
        }
    }

    /// Current cart entries, in insertion order.
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get an entry by id.
    pub fn get_item(&self, id: &EntryId) -> Option<&CartLineItem> {
        self.items.iter().find(|i| &i.id == id)
    }

    /// Append an entry to the cart.
    ///
    /// The only validation is that the entry references a purchasable item.
    pub fn add_item(&mut self, item: CartLineItem) -> Result<(), CommerceError> {
        if item.product_ref.as_str().is_empty() {
            return Err(CommerceError::EmptyProductRef);
        }
        self.items.push(item);
        self.persist();
        Ok(())
    }

    /// Remove the entry with the given id.
    ///
    /// Removing an id that is not present is a no-op, not an error.
    pub fn remove_item(&mut self, id: &EntryId) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| &i.id != id);
        let removed = self.items.len() < len_before;
        if removed {
            self.persist();
        }
        removed
    }

    /// Replace the entire sequence (the synchronizer's entry point after a
    /// remote fetch).
    pub fn set_all(&mut self, items: Vec<CartLineItem>) {
        self.items = items;
        self.persist();
    }

    /// Empty the cart and delete the storage key entirely, so no stale
    /// snapshot is left behind.
    pub fn clear(&mut self) {
        self.items.clear();
        if let Err(err) = self.storage.remove(CART_STORAGE_KEY) {
            warn!(error = %err, "failed to remove cart snapshot from storage");
        }
    }

    fn persist(&self) {
        let snapshot = match serde_json::to_string(&self.items) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(error = %err, "failed to serialize cart snapshot");
                return;
            }
        };
        if let Err(err) = self.storage.set(CART_STORAGE_KEY, &snapshot) {
            warn!(error = %err, "failed to persist cart snapshot");
            return;
        }
        debug!(entries = self.items.len(), "persisted cart snapshot");
    }
}
