//! Checkout selection: the subset of cart entries chosen for purchase.

use crate::cart::CartLineItem;
use crate::error::CommerceError;
use crate::ids::EntryId;
use crate::money::{Currency, Money};
use std::collections::HashSet;

/// The set of entry ids chosen for the current checkout attempt.
///
/// The selection only ever refers to entries that exist in the live cart;
/// `prune` drops ids for entries that were removed (locally or by a remote
/// reconciliation) and must run before totals are computed. Totals are
/// always recomputed from the live items, never cached.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutSelection {
    selected: HashSet<EntryId>,
}

impl CheckoutSelection {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether an entry is selected.
    pub fn is_selected(&self, id: &EntryId) -> bool {
        self.selected.contains(id)
    }

    /// Number of selected entries.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Check if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Add an entry to the selection.
    pub fn insert(&mut self, id: EntryId) {
        self.selected.insert(id);
    }

    /// Remove an entry from the selection.
    pub fn remove(&mut self, id: &EntryId) {
        self.selected.remove(id);
    }

    /// Flip an entry's selection. Returns whether it is now selected.
    pub fn toggle(&mut self, id: EntryId) -> bool {
        if self.selected.remove(&id) {
            false
        } else {
            self.selected.insert(id);
            true
        }
    }

    /// Select exactly the ids of the given items.
    pub fn select_all(&mut self, items: &[CartLineItem]) {
        self.selected = items.iter().map(|i| i.id.clone()).collect();
    }

    /// Deselect everything.
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Whether every live item is selected.
    ///
    /// This drives the select-all checkbox: its state is derived from
    /// reality, never toggled independently. An empty cart is never
    /// "all selected".
    pub fn is_all_selected(&self, items: &[CartLineItem]) -> bool {
        !items.is_empty() && items.iter().all(|i| self.selected.contains(&i.id))
    }

    /// Drop selected ids that no longer exist in the live items.
    pub fn prune(&mut self, items: &[CartLineItem]) {
        let live: HashSet<&EntryId> = items.iter().map(|i| &i.id).collect();
        self.selected.retain(|id| live.contains(id));
    }

    /// The selected entries, in cart order.
    pub fn selected_items(&self, items: &[CartLineItem]) -> Vec<CartLineItem> {
        items
            .iter()
            .filter(|i| self.selected.contains(&i.id))
            .cloned()
            .collect()
    }

    /// Fresh total over the selected entries.
    ///
    /// Entries in the selection that are not in `items` contribute nothing;
    /// the sum is recomputed from the live items on every call.
    pub fn total(&self, items: &[CartLineItem], currency: Currency) -> Result<Money, CommerceError> {
        let mut total = Money::zero(currency);
        for item in items.iter().filter(|i| self.selected.contains(&i.id)) {
            total = total.try_add(&item.line_total()?)?;
        }
        Ok(total)
    }
}
