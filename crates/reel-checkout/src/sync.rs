//! Cart synchronizer: keeps the local store consistent with the remote
//! cart resource.

use crate::error::SyncError;
use crate::ports::{AccessToken, CartApi};
use reel_commerce::cart::{CartLineItem, CartStore, CheckoutSelection};
use reel_commerce::ids::{EntryId, ProductRef};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// Reconciles the local [`CartStore`] against the remote cart resource.
///
/// Runs once when the owning view attaches, and again after any successful
/// removal or checkout, pulling the authoritative post-mutation state.
/// There is no automatic retry; a manual re-trigger (refresh, navigation)
/// is the recovery path.
pub struct CartSynchronizer {
    api: Arc<dyn CartApi>,
}

impl CartSynchronizer {
    /// Create a synchronizer over the given cart resource.
    pub fn new(api: Arc<dyn CartApi>) -> Self {
        Self { api }
    }

    /// Lifecycle hook: called once by the hosting view when it attaches.
    pub async fn on_attach(
        &self,
        token: &AccessToken,
        store: &mut CartStore,
    ) -> Result<usize, SyncError> {
        self.fetch_and_reconcile(token, store).await
    }

    /// Fetch the remote cart and replace the local store's contents.
    ///
    /// Remote records are de-duplicated by product reference, keeping the
    /// first occurrence. On any failure the local cart is left untouched;
    /// a failed fetch never clears it. Returns the reconciled entry count.
    pub async fn fetch_and_reconcile(
        &self,
        token: &AccessToken,
        store: &mut CartStore,
    ) -> Result<usize, SyncError> {
        let records = self
            .api
            .fetch_cart(token)
            .await
            .map_err(SyncError::Fetch)?;
        let fetched = records.len();

        let mut seen: HashSet<ProductRef> = HashSet::new();
        let mut items: Vec<CartLineItem> = Vec::with_capacity(records.len());
        for record in records {
            let item = record.into_line_item().map_err(SyncError::BadRecord)?;
            if seen.insert(item.product_ref.clone()) {
                items.push(item);
            } else {
                warn!(product_ref = %item.product_ref, "dropping duplicate cart record");
            }
        }

        let count = items.len();
        store.set_all(items);
        debug!(fetched = fetched, reconciled = count, "reconciled cart with remote");
        Ok(count)
    }

    /// Remove one entry remotely, then pull the authoritative state.
    ///
    /// This is the cart view's removal path: the local store is only
    /// updated through the reconciliation that follows a successful remote
    /// delete.
    pub async fn remove_and_reconcile(
        &self,
        token: &AccessToken,
        store: &mut CartStore,
        id: &EntryId,
    ) -> Result<usize, SyncError> {
        self.api
            .remove_entry(token, id)
            .await
            .map_err(SyncError::Remove)?;
        self.fetch_and_reconcile(token, store).await
    }

    /// Keep a selection consistent with the items that still exist.
    ///
    /// Run after every reconciliation and before any total computation, so
    /// entries deleted server-side cannot be counted as phantom selections.
    pub fn prune_selection(&self, selection: &mut CheckoutSelection, items: &[CartLineItem]) {
        selection.prune(items);
    }
}
