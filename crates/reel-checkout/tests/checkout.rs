//! End-to-end checkout flow tests over fake collaborators.

use async_trait::async_trait;
use reel_checkout::prelude::*;
use reel_commerce::prelude::*;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Fake remote cart resource with a recording of removals.
#[derive(Default)]
struct ServerCart {
    records: Mutex<Vec<RemoteCartRecord>>,
    removed: Mutex<Vec<String>>,
    fetches: AtomicUsize,
    fail_remove: AtomicBool,
}

impl ServerCart {
    fn seeded(records: Vec<RemoteCartRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Self::default()
        }
    }

    fn removed_ids(&self) -> Vec<String> {
        self.removed.lock().unwrap().clone()
    }
}

#[async_trait]
impl CartApi for ServerCart {
    async fn fetch_cart(&self, _token: &AccessToken) -> Result<Vec<RemoteCartRecord>, ApiError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let removed = self.removed.lock().unwrap().clone();
        let records = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| !removed.contains(&r.id))
            .cloned()
            .collect();
        Ok(records)
    }

    async fn remove_entry(&self, _token: &AccessToken, id: &EntryId) -> Result<(), ApiError> {
        if self.fail_remove.load(Ordering::SeqCst) {
            return Err(ApiError::Http(500));
        }
        self.removed.lock().unwrap().push(id.as_str().to_string());
        Ok(())
    }
}

/// Fake payment resource recording every confirmation.
#[derive(Default)]
struct RecordingPayments {
    confirmed: Mutex<Vec<PaymentConfirmation>>,
    fail: AtomicBool,
}

impl RecordingPayments {
    fn confirmations(&self) -> Vec<PaymentConfirmation> {
        self.confirmed.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentApi for RecordingPayments {
    async fn confirm(
        &self,
        _token: &AccessToken,
        confirmation: &PaymentConfirmation,
    ) -> Result<(), ApiError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(ApiError::Network("connection reset".into()));
        }
        self.confirmed.lock().unwrap().push(confirmation.clone());
        Ok(())
    }
}

/// Fake provider returning a scripted outcome.
struct ScriptedGateway {
    outcome: Mutex<ProviderOutcome>,
    calls: AtomicUsize,
    last_request: Mutex<Option<ChargeRequest>>,
}

impl ScriptedGateway {
    fn returning(outcome: ProviderOutcome) -> Self {
        Self {
            outcome: Mutex::new(outcome),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    fn success(reference: &str) -> Self {
        Self::returning(ProviderOutcome::Completed {
            reference: PaymentRef::new(reference),
            status: ProviderStatus::Success,
        })
    }
}

#[async_trait]
impl PaymentGateway for ScriptedGateway {
    async fn collect(&self, request: &ChargeRequest) -> ProviderOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        self.outcome.lock().unwrap().clone()
    }
}

fn record(id: &str, product: &str, minor: i64) -> RemoteCartRecord {
    RemoteCartRecord {
        id: id.to_string(),
        product_ref: product.to_string(),
        title: format!("Reel {product}"),
        thumbnail_url: None,
        uploader_label: None,
        description: None,
        unit_price_minor: minor,
        currency: "NGN".to_string(),
    }
}

fn item(id: &str, product: &str, minor: i64) -> CartLineItem {
    CartLineItem::new(
        EntryId::new(id),
        ProductRef::new(product),
        format!("Reel {product}"),
        Money::new(minor, Currency::NGN),
    )
    .unwrap()
}

/// A store holding entries e1 (100) and e2 (200), everything selected.
fn two_item_cart() -> (CartStore, CheckoutSelection) {
    let mut store = CartStore::new(Box::new(MemoryStorage::default()));
    store.add_item(item("e1", "v1", 100)).unwrap();
    store.add_item(item("e2", "v2", 200)).unwrap();
    let mut selection = CheckoutSelection::new();
    selection.select_all(store.items());
    (store, selection)
}

#[tokio::test]
async fn successful_checkout_charges_confirms_and_cleans_up() -> anyhow::Result<()> {
    let server = Arc::new(ServerCart::seeded(vec![
        record("e1", "v1", 100),
        record("e2", "v2", 200),
    ]));
    let payments = Arc::new(RecordingPayments::default());
    let gateway = Arc::new(ScriptedGateway::success("ref-1"));
    let mut flow = CheckoutFlow::new(server.clone(), payments.clone(), gateway.clone());

    let (mut store, mut selection) = two_item_cart();
    let token = AccessToken::new("t");
    let receipt = flow
        .checkout(
            Some(&token),
            &UserId::new("u1"),
            &PayerProfile::new("buyer@example.com"),
            &mut store,
            &mut selection,
        )
        .await?;

    // The provider was invoked with the full selection total.
    let request = gateway.last_request.lock().unwrap().clone().unwrap();
    assert_eq!(request.amount_minor, 300);
    assert_eq!(request.email, "buyer@example.com");

    // The confirmation recorded the frozen attempt.
    let confirmations = payments.confirmations();
    assert_eq!(confirmations.len(), 1);
    assert_eq!(confirmations[0].total_minor, 300);
    assert_eq!(confirmations[0].reference, "ref-1");
    assert_eq!(confirmations[0].status, 's');
    assert_eq!(confirmations[0].purchases.len(), 2);

    // Cleanup removed both entries remotely, then re-fetched.
    assert_eq!(server.removed_ids(), vec!["e1".to_string(), "e2".to_string()]);
    assert!(server.fetches.load(Ordering::SeqCst) >= 1);

    // The re-fetch emptied the local cart and the selection was cleared.
    assert!(store.is_empty());
    assert!(selection.is_empty());

    assert_eq!(receipt.reference.as_str(), "ref-1");
    assert_eq!(receipt.total.amount_minor, 300);
    assert_eq!(receipt.purchased, 2);
    assert_eq!(flow.phase(), CheckoutPhase::Idle);
    Ok(())
}

#[tokio::test]
async fn empty_selection_is_rejected_before_any_side_effect() {
    let server = Arc::new(ServerCart::default());
    let payments = Arc::new(RecordingPayments::default());
    let gateway = Arc::new(ScriptedGateway::success("ref-x"));
    let mut flow = CheckoutFlow::new(server.clone(), payments.clone(), gateway.clone());

    let mut store = CartStore::new(Box::new(MemoryStorage::default()));
    store.add_item(item("e1", "v1", 100)).unwrap();
    let mut selection = CheckoutSelection::new();
    let token = AccessToken::new("t");

    let result = flow
        .checkout(
            Some(&token),
            &UserId::new("u1"),
            &PayerProfile::new("buyer@example.com"),
            &mut store,
            &mut selection,
        )
        .await;

    assert!(matches!(result, Err(CheckoutError::EmptySelection)));
    // The provider was never invoked and the flow never left idle.
    assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
    assert_eq!(flow.phase(), CheckoutPhase::Idle);
    assert!(payments.confirmations().is_empty());
}

#[tokio::test]
async fn unauthenticated_checkout_is_rejected_before_any_side_effect() {
    let server = Arc::new(ServerCart::default());
    let payments = Arc::new(RecordingPayments::default());
    let gateway = Arc::new(ScriptedGateway::success("ref-x"));
    let mut flow = CheckoutFlow::new(server, payments, gateway.clone());

    let (mut store, mut selection) = two_item_cart();
    let result = flow
        .checkout(
            None,
            &UserId::new("u1"),
            &PayerProfile::new("buyer@example.com"),
            &mut store,
            &mut selection,
        )
        .await;

    assert!(matches!(result, Err(CheckoutError::NotAuthenticated)));
    assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
    assert_eq!(flow.phase(), CheckoutPhase::Idle);
}

#[tokio::test]
async fn provider_failure_leaves_cart_untouched() {
    let server = Arc::new(ServerCart::seeded(vec![
        record("e1", "v1", 100),
        record("e2", "v2", 200),
    ]));
    let payments = Arc::new(RecordingPayments::default());
    let gateway = Arc::new(ScriptedGateway::returning(ProviderOutcome::Completed {
        reference: PaymentRef::new("ref-f"),
        status: ProviderStatus::Failed,
    }));
    let mut flow = CheckoutFlow::new(server.clone(), payments.clone(), gateway);

    let (mut store, mut selection) = two_item_cart();
    let token = AccessToken::new("t");
    let result = flow
        .checkout(
            Some(&token),
            &UserId::new("u1"),
            &PayerProfile::new("buyer@example.com"),
            &mut store,
            &mut selection,
        )
        .await;

    assert!(matches!(result, Err(CheckoutError::PaymentFailed)));
    // No record created, no cleanup, cart and selection intact.
    assert!(payments.confirmations().is_empty());
    assert!(server.removed_ids().is_empty());
    assert_eq!(store.len(), 2);
    assert_eq!(selection.len(), 2);
    assert_eq!(flow.phase(), CheckoutPhase::Idle);
}

#[tokio::test]
async fn dismissed_dialog_maps_to_abandoned() {
    let server = Arc::new(ServerCart::default());
    let payments = Arc::new(RecordingPayments::default());
    let gateway = Arc::new(ScriptedGateway::returning(ProviderOutcome::Dismissed));
    let mut flow = CheckoutFlow::new(server, payments.clone(), gateway);

    let (mut store, mut selection) = two_item_cart();
    let token = AccessToken::new("t");
    let result = flow
        .checkout(
            Some(&token),
            &UserId::new("u1"),
            &PayerProfile::new("buyer@example.com"),
            &mut store,
            &mut selection,
        )
        .await;

    assert!(matches!(result, Err(CheckoutError::PaymentAbandoned)));
    assert!(payments.confirmations().is_empty());
    assert_eq!(store.len(), 2);
    assert_eq!(flow.phase(), CheckoutPhase::Idle);
}

#[tokio::test]
async fn confirmation_failure_after_provider_success_is_paid_but_unrecorded() {
    let server = Arc::new(ServerCart::seeded(vec![
        record("e1", "v1", 100),
        record("e2", "v2", 200),
    ]));
    let payments = Arc::new(RecordingPayments::default());
    payments.fail.store(true, Ordering::SeqCst);
    let gateway = Arc::new(ScriptedGateway::success("ref-2"));
    let mut flow = CheckoutFlow::new(server.clone(), payments.clone(), gateway);

    let (mut store, mut selection) = two_item_cart();
    let token = AccessToken::new("t");
    let result = flow
        .checkout(
            Some(&token),
            &UserId::new("u1"),
            &PayerProfile::new("buyer@example.com"),
            &mut store,
            &mut selection,
        )
        .await;

    match result {
        Err(CheckoutError::PaidButUnrecorded { reference }) => {
            assert_eq!(reference.as_str(), "ref-2");
        }
        other => panic!("expected PaidButUnrecorded, got {other:?}"),
    }

    // Cleanup never ran: nothing removed, nothing re-fetched, cart intact.
    assert!(server.removed_ids().is_empty());
    assert_eq!(server.fetches.load(Ordering::SeqCst), 0);
    assert_eq!(store.len(), 2);
    assert_eq!(flow.phase(), CheckoutPhase::Idle);
}

#[tokio::test]
async fn purchase_snapshot_is_frozen_across_cart_mutations() -> anyhow::Result<()> {
    let server = Arc::new(ServerCart::seeded(vec![
        record("e1", "v1", 100),
        record("e2", "v2", 200),
    ]));
    let payments = Arc::new(RecordingPayments::default());
    let gateway = Arc::new(ScriptedGateway::success("ref-3"));
    let mut flow = CheckoutFlow::new(server, payments.clone(), gateway);

    let (mut store, mut selection) = two_item_cart();
    let attempt = flow.begin(&store, &selection)?;

    // The cart changes while the provider dialog is open: one purchased
    // entry removed, an unrelated one added.
    store.remove_item(&EntryId::new("e2"));
    store.add_item(item("e3", "v3", 900)).unwrap();

    let token = AccessToken::new("t");
    let outcome = ProviderOutcome::Completed {
        reference: PaymentRef::new("ref-3"),
        status: ProviderStatus::Success,
    };
    let receipt = flow
        .complete(
            &token,
            &UserId::new("u1"),
            attempt,
            outcome,
            &mut store,
            &mut selection,
        )
        .await?;

    // The confirmation reflects the frozen snapshot, not the live cart.
    let confirmations = payments.confirmations();
    assert_eq!(confirmations.len(), 1);
    let ids: Vec<&str> = confirmations[0]
        .purchases
        .iter()
        .map(|p| p.entry_id.as_str())
        .collect();
    assert_eq!(ids, vec!["e1", "e2"]);
    assert_eq!(confirmations[0].total_minor, 300);
    assert_eq!(receipt.purchased, 2);
    Ok(())
}

#[tokio::test]
async fn failed_cleanup_removals_do_not_fail_the_checkout() -> anyhow::Result<()> {
    let server = Arc::new(ServerCart::seeded(vec![record("e1", "v1", 100)]));
    server.fail_remove.store(true, Ordering::SeqCst);
    let payments = Arc::new(RecordingPayments::default());
    let gateway = Arc::new(ScriptedGateway::success("ref-4"));
    let mut flow = CheckoutFlow::new(server.clone(), payments, gateway);

    let mut store = CartStore::new(Box::new(MemoryStorage::default()));
    store.add_item(item("e1", "v1", 100)).unwrap();
    let mut selection = CheckoutSelection::new();
    selection.select_all(store.items());

    let token = AccessToken::new("t");
    let receipt = flow
        .checkout(
            Some(&token),
            &UserId::new("u1"),
            &PayerProfile::new("buyer@example.com"),
            &mut store,
            &mut selection,
        )
        .await?;

    // The purchase succeeded even though removals failed; the entry stays
    // remote until a later reconciliation, and the refetch still ran.
    assert_eq!(receipt.purchased, 1);
    assert!(server.removed_ids().is_empty());
    assert!(server.fetches.load(Ordering::SeqCst) >= 1);
    assert!(selection.is_empty());
    Ok(())
}
