//! Checkout flow state machine.

use crate::checkout::{PaymentAttempt, PaymentConfirmation};
use crate::error::CheckoutError;
use crate::ports::{
    AccessToken, CartApi, ChargeRequest, PaymentApi, PaymentGateway, ProviderOutcome,
    ProviderStatus,
};
use crate::sync::CartSynchronizer;
use reel_commerce::cart::{CartStore, CheckoutSelection};
use reel_commerce::ids::{PaymentRef, UserId};
use reel_commerce::money::{Currency, Money};
use std::sync::Arc;
use tracing::{debug, warn};

/// Phases of the checkout flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckoutPhase {
    /// No checkout in flight.
    Idle,
    /// Items being gathered into the attempt.
    Selecting,
    /// Waiting on the provider dialog.
    AwaitingProvider,
    /// Posting the confirmation to the payment resource.
    ConfirmingWithServer,
    /// Removing purchased entries and re-fetching the cart.
    Cleanup,
}

impl CheckoutPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutPhase::Idle => "idle",
            CheckoutPhase::Selecting => "selecting",
            CheckoutPhase::AwaitingProvider => "awaiting_provider",
            CheckoutPhase::ConfirmingWithServer => "confirming_with_server",
            CheckoutPhase::Cleanup => "cleanup",
        }
    }
}

/// Payer metadata handed to the provider.
///
/// Name and phone are best-effort, pulled from stored signup data; their
/// absence never blocks payment, the provider accepts empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PayerProfile {
    /// Payer email.
    pub email: String,
    /// Payer name, may be empty.
    pub name: String,
    /// Payer phone, may be empty.
    pub phone: String,
}

impl PayerProfile {
    /// Create a profile with just an email.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Self::default()
        }
    }

    /// Set the payer name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the payer phone.
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }
}

/// Checkout configuration.
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    /// Currency totals are computed and charged in.
    pub currency: Currency,
    /// Payment-type tag recorded with every confirmation.
    pub payment_kind: String,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            currency: Currency::NGN,
            payment_kind: "cart".to_string(),
        }
    }
}

/// What a successful checkout hands back to the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutReceipt {
    /// Provider reference of the successful payment.
    pub reference: PaymentRef,
    /// Charged total.
    pub total: Money,
    /// Number of entries purchased.
    pub purchased: usize,
}

/// Drives the multi-step purchase flow.
///
/// `Idle → Selecting → AwaitingProvider → ConfirmingWithServer → Cleanup →
/// Idle`, with error exits from `AwaitingProvider` and
/// `ConfirmingWithServer` back to idle. Steps run strictly in sequence;
/// only the provider step is cancellable (the user closing the dialog).
/// Once confirmation begins it runs to a terminal outcome.
///
/// The purchase set is frozen into the [`PaymentAttempt`] before the
/// provider handoff; the live cart may be mutated while the dialog is open
/// without affecting what is charged, recorded, or cleaned up.
pub struct CheckoutFlow {
    cart: Arc<dyn CartApi>,
    payments: Arc<dyn PaymentApi>,
    gateway: Arc<dyn PaymentGateway>,
    sync: CartSynchronizer,
    config: CheckoutConfig,
    phase: CheckoutPhase,
}

impl CheckoutFlow {
    /// Create a flow over the given collaborators with default config.
    pub fn new(
        cart: Arc<dyn CartApi>,
        payments: Arc<dyn PaymentApi>,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Self {
        let sync = CartSynchronizer::new(cart.clone());
        Self {
            cart,
            payments,
            gateway,
            sync,
            config: CheckoutConfig::default(),
            phase: CheckoutPhase::Idle,
        }
    }

    /// Override the checkout configuration.
    pub fn with_config(mut self, config: CheckoutConfig) -> Self {
        self.config = config;
        self
    }

    /// Current phase.
    pub fn phase(&self) -> CheckoutPhase {
        self.phase
    }

    fn set_phase(&mut self, next: CheckoutPhase) {
        debug!(from = self.phase.as_str(), to = next.as_str(), "checkout phase");
        self.phase = next;
    }

    /// Freeze the current selection into a payment attempt.
    ///
    /// Refused, with no state change and no side effects, if nothing in the
    /// live cart is selected. The returned attempt carries the frozen
    /// purchase snapshot and total used through the rest of the flow.
    pub fn begin(
        &mut self,
        store: &CartStore,
        selection: &CheckoutSelection,
    ) -> Result<PaymentAttempt, CheckoutError> {
        let purchases = selection.selected_items(store.items());
        if purchases.is_empty() {
            return Err(CheckoutError::EmptySelection);
        }
        let total = selection.total(store.items(), self.config.currency)?;

        self.set_phase(CheckoutPhase::Selecting);
        self.set_phase(CheckoutPhase::AwaitingProvider);
        Ok(PaymentAttempt::new(purchases, total))
    }

    /// Resolve a provider outcome: confirm with the server, then clean up.
    ///
    /// Consumes the attempt; it never outlives one invocation.
    pub async fn complete(
        &mut self,
        token: &AccessToken,
        user_id: &UserId,
        mut attempt: PaymentAttempt,
        outcome: ProviderOutcome,
        store: &mut CartStore,
        selection: &mut CheckoutSelection,
    ) -> Result<CheckoutReceipt, CheckoutError> {
        let (reference, status) = match outcome {
            ProviderOutcome::Dismissed => {
                attempt.mark_abandoned();
                self.set_phase(CheckoutPhase::Idle);
                return Err(CheckoutError::PaymentAbandoned);
            }
            ProviderOutcome::Completed { reference, status } => (reference, status),
        };

        if status != ProviderStatus::Success {
            attempt.mark_failed(reference);
            self.set_phase(CheckoutPhase::Idle);
            return Err(CheckoutError::PaymentFailed);
        }

        attempt.mark_succeeded(reference.clone());
        self.set_phase(CheckoutPhase::ConfirmingWithServer);
        let confirmation = PaymentConfirmation::from_attempt(
            &attempt,
            user_id,
            &reference,
            status.code(),
            self.config.payment_kind.clone(),
        );
        if let Err(err) = self.payments.confirm(token, &confirmation).await {
            // Money likely moved but no record exists; surface distinctly
            // and leave the cart alone.
            warn!(error = %err, reference = %reference, "payment succeeded but confirmation failed");
            self.set_phase(CheckoutPhase::Idle);
            return Err(CheckoutError::PaidButUnrecorded { reference });
        }

        self.set_phase(CheckoutPhase::Cleanup);
        for item in attempt.purchases() {
            if let Err(err) = self.cart.remove_entry(token, &item.id).await {
                // The purchase already succeeded; the entry stays in the
                // remote cart until the next reconciliation.
                warn!(error = %err, entry = %item.id, "failed to remove purchased entry from remote cart");
            }
        }
        if let Err(err) = self.sync.fetch_and_reconcile(token, store).await {
            warn!(error = %err, "post-checkout cart refresh failed");
        }
        selection.clear();

        let receipt = CheckoutReceipt {
            reference,
            total: attempt.total(),
            purchased: attempt.purchases().len(),
        };
        self.set_phase(CheckoutPhase::Idle);
        Ok(receipt)
    }

    /// Run one full checkout: guards, provider handoff, confirmation,
    /// cleanup.
    ///
    /// Refused before any side effect if the caller has no session
    /// credential or nothing is selected.
    pub async fn checkout(
        &mut self,
        token: Option<&AccessToken>,
        user_id: &UserId,
        payer: &PayerProfile,
        store: &mut CartStore,
        selection: &mut CheckoutSelection,
    ) -> Result<CheckoutReceipt, CheckoutError> {
        let token = token.ok_or(CheckoutError::NotAuthenticated)?;
        let attempt = self.begin(store, selection)?;

        let request = ChargeRequest {
            amount_minor: attempt.total().amount_minor,
            currency: attempt.total().currency,
            email: payer.email.clone(),
            name: payer.name.clone(),
            phone: payer.phone.clone(),
        };
        let outcome = self.gateway.collect(&request).await;

        self.complete(token, user_id, attempt, outcome, store, selection)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_names() {
        assert_eq!(CheckoutPhase::Idle.as_str(), "idle");
        assert_eq!(CheckoutPhase::AwaitingProvider.as_str(), "awaiting_provider");
        assert_eq!(
            CheckoutPhase::ConfirmingWithServer.as_str(),
            "confirming_with_server"
        );
    }

    #[test]
    fn test_payer_profile_defaults_to_empty_metadata() {
        let payer = PayerProfile::new("who@example.com");
        assert_eq!(payer.email, "who@example.com");
        assert_eq!(payer.name, "");
        assert_eq!(payer.phone, "");
    }

    #[test]
    fn test_config_default() {
        let config = CheckoutConfig::default();
        assert_eq!(config.currency, Currency::NGN);
        assert_eq!(config.payment_kind, "cart");
    }
}
