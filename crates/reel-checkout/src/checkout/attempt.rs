//! Per-invocation payment attempt.

use reel_commerce::cart::CartLineItem;
use reel_commerce::ids::PaymentRef;
use reel_commerce::money::Money;

/// Status of one payment attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttemptStatus {
    /// Created, awaiting the provider.
    Pending,
    /// Provider reported success.
    Succeeded,
    /// Provider reported failure.
    Failed,
    /// Dialog closed without a terminal callback.
    Abandoned,
}

impl AttemptStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttemptStatus::Pending => "pending",
            AttemptStatus::Succeeded => "succeeded",
            AttemptStatus::Failed => "failed",
            AttemptStatus::Abandoned => "abandoned",
        }
    }

    /// Check if the attempt has reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, AttemptStatus::Pending)
    }
}

/// One checkout invocation's attempt at payment.
///
/// The purchases and total are frozen when the attempt is created, before
/// the provider handoff, and reused through confirmation and cleanup.
/// Mutations of the live cart while the provider dialog is open cannot
/// change what gets charged or recorded. An attempt never outlives one
/// checkout invocation; a retry creates a new attempt with a new reference.
#[derive(Debug, Clone)]
pub struct PaymentAttempt {
    purchases: Vec<CartLineItem>,
    total: Money,
    status: AttemptStatus,
    reference: Option<PaymentRef>,
}

impl PaymentAttempt {
    pub(crate) fn new(purchases: Vec<CartLineItem>, total: Money) -> Self {
        Self {
            purchases,
            total,
            status: AttemptStatus::Pending,
            reference: None,
        }
    }

    /// The frozen purchase snapshot.
    pub fn purchases(&self) -> &[CartLineItem] {
        &self.purchases
    }

    /// The frozen total.
    pub fn total(&self) -> Money {
        self.total
    }

    /// Current status.
    pub fn status(&self) -> AttemptStatus {
        self.status
    }

    /// Provider reference, once the provider has called back.
    pub fn reference(&self) -> Option<&PaymentRef> {
        self.reference.as_ref()
    }

    pub(crate) fn mark_succeeded(&mut self, reference: PaymentRef) {
        self.status = AttemptStatus::Succeeded;
        self.reference = Some(reference);
    }

    pub(crate) fn mark_failed(&mut self, reference: PaymentRef) {
        self.status = AttemptStatus::Failed;
        self.reference = Some(reference);
    }

    pub(crate) fn mark_abandoned(&mut self) {
        self.status = AttemptStatus::Abandoned;
    }
}
