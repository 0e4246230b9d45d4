//! Cart synchronization and checkout flow for the ReelCart marketplace.
//!
//! Builds on [`reel_commerce`]'s cart store and selection:
//!
//! - **Ports**: trait objects for the remote cart resource, the remote
//!   payment resource, and the external payment provider
//! - **Synchronizer**: reconciles the local cart against the remote one,
//!   de-duplicating by product reference
//! - **Checkout**: the multi-step purchase flow with a frozen purchase
//!   snapshot, distinct "paid but unrecorded" handling, and best-effort
//!   cleanup
//!
//! The flow is single-threaded and event-driven: every step awaits the
//! prior one, and the only shared mutable resource, the cart store, is
//! mutated exclusively through its own operations.

pub mod checkout;
pub mod error;
pub mod ports;
pub mod sync;

pub use error::{CheckoutError, SyncError};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::checkout::{
        AttemptStatus, CheckoutConfig, CheckoutFlow, CheckoutPhase, CheckoutReceipt,
        PayerProfile, PaymentAttempt, PaymentConfirmation, PurchaseDetail,
    };
    pub use crate::error::{CheckoutError, SyncError};
    pub use crate::ports::{
        AccessToken, ApiError, CartApi, ChargeRequest, PaymentApi, PaymentGateway,
        ProviderOutcome, ProviderStatus, RemoteCartRecord,
    };
    pub use crate::sync::CartSynchronizer;
}
