//! Checkout module.
//!
//! Contains the checkout flow state machine, the per-invocation payment
//! attempt, and the confirmation payload posted to the payment resource.

mod attempt;
mod confirmation;
mod flow;

pub use attempt::{AttemptStatus, PaymentAttempt};
pub use confirmation::{PaymentConfirmation, PurchaseDetail};
pub use flow::{CheckoutConfig, CheckoutFlow, CheckoutPhase, CheckoutReceipt, PayerProfile};
