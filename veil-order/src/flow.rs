use crate::activation::ActivationOrchestrator;
use crate::manager::OrderService;
use crate::models::CheckoutAction;
use crate::poller::{PaymentWatcher, PollOutcome};
use std::sync::Arc;
use tracing::info;
use veil_shared::Outcome;

/// How a purchase attempt ended, once checkout succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseOutcome {
    /// Payment settled and activation ran.
    Completed,
    /// The order was canceled server-side while we were waiting.
    CanceledRemote,
    /// Confirmation attempts ran out. The order is left as-is; the user
    /// should verify the payment result manually.
    TimedOut,
    /// The wait was canceled locally.
    Canceled,
}

/// Drives one order from checkout to activation.
///
/// Free orders activate immediately and never poll. Externally paid orders
/// surface the payment medium through `present`, then wait for confirmation.
pub struct PurchaseFlow {
    service: Arc<OrderService>,
    watcher: Arc<PaymentWatcher>,
    activation: Arc<ActivationOrchestrator>,
}

impl PurchaseFlow {
    pub fn new(
        service: Arc<OrderService>,
        watcher: Arc<PaymentWatcher>,
        activation: Arc<ActivationOrchestrator>,
    ) -> Self {
        Self {
            service,
            watcher,
            activation,
        }
    }

    pub async fn run(
        &self,
        trade_no: &str,
        method_id: i32,
        present: impl FnOnce(&CheckoutAction) + Send,
    ) -> Outcome<PurchaseOutcome> {
        let action = match self.service.checkout(trade_no, method_id).await {
            Outcome::Success(action) => action,
            Outcome::Failure(error) => return Outcome::Failure(error),
            Outcome::Loading => return Outcome::Loading,
        };

        match &action {
            CheckoutAction::NoPaymentRequired => {
                info!(trade_no, "order settled without payment");
                self.activation.run().await;
                Outcome::Success(PurchaseOutcome::Completed)
            }
            CheckoutAction::QrCode(_) | CheckoutAction::Redirect(_) => {
                present(&action);
                let Some(handle) = self.watcher.watch(trade_no) else {
                    // Another session is already waiting on this order.
                    return Outcome::Loading;
                };
                match handle.outcome().await {
                    PollOutcome::Confirmed => {
                        self.activation.run().await;
                        Outcome::Success(PurchaseOutcome::Completed)
                    }
                    PollOutcome::CanceledRemote => {
                        Outcome::Success(PurchaseOutcome::CanceledRemote)
                    }
                    PollOutcome::TimedOut => Outcome::Success(PurchaseOutcome::TimedOut),
                    PollOutcome::Canceled => Outcome::Success(PurchaseOutcome::Canceled),
                }
            }
        }
    }

    /// Manual activation trigger, e.g. from a user affordance on the success
    /// screen. Shares the flow's once-guard: if the automatic run already
    /// fired, this is a no-op.
    pub async fn trigger_activation(&self) {
        self.activation.run().await;
    }
}
