use crate::models::OrderStatus;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, warn};
use veil_core::OrderGateway;

/// Tick cadence and ceiling for payment confirmation.
#[derive(Debug, Clone, Copy)]
pub struct PollerConfig {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollerConfig {
    fn default() -> Self {
        // One tick per second with a two-minute ceiling.
        Self {
            interval: Duration::from_secs(1),
            max_attempts: 120,
        }
    }
}

impl From<&veil_store::app_config::PollingConfig> for PollerConfig {
    fn from(config: &veil_store::app_config::PollingConfig) -> Self {
        Self {
            interval: Duration::from_millis(config.interval_ms),
            max_attempts: config.max_attempts,
        }
    }
}

/// Terminal result of a polling session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The order reached Paid.
    Confirmed,
    /// The order was canceled server-side.
    CanceledRemote,
    /// Attempts ran out while the order stayed unsettled. The order itself is
    /// left untouched; the user should verify the payment result manually.
    TimedOut,
    /// The session was canceled locally.
    Canceled,
}

/// Handle owned by the screen that started the session. Dropping it cancels
/// the session, so a torn-down owner cannot leak a ticking task.
pub struct PollHandle {
    trade_no: String,
    cancel: Arc<AtomicBool>,
    task: Option<JoinHandle<PollOutcome>>,
}

impl PollHandle {
    /// Cooperative cancel: the flag is checked at the top of each tick, and
    /// an in-flight request finishes but its result is discarded.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    pub fn trade_no(&self) -> &str {
        &self.trade_no
    }

    /// Wait for the session to settle.
    pub async fn outcome(mut self) -> PollOutcome {
        match self.task.take() {
            Some(task) => task.await.unwrap_or(PollOutcome::Canceled),
            None => PollOutcome::Canceled,
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        if self.task.is_some() {
            self.cancel.store(true, Ordering::SeqCst);
        }
    }
}

/// Watches orders until payment settles, times out, or is canceled.
///
/// At most one active session exists per trade number; asking to watch an
/// already-watched order is a no-op.
pub struct PaymentWatcher {
    orders: Arc<dyn OrderGateway>,
    config: PollerConfig,
    sessions: Arc<Mutex<HashMap<String, Arc<AtomicBool>>>>,
}

impl PaymentWatcher {
    pub fn new(orders: Arc<dyn OrderGateway>, config: PollerConfig) -> Self {
        Self {
            orders,
            config,
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Start a polling session. Returns `None` when a live session for this
    /// trade number already exists.
    pub fn watch(&self, trade_no: &str) -> Option<PollHandle> {
        let cancel = Arc::new(AtomicBool::new(false));
        {
            let mut sessions = self.sessions.lock().expect("session lock poisoned");
            if let Some(existing) = sessions.get(trade_no) {
                if !existing.load(Ordering::SeqCst) {
                    debug!(trade_no, "polling session already active");
                    return None;
                }
            }
            sessions.insert(trade_no.to_string(), cancel.clone());
        }

        let task = tokio::spawn(run_session(
            self.orders.clone(),
            self.config,
            trade_no.to_string(),
            cancel.clone(),
            self.sessions.clone(),
        ));
        Some(PollHandle {
            trade_no: trade_no.to_string(),
            cancel,
            task: Some(task),
        })
    }
}

async fn run_session(
    orders: Arc<dyn OrderGateway>,
    config: PollerConfig,
    trade_no: String,
    cancel: Arc<AtomicBool>,
    sessions: Arc<Mutex<HashMap<String, Arc<AtomicBool>>>>,
) -> PollOutcome {
    let mut attempts = 0u32;
    let outcome = loop {
        if cancel.load(Ordering::SeqCst) {
            break PollOutcome::Canceled;
        }
        if attempts >= config.max_attempts {
            warn!(%trade_no, attempts, "payment confirmation timed out");
            break PollOutcome::TimedOut;
        }

        let tick = orders.order_detail(&trade_no).await;
        // The request may have raced a cancel; discard its result if so.
        if cancel.load(Ordering::SeqCst) {
            break PollOutcome::Canceled;
        }
        match tick {
            veil_shared::Outcome::Success(reply) => {
                match OrderStatus::from_code(reply.status) {
                    OrderStatus::Paid => {
                        info!(%trade_no, attempts, "payment confirmed");
                        break PollOutcome::Confirmed;
                    }
                    OrderStatus::Canceled => {
                        info!(%trade_no, attempts, "order canceled server-side");
                        break PollOutcome::CanceledRemote;
                    }
                    _ => {}
                }
            }
            veil_shared::Outcome::Failure(error) => {
                // Deliberately tolerated: a single failed tick is transient
                // and must not end the session.
                debug!(%trade_no, attempts, message = %error.message, "poll tick failed");
            }
            veil_shared::Outcome::Loading => {}
        }

        attempts += 1;
        sleep(config.interval).await;
    };

    // Unregister, but only our own slot: a canceled session may already have
    // been replaced by a fresh one for the same order.
    let mut sessions = sessions.lock().expect("session lock poisoned");
    if sessions
        .get(&trade_no)
        .is_some_and(|current| Arc::ptr_eq(current, &cancel))
    {
        sessions.remove(&trade_no);
    }
    outcome
}
