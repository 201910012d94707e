pub mod activation;
pub mod flow;
pub mod manager;
pub mod models;
pub mod poller;

pub use activation::ActivationOrchestrator;
pub use flow::{PurchaseFlow, PurchaseOutcome};
pub use manager::OrderService;
pub use models::{CheckoutAction, Order, OrderStatus};
pub use poller::{PaymentWatcher, PollHandle, PollOutcome, PollerConfig};
