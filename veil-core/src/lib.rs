pub mod engine;
pub mod gateway;
pub mod kv;

pub use engine::{EngineError, NetworkEngine, ProfileHandle, ProfileSpec};
pub use gateway::{BillingGateway, OrderGateway, SubscriptionGateway};
pub use kv::KvStore;
