pub mod plan;
pub mod pricing;

pub use plan::{BillingPeriod, Plan};
pub use pricing::{Quote, QuoteError};
