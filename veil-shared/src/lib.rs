pub mod models;
pub mod outcome;

pub use models::envelope::{ApiEnvelope, CheckoutReply};
pub use outcome::{ApiError, ErrorKind, Outcome};
