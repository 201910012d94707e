use chrono::{DateTime, TimeZone, Utc};
use veil_catalog::BillingPeriod;
use veil_shared::models::order::OrderDetailReply;
use veil_shared::{ApiError, CheckoutReply};

/// Order status in the lifecycle.
///
/// Wire codes: 0 Waiting, 1 Paid, 2 Provisioning, 3 Canceled, 4 Discounted.
/// Unknown codes are preserved raw and treated as non-terminal so a poller
/// simply keeps observing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Waiting,
    Paid,
    Provisioning,
    Canceled,
    Discounted,
    Other(i32),
}

impl OrderStatus {
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => OrderStatus::Waiting,
            1 => OrderStatus::Paid,
            2 => OrderStatus::Provisioning,
            3 => OrderStatus::Canceled,
            4 => OrderStatus::Discounted,
            other => OrderStatus::Other(other),
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            OrderStatus::Waiting => 0,
            OrderStatus::Paid => 1,
            OrderStatus::Provisioning => 2,
            OrderStatus::Canceled => 3,
            OrderStatus::Discounted => 4,
            OrderStatus::Other(code) => *code,
        }
    }

    /// No transition leaves these states.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Paid | OrderStatus::Canceled | OrderStatus::Discounted
        )
    }

    /// Whether observing `next` after `self` is consistent with the
    /// server-side lifecycle. Transitions are monotonic; Waiting is the only
    /// state that may move to Canceled or Paid.
    pub fn can_transition(&self, next: OrderStatus) -> bool {
        if *self == next {
            return true;
        }
        match self {
            OrderStatus::Waiting => matches!(
                next,
                OrderStatus::Paid
                    | OrderStatus::Provisioning
                    | OrderStatus::Canceled
                    | OrderStatus::Discounted
            ),
            OrderStatus::Provisioning => matches!(next, OrderStatus::Paid),
            OrderStatus::Paid | OrderStatus::Canceled | OrderStatus::Discounted => false,
            OrderStatus::Other(_) => true,
        }
    }
}

/// Parsed order record. Amounts are integer minor units; the server is the
/// only writer, the client only observes by re-fetching.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub trade_no: String,
    pub plan_id: i32,
    pub period: Option<BillingPeriod>,
    pub status: OrderStatus,
    pub total_amount: i64,
    pub discount_amount: i64,
    pub balance_amount: i64,
    pub surplus_amount: i64,
    pub handling_amount: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub paid_at: Option<DateTime<Utc>>,
}

impl From<OrderDetailReply> for Order {
    fn from(reply: OrderDetailReply) -> Self {
        let period = reply
            .period
            .as_deref()
            .and_then(|raw| raw.parse::<BillingPeriod>().ok());
        Self {
            trade_no: reply.trade_no,
            plan_id: reply.plan_id,
            period,
            status: OrderStatus::from_code(reply.status),
            total_amount: reply.total_amount.unwrap_or(0),
            discount_amount: reply.discount_amount.unwrap_or(0),
            balance_amount: reply.balance_amount.unwrap_or(0),
            surplus_amount: reply.surplus_amount.unwrap_or(0),
            handling_amount: reply.handling_amount.unwrap_or(0),
            created_at: reply.created_at.and_then(|ts| Utc.timestamp_opt(ts, 0).single()),
            paid_at: reply.paid_at.and_then(|ts| Utc.timestamp_opt(ts, 0).single()),
        }
    }
}

/// What checkout asks the client to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutAction {
    /// Fully discounted order; nothing to pay.
    NoPaymentRequired,
    /// Show this payload as a QR code and wait for the external payment.
    QrCode(String),
    /// Open this URL in a browser and wait for the external payment.
    Redirect(String),
}

impl CheckoutAction {
    /// Classify the raw checkout reply. Unrecognized type codes are an error,
    /// never silently ignored.
    pub fn classify(reply: CheckoutReply) -> Result<Self, ApiError> {
        match reply.kind {
            Some(-1) => Ok(CheckoutAction::NoPaymentRequired),
            Some(0) => match reply.data.as_ref().and_then(|v| v.as_str()) {
                Some(payload) => Ok(CheckoutAction::QrCode(payload.to_string())),
                None => Err(ApiError::business("checkout reply is missing the QR payload")),
            },
            Some(1) => match reply.data.as_ref().and_then(|v| v.as_str()) {
                Some(url) => Ok(CheckoutAction::Redirect(url.to_string())),
                None => Err(ApiError::business(
                    "checkout reply is missing the redirect URL",
                )),
            },
            other => Err(ApiError::business(format!(
                "unrecognized checkout type: {other:?}"
            ))),
        }
    }
}
