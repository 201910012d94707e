use async_trait::async_trait;
use veil_catalog::Plan;
use veil_shared::models::billing::{
    CheckCouponRequest, CouponReply, GiftCardHistoryReply, GiftCardReply, PaymentMethod,
};
use veil_shared::models::order::{
    CancelOrderRequest, CheckoutRequest, CreateOrderRequest, OrderDetailReply, OrderHistoryReply,
};
use veil_shared::models::subscription::SubscribeInfo;
use veil_shared::{CheckoutReply, Outcome};

/// Remote order operations. Every method resolves to the normalized envelope;
/// implementations must never panic or surface raw transport errors.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Returns the new order's trade number.
    async fn create_order(&self, request: CreateOrderRequest) -> Outcome<String>;

    async fn order_detail(&self, trade_no: &str) -> Outcome<OrderDetailReply>;

    /// Bare status code for cheap display refresh; the poller prefers
    /// `order_detail`.
    async fn order_status(&self, trade_no: &str) -> Outcome<i32>;

    /// Raw checkout reply; classification into an action happens above the
    /// gateway.
    async fn checkout(&self, request: CheckoutRequest) -> Outcome<CheckoutReply>;

    async fn cancel_order(&self, request: CancelOrderRequest) -> Outcome<()>;

    async fn payment_methods(&self) -> Outcome<Vec<PaymentMethod>>;

    async fn order_history(&self, page: i32, per_page: i32) -> Outcome<OrderHistoryReply>;
}

/// Plans, coupons, and gift cards.
#[async_trait]
pub trait BillingGateway: Send + Sync {
    async fn fetch_plans(&self) -> Outcome<Vec<Plan>>;

    async fn check_coupon(&self, request: CheckCouponRequest) -> Outcome<CouponReply>;

    async fn check_gift_card(&self, card_code: &str) -> Outcome<GiftCardReply>;

    /// One-time, non-reversible. Callers guard against duplicate submission.
    async fn redeem_gift_card(&self, card_code: &str) -> Outcome<()>;

    async fn gift_card_history(&self, page: i32, per_page: i32) -> Outcome<GiftCardHistoryReply>;
}

/// Subscription endpoint plus the raw profile download it points at.
#[async_trait]
pub trait SubscriptionGateway: Send + Sync {
    async fn subscribe_info(&self) -> Outcome<SubscribeInfo>;

    /// Fetches the profile body from an absolute URL. The endpoint returns
    /// the raw document, not the standard envelope.
    async fn fetch_profile(&self, url: &str) -> Outcome<String>;
}
