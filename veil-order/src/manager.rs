use crate::models::{CheckoutAction, Order, OrderStatus};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};
use veil_catalog::{BillingPeriod, Plan};
use veil_core::{BillingGateway, OrderGateway};
use veil_shared::models::billing::{
    CheckCouponRequest, CouponReply, GiftCardHistoryReply, GiftCardReply, PaymentMethod,
};
use veil_shared::models::order::{CancelOrderRequest, CheckoutRequest, CreateOrderRequest};
use veil_shared::{ApiError, Outcome};

/// Order lifecycle manager.
///
/// Owns the idempotency guards the remote API does not give us: an ambiguous
/// order submission blocks blind resubmission until the caller has observed
/// fresh order state, and gift-card redemption fires at most once per user
/// action.
pub struct OrderService {
    orders: Arc<dyn OrderGateway>,
    billing: Arc<dyn BillingGateway>,
    create_unresolved: AtomicBool,
    redeeming: AtomicBool,
}

impl OrderService {
    pub fn new(orders: Arc<dyn OrderGateway>, billing: Arc<dyn BillingGateway>) -> Self {
        Self {
            orders,
            billing,
            create_unresolved: AtomicBool::new(false),
            redeeming: AtomicBool::new(false),
        }
    }

    /// Create an order and return its trade number.
    ///
    /// A transport failure here is ambiguous: the order may or may not exist
    /// server-side. Until the caller re-fetches order state (any detail or
    /// history read), further submissions are refused so a flaky network
    /// cannot produce duplicate orders.
    pub async fn create_order(
        &self,
        plan_id: i32,
        period: BillingPeriod,
        coupon_code: Option<String>,
    ) -> Outcome<String> {
        if self.create_unresolved.load(Ordering::SeqCst) {
            return Outcome::Failure(ApiError::business(
                "a previous order submission did not settle; refresh order status before retrying",
            ));
        }

        let request = CreateOrderRequest {
            plan_id,
            period: period.as_str().to_string(),
            coupon_code,
        };
        let outcome = self.orders.create_order(request).await;
        if let Some(error) = outcome.err() {
            if error.kind == veil_shared::ErrorKind::Transport {
                warn!(plan_id, "order submission is unresolved after a transport failure");
                self.create_unresolved.store(true, Ordering::SeqCst);
            }
        }
        outcome
    }

    /// Fetch and parse an order. Also clears the ambiguous-submission guard:
    /// the caller has now seen fresh server state.
    pub async fn order_detail(&self, trade_no: &str) -> Outcome<Order> {
        let outcome = self.orders.order_detail(trade_no).await.map(Order::from);
        if outcome.is_success() || outcome.err().is_some_and(|e| e.kind == veil_shared::ErrorKind::Business) {
            self.create_unresolved.store(false, Ordering::SeqCst);
        }
        outcome
    }

    pub async fn order_status(&self, trade_no: &str) -> Outcome<OrderStatus> {
        self.orders
            .order_status(trade_no)
            .await
            .map(OrderStatus::from_code)
    }

    /// Initiate payment, normalized under the envelope: failures and
    /// unrecognized reply types surface as errors instead of absent values.
    pub async fn checkout(&self, trade_no: &str, method_id: i32) -> Outcome<CheckoutAction> {
        let request = CheckoutRequest {
            trade_no: trade_no.to_string(),
            method: method_id,
        };
        match self.orders.checkout(request).await {
            Outcome::Success(reply) => match CheckoutAction::classify(reply) {
                Ok(action) => Outcome::Success(action),
                Err(error) => {
                    warn!(trade_no, message = %error.message, "checkout reply rejected");
                    Outcome::Failure(error)
                }
            },
            Outcome::Failure(error) => Outcome::Failure(error),
            Outcome::Loading => Outcome::Loading,
        }
    }

    /// Cancel, then observe. The cancel reply alone is never trusted: the
    /// caller gets the re-fetched order and decides from its actual status.
    pub async fn cancel_and_refetch(&self, trade_no: &str) -> Outcome<Order> {
        let canceled = self.orders
            .cancel_order(CancelOrderRequest {
                trade_no: trade_no.to_string(),
            })
            .await;
        if let Some(error) = canceled.err() {
            debug!(trade_no, message = %error.message, "cancel request rejected");
        }

        let refetched = self.order_detail(trade_no).await;
        if let Some(order) = refetched.clone().ok() {
            if canceled.is_success() && order.status != OrderStatus::Canceled {
                warn!(
                    trade_no,
                    status = order.status.code(),
                    "cancel acknowledged but order has not reached canceled state"
                );
            }
        }
        refetched
    }

    pub async fn check_coupon(
        &self,
        code: &str,
        plan_id: Option<i32>,
        period: Option<BillingPeriod>,
    ) -> Outcome<CouponReply> {
        self.billing
            .check_coupon(CheckCouponRequest {
                code: code.to_string(),
                plan_id,
                period: period.map(|p| p.as_str().to_string()),
            })
            .await
    }

    pub async fn check_gift_card(&self, card_code: &str) -> Outcome<GiftCardReply> {
        self.billing.check_gift_card(card_code).await
    }

    /// Redeem a gift card. Redemption is one-time and non-reversible, so a
    /// second call while one is in flight observes `Loading` instead of
    /// reaching the server.
    pub async fn redeem_gift_card(&self, card_code: &str) -> Outcome<()> {
        if self.redeeming.swap(true, Ordering::SeqCst) {
            debug!("gift-card redemption already in flight");
            return Outcome::Loading;
        }
        let _reset = ResetOnDrop(&self.redeeming);
        self.billing.redeem_gift_card(card_code).await
    }

    pub async fn gift_card_history(&self, page: i32, per_page: i32) -> Outcome<GiftCardHistoryReply> {
        self.billing.gift_card_history(page, per_page).await
    }

    pub async fn payment_methods(&self) -> Outcome<Vec<PaymentMethod>> {
        self.orders.payment_methods().await
    }

    pub async fn plans(&self) -> Outcome<Vec<Plan>> {
        self.billing.fetch_plans().await
    }

    /// Parsed order history page. Reading history counts as observing fresh
    /// state for the ambiguous-submission guard.
    pub async fn order_history(&self, page: i32, per_page: i32) -> Outcome<Vec<Order>> {
        let outcome = self.orders.order_history(page, per_page).await;
        if outcome.is_success() {
            self.create_unresolved.store(false, Ordering::SeqCst);
        }
        outcome.map(|reply| reply.data.into_iter().map(Order::from).collect())
    }
}

struct ResetOnDrop<'a>(&'a AtomicBool);

impl Drop for ResetOnDrop<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
