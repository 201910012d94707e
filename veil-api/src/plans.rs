use crate::client::ApiClient;
use async_trait::async_trait;
use std::sync::Arc;
use veil_catalog::Plan;
use veil_core::BillingGateway;
use veil_shared::models::billing::{
    CheckCouponRequest, CouponReply, GiftCardHistoryReply, GiftCardReply, GiftCardRequest,
};
use veil_shared::Outcome;

/// Plan, coupon, and gift-card endpoints.
#[derive(Clone)]
pub struct PlanApi {
    client: Arc<ApiClient>,
}

impl PlanApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BillingGateway for PlanApi {
    async fn fetch_plans(&self) -> Outcome<Vec<Plan>> {
        self.client.get_enveloped("user/plan/fetch", &[]).await
    }

    async fn check_coupon(&self, request: CheckCouponRequest) -> Outcome<CouponReply> {
        self.client.post_enveloped("user/coupon/check", &request).await
    }

    async fn check_gift_card(&self, card_code: &str) -> Outcome<GiftCardReply> {
        self.client
            .post_enveloped(
                "user/gift-card/check",
                &GiftCardRequest {
                    card_code: card_code.to_string(),
                },
            )
            .await
    }

    async fn redeem_gift_card(&self, card_code: &str) -> Outcome<()> {
        self.client
            .post_void(
                "user/gift-card/redeem",
                &GiftCardRequest {
                    card_code: card_code.to_string(),
                },
            )
            .await
    }

    async fn gift_card_history(&self, page: i32, per_page: i32) -> Outcome<GiftCardHistoryReply> {
        self.client
            .get_enveloped(
                "user/gift-card/history",
                &[
                    ("page", page.to_string()),
                    ("per_page", per_page.to_string()),
                ],
            )
            .await
    }
}
