use crate::client::ApiClient;
use async_trait::async_trait;
use std::sync::Arc;
use veil_core::OrderGateway;
use veil_shared::models::billing::PaymentMethod;
use veil_shared::models::order::{
    CancelOrderRequest, CheckoutRequest, CreateOrderRequest, OrderDetailReply, OrderHistoryReply,
};
use veil_shared::{CheckoutReply, Outcome};

/// Order endpoints.
#[derive(Clone)]
pub struct OrderApi {
    client: Arc<ApiClient>,
}

impl OrderApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl OrderGateway for OrderApi {
    async fn create_order(&self, request: CreateOrderRequest) -> Outcome<String> {
        self.client.post_enveloped("user/order/save", &request).await
    }

    async fn order_detail(&self, trade_no: &str) -> Outcome<OrderDetailReply> {
        self.client
            .get_enveloped(
                "user/order/detail",
                &[("trade_no", trade_no.to_string())],
            )
            .await
    }

    async fn order_status(&self, trade_no: &str) -> Outcome<i32> {
        self.client
            .get_enveloped("user/order/check", &[("trade_no", trade_no.to_string())])
            .await
    }

    async fn checkout(&self, request: CheckoutRequest) -> Outcome<CheckoutReply> {
        // This endpoint bypasses the standard envelope and answers the raw
        // `{type, data}` reply.
        self.client.post_direct("user/order/checkout", &request).await
    }

    async fn cancel_order(&self, request: CancelOrderRequest) -> Outcome<()> {
        self.client.post_void("user/order/cancel", &request).await
    }

    async fn payment_methods(&self) -> Outcome<Vec<PaymentMethod>> {
        self.client
            .get_enveloped("user/order/getPaymentMethod", &[])
            .await
    }

    async fn order_history(&self, page: i32, per_page: i32) -> Outcome<OrderHistoryReply> {
        self.client
            .get_enveloped(
                "user/order/fetch",
                &[
                    ("page", page.to_string()),
                    ("per_page", per_page.to_string()),
                ],
            )
            .await
    }
}
