use serde::{Deserialize, Serialize};

/// Body for `user/order/save`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateOrderRequest {
    pub plan_id: i32,
    pub period: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<String>,
}

/// Body for `user/order/checkout`.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutRequest {
    pub trade_no: String,
    pub method: i32,
}

/// Body for `user/order/cancel`.
#[derive(Debug, Clone, Serialize)]
pub struct CancelOrderRequest {
    pub trade_no: String,
}

/// Server-side order record as returned by `user/order/detail` and
/// `user/order/fetch`. Amounts are integer minor units; timestamps are epoch
/// seconds.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderDetailReply {
    pub trade_no: String,
    pub plan_id: i32,
    pub period: Option<String>,
    pub status: i32,
    #[serde(default)]
    pub total_amount: Option<i64>,
    #[serde(default)]
    pub discount_amount: Option<i64>,
    #[serde(default)]
    pub balance_amount: Option<i64>,
    #[serde(default)]
    pub surplus_amount: Option<i64>,
    #[serde(default)]
    pub handling_amount: Option<i64>,
    #[serde(default)]
    pub refund_amount: Option<i64>,
    #[serde(default)]
    pub payment_id: Option<i32>,
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub paid_at: Option<i64>,
}

/// Paged wrapper for `user/order/fetch`.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderHistoryReply {
    pub data: Vec<OrderDetailReply>,
    pub total: i32,
    pub per_page: i32,
    pub current_page: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_order_request_omits_absent_coupon() {
        let body = CreateOrderRequest {
            plan_id: 5,
            period: "month_price".to_string(),
            coupon_code: None,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(!json.contains("coupon_code"));

        let with_coupon = CreateOrderRequest {
            coupon_code: Some("WELCOME".to_string()),
            ..body
        };
        assert!(serde_json::to_string(&with_coupon)
            .unwrap()
            .contains("WELCOME"));
    }

    #[test]
    fn order_detail_tolerates_sparse_records() {
        let reply: OrderDetailReply = serde_json::from_str(
            r#"{"trade_no":"T1","plan_id":5,"status":0,"total_amount":800}"#,
        )
        .unwrap();
        assert_eq!(reply.total_amount, Some(800));
        assert!(reply.paid_at.is_none());
    }
}
