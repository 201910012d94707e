use serde::{Deserialize, Serialize};

/// A payment channel offered at checkout. `fee_percent` is added to the
/// payable amount before the gateway is invoked.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentMethod {
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub fee_percent: f64,
    #[serde(default)]
    pub plugin_code: Option<String>,
}

/// Body for `user/coupon/check`.
#[derive(Debug, Clone, Serialize)]
pub struct CheckCouponRequest {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
}

/// Coupon as validated by the server. `kind` 1 is a fixed minor-unit
/// discount, 2 a percentage of the plan price.
#[derive(Debug, Clone, Deserialize)]
pub struct CouponReply {
    pub id: i32,
    pub code: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: i32,
    pub value: i64,
    #[serde(default)]
    pub limit_plan_ids: Option<Vec<i32>>,
    #[serde(default)]
    pub limit_period: Option<Vec<String>>,
    #[serde(default)]
    pub started_at: Option<i64>,
    #[serde(default)]
    pub ended_at: Option<i64>,
}

/// Body for `user/gift-card/check` and `user/gift-card/redeem`.
#[derive(Debug, Clone, Serialize)]
pub struct GiftCardRequest {
    pub card_code: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GiftCardReply {
    pub id: i32,
    pub code: String,
    pub balance: i64,
    pub status: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GiftCardRecord {
    pub id: i32,
    pub code: String,
    pub balance: i64,
    #[serde(default)]
    pub redeemed_at: Option<i64>,
}

/// Paged wrapper for `user/gift-card/history`.
#[derive(Debug, Clone, Deserialize)]
pub struct GiftCardHistoryReply {
    pub data: Vec<GiftCardRecord>,
    pub total: i32,
    pub per_page: i32,
    pub current_page: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coupon_reply_reads_type_field() {
        let reply: CouponReply = serde_json::from_str(
            r#"{"id":7,"code":"SAVE20","name":"Save 20%","type":2,"value":20,
                "limit_plan_ids":[5],"limit_period":["month_price"]}"#,
        )
        .unwrap();
        assert_eq!(reply.kind, 2);
        assert_eq!(reply.limit_plan_ids.as_deref(), Some(&[5][..]));
    }

    #[test]
    fn payment_method_defaults_fee_to_zero() {
        let method: PaymentMethod =
            serde_json::from_str(r#"{"id":1,"name":"Alipay"}"#).unwrap();
        assert_eq!(method.fee_percent, 0.0);
    }
}
