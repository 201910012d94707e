use crate::plan::{BillingPeriod, Plan};
use thiserror::Error;
use veil_shared::models::billing::{CouponReply, PaymentMethod};

/// Purchase price breakdown, all in integer minor units.
///
/// Division to display units happens only at render time; nothing here ever
/// leaves integer arithmetic mid-computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub plan_price: i64,
    pub coupon_discount: i64,
    pub balance_deduction: i64,
    pub surplus_deduction: i64,
    /// Payment-method fee on the payable remainder.
    pub fee: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuoteError {
    #[error("plan {plan_id} is not offered on cycle {period}")]
    PeriodNotOffered {
        plan_id: i32,
        period: BillingPeriod,
    },

    #[error("coupon {code} does not apply to this plan or cycle")]
    CouponNotApplicable { code: String },

    #[error("unsupported coupon type: {0}")]
    UnsupportedCouponType(i32),
}

impl Quote {
    pub fn new(plan: &Plan, period: BillingPeriod) -> Result<Self, QuoteError> {
        let plan_price = plan.price(period).ok_or(QuoteError::PeriodNotOffered {
            plan_id: plan.id,
            period,
        })?;
        Ok(Self {
            plan_price,
            coupon_discount: 0,
            balance_deduction: 0,
            surplus_deduction: 0,
            fee: 0,
        })
    }

    /// Apply a validated coupon. Type 1 is a fixed minor-unit discount,
    /// type 2 a percentage of the plan price.
    pub fn with_coupon(
        mut self,
        coupon: &CouponReply,
        plan_id: i32,
        period: BillingPeriod,
    ) -> Result<Self, QuoteError> {
        let plan_ok = coupon
            .limit_plan_ids
            .as_ref()
            .is_none_or(|ids| ids.is_empty() || ids.contains(&plan_id));
        let period_ok = coupon.limit_period.as_ref().is_none_or(|periods| {
            periods.is_empty()
                || periods
                    .iter()
                    .any(|p| p.parse::<BillingPeriod>() == Ok(period))
        });
        if !plan_ok || !period_ok {
            return Err(QuoteError::CouponNotApplicable {
                code: coupon.code.clone(),
            });
        }

        self.coupon_discount = match coupon.kind {
            1 => coupon.value,
            2 => self.plan_price * coupon.value / 100,
            other => return Err(QuoteError::UnsupportedCouponType(other)),
        };
        Ok(self)
    }

    pub fn with_balance(mut self, deduction: i64) -> Self {
        self.balance_deduction = deduction;
        self
    }

    pub fn with_surplus(mut self, deduction: i64) -> Self {
        self.surplus_deduction = deduction;
        self
    }

    /// Add the payment channel's fee, computed on the current total and
    /// rounded to the nearest minor unit. Percentages stay in integer
    /// hundredths to avoid floating-point drift.
    pub fn with_method(mut self, method: &PaymentMethod) -> Self {
        let percent_hundredths = (method.fee_percent * 100.0).round() as i64;
        self.fee = (self.total() * percent_hundredths + 5_000) / 10_000;
        self
    }

    /// `max(0, plan_price - coupon - balance - surplus)`; never negative.
    pub fn total(&self) -> i64 {
        (self.plan_price - self.coupon_discount - self.balance_deduction - self.surplus_deduction)
            .max(0)
    }

    /// Amount actually sent to the gateway: total plus the method fee.
    pub fn payable(&self) -> i64 {
        self.total() + self.fee
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan() -> Plan {
        serde_json::from_str(r#"{"id":5,"name":"Pro","month_price":1000}"#).unwrap()
    }

    fn fixed_coupon(value: i64) -> CouponReply {
        serde_json::from_str(&format!(
            r#"{{"id":1,"code":"C","name":"c","type":1,"value":{value}}}"#
        ))
        .unwrap()
    }

    #[test]
    fn total_subtracts_discounts() {
        let quote = Quote::new(&plan(), BillingPeriod::Monthly)
            .unwrap()
            .with_coupon(&fixed_coupon(200), 5, BillingPeriod::Monthly)
            .unwrap();
        assert_eq!(quote.total(), 800);
    }

    #[test]
    fn total_clamps_at_zero() {
        let quote = Quote::new(&plan(), BillingPeriod::Monthly)
            .unwrap()
            .with_coupon(&fixed_coupon(1500), 5, BillingPeriod::Monthly)
            .unwrap();
        assert_eq!(quote.total(), 0);
        assert_eq!(quote.payable(), 0);
    }

    #[test]
    fn percentage_coupon_stays_in_integer_arithmetic() {
        let coupon: CouponReply = serde_json::from_str(
            r#"{"id":1,"code":"P","name":"p","type":2,"value":20}"#,
        )
        .unwrap();
        let quote = Quote::new(&plan(), BillingPeriod::Monthly)
            .unwrap()
            .with_coupon(&coupon, 5, BillingPeriod::Monthly)
            .unwrap();
        assert_eq!(quote.coupon_discount, 200);
        assert_eq!(quote.total(), 800);
    }

    #[test]
    fn coupon_scope_is_enforced() {
        let coupon: CouponReply = serde_json::from_str(
            r#"{"id":1,"code":"X","name":"x","type":1,"value":100,
                "limit_plan_ids":[9],"limit_period":["year_price"]}"#,
        )
        .unwrap();
        let err = Quote::new(&plan(), BillingPeriod::Monthly)
            .unwrap()
            .with_coupon(&coupon, 5, BillingPeriod::Monthly)
            .unwrap_err();
        assert!(matches!(err, QuoteError::CouponNotApplicable { .. }));
    }

    #[test]
    fn balance_and_surplus_deductions_stack() {
        let quote = Quote::new(&plan(), BillingPeriod::Monthly)
            .unwrap()
            .with_balance(300)
            .with_surplus(200);
        assert_eq!(quote.total(), 500);
    }

    #[test]
    fn method_fee_rounds_to_nearest_minor_unit() {
        let method: PaymentMethod =
            serde_json::from_str(r#"{"id":1,"name":"Card","fee_percent":2.5}"#).unwrap();
        let quote = Quote::new(&plan(), BillingPeriod::Monthly)
            .unwrap()
            .with_method(&method);
        assert_eq!(quote.fee, 25);
        assert_eq!(quote.payable(), 1025);

        let odd: PaymentMethod =
            serde_json::from_str(r#"{"id":2,"name":"Odd","fee_percent":2.56}"#).unwrap();
        let quote = Quote::new(&plan(), BillingPeriod::Monthly)
            .unwrap()
            .with_method(&odd);
        // 1000 * 2.56% = 25.6, rounds to 26
        assert_eq!(quote.fee, 26);
    }

    #[test]
    fn missing_cycle_is_an_error() {
        let err = Quote::new(&plan(), BillingPeriod::Annual).unwrap_err();
        assert!(matches!(err, QuoteError::PeriodNotOffered { .. }));
    }
}
