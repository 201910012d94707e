use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Enumerated billing cycle.
///
/// `as_str` yields the wire key used by the plan object's price fields;
/// parsing additionally accepts the compact aliases that appear on order
/// records (`month_1`, `year_2`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BillingPeriod {
    Monthly,
    Quarterly,
    HalfYearly,
    Annual,
    TwoYear,
    ThreeYear,
    Onetime,
}

impl BillingPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingPeriod::Monthly => "month_price",
            BillingPeriod::Quarterly => "quarter_price",
            BillingPeriod::HalfYearly => "half_year_price",
            BillingPeriod::Annual => "year_price",
            BillingPeriod::TwoYear => "two_year_price",
            BillingPeriod::ThreeYear => "three_year_price",
            BillingPeriod::Onetime => "onetime_price",
        }
    }

    pub fn all() -> [BillingPeriod; 7] {
        [
            BillingPeriod::Monthly,
            BillingPeriod::Quarterly,
            BillingPeriod::HalfYearly,
            BillingPeriod::Annual,
            BillingPeriod::TwoYear,
            BillingPeriod::ThreeYear,
            BillingPeriod::Onetime,
        ]
    }
}

impl fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized billing period: {0}")]
pub struct PeriodParseError(String);

impl FromStr for BillingPeriod {
    type Err = PeriodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "month_price" | "month_1" | "monthly" => Ok(BillingPeriod::Monthly),
            "quarter_price" | "month_3" | "quarterly" => Ok(BillingPeriod::Quarterly),
            "half_year_price" | "month_6" => Ok(BillingPeriod::HalfYearly),
            "year_price" | "year_1" | "annual" => Ok(BillingPeriod::Annual),
            "two_year_price" | "year_2" => Ok(BillingPeriod::TwoYear),
            "three_year_price" | "year_3" => Ok(BillingPeriod::ThreeYear),
            "onetime_price" | "onetime" => Ok(BillingPeriod::Onetime),
            other => Err(PeriodParseError(other.to_string())),
        }
    }
}

/// A sellable plan. Prices are integer minor units; a missing price means the
/// cycle is not offered for this plan.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Plan {
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub transfer_enable: Option<i64>,
    #[serde(default)]
    pub device_limit: Option<i32>,
    #[serde(default)]
    pub month_price: Option<i64>,
    #[serde(default)]
    pub quarter_price: Option<i64>,
    #[serde(default)]
    pub half_year_price: Option<i64>,
    #[serde(default)]
    pub year_price: Option<i64>,
    #[serde(default)]
    pub two_year_price: Option<i64>,
    #[serde(default)]
    pub three_year_price: Option<i64>,
    #[serde(default)]
    pub onetime_price: Option<i64>,
    #[serde(default = "default_true")]
    pub sell: bool,
    #[serde(default = "default_true")]
    pub renew: bool,
}

fn default_true() -> bool {
    true
}

impl Plan {
    /// Price for the given cycle in minor units, if offered.
    pub fn price(&self, period: BillingPeriod) -> Option<i64> {
        match period {
            BillingPeriod::Monthly => self.month_price,
            BillingPeriod::Quarterly => self.quarter_price,
            BillingPeriod::HalfYearly => self.half_year_price,
            BillingPeriod::Annual => self.year_price,
            BillingPeriod::TwoYear => self.two_year_price,
            BillingPeriod::ThreeYear => self.three_year_price,
            BillingPeriod::Onetime => self.onetime_price,
        }
    }

    /// Cycles this plan can actually be bought on.
    pub fn offered_periods(&self) -> Vec<BillingPeriod> {
        BillingPeriod::all()
            .into_iter()
            .filter(|p| self.price(*p).is_some_and(|v| v > 0))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan() -> Plan {
        serde_json::from_str(
            r#"{"id":5,"name":"Pro","month_price":1000,"year_price":10000}"#,
        )
        .unwrap()
    }

    #[test]
    fn price_lookup_per_period() {
        let plan = plan();
        assert_eq!(plan.price(BillingPeriod::Monthly), Some(1000));
        assert_eq!(plan.price(BillingPeriod::Annual), Some(10000));
        assert_eq!(plan.price(BillingPeriod::Quarterly), None);
    }

    #[test]
    fn offered_periods_skip_missing_cycles() {
        assert_eq!(
            plan().offered_periods(),
            vec![BillingPeriod::Monthly, BillingPeriod::Annual]
        );
    }

    #[test]
    fn period_parsing_accepts_both_key_families() {
        assert_eq!(
            "month_price".parse::<BillingPeriod>().unwrap(),
            BillingPeriod::Monthly
        );
        assert_eq!(
            "month_1".parse::<BillingPeriod>().unwrap(),
            BillingPeriod::Monthly
        );
        assert_eq!(
            "year_2".parse::<BillingPeriod>().unwrap(),
            BillingPeriod::TwoYear
        );
        assert!("fortnight".parse::<BillingPeriod>().is_err());
    }
}
