//! Break-even result records

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Single-product break-even analysis
///
/// Only produced by the analyzer, which rejects non-positive contribution margins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct BreakEvenResult {
    /// Revenue needed to cover fixed costs
    pub break_even_point: f64,
    /// Start date moved forward by `months_to_break_even - 1` months; absent when
    /// break-even can never be reached
    pub break_even_date: Option<NaiveDate>,
    /// 1-based month in which cumulative sales cover fixed costs
    pub months_to_break_even: Option<u32>,
    pub fixed_costs: f64,
    pub variable_costs_per_unit: f64,
    pub revenue_per_unit: f64,
    pub units_at_break_even: f64,
    pub assumptions: Vec<String>,
}

impl BreakEvenResult {
    pub fn contribution_margin(&self) -> f64 {
        self.revenue_per_unit - self.variable_costs_per_unit
    }

    /// Contribution margin as a fraction of price
    pub fn contribution_margin_ratio(&self) -> f64 {
        self.contribution_margin() / self.revenue_per_unit
    }
}

/// One product in a multi-product sales mix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductLine {
    pub name: String,
    pub revenue_per_unit: f64,
    pub variable_cost_per_unit: f64,
    /// Share of unit sales, in percent
    pub sales_mix: f64,
}

impl ProductLine {
    pub fn new(name: &str, revenue_per_unit: f64, variable_cost_per_unit: f64, sales_mix: f64) -> Self {
        Self {
            name: name.to_string(),
            revenue_per_unit,
            variable_cost_per_unit,
            sales_mix,
        }
    }

    pub fn contribution_margin(&self) -> f64 {
        self.revenue_per_unit - self.variable_cost_per_unit
    }
}

/// A product's share of the combined break-even volume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductBreakEven {
    pub name: String,
    pub units: f64,
    pub revenue: f64,
}

/// Break-even for a weighted sales mix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiProductBreakEven {
    pub break_even_revenue: f64,
    pub break_even_units: f64,
    pub weighted_contribution_margin: f64,
    pub contribution_margin_ratio: f64,
    pub break_even_by_product: Vec<ProductBreakEven>,
}

/// Break-even for a recurring-revenue business
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionBreakEven {
    pub break_even_subscribers: f64,
    /// Monthly recurring revenue at the break-even subscriber count
    pub break_even_revenue: f64,
    pub break_even_months: u32,
    pub ltv: f64,
    pub cac: f64,
    pub ltv_cac_ratio: f64,
}
