//! Profitability records

use serde::{Deserialize, Serialize};

/// Investment profitability metrics for one cash-flow schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitabilityResult {
    /// Percent
    pub roi: f64,
    pub npv: f64,
    /// Percent, from the bounded bisection search
    pub irr: f64,
    /// Periods to recover the investment; absent when it never is
    pub payback_period: Option<f64>,
    pub profitability_index: f64,
    /// Percent, not a fraction
    pub discount_rate: f64,
    pub initial_investment: f64,
    pub cash_flows: Vec<f64>,
}

/// A named investment to evaluate, e.g. one line of a batch file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentCase {
    pub name: String,
    pub initial_investment: f64,
    pub cash_flows: Vec<f64>,
    pub discount_rate: f64,
    #[serde(default = "default_annualized")]
    pub annualized_rate: bool,
}

fn default_annualized() -> bool {
    true
}
