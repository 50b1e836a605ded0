//! Scenario runner for batch profitability evaluation
//!
//! Evaluates many investment cases, or one case across many discount rates, in
//! parallel over a single shared analyzer cache.

use rayon::prelude::*;
use serde::Serialize;

use crate::profitability::{
    calculate_npv, calculate_profitability_index, InvestmentCase, ProfitabilityAnalyzer,
    ProfitabilityResult,
};

/// Result of evaluating one case in a batch
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseOutcome {
    pub name: String,
    pub result: Option<ProfitabilityResult>,
    pub error: Option<String>,
}

/// NPV of a schedule at one discount rate
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SensitivityPoint {
    pub discount_rate: f64,
    pub npv: f64,
    pub profitability_index: f64,
}

/// Parallel batch evaluation over one profitability analyzer
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new(ProfitabilityAnalyzer::default());
/// let outcomes = runner.run_batch(&cases);
/// let grid = runner.discount_rate_sensitivity(100_000.0, &flows, &[5.0, 10.0, 15.0], true);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    analyzer: ProfitabilityAnalyzer,
}

impl ScenarioRunner {
    pub fn new(analyzer: ProfitabilityAnalyzer) -> Self {
        Self { analyzer }
    }

    pub fn analyzer(&self) -> &ProfitabilityAnalyzer {
        &self.analyzer
    }

    /// Evaluate every case; failures are reported per case, in input order
    pub fn run_batch(&self, cases: &[InvestmentCase]) -> Vec<CaseOutcome> {
        cases
            .par_iter()
            .map(|case| match self.analyzer.evaluate(case) {
                Ok(result) => CaseOutcome {
                    name: case.name.clone(),
                    result: Some(result),
                    error: None,
                },
                Err(e) => {
                    log::warn!("Case '{}' failed: {}", case.name, e);
                    CaseOutcome {
                        name: case.name.clone(),
                        result: None,
                        error: Some(e.to_string()),
                    }
                }
            })
            .collect()
    }

    /// NPV and profitability index of one schedule at each discount rate
    pub fn discount_rate_sensitivity(
        &self,
        initial_investment: f64,
        cash_flows: &[f64],
        discount_rates: &[f64],
        annualized_rate: bool,
    ) -> Vec<SensitivityPoint> {
        discount_rates
            .par_iter()
            .map(|&discount_rate| {
                let npv = calculate_npv(initial_investment, cash_flows, discount_rate, annualized_rate);
                SensitivityPoint {
                    discount_rate,
                    npv,
                    profitability_index: calculate_profitability_index(initial_investment, npv),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case(name: &str, investment: f64, discount_rate: f64) -> InvestmentCase {
        InvestmentCase {
            name: name.to_string(),
            initial_investment: investment,
            cash_flows: vec![30_000.0, 35_000.0, 40_000.0, 45_000.0],
            discount_rate,
            annualized_rate: true,
        }
    }

    #[test]
    fn test_batch_preserves_order_and_errors() {
        let runner = ScenarioRunner::default();
        let cases = vec![
            case("low rate", 100_000.0, 5.0),
            case("broken", 0.0, 5.0),
            case("high rate", 100_000.0, 15.0),
        ];

        let outcomes = runner.run_batch(&cases);
        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[1].name, "broken");
        assert!(outcomes[1].result.is_none());
        assert!(outcomes[1].error.is_some());

        let low = outcomes[0].result.as_ref().unwrap();
        let high = outcomes[2].result.as_ref().unwrap();
        assert!(low.npv > high.npv);
        // IRR does not depend on the discount rate
        assert_eq!(low.irr, high.irr);
    }

    #[test]
    fn test_batch_shares_cache() {
        let runner = ScenarioRunner::default();
        let cases = vec![case("a", 100_000.0, 8.0); 8];
        runner.run_batch(&cases);

        let stats = runner.analyzer().cache().stats();
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.hits + stats.misses, 8);
    }

    #[test]
    fn test_sensitivity_is_monotonic() {
        let runner = ScenarioRunner::default();
        let rates = [0.0, 5.0, 10.0, 15.0, 20.0];
        let grid = runner.discount_rate_sensitivity(
            100_000.0,
            &[30_000.0, 35_000.0, 40_000.0, 45_000.0],
            &rates,
            true,
        );

        assert_eq!(grid.len(), rates.len());
        assert_eq!(grid[0].npv, 50_000.0);
        assert!(grid.windows(2).all(|w| w[0].npv > w[1].npv));
        assert!((grid[0].profitability_index - 1.5).abs() < 1e-12);
    }
}
