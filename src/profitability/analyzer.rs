//! Memoizing profitability analyzer

use std::sync::Arc;

use super::irr::calculate_irr_with;
use super::metrics::{
    calculate_mirr, calculate_npv, calculate_payback_period, calculate_profitability_index,
    calculate_roi,
};
use super::types::{InvestmentCase, ProfitabilityResult};
use crate::cache::{CacheKey, MemoCache};
use crate::config::IrrSettings;
use crate::error::{ForecastError, Result};

/// Compute every profitability metric for one schedule without touching any cache
pub fn profitability(
    initial_investment: f64,
    cash_flows: &[f64],
    discount_rate: f64,
    annualized_rate: bool,
    irr_settings: &IrrSettings,
) -> Result<ProfitabilityResult> {
    if cash_flows.is_empty() {
        return Err(ForecastError::InvalidInput(
            "at least one cash flow is required".to_string(),
        ));
    }
    if !(initial_investment > 0.0) {
        return Err(ForecastError::InvalidInput(format!(
            "initial investment must be positive, got {}",
            initial_investment
        )));
    }

    let npv = calculate_npv(initial_investment, cash_flows, discount_rate, annualized_rate);

    Ok(ProfitabilityResult {
        roi: calculate_roi(initial_investment, cash_flows),
        npv,
        irr: calculate_irr_with(initial_investment, cash_flows, irr_settings),
        payback_period: calculate_payback_period(initial_investment, cash_flows),
        profitability_index: calculate_profitability_index(initial_investment, npv),
        discount_rate,
        initial_investment,
        cash_flows: cash_flows.to_vec(),
    })
}

/// Profitability analyzer with memoized results
#[derive(Debug, Clone, Default)]
pub struct ProfitabilityAnalyzer {
    cache: Arc<MemoCache<ProfitabilityResult>>,
    irr: IrrSettings,
}

impl ProfitabilityAnalyzer {
    /// Create an analyzer with a private cache of the given capacity
    pub fn new(cache_capacity: usize) -> Self {
        Self::with_cache(Arc::new(MemoCache::new(cache_capacity)))
    }

    /// Create an analyzer over an existing (possibly shared) cache
    pub fn with_cache(cache: Arc<MemoCache<ProfitabilityResult>>) -> Self {
        Self {
            cache,
            irr: IrrSettings::default(),
        }
    }

    pub fn with_irr_settings(mut self, irr: IrrSettings) -> Self {
        self.irr = irr;
        self
    }

    pub fn cache(&self) -> &Arc<MemoCache<ProfitabilityResult>> {
        &self.cache
    }

    pub fn irr_settings(&self) -> &IrrSettings {
        &self.irr
    }

    /// Memoized [`profitability`]; failures are not cached
    pub fn calculate_profitability(
        &self,
        initial_investment: f64,
        cash_flows: &[f64],
        discount_rate: f64,
        annualized_rate: bool,
    ) -> Result<ProfitabilityResult> {
        // Solver settings change the IRR, so they are part of the signature
        let key = CacheKey::new("profitability")
            .number(initial_investment)
            .numbers(cash_flows)
            .number(discount_rate)
            .flag(annualized_rate)
            .number(self.irr.lower_pct)
            .number(self.irr.upper_pct)
            .text(self.irr.max_iterations)
            .number(self.irr.tolerance);

        self.cache.get_or_try_insert_with(key, || {
            profitability(
                initial_investment,
                cash_flows,
                discount_rate,
                annualized_rate,
                &self.irr,
            )
        })
    }

    pub fn evaluate(&self, case: &InvestmentCase) -> Result<ProfitabilityResult> {
        self.calculate_profitability(
            case.initial_investment,
            &case.cash_flows,
            case.discount_rate,
            case.annualized_rate,
        )
    }

    pub fn calculate_npv(
        &self,
        initial_investment: f64,
        cash_flows: &[f64],
        discount_rate: f64,
        annualized_rate: bool,
    ) -> f64 {
        calculate_npv(initial_investment, cash_flows, discount_rate, annualized_rate)
    }

    pub fn calculate_irr(&self, initial_investment: f64, cash_flows: &[f64]) -> f64 {
        calculate_irr_with(initial_investment, cash_flows, &self.irr)
    }

    pub fn calculate_payback_period(&self, initial_investment: f64, cash_flows: &[f64]) -> Option<f64> {
        calculate_payback_period(initial_investment, cash_flows)
    }

    pub fn calculate_profitability_index(&self, initial_investment: f64, npv: f64) -> f64 {
        calculate_profitability_index(initial_investment, npv)
    }

    pub fn calculate_mirr(
        &self,
        initial_investment: f64,
        cash_flows: &[f64],
        financing_rate: f64,
        reinvestment_rate: f64,
    ) -> Option<f64> {
        calculate_mirr(initial_investment, cash_flows, financing_rate, reinvestment_rate)
    }
}
