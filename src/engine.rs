//! Forecast engine: the three calculators built from one configuration

use crate::break_even::BreakEvenAnalyzer;
use crate::config::EngineConfig;
use crate::profitability::ProfitabilityAnalyzer;
use crate::revenue::{validate_with_tolerance, RevenueProjection, RevenueProjectionCalculator, ValidationReport};

/// Calculators sharing one configuration, each with its own cache
#[derive(Debug, Clone)]
pub struct ForecastEngine {
    config: EngineConfig,
    revenue: RevenueProjectionCalculator,
    break_even: BreakEvenAnalyzer,
    profitability: ProfitabilityAnalyzer,
}

impl ForecastEngine {
    pub fn new(config: EngineConfig) -> Self {
        let revenue = RevenueProjectionCalculator::new(config.cache_capacity);
        let break_even = BreakEvenAnalyzer::new(config.cache_capacity)
            .with_sales_mix_tolerance(config.sales_mix_tolerance);
        let profitability =
            ProfitabilityAnalyzer::new(config.cache_capacity).with_irr_settings(config.irr);

        log::debug!(
            "Forecast engine ready (cache capacity {}, IRR cap {} iterations)",
            config.cache_capacity,
            config.irr.max_iterations
        );

        Self {
            config,
            revenue,
            break_even,
            profitability,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn revenue(&self) -> &RevenueProjectionCalculator {
        &self.revenue
    }

    pub fn break_even(&self) -> &BreakEvenAnalyzer {
        &self.break_even
    }

    pub fn profitability(&self) -> &ProfitabilityAnalyzer {
        &self.profitability
    }

    /// Validate a projection with the configured probability tolerance
    pub fn validate_revenue_projection(&self, projection: &RevenueProjection) -> ValidationReport {
        validate_with_tolerance(projection, self.config.probability_tolerance)
    }

    /// Empty every calculator cache
    pub fn clear_caches(&self) {
        self.revenue.cache().clear();
        self.break_even.cache().clear();
        self.profitability.cache().clear();
    }
}

impl Default for ForecastEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
