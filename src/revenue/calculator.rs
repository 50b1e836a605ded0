//! Revenue projection formulas and the memoizing calculator

use chrono::NaiveDate;
use std::sync::Arc;

use super::types::{ConfidenceLevel, MonthlyRevenue, PeriodType, ProjectionMethod};
use crate::cache::{CacheKey, MemoCache};
use crate::dates;
use crate::error::Result;

/// Number of months in a seasonality profile
pub const MONTHS_PER_YEAR: usize = 12;

/// Project revenue for one period without touching any cache
///
/// `growth_rate` is a percentage. `historical_data` is a series of past period growth
/// rates (percent, oldest first) used only by [`ProjectionMethod::Historical`].
pub fn projected_revenue(
    base_revenue: f64,
    growth_rate: f64,
    period_type: PeriodType,
    confidence_level: ConfidenceLevel,
    method: ProjectionMethod,
    historical_data: &[f64],
) -> f64 {
    let confidence = confidence_level.factor();

    match method {
        ProjectionMethod::Linear => linear_projection(base_revenue, growth_rate, confidence),
        ProjectionMethod::Compound => {
            let period_growth = 1.0 + (growth_rate / 100.0) * confidence;
            base_revenue * period_growth.powf(period_type.year_fraction())
        }
        ProjectionMethod::Historical => match weighted_average_growth(historical_data) {
            Some(average) => linear_projection(base_revenue, average, confidence),
            None => linear_projection(base_revenue, growth_rate, confidence),
        },
        // Confidence scales the whole result, not just the growth term
        ProjectionMethod::Custom => base_revenue * (1.0 + growth_rate / 100.0) * confidence,
        ProjectionMethod::Unrecognized => base_revenue,
    }
}

fn linear_projection(base_revenue: f64, growth_rate: f64, confidence: f64) -> f64 {
    base_revenue * (1.0 + (growth_rate / 100.0) * confidence)
}

/// Average of `rates` where entry `i` has weight `i + 1`
pub fn weighted_average_growth(rates: &[f64]) -> Option<f64> {
    if rates.is_empty() {
        return None;
    }

    let (weighted_sum, total_weight) = rates
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(sum, weights), (i, &rate)| {
            let weight = (i + 1) as f64;
            (sum + rate * weight, weights + weight)
        });

    Some(weighted_sum / total_weight)
}

/// Spread annual revenue over twelve months following a seasonality profile
///
/// Exactly twelve factors with a positive total are rescaled to sum to twelve so only
/// their relative shape matters. Any other input yields an even split.
/// `_start_date` anchors the profile for callers; month `i` of the result is the
/// `i`-th month from the start.
pub fn generate_monthly_revenue(
    annual_revenue: f64,
    seasonality_factors: &[f64],
    _start_date: NaiveDate,
) -> [f64; MONTHS_PER_YEAR] {
    let factors = normalized_seasonality(seasonality_factors);
    let mut monthly = [0.0; MONTHS_PER_YEAR];
    for (slot, factor) in monthly.iter_mut().zip(factors.iter()) {
        *slot = annual_revenue * factor / MONTHS_PER_YEAR as f64;
    }
    monthly
}

/// Monthly breakdown labelled with the first day of each month from `start_date`
pub fn monthly_revenue_schedule(
    annual_revenue: f64,
    seasonality_factors: &[f64],
    start_date: NaiveDate,
) -> Result<Vec<MonthlyRevenue>> {
    let first = dates::month_start(start_date);
    generate_monthly_revenue(annual_revenue, seasonality_factors, start_date)
        .iter()
        .enumerate()
        .map(|(i, &revenue)| {
            Ok(MonthlyRevenue {
                month_start: dates::add_months(first, i as u32)?,
                revenue,
            })
        })
        .collect()
}

fn normalized_seasonality(factors: &[f64]) -> [f64; MONTHS_PER_YEAR] {
    if factors.len() != MONTHS_PER_YEAR {
        if !factors.is_empty() {
            log::warn!(
                "Seasonality profile has {} factors, expected {}; using an even split",
                factors.len(),
                MONTHS_PER_YEAR
            );
        }
        return [1.0; MONTHS_PER_YEAR];
    }

    let total: f64 = factors.iter().sum();
    if total <= 0.0 || !total.is_finite() {
        log::warn!("Seasonality factors sum to {}; using an even split", total);
        return [1.0; MONTHS_PER_YEAR];
    }

    let scale = MONTHS_PER_YEAR as f64 / total;
    let mut normalized = [0.0; MONTHS_PER_YEAR];
    for (slot, factor) in normalized.iter_mut().zip(factors) {
        *slot = factor * scale;
    }
    normalized
}

/// Revenue projection calculator backed by a memoization cache
#[derive(Debug, Clone, Default)]
pub struct RevenueProjectionCalculator {
    cache: Arc<MemoCache<f64>>,
}

impl RevenueProjectionCalculator {
    /// Create a calculator with a private cache of the given capacity
    pub fn new(cache_capacity: usize) -> Self {
        Self::with_cache(Arc::new(MemoCache::new(cache_capacity)))
    }

    /// Create a calculator over an existing (possibly shared) cache
    pub fn with_cache(cache: Arc<MemoCache<f64>>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &Arc<MemoCache<f64>> {
        &self.cache
    }

    /// Memoized [`projected_revenue`]
    pub fn calculate_projected_revenue(
        &self,
        base_revenue: f64,
        growth_rate: f64,
        period_type: PeriodType,
        confidence_level: ConfidenceLevel,
        method: ProjectionMethod,
        historical_data: &[f64],
    ) -> f64 {
        let key = CacheKey::new("projected_revenue")
            .number(base_revenue)
            .number(growth_rate)
            .text(period_type)
            .text(confidence_level)
            .text(method)
            .numbers(historical_data);

        self.cache.get_or_insert_with(key, || {
            projected_revenue(
                base_revenue,
                growth_rate,
                period_type,
                confidence_level,
                method,
                historical_data,
            )
        })
    }

    pub fn generate_monthly_revenue(
        &self,
        annual_revenue: f64,
        seasonality_factors: &[f64],
        start_date: NaiveDate,
    ) -> [f64; MONTHS_PER_YEAR] {
        generate_monthly_revenue(annual_revenue, seasonality_factors, start_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn jan_first() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn test_linear_medium_annual() {
        let calc = RevenueProjectionCalculator::default();
        let revenue = calc.calculate_projected_revenue(
            120_000.0,
            25.0,
            PeriodType::Annual,
            ConfidenceLevel::Medium,
            ProjectionMethod::Linear,
            &[],
        );
        assert_relative_eq!(revenue, 150_000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_confidence_scales_growth_term() {
        let low = projected_revenue(100_000.0, 10.0, PeriodType::Annual, ConfidenceLevel::Low, ProjectionMethod::Linear, &[]);
        let high = projected_revenue(100_000.0, 10.0, PeriodType::Annual, ConfidenceLevel::High, ProjectionMethod::Linear, &[]);
        assert_relative_eq!(low, 108_000.0, epsilon = 1e-9);
        assert_relative_eq!(high, 112_000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_compound_uses_period_fraction() {
        let quarterly = projected_revenue(100_000.0, 21.0, PeriodType::Quarterly, ConfidenceLevel::Medium, ProjectionMethod::Compound, &[]);
        assert_relative_eq!(quarterly, 100_000.0 * 1.21_f64.powf(0.25), epsilon = 1e-6);

        let annual = projected_revenue(100_000.0, 21.0, PeriodType::Annual, ConfidenceLevel::Medium, ProjectionMethod::Compound, &[]);
        assert_relative_eq!(annual, 121_000.0, epsilon = 1e-6);

        let monthly = projected_revenue(100_000.0, 21.0, PeriodType::Monthly, ConfidenceLevel::Medium, ProjectionMethod::Compound, &[]);
        assert!(monthly < quarterly);
    }

    #[test]
    fn test_historical_weights_recent_periods() {
        // weights 1,2,3: (10 + 40 + 90) / 6
        let average = weighted_average_growth(&[10.0, 20.0, 30.0]).unwrap();
        assert_relative_eq!(average, 140.0 / 6.0, epsilon = 1e-12);

        let revenue = projected_revenue(60_000.0, 5.0, PeriodType::Annual, ConfidenceLevel::Medium, ProjectionMethod::Historical, &[10.0, 20.0, 30.0]);
        assert_relative_eq!(revenue, 60_000.0 * (1.0 + average / 100.0), epsilon = 1e-9);
    }

    #[test]
    fn test_historical_without_data_is_linear() {
        let historical = projected_revenue(50_000.0, 8.0, PeriodType::Annual, ConfidenceLevel::High, ProjectionMethod::Historical, &[]);
        let linear = projected_revenue(50_000.0, 8.0, PeriodType::Annual, ConfidenceLevel::High, ProjectionMethod::Linear, &[]);
        assert_eq!(historical, linear);
    }

    #[test]
    fn test_custom_applies_confidence_outside() {
        let custom = projected_revenue(100_000.0, 10.0, PeriodType::Annual, ConfidenceLevel::Low, ProjectionMethod::Custom, &[]);
        assert_relative_eq!(custom, 88_000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_unrecognized_method_returns_base() {
        let revenue = projected_revenue(75_000.0, 40.0, PeriodType::Annual, ConfidenceLevel::High, ProjectionMethod::Unrecognized, &[]);
        assert_eq!(revenue, 75_000.0);
    }

    #[test]
    fn test_historical_data_is_part_of_cache_key() {
        let calc = RevenueProjectionCalculator::default();
        let a = calc.calculate_projected_revenue(100.0, 0.0, PeriodType::Annual, ConfidenceLevel::Medium, ProjectionMethod::Historical, &[10.0]);
        let b = calc.calculate_projected_revenue(100.0, 0.0, PeriodType::Annual, ConfidenceLevel::Medium, ProjectionMethod::Historical, &[50.0]);
        assert_relative_eq!(a, 110.0, epsilon = 1e-9);
        assert_relative_eq!(b, 150.0, epsilon = 1e-9);
        assert_eq!(calc.cache().len(), 2);
    }

    #[test]
    fn test_repeated_calls_hit_cache() {
        let calc = RevenueProjectionCalculator::new(4);
        let first = calc.calculate_projected_revenue(1_000.0, 12.0, PeriodType::Monthly, ConfidenceLevel::Low, ProjectionMethod::Compound, &[]);
        let second = calc.calculate_projected_revenue(1_000.0, 12.0, PeriodType::Monthly, ConfidenceLevel::Low, ProjectionMethod::Compound, &[]);
        assert_eq!(first, second);
        assert_eq!(calc.cache().stats().hits, 1);
    }

    #[test]
    fn test_monthly_revenue_normalizes_factors() {
        // Doubling every factor keeps the same shape
        let factors = [2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 4.0, 4.0, 4.0, 4.0, 4.0, 4.0];
        let monthly = generate_monthly_revenue(120_000.0, &factors, jan_first());

        assert_relative_eq!(monthly.iter().sum::<f64>(), 120_000.0, epsilon = 1e-6);
        assert_relative_eq!(monthly[0], 120_000.0 * (2.0 / 3.0) / 12.0, epsilon = 1e-6);
        assert_relative_eq!(monthly[11], monthly[0] * 2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_monthly_revenue_uniform_fallback() {
        let monthly = generate_monthly_revenue(24_000.0, &[1.0, 2.0, 3.0], jan_first());
        assert!(monthly.iter().all(|&m| (m - 2_000.0).abs() < 1e-9));

        let zeros = generate_monthly_revenue(24_000.0, &[0.0; 12], jan_first());
        assert!(zeros.iter().all(|&m| (m - 2_000.0).abs() < 1e-9));
    }

    #[test]
    fn test_monthly_schedule_labels_months() {
        let start = NaiveDate::from_ymd_opt(2024, 11, 15).unwrap();
        let schedule = monthly_revenue_schedule(12_000.0, &[], start).unwrap();
        assert_eq!(schedule.len(), 12);
        assert_eq!(schedule[0].month_start, NaiveDate::from_ymd_opt(2024, 11, 1).unwrap());
        assert_eq!(schedule[2].month_start, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_relative_eq!(schedule[5].revenue, 1_000.0, epsilon = 1e-9);
    }
}
