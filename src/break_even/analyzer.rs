//! Single and multi-product break-even analysis

use chrono::NaiveDate;
use std::sync::Arc;

use super::subscription::subscription_break_even;
use super::types::{
    BreakEvenResult, MultiProductBreakEven, ProductBreakEven, ProductLine, SubscriptionBreakEven,
};
use crate::cache::{CacheKey, MemoCache};
use crate::config::DEFAULT_PERCENT_TOLERANCE;
use crate::dates;
use crate::error::{ForecastError, Result};

/// Break-even for a single product without touching any cache
///
/// `projected_unit_sales` holds expected units per month starting at `start_date`.
pub fn break_even(
    fixed_costs: f64,
    revenue_per_unit: f64,
    variable_costs_per_unit: f64,
    projected_unit_sales: &[f64],
    start_date: NaiveDate,
) -> Result<BreakEvenResult> {
    let contribution_margin = revenue_per_unit - variable_costs_per_unit;
    // NaN inputs are rejected here as well
    if !(contribution_margin > 0.0) {
        return Err(ForecastError::NonPositiveContributionMargin {
            revenue_per_unit,
            variable_costs_per_unit,
        });
    }

    let units_at_break_even = fixed_costs / contribution_margin;
    let break_even_point = units_at_break_even * revenue_per_unit;

    let mut assumptions = vec![
        format!(
            "Contribution margin of {:.2} per unit ({:.1}% of price)",
            contribution_margin,
            contribution_margin / revenue_per_unit * 100.0
        ),
        format!(
            "Fixed costs of {:.2} are covered after {:.2} units",
            fixed_costs, units_at_break_even
        ),
    ];

    let months_to_break_even = match months_to_cover(units_at_break_even, projected_unit_sales) {
        SalesCoverage::WithinSchedule(month) => Some(month),
        SalesCoverage::Extrapolated { month, average } => {
            log::warn!(
                "Break-even not reached within {} projected months, extrapolated to month {}",
                projected_unit_sales.len(),
                month
            );
            assumptions.push(format!(
                "Extrapolated beyond the {}-month sales projection at {:.2} units per month",
                projected_unit_sales.len(),
                average
            ));
            Some(month)
        }
        SalesCoverage::Never => {
            log::warn!("Projected unit sales never cover {:.2} units", units_at_break_even);
            assumptions.push("Projected sales never cover fixed costs".to_string());
            None
        }
    };

    let break_even_date = months_to_break_even.and_then(|months| {
        dates::add_months(start_date, months.saturating_sub(1))
            .map_err(|e| log::warn!("No break-even date: {}", e))
            .ok()
    });

    Ok(BreakEvenResult {
        break_even_point,
        break_even_date,
        months_to_break_even,
        fixed_costs,
        variable_costs_per_unit,
        revenue_per_unit,
        units_at_break_even,
        assumptions,
    })
}

enum SalesCoverage {
    WithinSchedule(u32),
    Extrapolated { month: u32, average: f64 },
    Never,
}

fn months_to_cover(units: f64, monthly_sales: &[f64]) -> SalesCoverage {
    let mut cumulative = 0.0;
    for (i, &sales) in monthly_sales.iter().enumerate() {
        cumulative += sales;
        if cumulative >= units {
            return SalesCoverage::WithinSchedule(i as u32 + 1);
        }
    }

    if monthly_sales.is_empty() {
        return SalesCoverage::Never;
    }

    let average = cumulative / monthly_sales.len() as f64;
    let month = (units / average).ceil();
    if average > 0.0 && month.is_finite() && month <= u32::MAX as f64 {
        SalesCoverage::Extrapolated {
            month: (month as u32).max(1),
            average,
        }
    } else {
        SalesCoverage::Never
    }
}

/// Break-even for a weighted sales mix without touching any cache
///
/// `sales_mix` values are percentages and must total 100 within `mix_tolerance`.
pub fn multi_product_break_even(
    fixed_costs: f64,
    products: &[ProductLine],
    mix_tolerance: f64,
) -> Result<MultiProductBreakEven> {
    let total_mix: f64 = products.iter().map(|p| p.sales_mix).sum();
    if !((total_mix - 100.0).abs() <= mix_tolerance) {
        return Err(ForecastError::SalesMixNotBalanced { total: total_mix });
    }
    // Every product contributes to the weighted ratio, so its price must be usable
    if let Some(product) = products.iter().find(|p| !(p.revenue_per_unit > 0.0)) {
        return Err(ForecastError::InvalidInput(format!(
            "product '{}' must have a positive revenue per unit, got {}",
            product.name, product.revenue_per_unit
        )));
    }

    let mut weighted_margin = 0.0;
    let mut weighted_ratio = 0.0;
    for product in products {
        let share = product.sales_mix / 100.0;
        weighted_margin += product.contribution_margin() * share;
        weighted_ratio += product.contribution_margin() / product.revenue_per_unit * share;
    }

    if !(weighted_margin > 0.0 && weighted_ratio > 0.0) {
        let weighted_price: f64 = products
            .iter()
            .map(|p| p.revenue_per_unit * p.sales_mix / 100.0)
            .sum();
        let weighted_cost: f64 = products
            .iter()
            .map(|p| p.variable_cost_per_unit * p.sales_mix / 100.0)
            .sum();
        return Err(ForecastError::NonPositiveContributionMargin {
            revenue_per_unit: weighted_price,
            variable_costs_per_unit: weighted_cost,
        });
    }

    let break_even_units = fixed_costs / weighted_margin;
    let break_even_revenue = fixed_costs / weighted_ratio;

    let break_even_by_product = products
        .iter()
        .map(|product| {
            let units = break_even_units * product.sales_mix / 100.0;
            ProductBreakEven {
                name: product.name.clone(),
                units,
                revenue: units * product.revenue_per_unit,
            }
        })
        .collect();

    Ok(MultiProductBreakEven {
        break_even_revenue,
        break_even_units,
        weighted_contribution_margin: weighted_margin,
        contribution_margin_ratio: weighted_ratio,
        break_even_by_product,
    })
}

/// Break-even analyzer with memoized single-product results
#[derive(Debug, Clone)]
pub struct BreakEvenAnalyzer {
    cache: Arc<MemoCache<BreakEvenResult>>,
    sales_mix_tolerance: f64,
}

impl Default for BreakEvenAnalyzer {
    fn default() -> Self {
        Self::with_cache(Arc::new(MemoCache::default()))
    }
}

impl BreakEvenAnalyzer {
    /// Create an analyzer with a private cache of the given capacity
    pub fn new(cache_capacity: usize) -> Self {
        Self::with_cache(Arc::new(MemoCache::new(cache_capacity)))
    }

    /// Create an analyzer over an existing (possibly shared) cache
    pub fn with_cache(cache: Arc<MemoCache<BreakEvenResult>>) -> Self {
        Self {
            cache,
            sales_mix_tolerance: DEFAULT_PERCENT_TOLERANCE,
        }
    }

    pub fn with_sales_mix_tolerance(mut self, tolerance: f64) -> Self {
        self.sales_mix_tolerance = tolerance;
        self
    }

    pub fn cache(&self) -> &Arc<MemoCache<BreakEvenResult>> {
        &self.cache
    }

    /// Memoized [`break_even`]; failures are not cached
    pub fn calculate_break_even(
        &self,
        fixed_costs: f64,
        revenue_per_unit: f64,
        variable_costs_per_unit: f64,
        projected_unit_sales: &[f64],
        start_date: NaiveDate,
    ) -> Result<BreakEvenResult> {
        let key = CacheKey::new("break_even")
            .number(fixed_costs)
            .number(revenue_per_unit)
            .number(variable_costs_per_unit)
            .numbers(projected_unit_sales)
            .text(start_date);

        self.cache.get_or_try_insert_with(key, || {
            break_even(
                fixed_costs,
                revenue_per_unit,
                variable_costs_per_unit,
                projected_unit_sales,
                start_date,
            )
        })
    }

    pub fn calculate_multi_product_break_even(
        &self,
        fixed_costs: f64,
        products: &[ProductLine],
    ) -> Result<MultiProductBreakEven> {
        multi_product_break_even(fixed_costs, products, self.sales_mix_tolerance)
    }

    pub fn calculate_subscription_break_even(
        &self,
        fixed_costs: f64,
        monthly_subscription_revenue: f64,
        variable_costs_per_subscriber: f64,
        customer_acquisition_cost: f64,
        churn_rate_percent: f64,
    ) -> Result<SubscriptionBreakEven> {
        subscription_break_even(
            fixed_costs,
            monthly_subscription_revenue,
            variable_costs_per_subscriber,
            customer_acquisition_cost,
            churn_rate_percent,
        )
    }
}
