//! Subscription (recurring revenue) break-even
//!
//! Static model: the subscriber count needed to cover fixed costs each month,
//! with acquisition ramp-up approximated by how many customers the fixed-cost budget
//! could acquire per month. No cohort simulation.

use super::types::SubscriptionBreakEven;
use crate::error::{ForecastError, Result};

/// Break-even for a subscription business
///
/// `churn_rate_percent` is the monthly churn rate, in percent.
pub fn subscription_break_even(
    fixed_costs: f64,
    monthly_subscription_revenue: f64,
    variable_costs_per_subscriber: f64,
    customer_acquisition_cost: f64,
    churn_rate_percent: f64,
) -> Result<SubscriptionBreakEven> {
    let margin_per_subscriber = monthly_subscription_revenue - variable_costs_per_subscriber;
    if !(margin_per_subscriber > 0.0) {
        return Err(ForecastError::NonPositiveContributionMargin {
            revenue_per_unit: monthly_subscription_revenue,
            variable_costs_per_unit: variable_costs_per_subscriber,
        });
    }
    if !(churn_rate_percent > 0.0 && churn_rate_percent <= 100.0) {
        return Err(ForecastError::InvalidInput(format!(
            "churn rate must be in (0, 100] percent, got {}",
            churn_rate_percent
        )));
    }
    if !(customer_acquisition_cost > 0.0) {
        return Err(ForecastError::InvalidInput(format!(
            "customer acquisition cost must be positive, got {}",
            customer_acquisition_cost
        )));
    }

    let average_lifetime_months = 1.0 / (churn_rate_percent / 100.0);
    let ltv = margin_per_subscriber * average_lifetime_months;
    let ltv_cac_ratio = ltv / customer_acquisition_cost;

    let break_even_subscribers = fixed_costs / margin_per_subscriber;
    let break_even_revenue = break_even_subscribers * monthly_subscription_revenue;

    let break_even_months = if fixed_costs > 0.0 {
        let acquired_per_month = fixed_costs / customer_acquisition_cost;
        let months = (break_even_subscribers / acquired_per_month).ceil();
        if months <= f64::from(u32::MAX) {
            months as u32
        } else {
            log::warn!(
                "Subscription break-even takes {} months, reporting {}",
                months,
                u32::MAX
            );
            u32::MAX
        }
    } else {
        0
    };

    Ok(SubscriptionBreakEven {
        break_even_subscribers,
        break_even_revenue,
        break_even_months,
        ltv,
        cac: customer_acquisition_cost,
        ltv_cac_ratio,
    })
}
