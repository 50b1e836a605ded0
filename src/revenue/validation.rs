//! Pre-flight checks for revenue projections

use super::types::{RevenueProjection, ValidationReport};
use crate::config::DEFAULT_PERCENT_TOLERANCE;

/// Validate a projection with the default probability tolerance
pub fn validate_revenue_projection(projection: &RevenueProjection) -> ValidationReport {
    validate_with_tolerance(projection, DEFAULT_PERCENT_TOLERANCE)
}

/// Collect every problem with `projection` instead of stopping at the first
pub fn validate_with_tolerance(
    projection: &RevenueProjection,
    probability_tolerance: f64,
) -> ValidationReport {
    let mut errors = Vec::new();

    if projection.id.trim().is_empty() {
        errors.push("Projection ID is required".to_string());
    }
    if projection.plan_id.trim().is_empty() {
        errors.push("Plan ID is required".to_string());
    }
    if projection.period.is_none() {
        errors.push("Projection period is required".to_string());
    }
    // NaN fails this too
    if !(projection.total_revenue >= 0.0) {
        errors.push(format!(
            "Total revenue must be non-negative, got {}",
            projection.total_revenue
        ));
    }

    if projection.scenarios.is_empty() {
        errors.push("At least one revenue scenario is required".to_string());
    } else {
        let preferred = projection.scenarios.iter().filter(|s| s.is_preferred).count();
        if preferred != 1 {
            errors.push(format!(
                "Exactly one scenario must be marked as preferred, found {}",
                preferred
            ));
        }

        let total = projection.total_probability();
        if !((total - 100.0).abs() <= probability_tolerance) {
            errors.push(format!(
                "Scenario probabilities must sum to 100%, got {:.2}%",
                total
            ));
        }
    }

    ValidationReport::from_errors(errors)
}
