//! Revenue projections: growth methods, seasonality, scenario validation

mod types;
mod calculator;
mod validation;

pub use types::{
    ConfidenceLevel, MonthlyRevenue, Period, PeriodType, ProjectionMethod, RevenueCategory,
    RevenueProjection, RevenueScenario, ValidationReport,
};
pub use calculator::{
    generate_monthly_revenue, monthly_revenue_schedule, projected_revenue,
    weighted_average_growth, RevenueProjectionCalculator, MONTHS_PER_YEAR,
};
pub use validation::{validate_revenue_projection, validate_with_tolerance};
