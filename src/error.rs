//! Error types for the forecasting engine

/// Errors raised when a calculation is ill-posed or an input file cannot be read
#[derive(Debug, thiserror::Error)]
pub enum ForecastError {
    /// Revenue per unit does not exceed variable cost per unit
    #[error(
        "contribution margin must be positive (revenue per unit {revenue_per_unit}, variable cost per unit {variable_costs_per_unit})"
    )]
    NonPositiveContributionMargin {
        revenue_per_unit: f64,
        variable_costs_per_unit: f64,
    },

    /// Product sales mix percentages do not add up to 100
    #[error("sales mix must total 100%, got {total:.2}%")]
    SalesMixNotBalanced { total: f64 },

    /// A parameter is outside the domain the formula is defined on
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A date string is not ISO-8601 or a month offset overflows the calendar
    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, ForecastError>;
