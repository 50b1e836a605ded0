//! Plan Forecast - financial projection engine for business plans
//!
//! This library provides:
//! - Revenue projections (linear, compound, historical, custom growth) and seasonality
//! - Break-even analysis for single products, sales mixes and subscriptions
//! - Investment profitability: ROI, NPV, IRR, payback period, profitability index, MIRR
//! - Bounded memoization shared by the calculators
//! - Parallel batch and sensitivity runs

pub mod error;
pub mod config;
pub mod cache;
pub mod dates;
pub mod revenue;
pub mod break_even;
pub mod profitability;
pub mod engine;
pub mod scenario;
pub mod loader;

// Re-export commonly used types
pub use error::{ForecastError, Result};
pub use config::{EngineConfig, IrrSettings};
pub use cache::{CacheKey, CacheStats, MemoCache};
pub use revenue::{
    ConfidenceLevel, Period, PeriodType, ProjectionMethod, RevenueProjection,
    RevenueProjectionCalculator, RevenueScenario, ValidationReport,
};
pub use break_even::{BreakEvenAnalyzer, BreakEvenResult, ProductLine};
pub use profitability::{InvestmentCase, ProfitabilityAnalyzer, ProfitabilityResult};
pub use engine::ForecastEngine;
pub use scenario::ScenarioRunner;
