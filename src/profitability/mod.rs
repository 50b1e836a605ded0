//! Investment profitability: ROI, NPV, IRR, payback, profitability index, MIRR

mod types;
mod metrics;
mod irr;
mod analyzer;

pub use types::{InvestmentCase, ProfitabilityResult};
pub use metrics::{
    calculate_discounted_payback_period, calculate_mirr, calculate_npv, calculate_payback_period,
    calculate_profitability_index, calculate_roi, period_rate,
};
pub use irr::{calculate_irr, calculate_irr_precise, calculate_irr_with};
pub use analyzer::{profitability, ProfitabilityAnalyzer};
