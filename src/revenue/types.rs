//! Revenue projection records and enumerations

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::break_even::BreakEvenResult;
use crate::dates;
use crate::error::ForecastError;

/// Granularity of a projection period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    Monthly,
    Quarterly,
    Annual,
}

impl PeriodType {
    /// Fraction of a year one period covers
    pub fn year_fraction(&self) -> f64 {
        match self {
            PeriodType::Monthly => 1.0 / 12.0,
            PeriodType::Quarterly => 1.0 / 4.0,
            PeriodType::Annual => 1.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodType::Monthly => "monthly",
            PeriodType::Quarterly => "quarterly",
            PeriodType::Annual => "annual",
        }
    }
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PeriodType {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "monthly" => Ok(PeriodType::Monthly),
            "quarterly" => Ok(PeriodType::Quarterly),
            "annual" | "yearly" => Ok(PeriodType::Annual),
            other => Err(ForecastError::InvalidInput(format!(
                "unknown period type '{}'",
                other
            ))),
        }
    }
}

/// Qualitative confidence in a growth assumption
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    /// Multiplier applied to the growth effect
    pub fn factor(&self) -> f64 {
        match self {
            ConfidenceLevel::Low => 0.8,
            ConfidenceLevel::Medium => 1.0,
            ConfidenceLevel::High => 1.2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLevel::Low => "low",
            ConfidenceLevel::Medium => "medium",
            ConfidenceLevel::High => "high",
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfidenceLevel {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(ConfidenceLevel::Low),
            "medium" => Ok(ConfidenceLevel::Medium),
            "high" => Ok(ConfidenceLevel::High),
            other => Err(ForecastError::InvalidInput(format!(
                "unknown confidence level '{}'",
                other
            ))),
        }
    }
}

/// How growth is applied to the base revenue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionMethod {
    Linear,
    Compound,
    Historical,
    Custom,
    /// Any method name the engine does not know; projects no growth
    #[serde(other)]
    Unrecognized,
}

impl ProjectionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectionMethod::Linear => "linear",
            ProjectionMethod::Compound => "compound",
            ProjectionMethod::Historical => "historical",
            ProjectionMethod::Custom => "custom",
            ProjectionMethod::Unrecognized => "unrecognized",
        }
    }
}

impl fmt::Display for ProjectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectionMethod {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "linear" => ProjectionMethod::Linear,
            "compound" => ProjectionMethod::Compound,
            "historical" => ProjectionMethod::Historical,
            "custom" => ProjectionMethod::Custom,
            other => {
                log::warn!("Unrecognized projection method '{}', growth will not be applied", other);
                ProjectionMethod::Unrecognized
            }
        })
    }
}

/// Time window a projection covers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub period_type: PeriodType,
}

impl Period {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate, period_type: PeriodType) -> Self {
        Self {
            start_date,
            end_date,
            period_type,
        }
    }

    /// Calendar months touched by the period
    pub fn months(&self) -> u32 {
        dates::months_spanned(self.start_date, self.end_date)
    }
}

/// One hypothesis within a revenue projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueScenario {
    pub id: String,
    pub name: String,
    pub projected_revenue: f64,
    pub baseline_revenue: f64,
    pub probability_percentage: f64,
    pub is_preferred: bool,
    #[serde(default)]
    pub assumptions: Vec<String>,
}

/// Revenue attributed to one category (product line, channel...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueCategory {
    pub category: String,
    pub amount: f64,
}

/// A plan's revenue projection with its competing scenarios
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RevenueProjection {
    pub id: String,
    pub plan_id: String,
    pub period: Option<Period>,
    pub total_revenue: f64,
    pub scenarios: Vec<RevenueScenario>,
    pub revenue_breakdown: Vec<RevenueCategory>,
    pub break_even: Option<BreakEvenResult>,
}

impl RevenueProjection {
    /// The scenario flagged as preferred, if exactly one is
    pub fn preferred_scenario(&self) -> Option<&RevenueScenario> {
        let mut preferred = self.scenarios.iter().filter(|s| s.is_preferred);
        match (preferred.next(), preferred.next()) {
            (Some(scenario), None) => Some(scenario),
            _ => None,
        }
    }

    /// Probability-weighted projected revenue across all scenarios
    pub fn expected_revenue(&self) -> f64 {
        self.scenarios
            .iter()
            .map(|s| s.projected_revenue * s.probability_percentage / 100.0)
            .sum()
    }

    /// Sum of scenario probabilities, in percent
    pub fn total_probability(&self) -> f64 {
        self.scenarios.iter().map(|s| s.probability_percentage).sum()
    }
}

/// Outcome of a non-throwing pre-flight check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

/// Revenue attributed to one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRevenue {
    pub month_start: NaiveDate,
    pub revenue: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario(id: &str, revenue: f64, probability: f64, preferred: bool) -> RevenueScenario {
        RevenueScenario {
            id: id.to_string(),
            name: id.to_string(),
            projected_revenue: revenue,
            baseline_revenue: 100_000.0,
            probability_percentage: probability,
            is_preferred: preferred,
            assumptions: Vec::new(),
        }
    }

    #[test]
    fn test_method_parsing_falls_back() {
        assert_eq!("Compound".parse::<ProjectionMethod>().unwrap(), ProjectionMethod::Compound);
        assert_eq!("monte-carlo".parse::<ProjectionMethod>().unwrap(), ProjectionMethod::Unrecognized);
    }

    #[test]
    fn test_method_deserializes_unknown() {
        let method: ProjectionMethod = serde_json::from_str("\"seasonal\"").unwrap();
        assert_eq!(method, ProjectionMethod::Unrecognized);
    }

    #[test]
    fn test_period_type_parsing() {
        assert_eq!("ANNUAL".parse::<PeriodType>().unwrap(), PeriodType::Annual);
        assert!("weekly".parse::<PeriodType>().is_err());
        assert!("extreme".parse::<ConfidenceLevel>().is_err());
    }

    #[test]
    fn test_expected_revenue_and_preferred() {
        let projection = RevenueProjection {
            scenarios: vec![
                scenario("pessimistic", 80_000.0, 25.0, false),
                scenario("base", 100_000.0, 50.0, true),
                scenario("optimistic", 140_000.0, 25.0, false),
            ],
            ..Default::default()
        };

        assert_eq!(projection.preferred_scenario().map(|s| s.id.as_str()), Some("base"));
        assert!((projection.expected_revenue() - 105_000.0).abs() < 1e-9);
        assert!((projection.total_probability() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_preferred_requires_exactly_one() {
        let projection = RevenueProjection {
            scenarios: vec![scenario("a", 1.0, 50.0, true), scenario("b", 1.0, 50.0, true)],
            ..Default::default()
        };
        assert!(projection.preferred_scenario().is_none());
    }

    #[test]
    fn test_projection_json_shape() {
        let json = r#"{
            "id": "p1",
            "planId": "plan-7",
            "period": { "startDate": "2024-01-01", "endDate": "2024-12-31", "periodType": "annual" },
            "totalRevenue": 120000,
            "scenarios": [{
                "id": "s1", "name": "Base", "projectedRevenue": 120000, "baselineRevenue": 100000,
                "probabilityPercentage": 100, "isPreferred": true
            }]
        }"#;
        let projection: RevenueProjection = serde_json::from_str(json).unwrap();
        assert_eq!(projection.plan_id, "plan-7");
        assert_eq!(projection.period.as_ref().map(|p| p.months()), Some(12));
        assert!(projection.break_even.is_none());
    }
}
