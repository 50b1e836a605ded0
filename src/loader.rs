//! Load calculator inputs from CSV and JSON files
//!
//! Series files (cash flows, unit sales) have `period,amount` columns; rows are
//! ordered by period regardless of their order in the file.

use serde::Deserialize;
use std::fs::File;
use std::path::Path;

use crate::break_even::ProductLine;
use crate::error::Result;
use crate::profitability::InvestmentCase;

/// Raw row of a per-period series file
#[derive(Debug, Deserialize)]
struct SeriesRow {
    period: u32,
    amount: f64,
}

/// Raw row of a product mix file
#[derive(Debug, Deserialize)]
struct ProductRow {
    name: String,
    revenue_per_unit: f64,
    variable_cost_per_unit: f64,
    sales_mix: f64,
}

impl From<ProductRow> for ProductLine {
    fn from(row: ProductRow) -> Self {
        ProductLine {
            name: row.name,
            revenue_per_unit: row.revenue_per_unit,
            variable_cost_per_unit: row.variable_cost_per_unit,
            sales_mix: row.sales_mix,
        }
    }
}

/// Load a per-period series (cash flows or unit sales), ordered by period
pub fn load_series(path: &Path) -> Result<Vec<f64>> {
    let mut reader = csv::Reader::from_reader(File::open(path)?);

    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let row: SeriesRow = result?;
        rows.push(row);
    }
    rows.sort_by_key(|row| row.period);

    log::debug!("Loaded {} periods from {}", rows.len(), path.display());
    Ok(rows.into_iter().map(|row| row.amount).collect())
}

/// Load product lines with `name,revenue_per_unit,variable_cost_per_unit,sales_mix` columns
pub fn load_product_lines(path: &Path) -> Result<Vec<ProductLine>> {
    let mut reader = csv::Reader::from_reader(File::open(path)?);

    let mut products = Vec::new();
    for result in reader.deserialize() {
        let row: ProductRow = result?;
        products.push(ProductLine::from(row));
    }

    log::debug!("Loaded {} product lines from {}", products.len(), path.display());
    Ok(products)
}

/// Load a JSON array of investment cases
pub fn load_investment_cases(path: &Path) -> Result<Vec<InvestmentCase>> {
    let file = File::open(path)?;
    let cases: Vec<InvestmentCase> = serde_json::from_reader(file)?;
    log::debug!("Loaded {} investment cases from {}", cases.len(), path.display());
    Ok(cases)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ForecastError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_series_orders_by_period() {
        let file = write_temp("period,amount\n2,35000\n1,30000\n3,40000\n");
        let series = load_series(file.path()).unwrap();
        assert_eq!(series, vec![30_000.0, 35_000.0, 40_000.0]);
    }

    #[test]
    fn test_load_series_rejects_bad_numbers() {
        let file = write_temp("period,amount\n1,lots\n");
        assert!(matches!(load_series(file.path()), Err(ForecastError::Csv(_))));
    }

    #[test]
    fn test_load_product_lines() {
        let file = write_temp(
            "name,revenue_per_unit,variable_cost_per_unit,sales_mix\n\
             basic,20,10,60\n\
             premium,100,40,40\n",
        );
        let products = load_product_lines(file.path()).unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[1].name, "premium");
        assert_eq!(products[1].contribution_margin(), 60.0);
    }

    #[test]
    fn test_load_investment_cases() {
        let file = write_temp(
            r#"[{ "name": "a", "initialInvestment": 1000, "cashFlows": [600, 600], "discountRate": 5 },
                { "name": "b", "initialInvestment": 1000, "cashFlows": [100], "discountRate": 12, "annualizedRate": false }]"#,
        );
        let cases = load_investment_cases(file.path()).unwrap();
        assert_eq!(cases.len(), 2);
        assert!(cases[0].annualized_rate);
        assert!(!cases[1].annualized_rate);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            load_series(Path::new("/nonexistent/cash_flows.csv")),
            Err(ForecastError::Io(_))
        ));
    }
}
