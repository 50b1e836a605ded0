//! Plan Forecast CLI
//!
//! Command-line front end for the forecasting engine. Every subcommand prints a text
//! summary, or JSON with --json. Engine settings come from --config (JSON) and the
//! FORECAST_* environment variables.

use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};

use plan_forecast::dates::parse_iso_date;
use plan_forecast::loader::{load_investment_cases, load_product_lines, load_series};
use plan_forecast::profitability::{calculate_discounted_payback_period, calculate_irr_precise};
use plan_forecast::revenue::monthly_revenue_schedule;
use plan_forecast::{
    ConfidenceLevel, EngineConfig, ForecastEngine, PeriodType, ProjectionMethod,
    RevenueProjection, ScenarioRunner,
};

#[derive(Parser)]
#[command(name = "plan-forecast", version, about = "Revenue, break-even and profitability projections")]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Engine configuration file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Project revenue for one period
    Revenue {
        #[arg(long)]
        base: f64,
        /// Growth rate, percent
        #[arg(long)]
        growth: f64,
        #[arg(long, default_value = "annual")]
        period: PeriodType,
        #[arg(long, default_value = "medium")]
        confidence: ConfidenceLevel,
        #[arg(long, default_value = "linear")]
        method: ProjectionMethod,
        /// Past growth rates (percent, oldest first) for the historical method
        #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
        history: Vec<f64>,
    },
    /// Spread annual revenue over twelve months
    Monthly {
        #[arg(long)]
        annual: f64,
        /// Twelve seasonality weights
        #[arg(long, value_delimiter = ',')]
        factors: Vec<f64>,
        #[arg(long, value_parser = parse_date)]
        start: NaiveDate,
    },
    /// Single product break-even
    BreakEven {
        #[arg(long)]
        fixed_costs: f64,
        #[arg(long)]
        price: f64,
        #[arg(long)]
        variable_cost: f64,
        #[command(flatten)]
        sales: SeriesInput,
        #[arg(long, value_parser = parse_date)]
        start: NaiveDate,
    },
    /// Break-even for a sales mix read from CSV
    MultiProduct {
        #[arg(long)]
        fixed_costs: f64,
        /// CSV with name,revenue_per_unit,variable_cost_per_unit,sales_mix
        #[arg(long)]
        products: PathBuf,
    },
    /// Subscription business break-even
    Subscription {
        #[arg(long)]
        fixed_costs: f64,
        /// Monthly subscription price
        #[arg(long)]
        price: f64,
        #[arg(long)]
        variable_cost: f64,
        #[arg(long)]
        cac: f64,
        /// Monthly churn, percent
        #[arg(long)]
        churn: f64,
    },
    /// ROI, NPV, IRR, payback and MIRR for one investment
    Profitability {
        #[arg(long)]
        investment: f64,
        #[command(flatten)]
        flows: SeriesInput,
        /// Discount rate, percent
        #[arg(long)]
        rate: f64,
        /// Treat the rate as annual but the periods as months
        #[arg(long)]
        monthly: bool,
        /// MIRR financing rate, percent (defaults to the discount rate)
        #[arg(long)]
        financing_rate: Option<f64>,
        /// MIRR reinvestment rate, percent (defaults to the discount rate)
        #[arg(long)]
        reinvestment_rate: Option<f64>,
        /// Also solve IRR to full precision, allowing negative and >100% rates
        #[arg(long)]
        precise_irr: bool,
    },
    /// NPV across a range of discount rates
    Sensitivity {
        #[arg(long)]
        investment: f64,
        #[command(flatten)]
        flows: SeriesInput,
        #[arg(long, value_delimiter = ',', required = true)]
        rates: Vec<f64>,
        #[arg(long)]
        monthly: bool,
    },
    /// Evaluate a JSON array of investment cases in parallel
    Batch {
        #[arg(long)]
        cases: PathBuf,
    },
    /// Validate a revenue projection (JSON)
    Validate {
        #[arg(long)]
        projection: PathBuf,
    },
}

/// Per-period amounts given inline or as a `period,amount` CSV file
#[derive(Args)]
struct SeriesInput {
    #[arg(long = "values", value_delimiter = ',', allow_negative_numbers = true)]
    values: Vec<f64>,
    #[arg(long = "values-file", conflicts_with = "values")]
    values_file: Option<PathBuf>,
}

impl SeriesInput {
    fn resolve(&self) -> anyhow::Result<Vec<f64>> {
        match &self.values_file {
            Some(path) => load_series(path)
                .with_context(|| format!("reading series from {}", path.display())),
            None => Ok(self.values.clone()),
        }
    }
}

fn parse_date(input: &str) -> Result<NaiveDate, String> {
    parse_iso_date(input).map_err(|e| e.to_string())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    match path {
        Some(path) => Ok(EngineConfig::from_json_path(path)
            .with_context(|| format!("loading config from {}", path.display()))?
            .with_env_overrides()),
        None => Ok(EngineConfig::from_env()),
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn fmt_optional(value: Option<f64>, suffix: &str) -> String {
    match value {
        Some(v) => format!("{:.2}{}", v, suffix),
        None => "n/a".to_string(),
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProfitabilityReport {
    #[serde(flatten)]
    result: plan_forecast::ProfitabilityResult,
    discounted_payback_period: Option<f64>,
    mirr: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    irr_precise: Option<f64>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let engine = ForecastEngine::new(load_config(cli.config.as_deref())?);

    match cli.command {
        Command::Revenue { base, growth, period, confidence, method, history } => {
            let revenue = engine.revenue().calculate_projected_revenue(
                base, growth, period, confidence, method, &history,
            );
            if cli.json {
                print_json(&serde_json::json!({ "projectedRevenue": revenue }))?;
            } else {
                println!("Projected revenue ({}, {}, {} confidence): {:.2}", method, period, confidence, revenue);
            }
        }

        Command::Monthly { annual, factors, start } => {
            let schedule = monthly_revenue_schedule(annual, &factors, start)?;
            if cli.json {
                print_json(&schedule)?;
            } else {
                println!("{:>10} {:>14}", "Month", "Revenue");
                println!("{}", "-".repeat(25));
                for month in &schedule {
                    println!("{:>10} {:>14.2}", month.month_start.format("%Y-%m"), month.revenue);
                }
            }
        }

        Command::BreakEven { fixed_costs, price, variable_cost, sales, start } => {
            let sales = sales.resolve()?;
            let result = engine
                .break_even()
                .calculate_break_even(fixed_costs, price, variable_cost, &sales, start)?;
            if cli.json {
                print_json(&result)?;
            } else {
                println!("Break-even analysis:");
                println!("  Units at break-even: {:.2}", result.units_at_break_even);
                println!("  Break-even revenue:  {:.2}", result.break_even_point);
                match (result.months_to_break_even, result.break_even_date) {
                    (Some(months), Some(date)) => println!("  Reached in month {} ({})", months, date),
                    _ => println!("  Not reached with the projected sales"),
                }
                for assumption in &result.assumptions {
                    println!("  - {}", assumption);
                }
            }
        }

        Command::MultiProduct { fixed_costs, products } => {
            let products = load_product_lines(&products)
                .with_context(|| format!("reading products from {}", products.display()))?;
            let result = engine
                .break_even()
                .calculate_multi_product_break_even(fixed_costs, &products)?;
            if cli.json {
                print_json(&result)?;
            } else {
                println!("Break-even revenue: {:.2}", result.break_even_revenue);
                println!("Break-even units:   {:.2}", result.break_even_units);
                println!("Weighted CM ratio:  {:.2}%", result.contribution_margin_ratio * 100.0);
                println!("{:>20} {:>12} {:>14}", "Product", "Units", "Revenue");
                for product in &result.break_even_by_product {
                    println!("{:>20} {:>12.2} {:>14.2}", product.name, product.units, product.revenue);
                }
            }
        }

        Command::Subscription { fixed_costs, price, variable_cost, cac, churn } => {
            let result = engine
                .break_even()
                .calculate_subscription_break_even(fixed_costs, price, variable_cost, cac, churn)?;
            if cli.json {
                print_json(&result)?;
            } else {
                println!("Subscribers at break-even: {:.1}", result.break_even_subscribers);
                println!("MRR at break-even:         {:.2}", result.break_even_revenue);
                println!("Months to break-even:      {}", result.break_even_months);
                println!("LTV: {:.2}  CAC: {:.2}  LTV/CAC: {:.2}", result.ltv, result.cac, result.ltv_cac_ratio);
            }
        }

        Command::Profitability { investment, flows, rate, monthly, financing_rate, reinvestment_rate, precise_irr } => {
            let flows = flows.resolve()?;
            if flows.is_empty() {
                bail!("no cash flows given; use --values or --values-file");
            }
            let annualized = !monthly;
            let analyzer = engine.profitability();
            let result = analyzer.calculate_profitability(investment, &flows, rate, annualized)?;
            let report = ProfitabilityReport {
                discounted_payback_period: calculate_discounted_payback_period(investment, &flows, rate, annualized),
                mirr: analyzer.calculate_mirr(
                    investment,
                    &flows,
                    financing_rate.unwrap_or(rate),
                    reinvestment_rate.unwrap_or(rate),
                ),
                irr_precise: if precise_irr { calculate_irr_precise(investment, &flows) } else { None },
                result,
            };

            if cli.json {
                print_json(&report)?;
            } else {
                let r = &report.result;
                println!("Profitability ({} periods at {:.2}%):", r.cash_flows.len(), r.discount_rate);
                println!("  ROI:                 {:.2}%", r.roi);
                println!("  NPV:                 {:.2}", r.npv);
                println!("  IRR:                 {:.2}%", r.irr);
                if precise_irr {
                    println!("  IRR (precise):       {}", fmt_optional(report.irr_precise, "%"));
                }
                println!("  Payback:             {}", fmt_optional(r.payback_period, " periods"));
                println!("  Discounted payback:  {}", fmt_optional(report.discounted_payback_period, " periods"));
                println!("  Profitability index: {:.3}", r.profitability_index);
                println!("  MIRR:                {}", fmt_optional(report.mirr, "%"));
            }
        }

        Command::Sensitivity { investment, flows, rates, monthly } => {
            let flows = flows.resolve()?;
            let runner = ScenarioRunner::new(engine.profitability().clone());
            let grid = runner.discount_rate_sensitivity(investment, &flows, &rates, !monthly);
            if cli.json {
                print_json(&grid)?;
            } else {
                println!("{:>8} {:>16} {:>8}", "Rate%", "NPV", "PI");
                println!("{}", "-".repeat(34));
                for point in &grid {
                    println!("{:>8.2} {:>16.2} {:>8.3}", point.discount_rate, point.npv, point.profitability_index);
                }
            }
        }

        Command::Batch { cases } => {
            let cases = load_investment_cases(&cases)
                .with_context(|| format!("reading cases from {}", cases.display()))?;
            let runner = ScenarioRunner::new(engine.profitability().clone());
            let outcomes = runner.run_batch(&cases);
            if cli.json {
                print_json(&outcomes)?;
            } else {
                println!("{:>20} {:>14} {:>10} {:>10}", "Case", "NPV", "IRR%", "ROI%");
                println!("{}", "-".repeat(57));
                for outcome in &outcomes {
                    match (&outcome.result, &outcome.error) {
                        (Some(r), _) => println!("{:>20} {:>14.2} {:>10.2} {:>10.2}", outcome.name, r.npv, r.irr, r.roi),
                        (None, error) => println!("{:>20} error: {}", outcome.name, error.as_deref().unwrap_or("unknown")),
                    }
                }
                let stats = runner.analyzer().cache().stats();
                println!("\nCache: {} entries, hit rate {:.1}%", stats.entries, stats.hit_rate() * 100.0);
            }
        }

        Command::Validate { projection } => {
            let file = std::fs::File::open(&projection)
                .with_context(|| format!("opening {}", projection.display()))?;
            let parsed: RevenueProjection = serde_json::from_reader(file)
                .with_context(|| format!("parsing {}", projection.display()))?;
            let report = engine.validate_revenue_projection(&parsed);
            if cli.json {
                print_json(&report)?;
            } else if report.is_valid {
                println!("Projection is valid (expected revenue {:.2})", parsed.expected_revenue());
            } else {
                println!("Projection has {} problem(s):", report.errors.len());
                for error in &report.errors {
                    println!("  - {}", error);
                }
            }
            if !report.is_valid {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
