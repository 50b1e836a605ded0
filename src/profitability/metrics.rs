//! Investment metrics over a per-period cash-flow schedule
//!
//! Cash flows are net amounts at the end of periods 1..=n; the initial investment
//! is an outflow at period 0 given as a positive amount. Rates are percentages.

/// Return on investment, in percent
pub fn calculate_roi(initial_investment: f64, cash_flows: &[f64]) -> f64 {
    let total: f64 = cash_flows.iter().sum();
    (total - initial_investment) / initial_investment * 100.0
}

/// Per-period rate as a fraction: annual percent, or monthly when not annualized
pub fn period_rate(discount_rate: f64, annualized_rate: bool) -> f64 {
    if annualized_rate {
        discount_rate / 100.0
    } else {
        discount_rate / 1200.0
    }
}

/// Net present value of the schedule, net of the initial investment
pub fn calculate_npv(
    initial_investment: f64,
    cash_flows: &[f64],
    discount_rate: f64,
    annualized_rate: bool,
) -> f64 {
    let rate = period_rate(discount_rate, annualized_rate);
    let present_value: f64 = cash_flows
        .iter()
        .enumerate()
        .map(|(t, &cf)| cf / (1.0 + rate).powi(t as i32 + 1))
        .sum();

    present_value - initial_investment
}

/// Periods until cumulative cash flows recover the investment
///
/// Interpolates linearly inside the recovering period; `None` when the investment
/// is never recovered.
pub fn calculate_payback_period(initial_investment: f64, cash_flows: &[f64]) -> Option<f64> {
    recover(initial_investment, cash_flows.iter().copied())
}

/// Payback period measured on discounted cash flows
pub fn calculate_discounted_payback_period(
    initial_investment: f64,
    cash_flows: &[f64],
    discount_rate: f64,
    annualized_rate: bool,
) -> Option<f64> {
    let rate = period_rate(discount_rate, annualized_rate);
    let discounted = cash_flows
        .iter()
        .enumerate()
        .map(|(t, &cf)| cf / (1.0 + rate).powi(t as i32 + 1));
    recover(initial_investment, discounted)
}

fn recover(initial_investment: f64, flows: impl Iterator<Item = f64>) -> Option<f64> {
    if initial_investment <= 0.0 {
        return Some(0.0);
    }

    let mut remaining = initial_investment;
    for (periods_passed, cf) in flows.enumerate() {
        if cf > 0.0 && remaining - cf <= 0.0 {
            return Some(periods_passed as f64 + remaining / cf);
        }
        remaining -= cf;
    }

    None
}

/// Present value of inflows per unit invested
pub fn calculate_profitability_index(initial_investment: f64, npv: f64) -> f64 {
    (npv + initial_investment) / initial_investment
}

/// Modified IRR, in percent
///
/// Outflows (the investment first, then negative flows in order) are discounted at
/// `financing_rate`; inflows are compounded to the end of the positive-flow sequence
/// at `reinvestment_rate`. Both rates are annual percentages. Returns `None` without
/// both outflows and inflows.
pub fn calculate_mirr(
    initial_investment: f64,
    cash_flows: &[f64],
    financing_rate: f64,
    reinvestment_rate: f64,
) -> Option<f64> {
    let finance = financing_rate / 100.0;
    let reinvest = reinvestment_rate / 100.0;

    let outflows: Vec<f64> = std::iter::once(initial_investment)
        .chain(cash_flows.iter().filter(|&&cf| cf < 0.0).map(|cf| cf.abs()))
        .collect();
    let inflows: Vec<f64> = cash_flows.iter().copied().filter(|&cf| cf > 0.0).collect();

    let present_outflows: f64 = outflows
        .iter()
        .enumerate()
        .map(|(t, &cf)| cf / (1.0 + finance).powi(t as i32))
        .sum();

    let n = inflows.len();
    let terminal_inflows: f64 = inflows
        .iter()
        .enumerate()
        .map(|(t, &cf)| cf * (1.0 + reinvest).powi((n - t - 1) as i32))
        .sum();

    if n == 0 || present_outflows <= 0.0 {
        return None;
    }

    let mirr = (terminal_inflows / present_outflows).powf(1.0 / n as f64) - 1.0;
    Some(mirr * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_roi() {
        assert_relative_eq!(calculate_roi(100_000.0, &[30_000.0, 35_000.0, 40_000.0, 45_000.0]), 50.0);
        assert_relative_eq!(calculate_roi(1_000.0, &[500.0]), -50.0);
    }

    #[test]
    fn test_npv_annual_and_monthly() {
        // 1100 in one year at 10% is worth exactly 1000
        assert_relative_eq!(calculate_npv(1_000.0, &[1_100.0], 10.0, true), 0.0, epsilon = 1e-9);

        let monthly = calculate_npv(1_000.0, &[1_100.0], 12.0, false);
        assert_relative_eq!(monthly, 1_100.0 / 1.01 - 1_000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_npv_discounts_from_period_one() {
        let npv = calculate_npv(0.0, &[100.0, 100.0], 0.0, true);
        assert_relative_eq!(npv, 200.0);
    }

    #[test]
    fn test_payback_interpolates() {
        let payback = calculate_payback_period(100_000.0, &[30_000.0, 35_000.0, 40_000.0, 45_000.0]).unwrap();
        assert!(payback > 2.0 && payback < 3.0);
        assert_relative_eq!(payback, 2.875, epsilon = 1e-12);
    }

    #[test]
    fn test_payback_exact_period_boundary() {
        assert_eq!(calculate_payback_period(100.0, &[50.0, 50.0, 50.0]), Some(2.0));
    }

    #[test]
    fn test_payback_never_recovered() {
        assert_eq!(calculate_payback_period(100_000.0, &[10_000.0, 20_000.0]), None);
        assert_eq!(calculate_payback_period(100.0, &[-50.0, 40.0]), None);
    }

    #[test]
    fn test_payback_after_negative_period() {
        // 100 + 20 lost in period 1, recovered half way through period 3
        let payback = calculate_payback_period(100.0, &[-20.0, 60.0, 120.0]).unwrap();
        assert_relative_eq!(payback, 2.5, epsilon = 1e-12);
    }

    #[test]
    fn test_discounted_payback_is_later() {
        let flows = [30_000.0, 35_000.0, 40_000.0, 45_000.0];
        let plain = calculate_payback_period(100_000.0, &flows).unwrap();
        let discounted = calculate_discounted_payback_period(100_000.0, &flows, 8.0, true).unwrap();
        assert!(discounted > plain);
        assert!(calculate_discounted_payback_period(100_000.0, &flows, 40.0, true).is_none());
    }

    #[test]
    fn test_profitability_index() {
        assert_relative_eq!(calculate_profitability_index(1_000.0, 250.0), 1.25);
        assert_relative_eq!(calculate_profitability_index(1_000.0, -1_000.0), 0.0);
    }

    #[test]
    fn test_mirr() {
        // Single inflow: MIRR equals the plain return
        let mirr = calculate_mirr(1_000.0, &[1_100.0], 5.0, 8.0).unwrap();
        assert_relative_eq!(mirr, 10.0, epsilon = 1e-9);

        // Two inflows: 600 compounds one period at 10%
        let mirr = calculate_mirr(1_000.0, &[600.0, 600.0], 5.0, 10.0).unwrap();
        let expected = ((600.0 * 1.1 + 600.0) / 1_000.0_f64).powf(0.5) - 1.0;
        assert_relative_eq!(mirr, expected * 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_mirr_discounts_later_outflows() {
        let mirr = calculate_mirr(1_000.0, &[-100.0, 1_500.0], 10.0, 0.0).unwrap();
        let present_outflows = 1_000.0 + 100.0 / 1.1;
        assert_relative_eq!(mirr, (1_500.0 / present_outflows - 1.0) * 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_mirr_requires_inflows() {
        assert!(calculate_mirr(1_000.0, &[-10.0, -20.0], 5.0, 5.0).is_none());
        assert!(calculate_mirr(0.0, &[10.0], 5.0, 5.0).is_none());
    }
}
