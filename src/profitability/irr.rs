//! Internal Rate of Return (IRR) calculation
//!
//! The reference solver is a bounded bisection over a fixed rate range that degrades
//! to a boundary rate instead of failing. [`calculate_irr_precise`] solves the same
//! NPV to full precision over a much wider range, for callers that need it.

use super::metrics::calculate_npv;
use crate::config::IrrSettings;

/// IRR (percent) of `cash_flows` against an upfront `initial_investment`
///
/// Bisects over `[0, 100]` percent for at most 20 iterations, stopping once
/// |NPV| < 0.01. Without a sign change in that range it returns the lower bound when
/// NPV at the lower bound is negative and the upper bound otherwise.
pub fn calculate_irr(initial_investment: f64, cash_flows: &[f64]) -> f64 {
    calculate_irr_with(initial_investment, cash_flows, &IrrSettings::default())
}

/// [`calculate_irr`] with explicit search settings
pub fn calculate_irr_with(initial_investment: f64, cash_flows: &[f64], settings: &IrrSettings) -> f64 {
    let npv_at = |rate: f64| calculate_npv(initial_investment, cash_flows, rate, true);

    let mut low = settings.lower_pct;
    let mut high = settings.upper_pct;
    let npv_low = npv_at(low);
    let npv_high = npv_at(high);

    if npv_low == 0.0 {
        return low;
    }
    if npv_high == 0.0 {
        return high;
    }

    // No root bracketed in range
    if npv_low.signum() == npv_high.signum() {
        let boundary = if npv_low < 0.0 { low } else { high };
        log::warn!(
            "IRR not bracketed in [{}%, {}%] (NPV {:.2} / {:.2}), using {}%",
            low,
            high,
            npv_low,
            npv_high,
            boundary
        );
        return boundary;
    }

    let low_sign = npv_low.signum();
    let mut mid = (low + high) / 2.0;
    for _ in 0..settings.max_iterations {
        mid = (low + high) / 2.0;
        let npv_mid = npv_at(mid);

        if npv_mid.abs() < settings.tolerance {
            return mid;
        }

        if npv_mid.signum() == low_sign {
            low = mid;
        } else {
            high = mid;
        }
    }

    log::debug!(
        "IRR bisection stopped after {} iterations at {}%",
        settings.max_iterations,
        mid
    );
    mid
}

/// Rates (percent) where the precise solver looks for a bracketed root, ascending
const PRECISE_GRID_PCT: [f64; 12] = [
    -99.0, -90.0, -50.0, -25.0, 0.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1_000.0,
];

/// Stop once the bracket is narrower than this many percentage points
const PRECISE_TOLERANCE_PCT: f64 = 1e-10;

/// IRR (percent) solved to full precision over `[-99%, 1000%]`
///
/// Unlike [`calculate_irr`] the rate may be negative and is not capped at 100%.
/// The first root found scanning upwards from -99% is refined by bisection on
/// [`calculate_npv`]. Returns `None` when the flows never change sign or no root
/// is bracketed.
pub fn calculate_irr_precise(initial_investment: f64, cash_flows: &[f64]) -> Option<f64> {
    let outlays = std::iter::once(-initial_investment).chain(cash_flows.iter().copied());
    let (mut has_positive, mut has_negative) = (false, false);
    for cf in outlays {
        has_positive |= cf > 1e-10;
        has_negative |= cf < -1e-10;
    }
    if !has_positive && !has_negative {
        return Some(0.0);
    }
    if !(has_positive && has_negative) {
        return None;
    }

    let npv_at = |rate: f64| calculate_npv(initial_investment, cash_flows, rate, true);

    let (mut low, mut high) = PRECISE_GRID_PCT
        .windows(2)
        .map(|pair| (pair[0], pair[1]))
        .find(|&(low, high)| {
            let (a, b) = (npv_at(low), npv_at(high));
            a.is_finite() && b.is_finite() && (a == 0.0 || a.signum() != b.signum())
        })?;

    let mut npv_low = npv_at(low);
    if npv_low == 0.0 {
        return Some(low);
    }

    for _ in 0..200 {
        let mid = (low + high) / 2.0;
        let npv_mid = npv_at(mid);
        if npv_mid == 0.0 || high - low < PRECISE_TOLERANCE_PCT {
            return Some(mid);
        }
        if npv_mid.signum() == npv_low.signum() {
            low = mid;
            npv_low = npv_mid;
        } else {
            high = mid;
        }
    }

    log::debug!("Precise IRR stopped at [{}%, {}%]", low, high);
    Some((low + high) / 2.0)
}
