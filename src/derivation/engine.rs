//! Derivation of current, improved and impact metrics from the inputs

use log::debug;

use super::results::{Impact, Results, StateMetrics};
use crate::inputs::Inputs;

/// Compute the full result set for `inputs`.
///
/// Pure and deterministic. Edge policies:
/// - a zero customer base gives 0% for every rate
/// - active customers never go below zero when the inactive count exceeds the base
/// - a zero baseline purchase frequency leaves the LTV frequency factor at 1
pub fn derive(inputs: &Inputs) -> Results {
    let base = inputs.customer_base as f64;
    let inactive_count = i64::try_from(inputs.inactive_customers_count).unwrap_or(i64::MAX);
    let inactive = inactive_count as f64;

    // Current state
    let current_multi = round_half_up(base * (inputs.multi_purchase_rate / 100.0));
    let current_active = (base - inactive).max(0.0);
    let current_revenue = current_active * inputs.aov * inputs.purchase_frequency;
    let current_total_ltv = base * inputs.ltv;

    // Improved state
    let improved_rate = (inputs.multi_purchase_rate + inputs.multi_purchase_improvement).min(100.0);
    let improved_multi = round_half_up(base * (improved_rate / 100.0));

    let reactivated = round_half_up((inputs.churn_reduction / 100.0) * base);
    let improved_inactive_count = inactive_count.saturating_sub(reactivated).max(0);
    let improved_inactive = improved_inactive_count as f64;
    let improved_active = (base - improved_inactive).max(0.0);

    let improved_freq = inputs.purchase_frequency + inputs.purchase_freq_improvement;
    let improved_revenue = improved_active * inputs.aov * improved_freq;

    let churn_factor = 1.0 + inputs.churn_reduction / 100.0;
    let freq_factor = if inputs.purchase_frequency > 0.0 {
        improved_freq / inputs.purchase_frequency
    } else {
        1.0
    };
    let improved_ltv = inputs.ltv * churn_factor * freq_factor;
    let improved_total_ltv = base * improved_ltv;

    let current_state = StateMetrics {
        multi_purchase_customers: current_multi,
        inactive_customers: inactive_count,
        inactive_rate: percent_of(inactive, base),
        annual_revenue: current_revenue,
        total_ltv: current_total_ltv,
    };

    let improved_state = StateMetrics {
        multi_purchase_customers: improved_multi,
        inactive_customers: improved_inactive_count,
        inactive_rate: percent_of(improved_inactive, base),
        annual_revenue: improved_revenue,
        total_ltv: improved_total_ltv,
    };

    let impact = Impact {
        additional_customers: improved_multi.saturating_sub(current_multi),
        reduced_churn: inactive_count.saturating_sub(improved_inactive_count),
        revenue_increase: improved_revenue - current_revenue,
        ltv_increase: improved_total_ltv - current_total_ltv,
    };

    debug!(
        "derived: revenue {:.2} -> {:.2}, total LTV {:.2} -> {:.2}",
        current_revenue, improved_revenue, current_total_ltv, improved_total_ltv
    );

    Results { current_state, improved_state, impact }
}

/// Round to the nearest integer, halves toward positive infinity
///
/// Compares the fraction against 0.5 instead of adding 0.5, which would itself
/// round for values near 0.5 and for odd integers above 2^52.
pub fn round_half_up(value: f64) -> i64 {
    let floor = value.floor();
    let rounded = if value - floor >= 0.5 { floor + 1.0 } else { floor };
    rounded as i64
}

/// Round to one decimal place, halves toward positive infinity
pub fn round_to_tenth(value: f64) -> f64 {
    round_half_up(value * 10.0) as f64 / 10.0
}

/// `part / whole` in percent to one decimal; 0 when `whole` is 0
pub fn percent_of(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    round_to_tenth(part / whole * 100.0)
}
