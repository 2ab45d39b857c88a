//! Secondary figures shown alongside the inputs and results
//!
//! Every ratio here falls back to 0 when its denominator is 0.

use serde::Serialize;

use super::engine::{percent_of, round_half_up, round_to_tenth};
use super::results::Results;
use super::SOLUTION_COST_SHARE;
use crate::inputs::Inputs;

/// Previews, growth percentages and ROI derived from one inputs/results pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Insights {
    /// Inactive share of the base, percent
    pub inactive_share: f64,

    /// Active share of the base, percent
    pub active_share: f64,

    /// Multi-purchase rate plus its improvement, uncapped, one decimal
    pub target_multi_purchase_rate: f64,

    /// Customers the multi-purchase improvement alone would add
    pub multi_purchase_preview: i64,

    /// Customers the churn reduction would reactivate
    pub reactivation_preview: i64,

    /// Reactivated customers as a whole percent of the inactive base
    pub reactivation_share: i64,

    /// Baseline and improved purchases per year
    pub frequency_from: f64,
    pub frequency_to: f64,

    /// Frequency lift as a whole percent of the baseline
    pub frequency_increase_pct: i64,

    pub multi_purchase_growth_pct: f64,
    pub reduced_churn_share_pct: f64,
    pub revenue_growth_pct: f64,
    pub ltv_growth_pct: f64,

    /// First-year ROI in whole percent, cost taken as a share of current revenue
    pub first_year_roi_pct: i64,
}

impl Insights {
    pub fn compute(inputs: &Inputs, results: &Results) -> Self {
        let base = inputs.customer_base as f64;
        let inactive = inputs.inactive_customers_count as f64;
        let current = &results.current_state;
        let impact = &results.impact;

        let inactive_share = percent_of(inactive, base);
        let active_share = if base > 0.0 {
            percent_of(base - inactive, base)
        } else {
            0.0
        };

        let reactivation_preview = round_half_up((inputs.churn_reduction / 100.0) * base);
        let reactivation_share = if inactive > 0.0 {
            round_half_up(reactivation_preview as f64 / inactive * 100.0)
        } else {
            0
        };

        let frequency_increase_pct = if inputs.purchase_frequency > 0.0 {
            round_half_up(inputs.purchase_freq_improvement / inputs.purchase_frequency * 100.0)
        } else {
            0
        };

        let first_year_roi_pct = if current.annual_revenue > 0.0 {
            round_half_up(
                impact.revenue_increase / (current.annual_revenue * SOLUTION_COST_SHARE) * 100.0,
            )
        } else {
            0
        };

        Self {
            inactive_share,
            active_share,
            target_multi_purchase_rate: round_to_tenth(
                inputs.multi_purchase_rate + inputs.multi_purchase_improvement,
            ),
            multi_purchase_preview: round_half_up(base * (inputs.multi_purchase_improvement / 100.0)),
            reactivation_preview,
            reactivation_share,
            frequency_from: inputs.purchase_frequency,
            frequency_to: inputs.purchase_frequency + inputs.purchase_freq_improvement,
            frequency_increase_pct,
            multi_purchase_growth_pct: percent_of(
                impact.additional_customers as f64,
                current.multi_purchase_customers as f64,
            ),
            reduced_churn_share_pct: percent_of(impact.reduced_churn as f64, inactive),
            revenue_growth_pct: percent_of(impact.revenue_increase, current.annual_revenue),
            ltv_growth_pct: percent_of(impact.ltv_increase, current.total_ltv),
            first_year_roi_pct,
        }
    }
}
