//! Derivation engine: current, improved and impact metrics

mod engine;
mod results;
pub mod insights;

pub use engine::{derive, round_half_up, round_to_tenth, percent_of};
pub use results::{Results, StateMetrics, Impact};
pub use insights::Insights;

// ============================================================================
// Pricing Assumptions
// ============================================================================

/// Cost of the retention solution as a share of current annual revenue (2%)
pub const SOLUTION_COST_SHARE: f64 = 0.02;
