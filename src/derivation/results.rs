//! Derived result structures

use serde::{Deserialize, Serialize};

/// Snapshot of the customer base before or after the improvements
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StateMetrics {
    /// Customers with two or more purchases
    pub multi_purchase_customers: i64,

    /// Customers inactive for 12+ months
    pub inactive_customers: i64,

    /// Inactive share of the base in percent, rounded to one decimal
    pub inactive_rate: f64,

    /// Active customers × AOV × purchase frequency
    pub annual_revenue: f64,

    /// Customer base × per-customer LTV
    pub total_ltv: f64,
}

/// Differences between the improved and current states
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Impact {
    pub additional_customers: i64,
    pub reduced_churn: i64,
    pub revenue_increase: f64,
    pub ltv_increase: f64,
}

/// Full output of one derivation, always recomputed as a whole
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Results {
    pub current_state: StateMetrics,
    pub improved_state: StateMetrics,
    pub impact: Impact,
}
