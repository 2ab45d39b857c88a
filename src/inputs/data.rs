//! Input data structures: base metrics, improvement goals and call metadata

use chrono::Local;
use serde::{Deserialize, Serialize};

use super::field::InputField;

/// Largest storable customer count, so counts convert to `i64` losslessly
pub const MAX_COUNT: u64 = i64::MAX as u64;

/// Base customer metrics plus improvement-goal deltas
///
/// Every write goes through [`Inputs::set_field`] or [`Inputs::sanitized`], so a
/// stored value is always inside its field's domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inputs {
    /// Total customers (>= 1)
    #[serde(default = "default_customer_base")]
    pub customer_base: u64,

    /// Percent of the base with two or more purchases (0 to 100)
    #[serde(default = "default_multi_purchase_rate")]
    pub multi_purchase_rate: f64,

    /// Customers with no purchase in the last 12 months
    /// Not bounded by `customer_base`
    #[serde(default = "default_inactive_customers")]
    pub inactive_customers_count: u64,

    /// Average order value
    #[serde(default = "default_aov")]
    pub aov: f64,

    /// Purchases per customer per year
    #[serde(default = "default_purchase_frequency")]
    pub purchase_frequency: f64,

    /// Current lifetime value per customer
    #[serde(default = "default_ltv")]
    pub ltv: f64,

    /// Percentage-point lift in multi-purchase rate (0 to 100 - multi_purchase_rate)
    #[serde(default = "default_five")]
    pub multi_purchase_improvement: f64,

    /// Percentage points of the base reactivated out of the inactive pool (0 to 100)
    #[serde(default = "default_five")]
    pub churn_reduction: f64,

    /// Absolute lift in purchases per year
    #[serde(default = "default_purchase_freq_improvement")]
    pub purchase_freq_improvement: f64,
}

fn default_customer_base() -> u64 { 1000 }
fn default_multi_purchase_rate() -> f64 { 20.0 }
fn default_inactive_customers() -> u64 { 300 }
fn default_aov() -> f64 { 100.0 }
fn default_purchase_frequency() -> f64 { 2.0 }
fn default_ltv() -> f64 { 200.0 }
fn default_five() -> f64 { 5.0 }
fn default_purchase_freq_improvement() -> f64 { 0.5 }

impl Default for Inputs {
    fn default() -> Self {
        Self {
            customer_base: 1000,
            multi_purchase_rate: 20.0,
            inactive_customers_count: 300,
            aov: 100.0,
            purchase_frequency: 2.0,
            ltv: 200.0,
            multi_purchase_improvement: 5.0,
            churn_reduction: 5.0,
            purchase_freq_improvement: 0.5,
        }
    }
}

impl Inputs {
    /// Parse `raw` for `field`, clamp it into the field's domain and store it.
    ///
    /// Never fails: unparseable text becomes 0 before clamping.
    pub fn set_field(&mut self, field: InputField, raw: &str) {
        match field {
            InputField::CustomerBase => {
                self.customer_base = clamp_count(field.parse(raw), 1);
            }
            InputField::MultiPurchaseRate => {
                self.multi_purchase_rate = field.parse(raw).clamp(0.0, 100.0);
                // The improvement's ceiling moves with the rate
                self.multi_purchase_improvement = self
                    .multi_purchase_improvement
                    .min(self.improvement_ceiling());
            }
            InputField::InactiveCustomersCount => {
                self.inactive_customers_count = clamp_count(field.parse(raw), 0);
            }
            InputField::Aov => self.aov = field.parse(raw).max(0.0),
            InputField::PurchaseFrequency => self.purchase_frequency = field.parse(raw).max(0.0),
            InputField::Ltv => self.ltv = field.parse(raw).max(0.0),
            InputField::MultiPurchaseImprovement => {
                self.multi_purchase_improvement =
                    field.parse(raw).max(0.0).min(self.improvement_ceiling());
            }
            InputField::ChurnReduction => {
                self.churn_reduction = field.parse(raw).clamp(0.0, 100.0);
            }
            InputField::PurchaseFreqImprovement => {
                self.purchase_freq_improvement = field.parse(raw).max(0.0);
            }
        }
    }

    /// Current stored value of `field`, as a float
    pub fn get(&self, field: InputField) -> f64 {
        match field {
            InputField::CustomerBase => self.customer_base as f64,
            InputField::MultiPurchaseRate => self.multi_purchase_rate,
            InputField::InactiveCustomersCount => self.inactive_customers_count as f64,
            InputField::Aov => self.aov,
            InputField::PurchaseFrequency => self.purchase_frequency,
            InputField::Ltv => self.ltv,
            InputField::MultiPurchaseImprovement => self.multi_purchase_improvement,
            InputField::ChurnReduction => self.churn_reduction,
            InputField::PurchaseFreqImprovement => self.purchase_freq_improvement,
        }
    }

    /// Upper bound for `multi_purchase_improvement` given the current rate
    pub fn improvement_ceiling(&self) -> f64 {
        100.0 - self.multi_purchase_rate
    }

    /// Apply every field's clamp to a wholesale-loaded value set.
    ///
    /// Used for inputs that arrive from a config file rather than through
    /// `set_field`. The rate is clamped before the improvement so the dynamic
    /// ceiling sees the final rate.
    pub fn sanitized(mut self) -> Self {
        self.customer_base = self.customer_base.clamp(1, MAX_COUNT);
        self.inactive_customers_count = self.inactive_customers_count.min(MAX_COUNT);
        self.multi_purchase_rate = finite_or_zero(self.multi_purchase_rate).clamp(0.0, 100.0);
        self.aov = finite_or_zero(self.aov).max(0.0);
        self.purchase_frequency = finite_or_zero(self.purchase_frequency).max(0.0);
        self.ltv = finite_or_zero(self.ltv).max(0.0);
        self.multi_purchase_improvement = finite_or_zero(self.multi_purchase_improvement)
            .max(0.0)
            .min(self.improvement_ceiling());
        self.churn_reduction = finite_or_zero(self.churn_reduction).clamp(0.0, 100.0);
        self.purchase_freq_improvement = finite_or_zero(self.purchase_freq_improvement).max(0.0);
        self
    }
}

fn clamp_count(value: f64, floor: u64) -> u64 {
    if value <= floor as f64 {
        floor
    } else if value >= MAX_COUNT as f64 {
        MAX_COUNT
    } else {
        value as u64
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// Who the calculation was run for, and where to save it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallMetadata {
    #[serde(default)]
    pub client_name: String,

    #[serde(default)]
    pub sales_rep_name: String,

    /// Call date as `YYYY-MM-DD`; defaults to today's local date
    #[serde(default = "today")]
    pub call_date: String,

    /// Spreadsheet web-app endpoint receiving the form post
    #[serde(default)]
    pub google_sheet_url: String,
}

fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

impl Default for CallMetadata {
    fn default() -> Self {
        Self {
            client_name: String::new(),
            sales_rep_name: String::new(),
            call_date: today(),
            google_sheet_url: String::new(),
        }
    }
}

impl CallMetadata {
    /// Both the endpoint and the client name are present
    pub fn ready_to_save(&self) -> bool {
        !self.google_sheet_url.is_empty() && !self.client_name.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multi_purchase_rate_clamps_to_bounds() {
        let mut inputs = Inputs::default();

        inputs.set_field(InputField::MultiPurchaseRate, "150");
        assert_eq!(inputs.multi_purchase_rate, 100.0);

        inputs.set_field(InputField::MultiPurchaseRate, "-12.5");
        assert_eq!(inputs.multi_purchase_rate, 0.0);

        inputs.set_field(InputField::MultiPurchaseRate, "42.5");
        assert_eq!(inputs.multi_purchase_rate, 42.5);
    }

    #[test]
    fn test_improvement_bounded_by_rate() {
        let mut inputs = Inputs::default();
        inputs.set_field(InputField::MultiPurchaseRate, "90");
        inputs.set_field(InputField::MultiPurchaseImprovement, "25");
        assert_eq!(inputs.multi_purchase_improvement, 10.0);

        inputs.set_field(InputField::MultiPurchaseImprovement, "-3");
        assert_eq!(inputs.multi_purchase_improvement, 0.0);
    }

    #[test]
    fn test_rate_change_reclamps_improvement() {
        let mut inputs = Inputs::default();
        inputs.set_field(InputField::MultiPurchaseImprovement, "30");
        assert_eq!(inputs.multi_purchase_improvement, 30.0);

        inputs.set_field(InputField::MultiPurchaseRate, "95");
        assert_eq!(inputs.multi_purchase_improvement, 5.0);
        assert!(inputs.multi_purchase_rate + inputs.multi_purchase_improvement <= 100.0);
    }

    #[test]
    fn test_customer_base_floor_is_one() {
        let mut inputs = Inputs::default();
        inputs.set_field(InputField::CustomerBase, "0");
        assert_eq!(inputs.customer_base, 1);

        inputs.set_field(InputField::CustomerBase, "abc");
        assert_eq!(inputs.customer_base, 1);

        inputs.set_field(InputField::CustomerBase, "2500.9");
        assert_eq!(inputs.customer_base, 2500);
    }

    #[test]
    fn test_garbage_coerces_to_zero() {
        let mut inputs = Inputs::default();
        inputs.set_field(InputField::Aov, "");
        assert_eq!(inputs.aov, 0.0);

        inputs.set_field(InputField::Ltv, "n/a");
        assert_eq!(inputs.ltv, 0.0);

        inputs.set_field(InputField::InactiveCustomersCount, "-40");
        assert_eq!(inputs.inactive_customers_count, 0);

        inputs.set_field(InputField::PurchaseFrequency, "1e999");
        assert_eq!(inputs.purchase_frequency, 0.0);
    }

    #[test]
    fn test_inactive_count_not_bounded_by_base() {
        let mut inputs = Inputs::default();
        inputs.set_field(InputField::InactiveCustomersCount, "5000");
        assert_eq!(inputs.inactive_customers_count, 5000);
    }

    #[test]
    fn test_huge_counts_saturate() {
        let mut inputs = Inputs::default();
        inputs.set_field(InputField::InactiveCustomersCount, "9223372036854775807");
        assert_eq!(inputs.inactive_customers_count, MAX_COUNT);

        inputs.set_field(InputField::InactiveCustomersCount, "99999999999999999999");
        assert_eq!(inputs.inactive_customers_count, MAX_COUNT);

        inputs.set_field(InputField::CustomerBase, "99999999999999999999");
        assert_eq!(inputs.customer_base, MAX_COUNT);

        let loaded = Inputs {
            customer_base: u64::MAX,
            inactive_customers_count: u64::MAX,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(loaded.customer_base, MAX_COUNT);
        assert_eq!(loaded.inactive_customers_count, MAX_COUNT);
    }

    #[test]
    fn test_churn_reduction_clamps() {
        let mut inputs = Inputs::default();
        inputs.set_field(InputField::ChurnReduction, "250");
        assert_eq!(inputs.churn_reduction, 100.0);
    }

    #[test]
    fn test_sanitized_applies_all_clamps() {
        let raw = Inputs {
            customer_base: 0,
            multi_purchase_rate: 130.0,
            multi_purchase_improvement: 10.0,
            aov: -5.0,
            churn_reduction: f64::NAN,
            ..Default::default()
        };
        let clean = raw.sanitized();

        assert_eq!(clean.customer_base, 1);
        assert_eq!(clean.multi_purchase_rate, 100.0);
        assert_eq!(clean.multi_purchase_improvement, 0.0);
        assert_eq!(clean.aov, 0.0);
        assert_eq!(clean.churn_reduction, 0.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let inputs: Inputs = serde_json::from_str(r#"{"aov": 80.0}"#).unwrap();
        assert_eq!(inputs.aov, 80.0);
        assert_eq!(inputs.customer_base, 1000);
        assert_eq!(inputs.purchase_freq_improvement, 0.5);
    }

    #[test]
    fn test_ready_to_save() {
        let mut meta = CallMetadata::default();
        assert!(!meta.ready_to_save());

        meta.google_sheet_url = "https://script.example.com/exec".to_string();
        assert!(!meta.ready_to_save());

        meta.client_name = "Acme".to_string();
        assert!(meta.ready_to_save());
    }
}
