//! Flat, ordered field-set sent to the spreadsheet endpoint

use chrono::{SecondsFormat, Utc};

use crate::derivation::Results;
use crate::inputs::{CallMetadata, InputField, Inputs};

/// Wire keys in the order the receiving sheet appends them
pub const FIELD_KEYS: [&str; 25] = [
    "timestamp",
    "callDate",
    "salesRep",
    "clientName",
    "customerBase",
    "multiPurchaseRate",
    "inactiveCustomersCount",
    "aov",
    "purchaseFrequency",
    "ltv",
    "multiPurchaseImprovement",
    "churnReduction",
    "purchaseFreqImprovement",
    "currentMultiPurchaseCustomers",
    "currentInactiveCustomers",
    "currentAnnualRevenue",
    "currentTotalLtv",
    "improvedMultiPurchaseCustomers",
    "improvedInactiveCustomers",
    "improvedAnnualRevenue",
    "improvedTotalLtv",
    "additionalCustomers",
    "reducedChurn",
    "revenueIncrease",
    "ltvIncrease",
];

/// Ordered key/value pairs, values already rendered as text
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSet {
    fields: Vec<(&'static str, String)>,
}

impl FieldSet {
    /// Build the field-set with `timestamp` taken from the current UTC time
    pub fn build(meta: &CallMetadata, inputs: &Inputs, results: &Results) -> Self {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        Self::build_at(timestamp, meta, inputs, results)
    }

    pub fn build_at(
        timestamp: String,
        meta: &CallMetadata,
        inputs: &Inputs,
        results: &Results,
    ) -> Self {
        let current = &results.current_state;
        let improved = &results.improved_state;
        let impact = &results.impact;

        let mut fields: Vec<(&'static str, String)> = Vec::with_capacity(FIELD_KEYS.len());
        fields.push(("timestamp", timestamp));
        fields.push(("callDate", meta.call_date.clone()));
        fields.push(("salesRep", meta.sales_rep_name.clone()));
        fields.push(("clientName", meta.client_name.clone()));

        for field in InputField::ALL {
            fields.push((field.key(), number_text(inputs.get(field))));
        }

        fields.push(("currentMultiPurchaseCustomers", current.multi_purchase_customers.to_string()));
        fields.push(("currentInactiveCustomers", current.inactive_customers.to_string()));
        fields.push(("currentAnnualRevenue", number_text(current.annual_revenue)));
        fields.push(("currentTotalLtv", number_text(current.total_ltv)));
        fields.push(("improvedMultiPurchaseCustomers", improved.multi_purchase_customers.to_string()));
        fields.push(("improvedInactiveCustomers", improved.inactive_customers.to_string()));
        fields.push(("improvedAnnualRevenue", number_text(improved.annual_revenue)));
        fields.push(("improvedTotalLtv", number_text(improved.total_ltv)));
        fields.push(("additionalCustomers", impact.additional_customers.to_string()));
        fields.push(("reducedChurn", impact.reduced_churn.to_string()));
        fields.push(("revenueIncrease", number_text(impact.revenue_increase)));
        fields.push(("ltvIncrease", number_text(impact.ltv_increase)));

        Self { fields }
    }

    pub fn as_pairs(&self) -> &[(&'static str, String)] {
        &self.fields
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Shortest text that parses back to the same value (`2`, `2.5`, `187500`)
pub fn number_text(value: f64) -> String {
    value.to_string()
}
