//! CSV file export of a calculator snapshot, and parsing it back
//!
//! Layout:
//! - `Call Information`, `Current Metrics`, `Improvement Goals` sections of
//!   label/value rows, each followed by a blank row
//! - `Results` section with a `Metric,Current,Improved,Impact` table

use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, WriterBuilder};
use log::info;

use super::fields::number_text;
use crate::derivation::Results;
use crate::error::{ExportError, ExportResult};
use crate::inputs::{CallMetadata, InputField, Inputs};

const SECTION_CALL: &str = "Call Information";
const SECTION_CURRENT: &str = "Current Metrics";
const SECTION_GOALS: &str = "Improvement Goals";
const SECTION_RESULTS: &str = "Results";

const CURRENT_FIELDS: [InputField; 6] = [
    InputField::CustomerBase,
    InputField::MultiPurchaseRate,
    InputField::InactiveCustomersCount,
    InputField::Aov,
    InputField::PurchaseFrequency,
    InputField::Ltv,
];

const GOAL_FIELDS: [InputField; 3] = [
    InputField::MultiPurchaseImprovement,
    InputField::ChurnReduction,
    InputField::PurchaseFreqImprovement,
];

/// One line of the results table
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ResultRow {
    pub current: f64,
    pub improved: f64,
    pub impact: f64,
}

/// The four-row results table as written to the export
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ResultTable {
    pub multi_purchase_customers: ResultRow,
    pub inactive_customers: ResultRow,
    pub annual_revenue: ResultRow,
    pub total_ltv: ResultRow,
}

impl ResultTable {
    pub fn from_results(results: &Results) -> Self {
        let current = &results.current_state;
        let improved = &results.improved_state;
        let impact = &results.impact;
        Self {
            multi_purchase_customers: ResultRow {
                current: current.multi_purchase_customers as f64,
                improved: improved.multi_purchase_customers as f64,
                impact: impact.additional_customers as f64,
            },
            inactive_customers: ResultRow {
                current: current.inactive_customers as f64,
                improved: improved.inactive_customers as f64,
                impact: impact.reduced_churn as f64,
            },
            annual_revenue: ResultRow {
                current: current.annual_revenue,
                improved: improved.annual_revenue,
                impact: impact.revenue_increase,
            },
            total_ltv: ResultRow {
                current: current.total_ltv,
                improved: improved.total_ltv,
                impact: impact.ltv_increase,
            },
        }
    }

    fn rows(&self) -> [(&'static str, ResultRow); 4] {
        [
            ("Multi-Purchase Customers", self.multi_purchase_customers),
            ("Inactive Customers", self.inactive_customers),
            ("Annual Revenue", self.annual_revenue),
            ("Total LTV", self.total_ltv),
        ]
    }

    fn row_mut(&mut self, label: &str) -> Option<&mut ResultRow> {
        match label {
            "Multi-Purchase Customers" => Some(&mut self.multi_purchase_customers),
            "Inactive Customers" => Some(&mut self.inactive_customers),
            "Annual Revenue" => Some(&mut self.annual_revenue),
            "Total LTV" => Some(&mut self.total_ltv),
            _ => None,
        }
    }
}

/// Contents recovered from an exported document
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedSnapshot {
    pub call_date: String,
    pub sales_rep_name: String,
    pub client_name: String,
    pub inputs: Inputs,
    pub results: ResultTable,
}

/// `retention-analysis-<client slug>-<call date>.csv`
pub fn export_filename(meta: &CallMetadata) -> String {
    format!(
        "retention-analysis-{}-{}.csv",
        slug(&meta.client_name),
        slug(&meta.call_date)
    )
}

/// Each non-ASCII-alphanumeric character becomes `-`, then lowercase
fn slug(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect()
}

/// Write the export document to `writer`
pub fn write_export<W: Write>(
    writer: W,
    meta: &CallMetadata,
    inputs: &Inputs,
    results: &Results,
) -> ExportResult<()> {
    let mut wtr = WriterBuilder::new().flexible(true).from_writer(writer);

    wtr.write_record([SECTION_CALL])?;
    wtr.write_record(["Date", meta.call_date.as_str()])?;
    wtr.write_record(["Sales Rep", meta.sales_rep_name.as_str()])?;
    wtr.write_record(["Client Name", meta.client_name.as_str()])?;
    wtr.write_record([""])?;

    wtr.write_record([SECTION_CURRENT])?;
    for field in CURRENT_FIELDS {
        wtr.write_record([field.label(), number_text(inputs.get(field)).as_str()])?;
    }
    wtr.write_record([""])?;

    wtr.write_record([SECTION_GOALS])?;
    for field in GOAL_FIELDS {
        wtr.write_record([field.label(), number_text(inputs.get(field)).as_str()])?;
    }
    wtr.write_record([""])?;

    wtr.write_record([SECTION_RESULTS])?;
    wtr.write_record(["Metric", "Current", "Improved", "Impact"])?;
    for (label, row) in ResultTable::from_results(results).rows() {
        wtr.write_record([
            label.to_string(),
            number_text(row.current),
            number_text(row.improved),
            number_text(row.impact),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write the export into `dir` under [`export_filename`], returning the path
pub fn export_to_dir(
    dir: &Path,
    meta: &CallMetadata,
    inputs: &Inputs,
    results: &Results,
) -> ExportResult<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(export_filename(meta));
    let file = File::create(&path)?;
    write_export(file, meta, inputs, results)?;
    info!("Exported snapshot to {}", path.display());
    Ok(path)
}

/// Parse an export document back into its literal values
pub fn parse_export<R: Read>(reader: R) -> ExportResult<ExportedSnapshot> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut section = "";
    let mut call_info: HashMap<String, String> = HashMap::new();
    let mut raw_inputs: HashMap<InputField, String> = HashMap::new();
    let mut table = ResultTable::default();
    let mut table_rows = 0;

    for record in rdr.records() {
        let record = record?;
        if record.iter().all(|f| f.is_empty()) {
            continue;
        }
        let label = record.get(0).unwrap_or_default();

        if record.len() == 1 {
            section = match label {
                SECTION_CALL => SECTION_CALL,
                SECTION_CURRENT => SECTION_CURRENT,
                SECTION_GOALS => SECTION_GOALS,
                SECTION_RESULTS => SECTION_RESULTS,
                other => return Err(ExportError::Malformed(format!("unknown section '{}'", other))),
            };
            continue;
        }

        match section {
            SECTION_CALL => {
                call_info.insert(label.to_string(), record.get(1).unwrap_or_default().to_string());
            }
            SECTION_CURRENT | SECTION_GOALS => {
                let field = InputField::ALL
                    .iter()
                    .copied()
                    .find(|f| f.label() == label)
                    .ok_or_else(|| ExportError::Malformed(format!("unknown metric '{}'", label)))?;
                raw_inputs.insert(field, record.get(1).unwrap_or_default().to_string());
            }
            SECTION_RESULTS => {
                if label == "Metric" {
                    continue;
                }
                if record.len() != 4 {
                    return Err(ExportError::Malformed(format!("results row '{}' needs 4 columns", label)));
                }
                let row = table
                    .row_mut(label)
                    .ok_or_else(|| ExportError::Malformed(format!("unknown result '{}'", label)))?;
                *row = ResultRow {
                    current: parse_number(label, &record[1])?,
                    improved: parse_number(label, &record[2])?,
                    impact: parse_number(label, &record[3])?,
                };
                table_rows += 1;
            }
            _ => return Err(ExportError::Malformed(format!("row '{}' outside any section", label))),
        }
    }

    if table_rows != 4 {
        return Err(ExportError::Malformed(format!("expected 4 result rows, found {}", table_rows)));
    }

    Ok(ExportedSnapshot {
        call_date: take_call_field(&mut call_info, "Date")?,
        sales_rep_name: take_call_field(&mut call_info, "Sales Rep")?,
        client_name: take_call_field(&mut call_info, "Client Name")?,
        inputs: inputs_from_raw(&raw_inputs)?,
        results: table,
    })
}

fn take_call_field(info: &mut HashMap<String, String>, label: &str) -> ExportResult<String> {
    info.remove(label)
        .ok_or_else(|| ExportError::Malformed(format!("missing '{}'", label)))
}

fn inputs_from_raw(raw: &HashMap<InputField, String>) -> ExportResult<Inputs> {
    let value = |field: InputField| -> ExportResult<f64> {
        let text = raw
            .get(&field)
            .ok_or_else(|| ExportError::Malformed(format!("missing '{}'", field.label())))?;
        parse_number(field.label(), text)
    };
    let count = |field: InputField| -> ExportResult<u64> {
        let text = raw
            .get(&field)
            .ok_or_else(|| ExportError::Malformed(format!("missing '{}'", field.label())))?;
        text.parse::<u64>()
            .map_err(|_| ExportError::Malformed(format!("'{}' is not a count: {}", field.label(), text)))
    };

    Ok(Inputs {
        customer_base: count(InputField::CustomerBase)?,
        multi_purchase_rate: value(InputField::MultiPurchaseRate)?,
        inactive_customers_count: count(InputField::InactiveCustomersCount)?,
        aov: value(InputField::Aov)?,
        purchase_frequency: value(InputField::PurchaseFrequency)?,
        ltv: value(InputField::Ltv)?,
        multi_purchase_improvement: value(InputField::MultiPurchaseImprovement)?,
        churn_reduction: value(InputField::ChurnReduction)?,
        purchase_freq_improvement: value(InputField::PurchaseFreqImprovement)?,
    })
}

fn parse_number(label: &str, text: &str) -> ExportResult<f64> {
    text.parse::<f64>()
        .map_err(|_| ExportError::Malformed(format!("'{}' is not a number: {}", label, text)))
}
