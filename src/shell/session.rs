//! Single-owner session state: inputs, derived results, metadata and view flags

use std::path::{Path, PathBuf};
use std::time::Instant;

use log::debug;

use super::command::{MetaField, Panel};
use crate::config::SessionConfig;
use crate::derivation::{derive, Insights, Results};
use crate::error::{ExportResult, SaveError};
use crate::inputs::{CallMetadata, InputField, Inputs};
use crate::snapshot::{export_to_dir, SaveStatus, TransientStatus};

/// Show/hide flags for the collapsible panels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Panels {
    pub call_info: bool,
    pub save_section: bool,
}

impl Default for Panels {
    fn default() -> Self {
        Self { call_info: true, save_section: true }
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    inputs: Inputs,
    results: Results,
    meta: CallMetadata,
    panels: Panels,
    status: TransientStatus,
    export_dir: PathBuf,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        let status = TransientStatus::new(config.status_clear_delay());
        let inputs = config.inputs.sanitized();
        let results = derive(&inputs);
        Self {
            inputs,
            results,
            meta: config.call,
            panels: Panels::default(),
            status,
            export_dir: config.export_dir,
        }
    }

    pub fn inputs(&self) -> &Inputs {
        &self.inputs
    }

    pub fn results(&self) -> &Results {
        &self.results
    }

    pub fn insights(&self) -> Insights {
        Insights::compute(&self.inputs, &self.results)
    }

    pub fn meta(&self) -> &CallMetadata {
        &self.meta
    }

    pub fn panels(&self) -> Panels {
        self.panels
    }

    /// Store a clamped input value and re-derive every result
    pub fn set_field(&mut self, field: InputField, raw: &str) {
        self.inputs.set_field(field, raw);
        self.results = derive(&self.inputs);
        debug!("{} = {}", field, self.inputs.get(field));
    }

    pub fn set_meta(&mut self, field: MetaField, value: String) {
        match field {
            MetaField::ClientName => self.meta.client_name = value,
            MetaField::SalesRep => self.meta.sales_rep_name = value,
            MetaField::CallDate => self.meta.call_date = value,
            MetaField::SheetUrl => self.meta.google_sheet_url = value,
        }
    }

    pub fn toggle(&mut self, panel: Panel) {
        match panel {
            Panel::CallInfo => self.panels.call_info = !self.panels.call_info,
            Panel::SaveSection => self.panels.save_section = !self.panels.save_section,
        }
    }

    /// Record the outcome of a save attempt as the visible status
    pub fn record_save(&mut self, outcome: &Result<(), SaveError>, now: Instant) {
        self.status.set(SaveStatus::from_outcome(outcome), now);
    }

    pub fn save_status(&self, now: Instant) -> Option<SaveStatus> {
        self.status.visible(now)
    }

    /// Write a CSV snapshot to `dir`, or the configured export directory
    pub fn export(&self, dir: Option<&Path>) -> ExportResult<PathBuf> {
        let dir = dir.unwrap_or(self.export_dir.as_path());
        export_to_dir(dir, &self.meta, &self.inputs, &self.results)
    }
}
