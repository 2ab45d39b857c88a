//! Snapshot export: ordered field-set, remote form-post and CSV file

mod fields;
pub mod export;
pub mod remote;

pub use fields::{FieldSet, FIELD_KEYS};
pub use export::{
    export_filename, export_to_dir, parse_export, write_export, ExportedSnapshot, ResultRow,
    ResultTable,
};
pub use remote::{
    HttpTransport, RemoteSaver, SaveStatus, Transport, TransientStatus, STATUS_CLEAR_DELAY,
};
