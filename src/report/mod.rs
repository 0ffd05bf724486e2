//! Export builders for the planning view: the low-movement CSV and the
//! printable text report.

pub mod planning;

pub use planning::{build_csv, build_report, export_csv, export_report};
