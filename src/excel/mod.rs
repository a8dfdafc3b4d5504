//! Excel export
//!
//! - Weekly attendance report in a fixed template (`ReportExporter`)
//! - Collected name lists, one row per program (`RosterSheetExporter`)

mod exporter;
pub mod layout;
mod roster_sheet;

pub use exporter::ReportExporter;
pub use layout::{DayColumns, ReportLayout};
pub use roster_sheet::{RosterSheetExporter, ROSTER_SHEET_NAME};
