//! Roster sheet export for collected name lists

use super::exporter::{export_err, SheetFormats};
use crate::error::RollcallResult;
use rust_xlsxwriter::{Workbook, Worksheet};
use std::path::Path;
use tracing::info;

pub const ROSTER_SHEET_NAME: &str = "学生名单";
const HEADERS: [(&str, f64); 4] = [("序号", 6.0), ("专业", 24.0), ("人数", 8.0), ("名单", 80.0)];
const NAME_SEPARATOR: &str = "、";

/// Writes `(program, names)` entries as one row per program
pub struct RosterSheetExporter<'a> {
    entries: &'a [(String, Vec<String>)],
}

impl<'a> RosterSheetExporter<'a> {
    pub fn new(entries: &'a [(String, Vec<String>)]) -> Self {
        Self { entries }
    }

    pub fn to_bytes(&self) -> RollcallResult<Vec<u8>> {
        let formats = SheetFormats::new();
        let mut ws = Worksheet::new();
        ws.set_name(ROSTER_SHEET_NAME)
            .map_err(export_err("Failed to set worksheet name"))?;

        for (col, (title, width)) in HEADERS.iter().enumerate() {
            let col = col as u16;
            ws.set_column_width(col, *width)
                .map_err(export_err("Failed to set column width"))?;
            ws.write_string_with_format(0, col, *title, &formats.header)
                .map_err(export_err("Failed to write header"))?;
        }

        for (i, (program, names)) in self.entries.iter().enumerate() {
            let row = (i + 1) as u32;
            ws.write_number_with_format(row, 0, (i + 1) as f64, &formats.body)
                .map_err(export_err("Failed to write index"))?;
            ws.write_string_with_format(row, 1, program, &formats.body)
                .map_err(export_err("Failed to write program"))?;
            ws.write_number_with_format(row, 2, names.len() as f64, &formats.body)
                .map_err(export_err("Failed to write count"))?;
            ws.write_string_with_format(row, 3, names.join(NAME_SEPARATOR), &formats.text)
                .map_err(export_err("Failed to write names"))?;
        }

        let mut workbook = Workbook::new();
        workbook.push_worksheet(ws);
        workbook
            .save_to_buffer()
            .map_err(export_err("Failed to generate workbook"))
    }

    pub fn export(&self, output_path: &Path) -> RollcallResult<()> {
        std::fs::write(output_path, self.to_bytes()?)?;
        info!(path = %output_path.display(), programs = self.entries.len(), "roster sheet exported");
        Ok(())
    }
}
