//! Weekly attendance report exporter

use super::layout::{
    ReportLayout, ABSENTEE_ROW_HEIGHT, BODY_FONT_SIZE, FONT_NAME, TITLE_FONT_SIZE,
    TITLE_ROW_HEIGHT,
};
use crate::config::ReportSettings;
use crate::error::{RollcallError, RollcallResult};
use crate::types::{AttendanceStats, ProgramRoster, Weekday};
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// Cell formats shared by the exported sheets
pub(crate) struct SheetFormats {
    pub title: Format,
    pub header: Format,
    pub body: Format,
    pub rate: Format,
    pub text: Format,
}

impl SheetFormats {
    pub fn new() -> Self {
        let base = Format::new()
            .set_font_name(FONT_NAME)
            .set_font_size(BODY_FONT_SIZE)
            .set_align(FormatAlign::VerticalCenter)
            .set_border(FormatBorder::Thin);
        let body = base.clone().set_align(FormatAlign::Center);

        Self {
            title: Format::new()
                .set_font_name(FONT_NAME)
                .set_font_size(TITLE_FONT_SIZE)
                .set_bold()
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter),
            header: body.clone().set_bold().set_text_wrap(),
            rate: body.clone().set_num_format("0.00"),
            text: base.set_align(FormatAlign::Left).set_text_wrap(),
            body,
        }
    }
}

/// Map a rust_xlsxwriter error into an export error with context
pub(crate) fn export_err(context: &'static str) -> impl Fn(XlsxError) -> RollcallError {
    move |e| RollcallError::Export(format!("{}: {}", context, e))
}

/// Writes attendance statistics into the weekly report template
pub struct ReportExporter<'a> {
    layout: ReportLayout,
    roster: &'a ProgramRoster,
    settings: &'a ReportSettings,
}

impl<'a> ReportExporter<'a> {
    pub fn new(layout: ReportLayout, roster: &'a ProgramRoster, settings: &'a ReportSettings) -> Self {
        Self {
            layout,
            roster,
            settings,
        }
    }

    /// Build the report into an in-memory .xlsx buffer
    pub fn to_bytes(&self, stats: &[AttendanceStats]) -> RollcallResult<Vec<u8>> {
        let mut workbook = self.build(stats)?;
        let bytes = workbook
            .save_to_buffer()
            .map_err(export_err("Failed to generate workbook"))?;
        debug!(bytes = bytes.len(), "report generated");
        Ok(bytes)
    }

    /// Build the report and write it to `output_path`
    pub fn export(&self, stats: &[AttendanceStats], output_path: &Path) -> RollcallResult<()> {
        let bytes = self.to_bytes(stats)?;
        std::fs::write(output_path, bytes)?;
        info!(path = %output_path.display(), records = stats.len(), "report exported");
        Ok(())
    }

    fn build(&self, stats: &[AttendanceStats]) -> RollcallResult<Workbook> {
        let formats = SheetFormats::new();
        let mut worksheet = Worksheet::new();
        worksheet
            .set_name(&self.settings.sheet_name)
            .map_err(export_err("Failed to set worksheet name"))?;

        self.write_layout(&mut worksheet, &formats)?;
        let rows = self.write_program_rows(&mut worksheet, &formats)?;
        self.write_stats(&mut worksheet, &formats, &rows, stats)?;
        self.write_absentee_section(&mut worksheet, &formats, stats)?;

        let mut workbook = Workbook::new();
        workbook.push_worksheet(worksheet);
        Ok(workbook)
    }

    /// Title, headers, column widths
    fn write_layout(&self, ws: &mut Worksheet, formats: &SheetFormats) -> RollcallResult<()> {
        let layout = &self.layout;

        for (col, width) in layout.column_widths() {
            ws.set_column_width(*col, *width)
                .map_err(export_err("Failed to set column width"))?;
        }
        ws.set_row_height(layout.title_row, TITLE_ROW_HEIGHT)
            .map_err(export_err("Failed to set row height"))?;

        ws.merge_range(
            layout.title_row,
            0,
            layout.title_row,
            layout.last_col,
            &self.settings.title,
            &formats.title,
        )
        .map_err(export_err("Failed to write title"))?;

        // Fixed columns span the day header and column header rows
        let fixed = [
            (layout.index_col, "序号"),
            (layout.program_col, "专业"),
            (layout.enrollment_col, "应到人数"),
            (layout.week_total_col, "本周缺勤人次"),
        ];
        for (col, text) in fixed {
            ws.merge_range(
                layout.day_header_row,
                col,
                layout.column_header_row,
                col,
                text,
                &formats.header,
            )
            .map_err(export_err("Failed to write header"))?;
        }

        for (day, cols) in layout.days() {
            ws.merge_range(
                layout.day_header_row,
                cols.absent,
                layout.day_header_row,
                cols.rate,
                day.label(),
                &formats.header,
            )
            .map_err(export_err("Failed to write day header"))?;
            ws.write_string_with_format(layout.column_header_row, cols.absent, "缺勤人数", &formats.header)
                .map_err(export_err("Failed to write header"))?;
            ws.write_string_with_format(layout.column_header_row, cols.rate, "出勤率(%)", &formats.header)
                .map_err(export_err("Failed to write header"))?;
        }
        Ok(())
    }

    /// One row per roster program. Returns program → row.
    fn write_program_rows(
        &self,
        ws: &mut Worksheet,
        formats: &SheetFormats,
    ) -> RollcallResult<HashMap<String, u32>> {
        let layout = &self.layout;
        let mut rows = HashMap::new();

        for (position, (program, enrollment)) in self.roster.iter().enumerate() {
            let row = layout.program_row(position).ok_or_else(|| {
                RollcallError::Export(format!(
                    "Roster has more programs than the template's {} rows",
                    layout.program_capacity()
                ))
            })?;

            ws.write_number_with_format(row, layout.index_col, (position + 1) as f64, &formats.body)
                .map_err(export_err("Failed to write index"))?;
            ws.write_string_with_format(row, layout.program_col, program, &formats.body)
                .map_err(export_err("Failed to write program"))?;
            ws.write_number_with_format(row, layout.enrollment_col, enrollment, &formats.body)
                .map_err(export_err("Failed to write enrollment"))?;
            ws.write_blank(row, layout.week_total_col, &formats.body)
                .map_err(export_err("Failed to write cell"))?;
            for (_, cols) in layout.days() {
                ws.write_blank(row, cols.absent, &formats.body)
                    .map_err(export_err("Failed to write cell"))?;
                ws.write_blank(row, cols.rate, &formats.rate)
                    .map_err(export_err("Failed to write cell"))?;
            }
            rows.insert(program.to_string(), row);
        }
        Ok(rows)
    }

    fn write_stats(
        &self,
        ws: &mut Worksheet,
        formats: &SheetFormats,
        rows: &HashMap<String, u32>,
        stats: &[AttendanceStats],
    ) -> RollcallResult<()> {
        let layout = &self.layout;
        let mut week_totals: HashMap<u32, usize> = HashMap::new();

        for s in stats {
            let Some(&row) = rows.get(&s.program) else {
                return Err(RollcallError::Export(format!(
                    "Program '{}' has no row in the report",
                    s.program
                )));
            };
            let cols = layout.day_columns(s.day);
            ws.write_number_with_format(row, cols.absent, s.absent_count as f64, &formats.body)
                .map_err(export_err("Failed to write absence count"))?;
            ws.write_number_with_format(row, cols.rate, s.rate, &formats.rate)
                .map_err(export_err("Failed to write attendance rate"))?;
            *week_totals.entry(row).or_insert(0) += s.absent_count;
        }

        for (row, total) in week_totals {
            ws.write_number_with_format(row, layout.week_total_col, total as f64, &formats.body)
                .map_err(export_err("Failed to write weekly total"))?;
        }
        Ok(())
    }

    /// Absentee names per program and day
    fn write_absentee_section(
        &self,
        ws: &mut Worksheet,
        formats: &SheetFormats,
        stats: &[AttendanceStats],
    ) -> RollcallResult<()> {
        let layout = &self.layout;

        ws.merge_range(
            layout.absentee_title_row,
            0,
            layout.absentee_title_row,
            layout.last_col,
            "缺勤名单",
            &formats.title,
        )
        .map_err(export_err("Failed to write absentee title"))?;

        ws.write_string_with_format(layout.absentee_header_row, layout.index_col, "序号", &formats.header)
            .map_err(export_err("Failed to write header"))?;
        ws.merge_range(
            layout.absentee_header_row,
            layout.program_col,
            layout.absentee_header_row,
            layout.week_total_col,
            "专业",
            &formats.header,
        )
        .map_err(export_err("Failed to write header"))?;
        for (day, cols) in layout.days() {
            ws.merge_range(
                layout.absentee_header_row,
                cols.absent,
                layout.absentee_header_row,
                cols.rate,
                day.label(),
                &formats.header,
            )
            .map_err(export_err("Failed to write day header"))?;
        }

        // Program labels in column B, as printed on the template
        let mut labels: Vec<(u32, &str)> = Vec::new();
        for (position, program) in self.roster.names().enumerate() {
            let row = layout.absentee_label_row(position).ok_or_else(|| {
                RollcallError::Export(format!(
                    "Roster has more programs than the absentee section's {} rows",
                    layout.program_capacity()
                ))
            })?;
            ws.set_row_height(row, ABSENTEE_ROW_HEIGHT)
                .map_err(export_err("Failed to set row height"))?;
            ws.write_number_with_format(row, layout.index_col, (position + 1) as f64, &formats.body)
                .map_err(export_err("Failed to write index"))?;
            ws.merge_range(row, layout.program_col, row, layout.week_total_col, program, &formats.body)
                .map_err(export_err("Failed to write program label"))?;
            labels.push((row, program));
        }

        let mut names: HashMap<(u32, Weekday), &str> = HashMap::new();
        for s in stats.iter().filter(|s| !s.absentees.is_empty()) {
            let row = self.absentee_row(&labels, &s.program).ok_or_else(|| {
                RollcallError::Export(format!(
                    "Program '{}' not found in the absentee section",
                    s.program
                ))
            })?;
            names.insert((row, s.day), s.absentees.as_str());
        }

        for &(row, _) in &labels {
            for (day, cols) in layout.days() {
                let text = names.get(&(row, day)).copied().unwrap_or("");
                ws.merge_range(row, cols.absent, row, cols.rate, text, &formats.text)
                    .map_err(export_err("Failed to write absentee names"))?;
            }
        }
        Ok(())
    }

    /// Scan the absentee section rows for the row labelled `program`
    fn absentee_row(&self, labels: &[(u32, &str)], program: &str) -> Option<u32> {
        self.layout
            .absentee_rows
            .clone()
            .find(|row| labels.iter().any(|(r, label)| r == row && *label == program))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RollcallConfig;
    use crate::core::AttendanceSession;

    #[test]
    fn test_to_bytes_is_xlsx() {
        let config = RollcallConfig::builtin().unwrap();
        let mut session = AttendanceSession::new();
        session
            .submit(Weekday::Monday, "机械2班：张三、李四（缺勤）", &config)
            .unwrap();
        let stats = session.stats(&config.roster).unwrap();

        let exporter = ReportExporter::new(ReportLayout::weekly(), &config.roster, &config.report);
        let bytes = exporter.to_bytes(&stats).unwrap();
        // .xlsx is a zip archive
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_empty_report_still_exports() {
        let config = RollcallConfig::builtin().unwrap();
        let exporter = ReportExporter::new(ReportLayout::weekly(), &config.roster, &config.report);
        assert!(exporter.to_bytes(&[]).is_ok());
    }

    #[test]
    fn test_stats_for_unknown_program_fail_export() {
        let config = RollcallConfig::builtin().unwrap();
        let stats = vec![AttendanceStats {
            day: Weekday::Monday,
            program: "23哲学".to_string(),
            enrollment: 30,
            absent_count: 1,
            rate: 96.67,
            absentees: "吴十".to_string(),
        }];
        let exporter = ReportExporter::new(ReportLayout::weekly(), &config.roster, &config.report);
        let err = exporter.to_bytes(&stats).unwrap_err();
        assert!(matches!(err, RollcallError::Export(_)));
    }

    #[test]
    fn test_absentee_row_scans_labels() {
        let config = RollcallConfig::builtin().unwrap();
        let exporter = ReportExporter::new(ReportLayout::weekly(), &config.roster, &config.report);
        let labels = vec![(18, "24机械设计制造及其自动化"), (19, "24电气工程及其自动化")];
        assert_eq!(exporter.absentee_row(&labels, "24电气工程及其自动化"), Some(19));
        assert_eq!(exporter.absentee_row(&labels, "24软件工程"), None);
        // Labels outside the section are ignored
        let outside = vec![(40, "24软件工程")];
        assert_eq!(exporter.absentee_row(&outside, "24软件工程"), None);
    }
}
