//! Weekly report workbook tests
//!
//! Reports are read back with calamine and checked cell by cell. Coordinates
//! are 0-based: (3, 1) is B4.

use calamine::{Data, Range, Reader, Xlsx};
use pretty_assertions::assert_eq;
use rollcall::config::RollcallConfig;
use rollcall::core::AttendanceSession;
use rollcall::excel::{ReportExporter, ReportLayout, RosterSheetExporter, ROSTER_SHEET_NAME};
use rollcall::types::Weekday;
use std::io::Cursor;
use tempfile::TempDir;

const MECH: &str = "24机械设计制造及其自动化";

fn read_sheet(bytes: Vec<u8>, sheet: &str) -> Range<Data> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).unwrap();
    workbook.worksheet_range(sheet).unwrap()
}

fn report(submissions: &[(Weekday, &str)]) -> Range<Data> {
    let config = RollcallConfig::builtin().unwrap();
    let mut session = AttendanceSession::new();
    for (day, text) in submissions {
        session.submit(*day, text, &config).unwrap();
    }
    let stats = session.stats(&config.roster).unwrap();
    let bytes = ReportExporter::new(ReportLayout::weekly(), &config.roster, &config.report)
        .to_bytes(&stats)
        .unwrap();
    read_sheet(bytes, &config.report.sheet_name)
}

fn string(range: &Range<Data>, pos: (u32, u32)) -> Option<String> {
    match range.get_value(pos) {
        Some(Data::String(s)) => Some(s.clone()),
        _ => None,
    }
}

fn number(range: &Range<Data>, pos: (u32, u32)) -> Option<f64> {
    match range.get_value(pos) {
        Some(Data::Float(f)) => Some(*f),
        Some(Data::Int(i)) => Some(*i as f64),
        _ => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// TEMPLATE
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_template_headers() {
    let sheet = report(&[]);
    assert_eq!(string(&sheet, (0, 0)).as_deref(), Some("学生周考勤统计表"));
    assert_eq!(string(&sheet, (1, 1)).as_deref(), Some("专业"));
    assert_eq!(string(&sheet, (1, 4)).as_deref(), Some("星期一"));
    assert_eq!(string(&sheet, (1, 7)).as_deref(), Some("星期二"));
    assert_eq!(string(&sheet, (1, 19)).as_deref(), Some("星期六"));
    assert_eq!(string(&sheet, (2, 4)).as_deref(), Some("缺勤人数"));
    assert_eq!(string(&sheet, (2, 5)).as_deref(), Some("出勤率(%)"));
}

#[test]
fn test_roster_rows_in_order() {
    let sheet = report(&[]);
    assert_eq!(string(&sheet, (3, 1)).as_deref(), Some(MECH));
    assert_eq!(number(&sheet, (3, 2)), Some(159.0));
    assert_eq!(string(&sheet, (13, 1)).as_deref(), Some("24数据科学与大数据技术"));
    assert_eq!(string(&sheet, (14, 1)), None);

    assert_eq!(string(&sheet, (16, 0)).as_deref(), Some("缺勤名单"));
    assert_eq!(string(&sheet, (18, 1)).as_deref(), Some(MECH));
    assert_eq!(string(&sheet, (28, 1)).as_deref(), Some("24数据科学与大数据技术"));
}

// ═══════════════════════════════════════════════════════════════════════════
// DATA CELLS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_monday_counts_and_rate() {
    let sheet = report(&[(Weekday::Monday, "机械2班：张三、李四（缺勤）")]);
    assert_eq!(number(&sheet, (3, 4)), Some(2.0));
    assert_eq!(number(&sheet, (3, 5)), Some(98.74));
    assert_eq!(number(&sheet, (3, 3)), Some(2.0));
    assert_eq!(string(&sheet, (18, 4)).as_deref(), Some("张三，李四"));
}

#[test]
fn test_days_land_in_their_columns() {
    let sheet = report(&[
        (Weekday::Tuesday, "机械2班：张三（缺勤）"),
        (Weekday::Saturday, "机械2班：李四、王五（缺勤）"),
    ]);
    // Tuesday H/I, Saturday T/U
    assert_eq!(number(&sheet, (3, 7)), Some(1.0));
    assert_eq!(number(&sheet, (3, 19)), Some(2.0));
    assert_eq!(number(&sheet, (3, 4)), None);
    assert_eq!(number(&sheet, (3, 3)), Some(3.0));
    assert_eq!(string(&sheet, (18, 19)).as_deref(), Some("李四，王五"));
}

#[test]
fn test_program_with_no_absentees() {
    let sheet = report(&[(Weekday::Wednesday, "自动化1班：缺勤0人（缺勤）")]);
    // 24自动化 is the third roster row
    assert_eq!(number(&sheet, (5, 10)), Some(0.0));
    assert_eq!(number(&sheet, (5, 11)), Some(100.0));
    assert!(string(&sheet, (20, 10)).unwrap_or_default().is_empty());
}

#[test]
fn test_report_export_to_file() {
    let config = RollcallConfig::builtin().unwrap();
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("week.xlsx");

    ReportExporter::new(ReportLayout::weekly(), &config.roster, &config.report)
        .export(&[], &path)
        .unwrap();

    let mut workbook: Xlsx<_> = calamine::open_workbook(&path).unwrap();
    assert_eq!(workbook.sheet_names(), vec![config.report.sheet_name.clone()]);
}

// ═══════════════════════════════════════════════════════════════════════════
// ROSTER SHEET
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_roster_sheet_rows() {
    let entries = vec![
        (
            "计算机".to_string(),
            vec!["张三".to_string(), "李四".to_string(), "王五".to_string()],
        ),
        ("软件工程".to_string(), vec!["孙八".to_string()]),
    ];
    let bytes = RosterSheetExporter::new(&entries).to_bytes().unwrap();
    let sheet = read_sheet(bytes, ROSTER_SHEET_NAME);

    assert_eq!(string(&sheet, (0, 3)).as_deref(), Some("名单"));
    assert_eq!(string(&sheet, (1, 1)).as_deref(), Some("计算机"));
    assert_eq!(number(&sheet, (1, 2)), Some(3.0));
    assert_eq!(string(&sheet, (1, 3)).as_deref(), Some("张三、李四、王五"));
    assert_eq!(string(&sheet, (2, 1)).as_deref(), Some("软件工程"));
}
