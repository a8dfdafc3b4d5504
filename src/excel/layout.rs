//! Fixed coordinates of the weekly attendance report
//!
//! Rows are 1-based in the constants below (as printed on the sheet) and
//! converted to the 0-based indexes rust_xlsxwriter uses by the accessors.
//!
//! ```text
//! row 1        title (merged A:U)
//! row 2        day headers, merged over each (count, rate) pair
//! row 3        column headers
//! rows 4-14    one program per row: A index, B program, C enrollment, D weekly total
//! row 17       absentee section title
//! row 18       absentee section headers
//! rows 19-29   program label in B, each day's names merged over its column pair
//! ```

use crate::types::Weekday;
use std::ops::RangeInclusive;

pub const TITLE_ROW: u32 = 1;
pub const DAY_HEADER_ROW: u32 = 2;
pub const COLUMN_HEADER_ROW: u32 = 3;
pub const DATA_ROWS: RangeInclusive<u32> = 4..=14;
pub const ABSENTEE_TITLE_ROW: u32 = 17;
pub const ABSENTEE_HEADER_ROW: u32 = 18;
pub const ABSENTEE_ROWS: RangeInclusive<u32> = 19..=29;

/// (absence count, rate) column letters per day
pub const DAY_COLUMNS: [(Weekday, &str, &str); 6] = [
    (Weekday::Monday, "E", "F"),
    (Weekday::Tuesday, "H", "I"),
    (Weekday::Wednesday, "K", "L"),
    (Weekday::Thursday, "N", "O"),
    (Weekday::Friday, "Q", "R"),
    (Weekday::Saturday, "T", "U"),
];

pub const INDEX_COLUMN: &str = "A";
pub const PROGRAM_COLUMN: &str = "B";
pub const ENROLLMENT_COLUMN: &str = "C";
pub const WEEK_TOTAL_COLUMN: &str = "D";
pub const LAST_COLUMN: &str = "U";

/// Column widths in character units
pub const COLUMN_WIDTHS: [(&str, f64); 21] = [
    ("A", 6.0),
    ("B", 30.0),
    ("C", 10.0),
    ("D", 10.0),
    ("E", 9.0),
    ("F", 10.0),
    ("G", 2.0),
    ("H", 9.0),
    ("I", 10.0),
    ("J", 2.0),
    ("K", 9.0),
    ("L", 10.0),
    ("M", 2.0),
    ("N", 9.0),
    ("O", 10.0),
    ("P", 2.0),
    ("Q", 9.0),
    ("R", 10.0),
    ("S", 2.0),
    ("T", 9.0),
    ("U", 10.0),
];

pub const FONT_NAME: &str = "宋体";
pub const TITLE_FONT_SIZE: f64 = 16.0;
pub const BODY_FONT_SIZE: f64 = 11.0;
pub const TITLE_ROW_HEIGHT: f64 = 30.0;
pub const ABSENTEE_ROW_HEIGHT: f64 = 36.0;

/// 0-based column indexes of one day's pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayColumns {
    pub absent: u16,
    pub rate: u16,
}

/// Resolved (0-based) report coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct ReportLayout {
    pub title_row: u32,
    pub day_header_row: u32,
    pub column_header_row: u32,
    pub data_rows: RangeInclusive<u32>,
    pub absentee_title_row: u32,
    pub absentee_header_row: u32,
    pub absentee_rows: RangeInclusive<u32>,
    pub index_col: u16,
    pub program_col: u16,
    pub enrollment_col: u16,
    pub week_total_col: u16,
    pub last_col: u16,
    days: Vec<(Weekday, DayColumns)>,
    widths: Vec<(u16, f64)>,
}

impl ReportLayout {
    /// The weekly report template
    pub fn weekly() -> Self {
        let days = DAY_COLUMNS
            .iter()
            .map(|(day, absent, rate)| {
                (
                    *day,
                    DayColumns {
                        absent: letter_index(absent),
                        rate: letter_index(rate),
                    },
                )
            })
            .collect();
        let widths = COLUMN_WIDTHS
            .iter()
            .map(|(letter, width)| (letter_index(letter), *width))
            .collect();

        Self {
            title_row: TITLE_ROW - 1,
            day_header_row: DAY_HEADER_ROW - 1,
            column_header_row: COLUMN_HEADER_ROW - 1,
            data_rows: (DATA_ROWS.start() - 1)..=(DATA_ROWS.end() - 1),
            absentee_title_row: ABSENTEE_TITLE_ROW - 1,
            absentee_header_row: ABSENTEE_HEADER_ROW - 1,
            absentee_rows: (ABSENTEE_ROWS.start() - 1)..=(ABSENTEE_ROWS.end() - 1),
            index_col: letter_index(INDEX_COLUMN),
            program_col: letter_index(PROGRAM_COLUMN),
            enrollment_col: letter_index(ENROLLMENT_COLUMN),
            week_total_col: letter_index(WEEK_TOTAL_COLUMN),
            last_col: letter_index(LAST_COLUMN),
            days,
            widths,
        }
    }

    /// Number of programs the template has rows for
    pub fn program_capacity(&self) -> usize {
        let data = (self.data_rows.end() - self.data_rows.start() + 1) as usize;
        let absentees = (self.absentee_rows.end() - self.absentee_rows.start() + 1) as usize;
        data.min(absentees)
    }

    /// Data row of the program at roster position `position`
    pub fn program_row(&self, position: usize) -> Option<u32> {
        let row = self.data_rows.start().checked_add(u32::try_from(position).ok()?)?;
        self.data_rows.contains(&row).then_some(row)
    }

    /// Absentee-section row reserved for roster position `position`
    pub fn absentee_label_row(&self, position: usize) -> Option<u32> {
        let row = self
            .absentee_rows
            .start()
            .checked_add(u32::try_from(position).ok()?)?;
        self.absentee_rows.contains(&row).then_some(row)
    }

    pub fn day_columns(&self, day: Weekday) -> DayColumns {
        self.days
            .iter()
            .find(|(d, _)| *d == day)
            .map(|(_, cols)| *cols)
            .unwrap_or(DayColumns { absent: 0, rate: 0 })
    }

    pub fn days(&self) -> impl Iterator<Item = (Weekday, DayColumns)> + '_ {
        self.days.iter().copied()
    }

    pub fn column_widths(&self) -> &[(u16, f64)] {
        &self.widths
    }
}

/// Column letters → 0-based index ("A" → 0, "AA" → 26)
pub fn column_letter_to_index(letters: &str) -> Option<u16> {
    if letters.is_empty() {
        return None;
    }
    let mut index: u32 = 0;
    for c in letters.chars() {
        if !c.is_ascii_uppercase() {
            return None;
        }
        index = index * 26 + (c as u32 - 'A' as u32 + 1);
    }
    u16::try_from(index - 1).ok()
}

// Letters in this module are compile-time constants
fn letter_index(letters: &str) -> u16 {
    column_letter_to_index(letters).unwrap_or(0)
}
