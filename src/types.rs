use crate::error::{RollcallError, RollcallResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

//==============================================================================
// Report days
//==============================================================================

/// A day that has a column pair in the weekly report (Monday to Saturday)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    pub const ALL: [Weekday; 6] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    /// Label used in the report header (星期一 ..)
    pub fn label(&self) -> &'static str {
        match self {
            Weekday::Monday => "星期一",
            Weekday::Tuesday => "星期二",
            Weekday::Wednesday => "星期三",
            Weekday::Thursday => "星期四",
            Weekday::Friday => "星期五",
            Weekday::Saturday => "星期六",
        }
    }

    /// Map a calendar weekday; Sunday has no report column
    pub fn from_chrono(day: chrono::Weekday) -> RollcallResult<Self> {
        match day {
            chrono::Weekday::Mon => Ok(Weekday::Monday),
            chrono::Weekday::Tue => Ok(Weekday::Tuesday),
            chrono::Weekday::Wed => Ok(Weekday::Wednesday),
            chrono::Weekday::Thu => Ok(Weekday::Thursday),
            chrono::Weekday::Fri => Ok(Weekday::Friday),
            chrono::Weekday::Sat => Ok(Weekday::Saturday),
            chrono::Weekday::Sun => Err(RollcallError::InvalidDay("星期日".to_string())),
        }
    }

    /// Today's report day in local time
    pub fn today() -> RollcallResult<Self> {
        use chrono::Datelike;
        Self::from_chrono(chrono::Local::now().weekday())
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Weekday {
    type Err = RollcallError;

    /// Accepts 周一 / 星期一 / 礼拜一 / 一 / mon / monday / 1 (and so on)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let lower = trimmed.to_lowercase();
        let key = ["星期", "礼拜", "周"]
            .iter()
            .find_map(|p| lower.strip_prefix(p))
            .unwrap_or(&lower);

        let day = match key {
            "一" | "1" | "mon" | "monday" => Weekday::Monday,
            "二" | "2" | "tue" | "tuesday" => Weekday::Tuesday,
            "三" | "3" | "wed" | "wednesday" => Weekday::Wednesday,
            "四" | "4" | "thu" | "thursday" => Weekday::Thursday,
            "五" | "5" | "fri" | "friday" => Weekday::Friday,
            "六" | "6" | "sat" | "saturday" => Weekday::Saturday,
            _ => return Err(RollcallError::InvalidDay(trimmed.to_string())),
        };
        Ok(day)
    }
}

//==============================================================================
// Static tables
//==============================================================================

/// Program full name → enrollment, in report row order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgramRoster {
    programs: Vec<(String, u32)>,
}

impl ProgramRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a program; a repeated name replaces the enrollment in place
    pub fn insert(&mut self, name: impl Into<String>, enrollment: u32) {
        let name = name.into();
        match self.programs.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = enrollment,
            None => self.programs.push((name, enrollment)),
        }
    }

    pub fn enrollment(&self, program: &str) -> Option<u32> {
        self.programs
            .iter()
            .find(|(n, _)| n == program)
            .map(|(_, e)| *e)
    }

    pub fn contains(&self, program: &str) -> bool {
        self.position(program).is_some()
    }

    /// Row order of a program
    pub fn position(&self, program: &str) -> Option<usize> {
        self.programs.iter().position(|(n, _)| n == program)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.programs.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.programs.iter().map(|(n, e)| (n.as_str(), *e))
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }
}

/// Informal short label → program full name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AbbreviationMap {
    entries: HashMap<String, String>,
}

impl AbbreviationMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the previous full name if the abbreviation was already mapped
    pub fn insert(&mut self, short: impl Into<String>, full: impl Into<String>) -> Option<String> {
        self.entries.insert(short.into(), full.into())
    }

    pub fn resolve(&self, short: &str) -> Option<&str> {
        self.entries.get(short).map(String::as_str)
    }

    /// Abbreviations of one program, sorted
    pub fn abbreviations_of(&self, full: &str) -> Vec<&str> {
        let mut shorts: Vec<&str> = self
            .entries
            .iter()
            .filter(|(_, f)| f.as_str() == full)
            .map(|(s, _)| s.as_str())
            .collect();
        shorts.sort_unstable();
        shorts
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//==============================================================================
// Records
//==============================================================================

/// Parser output: absentees grouped under a resolved program name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramAbsences {
    pub program: String,
    pub absentees: Vec<String>,
}

impl ProgramAbsences {
    pub fn new(program: impl Into<String>, absentees: Vec<String>) -> Self {
        Self {
            program: program.into(),
            absentees,
        }
    }
}

/// One stored submission for a (day, program) key
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceRecord {
    pub day: Weekday,
    pub program: String,
    pub absentees: Vec<String>,
    pub enrollment: u32,
}

impl AttendanceRecord {
    pub fn absent_count(&self) -> usize {
        self.absentees.len()
    }
}

/// Derived, read-only figures for one record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceStats {
    pub day: Weekday,
    pub program: String,
    pub enrollment: u32,
    pub absent_count: usize,
    /// Percentage, rounded to 2 decimals
    pub rate: f64,
    /// Absentee names joined with "，"
    pub absentees: String,
}

/// Separator used when absentee names are joined into one cell
pub const NAME_JOINER: &str = "，";
