//! Program label recognition and resolution
//!
//! A label is what precedes the separator in a group: an optional 2-4 digit
//! year, a Chinese short name, and an optional class suffix that is dropped.
//! `24机械2班` → year `24`, short name `机械`.

use crate::error::{RollcallError, RollcallResult};
use crate::types::{AbbreviationMap, ProgramRoster};
use regex::Regex;

/// Recognized parts of a program label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramLabel {
    pub year: Option<String>,
    pub short_name: String,
}

impl ProgramLabel {
    /// `<year><short-name>`, or just the short name without a year
    pub fn with_year(&self) -> String {
        match self.year {
            Some(ref y) => format!("{}{}", y, self.short_name),
            None => self.short_name.clone(),
        }
    }
}

/// Compiled label patterns
pub struct LabelPattern {
    label: Regex,
    head: Regex,
}

impl LabelPattern {
    pub fn new() -> RollcallResult<Self> {
        let label = Regex::new(
            r"^(?:(?P<year>\d{2,4})级?)?\s*(?P<name>\p{Han}+?)(?:专业)?\s*(?:(?:\d+|[一二三四五六七八九十]+)\s*班|\d+|班)?(?:\s*共?缺勤\s*\d+\s*人)?$",
        )
        .map_err(|e| RollcallError::Parse(format!("Regex error: {}", e)))?;

        // A line opening a new class report: the label is followed by a colon,
        // or carries a class number and is followed by a space.
        let head = Regex::new(
            r"^\s*(?:\d{2,4}级?)?\s*(?P<name>\p{Han}{1,16}?)(?:专业)?\s*(?:(?:(?:\d+|[一二三四五六七八九十]+)\s*班|\d+|班)\s*(?:[：:]|\s)|[：:])",
        )
        .map_err(|e| RollcallError::Parse(format!("Regex error: {}", e)))?;

        Ok(Self { label, head })
    }

    /// Parse a whole label
    pub fn parse(&self, label: &str) -> Option<ProgramLabel> {
        let caps = self.label.captures(label.trim())?;
        let short_name = caps.name("name")?.as_str();
        if is_marker_word(short_name) {
            return None;
        }
        Some(ProgramLabel {
            year: caps.name("year").map(|m| m.as_str().to_string()),
            short_name: short_name.to_string(),
        })
    }

    /// Whether a line begins with a program label
    pub fn starts_group(&self, line: &str) -> bool {
        self.head
            .captures(line)
            .and_then(|caps| caps.name("name"))
            .is_some_and(|m| !is_marker_word(m.as_str()))
    }
}

/// Words that head an absentee list rather than name a program
fn is_marker_word(name: &str) -> bool {
    name.contains("缺勤") || name.contains("请假") || name == "共"
}

/// Maps labels onto program full names
pub struct Resolver<'a> {
    abbreviations: &'a AbbreviationMap,
    roster: &'a ProgramRoster,
}

impl<'a> Resolver<'a> {
    pub fn new(abbreviations: &'a AbbreviationMap, roster: &'a ProgramRoster) -> Self {
        Self {
            abbreviations,
            roster,
        }
    }

    /// Lookup order: abbreviation with year, abbreviation, roster name with
    /// year, roster name, then the synthesized `<year><short-name>`.
    pub fn resolve(&self, label: &ProgramLabel) -> String {
        let with_year = label.with_year();

        if let Some(full) = self.abbreviations.resolve(&with_year) {
            return full.to_string();
        }
        if let Some(full) = self.abbreviations.resolve(&label.short_name) {
            return full.to_string();
        }
        if self.roster.contains(&with_year) {
            return with_year;
        }
        if self.roster.contains(&label.short_name) {
            return label.short_name.clone();
        }
        with_year
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(label: &str) -> Option<ProgramLabel> {
        LabelPattern::new().unwrap().parse(label)
    }

    fn label(year: Option<&str>, name: &str) -> Option<ProgramLabel> {
        Some(ProgramLabel {
            year: year.map(str::to_string),
            short_name: name.to_string(),
        })
    }

    #[test]
    fn test_parse_label_shapes() {
        assert_eq!(parse("机械2班"), label(None, "机械"));
        assert_eq!(parse("24机械2班"), label(Some("24"), "机械"));
        assert_eq!(parse("2024级机械"), label(Some("2024"), "机械"));
        assert_eq!(parse("计科一班"), label(None, "计科"));
        assert_eq!(parse("土木班"), label(None, "土木"));
        assert_eq!(parse("计算机专业3"), label(None, "计算机"));
        assert_eq!(parse("自动化"), label(None, "自动化"));
        assert_eq!(parse("24电气1班缺勤2人"), label(Some("24"), "电气"));
    }

    #[test]
    fn test_parse_label_rejects_non_labels() {
        assert_eq!(parse("张三、李四"), None);
        assert_eq!(parse("2班"), None);
        assert_eq!(parse("缺勤"), None);
        assert_eq!(parse(""), None);
    }

    #[test]
    fn test_starts_group() {
        let pattern = LabelPattern::new().unwrap();
        assert!(pattern.starts_group("机械2班：张三"));
        assert!(pattern.starts_group("土木:张三"));
        assert!(pattern.starts_group("24电气1班 缺勤2人 王五"));
        assert!(!pattern.starts_group("张三、李四（缺勤）"));
        assert!(!pattern.starts_group("张三 李四（缺勤）"));
        assert!(!pattern.starts_group("缺勤：张三（缺勤）"));
    }

    #[test]
    fn test_resolver_lookup_order() {
        let mut abbreviations = AbbreviationMap::new();
        abbreviations.insert("机械", "24机械设计制造及其自动化");
        abbreviations.insert("23机械", "23机械设计制造及其自动化");
        let mut roster = ProgramRoster::new();
        roster.insert("24自动化", 96);
        roster.insert("通信工程", 74);
        let resolver = Resolver::new(&abbreviations, &roster);

        let resolve = |l: Option<ProgramLabel>| resolver.resolve(&l.unwrap());
        assert_eq!(resolve(label(None, "机械")), "24机械设计制造及其自动化");
        assert_eq!(resolve(label(Some("23"), "机械")), "23机械设计制造及其自动化");
        assert_eq!(resolve(label(Some("24"), "自动化")), "24自动化");
        assert_eq!(resolve(label(Some("24"), "通信工程")), "通信工程");
        assert_eq!(resolve(label(Some("22"), "哲学")), "22哲学");
        assert_eq!(resolve(label(None, "哲学")), "哲学");
    }
}
