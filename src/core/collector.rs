//! Roster collector
//!
//! Collects student names per program from lines like
//! `计算机专业：张三、李四`. Lists only grow: repeated submissions append and
//! nothing is de-duplicated. `reset` empties the collector.

use crate::error::{RollcallError, RollcallResult};
use regex::Regex;
use tracing::{debug, info};

pub struct RosterCollector {
    line: Regex,
    separators: Regex,
    entries: Vec<(String, Vec<String>)>,
}

impl RosterCollector {
    pub fn new() -> RollcallResult<Self> {
        let line = Regex::new(r"^\s*(?P<program>[^：:\s][^：:]*?)\s*专业\s*[：:]\s*(?P<names>.*)$")
            .map_err(|e| RollcallError::Parse(format!("Regex error: {}", e)))?;
        let separators = Regex::new(r"[、，,\s]+")
            .map_err(|e| RollcallError::Parse(format!("Regex error: {}", e)))?;
        Ok(Self {
            line,
            separators,
            entries: Vec::new(),
        })
    }

    /// Append every `<program>专业：<names>` line in `text`.
    ///
    /// Returns the number of names added. Fails with
    /// [`RollcallError::NoRecords`] when no line matches.
    pub fn submit(&mut self, text: &str) -> RollcallResult<usize> {
        let mut matched = false;
        let mut added = 0;

        for line in text.lines() {
            let Some(caps) = self.line.captures(line) else {
                if !line.trim().is_empty() {
                    debug!(line = %line, "not a roster line, skipping");
                }
                continue;
            };
            matched = true;

            let program = caps["program"].trim().to_string();
            let names: Vec<String> = self
                .separators
                .split(&caps["names"])
                .filter(|n| !n.is_empty())
                .map(str::to_string)
                .collect();
            added += names.len();

            match self.entries.iter_mut().find(|(p, _)| *p == program) {
                Some((_, list)) => list.extend(names),
                None => self.entries.push((program, names)),
            }
        }

        if !matched {
            return Err(RollcallError::NoRecords);
        }
        debug!(added, programs = self.entries.len(), "roster submission collected");
        Ok(added)
    }

    /// Programs with their names, in first-seen order
    pub fn entries(&self) -> &[(String, Vec<String>)] {
        &self.entries
    }

    pub fn names(&self, program: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(p, _)| p == program)
            .map(|(_, names)| names.as_slice())
    }

    /// Total names across all programs
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, names)| names.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn reset(&mut self) {
        info!(programs = self.entries.len(), "resetting roster collector");
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strings(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_submissions_append_without_dedup() {
        let mut collector = RosterCollector::new().unwrap();
        assert_eq!(collector.submit("计算机专业：张三、李四").unwrap(), 2);
        assert_eq!(collector.submit("计算机专业：王五").unwrap(), 1);
        collector.submit("计算机专业:张三").unwrap();

        assert_eq!(
            collector.names("计算机").unwrap(),
            strings(&["张三", "李四", "王五", "张三"]).as_slice()
        );
        assert_eq!(collector.total(), 4);
    }

    #[test]
    fn test_multiple_programs_first_seen_order() {
        let mut collector = RosterCollector::new().unwrap();
        collector
            .submit("软件工程专业：甲、乙\n随便说点什么\n土木专业：丙\n软件工程专业：丁")
            .unwrap();

        let programs: Vec<&str> = collector.entries().iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(programs, vec!["软件工程", "土木"]);
        assert_eq!(
            collector.names("软件工程").unwrap(),
            strings(&["甲", "乙", "丁"]).as_slice()
        );
    }

    #[test]
    fn test_no_matching_line() {
        let mut collector = RosterCollector::new().unwrap();
        assert!(matches!(
            collector.submit("张三、李四"),
            Err(RollcallError::NoRecords)
        ));
        assert!(collector.is_empty());
    }

    #[test]
    fn test_reset() {
        let mut collector = RosterCollector::new().unwrap();
        collector.submit("计算机专业：张三").unwrap();
        collector.reset();
        assert!(collector.is_empty());
        assert_eq!(collector.names("计算机"), None);
        assert_eq!(collector.total(), 0);
    }
}
