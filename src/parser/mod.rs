//! Roster text parser
//!
//! Turns pasted, loosely formatted attendance text into `(program, absentees)`
//! records:
//!
//! 1. [`segment`] splits the text into groups and each group into label/content
//! 2. [`label`] recognizes the program label and resolves the full program name
//! 3. [`absentees`] pulls the names out of every `…（缺勤）` run
//!
//! Groups that resolve to the same program are merged; output order is the
//! order in which programs were first seen.
//!
//! # Example
//! ```
//! use rollcall::config::RollcallConfig;
//! use rollcall::parser::parse_roster_text;
//!
//! let config = RollcallConfig::builtin()?;
//! let records = parse_roster_text(
//!     "机械2班：张三、李四（缺勤）",
//!     &config.abbreviations,
//!     &config.roster,
//! )?;
//! assert_eq!(records[0].program, "24机械设计制造及其自动化");
//! assert_eq!(records[0].absentees, vec!["张三", "李四"]);
//! # Ok::<(), rollcall::error::RollcallError>(())
//! ```

pub mod absentees;
pub mod label;
pub mod segment;

pub use absentees::AbsenteeExtractor;
pub use label::{LabelPattern, ProgramLabel, Resolver};
pub use segment::{Segment, Segmenter, Separator, SEPARATORS};

use crate::error::RollcallResult;
use crate::types::{AbbreviationMap, ProgramAbsences, ProgramRoster};
use tracing::debug;

/// Parse pasted attendance text into per-program absentee lists
pub fn parse_roster_text(
    text: &str,
    abbreviations: &AbbreviationMap,
    roster: &ProgramRoster,
) -> RollcallResult<Vec<ProgramAbsences>> {
    Ok(RosterParser::new(abbreviations, roster)?.parse(text))
}

/// Reusable parser holding the compiled patterns
pub struct RosterParser<'a> {
    segmenter: Segmenter,
    labels: LabelPattern,
    absentees: AbsenteeExtractor,
    resolver: Resolver<'a>,
}

impl<'a> RosterParser<'a> {
    pub fn new(abbreviations: &'a AbbreviationMap, roster: &'a ProgramRoster) -> RollcallResult<Self> {
        Ok(Self {
            segmenter: Segmenter::new()?,
            labels: LabelPattern::new()?,
            absentees: AbsenteeExtractor::new()?,
            resolver: Resolver::new(abbreviations, roster),
        })
    }

    pub fn parse(&self, text: &str) -> Vec<ProgramAbsences> {
        let mut records: Vec<ProgramAbsences> = Vec::new();

        for group in self.segmenter.groups(text, &self.labels) {
            let Some((segment, label)) = self.split_group(&group) else {
                debug!(group = %group, "no program label, skipping group");
                continue;
            };

            let Some(names) = self.absentees.extract(&segment.content) else {
                debug!(label = %segment.label, "no absentee marker, skipping group");
                continue;
            };

            let program = self.resolver.resolve(&label);
            debug!(
                label = %segment.label,
                program = %program,
                absentees = names.len(),
                "parsed group"
            );

            match records.iter_mut().find(|r| r.program == program) {
                Some(existing) => existing.absentees.extend(names),
                None => records.push(ProgramAbsences::new(program, names)),
            }
        }

        records
    }

    /// Split a group at the first separator (by priority) whose label part is a
    /// program label.
    fn split_group(&self, group: &str) -> Option<(Segment, ProgramLabel)> {
        SEPARATORS
            .iter()
            .filter_map(|sep| sep.find(group))
            .map(|(pos, len)| Segment::split_at(group, pos, len))
            .find_map(|segment| {
                let label = self.labels.parse(&segment.label)?;
                Some((segment, label))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RollcallConfig;
    use pretty_assertions::assert_eq;

    fn parse(text: &str) -> Vec<ProgramAbsences> {
        let config = RollcallConfig::builtin().unwrap();
        parse_roster_text(text, &config.abbreviations, &config.roster).unwrap()
    }

    fn record(program: &str, names: &[&str]) -> ProgramAbsences {
        ProgramAbsences::new(program, names.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_single_group() {
        assert_eq!(
            parse("机械2班：张三、李四（缺勤）"),
            vec![record("24机械设计制造及其自动化", &["张三", "李四"])]
        );
    }

    #[test]
    fn test_ascii_colon_and_space_separators() {
        assert_eq!(
            parse("电气1班:王五（缺勤）;24土木2班 赵六、钱七（缺勤）"),
            vec![
                record("24电气工程及其自动化", &["王五"]),
                record("24土木工程", &["赵六", "钱七"]),
            ]
        );
    }

    #[test]
    fn test_absent_count_inside_label() {
        assert_eq!(
            parse("24电气1班 缺勤2人：王五、赵六（缺勤）"),
            vec![record("24电气工程及其自动化", &["王五", "赵六"])]
        );
    }

    #[test]
    fn test_same_program_groups_concatenate() {
        let text = "机械1班：张三（缺勤）\n软工2班：孙八（缺勤）\n机设2班：李四（缺勤）";
        assert_eq!(
            parse(text),
            vec![
                record("24机械设计制造及其自动化", &["张三", "李四"]),
                record("24软件工程", &["孙八"]),
            ]
        );
    }

    #[test]
    fn test_timestamped_chat_export() {
        let text = "\
2024-10-14 08:05:12
机械2班：缺勤2人 张三、李四（缺勤）
2024-10-14 08:07:40
计科1班：
周九（缺勤）
2024-10-14 08:09:02
大家记得按时上课";
        assert_eq!(
            parse(text),
            vec![
                record("24机械设计制造及其自动化", &["张三", "李四"]),
                record("24计算机科学与技术", &["周九"]),
            ]
        );
    }

    #[test]
    fn test_unknown_short_name_falls_back_to_year_concatenation() {
        assert_eq!(
            parse("23哲学1班：吴十（缺勤）"),
            vec![record("23哲学", &["吴十"])]
        );
    }

    #[test]
    fn test_group_without_marker_contributes_nothing() {
        assert!(parse("机械2班：全员到齐").is_empty());
        assert!(parse("今天天气不错").is_empty());
    }

    #[test]
    fn test_marker_without_names_registers_program() {
        assert_eq!(
            parse("自动化1班：缺勤0人（缺勤）"),
            vec![record("24自动化", &[])]
        );
    }
}
