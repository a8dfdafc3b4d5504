//! Absentee extraction from the content part of a group
//!
//! Every run of text ending in `（缺勤）` is a list of names, optionally led by
//! a class/count prefix such as `2班缺勤2人`:
//!
//! ```text
//! 1班缺勤1人 张三（缺勤）2班缺勤2人：李四、王五（缺勤）
//! → ["张三", "李四", "王五"]
//! ```

use crate::error::{RollcallError, RollcallResult};
use regex::Regex;

/// Suffixes that close an absentee list
const ABSENT_MARKERS: [&str; 2] = ["（缺勤）", "(缺勤)"];

pub struct AbsenteeExtractor {
    prefix: Regex,
    separators: Regex,
}

impl AbsenteeExtractor {
    pub fn new() -> RollcallResult<Self> {
        let prefix = Regex::new(
            r"^[\s、，,；;：:]*(?:(?:\d+|[一二三四五六七八九十]+)\s*班)?\s*[：:]?\s*(?:共?\s*缺勤\s*(?:\d+|[一二三四五六七八九十]+)?\s*人?)?\s*[：:，,]?",
        )
        .map_err(|e| RollcallError::Parse(format!("Regex error: {}", e)))?;
        let separators = Regex::new(r"[、，,；;\s]+")
            .map_err(|e| RollcallError::Parse(format!("Regex error: {}", e)))?;
        Ok(Self { prefix, separators })
    }

    /// Names in input order, or `None` when the content has no absentee marker
    pub fn extract(&self, content: &str) -> Option<Vec<String>> {
        let mut rest = content;
        let mut names = Vec::new();
        let mut found = false;

        while let Some((pos, len)) = next_marker(rest) {
            found = true;
            self.collect_names(&rest[..pos], &mut names);
            rest = &rest[pos + len..];
        }

        found.then_some(names)
    }

    fn collect_names(&self, piece: &str, names: &mut Vec<String>) {
        let body = match self.prefix.find(piece) {
            Some(m) => &piece[m.end()..],
            None => piece,
        };
        names.extend(
            self.separators
                .split(body)
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string),
        );
    }
}

/// Earliest absentee marker: (byte offset, byte length)
fn next_marker(text: &str) -> Option<(usize, usize)> {
    ABSENT_MARKERS
        .iter()
        .filter_map(|m| text.find(m).map(|pos| (pos, m.len())))
        .min_by_key(|(pos, _)| *pos)
}
