//! Group segmentation for pasted attendance text
//!
//! Splits raw text into groups (one per class report) and each group into a
//! label part and a content part:
//!
//! ```text
//! 2024-10-14 08:05:12            ← timestamp, starts a new group
//! 机械2班：张三、李四（缺勤）      ← label "机械2班", content "张三、李四（缺勤）"
//! 电气1班：王五（缺勤）；土木：…   ← "；" ends a group
//! ```

use super::label::LabelPattern;
use crate::error::{RollcallError, RollcallResult};
use regex::Regex;

/// Separators between label and content, highest priority first
pub const SEPARATORS: [Separator; 3] = [
    Separator::FullwidthColon,
    Separator::Colon,
    Separator::Whitespace,
];

/// Characters that end a group
const GROUP_TERMINATORS: [char; 2] = [';', '；'];

/// Label/content separator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    FullwidthColon,
    Colon,
    Whitespace,
}

impl Separator {
    /// Byte position and length of the first occurrence in `text`
    pub fn find(&self, text: &str) -> Option<(usize, usize)> {
        match self {
            Separator::FullwidthColon => text.find('：').map(|i| (i, '：'.len_utf8())),
            Separator::Colon => text.find(':').map(|i| (i, 1)),
            Separator::Whitespace => text
                .char_indices()
                .find(|(_, c)| c.is_whitespace())
                .map(|(i, c)| (i, c.len_utf8())),
        }
    }
}

/// A group split into its label and content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub label: String,
    pub content: String,
}

impl Segment {
    /// Split `group` around the separator at `pos` (byte offset) of `len` bytes
    pub fn split_at(group: &str, pos: usize, len: usize) -> Self {
        Self {
            label: normalize_spacing(&group[..pos]),
            content: normalize_spacing(&group[pos + len..]),
        }
    }
}

/// Trim and collapse runs of whitespace (including U+3000) to one space
pub fn normalize_spacing(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Line-oriented group segmenter
pub struct Segmenter {
    timestamp: Regex,
}

impl Segmenter {
    pub fn new() -> RollcallResult<Self> {
        // 2024-10-14 08:05:12 | 2024/10/14 8:05 | 2024年10月14日 08:05 | 10月14日 | 08:05
        let timestamp = Regex::new(
            r"^\s*(?:(?:\d{4}[-/.]\d{1,2}[-/.]\d{1,2}|(?:\d{4}年)?\d{1,2}月\d{1,2}日)(?:\s*\d{1,2}:\d{2}(?::\d{2})?)?|\d{1,2}:\d{2}(?::\d{2})?)",
        )
        .map_err(|e| RollcallError::Parse(format!("Regex error: {}", e)))?;
        Ok(Self { timestamp })
    }

    /// Remove a leading timestamp. Returns the remainder when one was found.
    pub fn strip_timestamp<'t>(&self, line: &'t str) -> Option<&'t str> {
        let m = self.timestamp.find(line)?;
        let rest = &line[m.end()..];
        // "12:305" or "2024-10-145" are not timestamps
        if rest.starts_with(|c: char| c.is_ascii_digit()) {
            return None;
        }
        Some(rest)
    }

    /// Split text into normalized, non-empty groups
    pub fn groups(&self, text: &str, labels: &LabelPattern) -> Vec<String> {
        let mut groups = Vec::new();
        let mut current = String::new();

        for raw_line in text.lines() {
            let mut line = raw_line.trim_start_matches('\u{feff}');

            if let Some(rest) = self.strip_timestamp(line) {
                flush(&mut current, &mut groups);
                line = rest;
            }

            if line.trim().is_empty() {
                flush(&mut current, &mut groups);
                continue;
            }

            if labels.starts_group(line) {
                flush(&mut current, &mut groups);
            }

            let mut pieces = line.split(GROUP_TERMINATORS);
            if let Some(first) = pieces.next() {
                append(&mut current, first);
            }
            for piece in pieces {
                flush(&mut current, &mut groups);
                append(&mut current, piece);
            }
        }
        flush(&mut current, &mut groups);

        groups
    }
}

fn append(current: &mut String, piece: &str) {
    let piece = piece.trim();
    if piece.is_empty() {
        return;
    }
    if !current.is_empty() {
        current.push(' ');
    }
    current.push_str(piece);
}

fn flush(current: &mut String, groups: &mut Vec<String>) {
    let group = normalize_spacing(current);
    if !group.is_empty() {
        groups.push(group);
    }
    current.clear();
}
