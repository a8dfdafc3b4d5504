//! Roster configuration
//!
//! The roster (program → enrollment) and the abbreviation table are read from a
//! YAML file. A default roster is compiled in from `config/roster.yaml`.
//!
//! ```yaml
//! report:
//!   title: 学生周考勤统计表
//! programs:
//!   - name: 24机械设计制造及其自动化
//!     enrollment: 159
//!     abbreviations: [机械, 机设]
//! ```

use crate::error::{RollcallError, RollcallResult};
use crate::excel::ReportLayout;
use crate::types::{AbbreviationMap, ProgramRoster};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

const BUILTIN_ROSTER: &str = include_str!("../config/roster.yaml");

/// Report-level settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    pub title: String,
    pub sheet_name: String,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            title: "学生周考勤统计表".to_string(),
            sheet_name: "考勤统计".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    report: ReportSettings,
    programs: Vec<ProgramEntry>,
}

#[derive(Debug, Deserialize)]
struct ProgramEntry {
    name: String,
    enrollment: u32,
    #[serde(default)]
    abbreviations: Vec<String>,
}

/// Validated configuration: report settings, roster, abbreviations
#[derive(Debug, Clone, PartialEq)]
pub struct RollcallConfig {
    pub report: ReportSettings,
    pub roster: ProgramRoster,
    pub abbreviations: AbbreviationMap,
}

impl RollcallConfig {
    /// The compiled-in roster
    pub fn builtin() -> RollcallResult<Self> {
        Self::from_yaml_str(BUILTIN_ROSTER)
    }

    /// Load from a file, or the compiled-in roster when no path is given
    pub fn load(path: Option<&Path>) -> RollcallResult<Self> {
        match path {
            Some(p) => {
                debug!(path = %p.display(), "loading roster configuration");
                let content = std::fs::read_to_string(p)?;
                Self::from_yaml_str(&content)
            }
            None => Self::builtin(),
        }
    }

    pub fn from_yaml_str(content: &str) -> RollcallResult<Self> {
        let file: ConfigFile = serde_yaml::from_str(content)?;
        Self::from_file(file)
    }

    fn from_file(file: ConfigFile) -> RollcallResult<Self> {
        if file.programs.is_empty() {
            return Err(RollcallError::Config(
                "roster must list at least one program".to_string(),
            ));
        }

        let capacity = ReportLayout::weekly().program_capacity();
        if file.programs.len() > capacity {
            return Err(RollcallError::Config(format!(
                "roster lists {} programs but the report template has {} rows",
                file.programs.len(),
                capacity
            )));
        }

        let mut roster = ProgramRoster::new();
        let mut abbreviations = AbbreviationMap::new();
        let mut seen = HashSet::new();

        for entry in file.programs {
            let name = entry.name.trim().to_string();
            if name.is_empty() {
                return Err(RollcallError::Config("program name is empty".to_string()));
            }
            if entry.enrollment == 0 {
                return Err(RollcallError::Config(format!(
                    "program '{}' has zero enrollment",
                    name
                )));
            }
            if !seen.insert(name.clone()) {
                return Err(RollcallError::Config(format!(
                    "program '{}' is listed twice",
                    name
                )));
            }

            for short in entry.abbreviations {
                let short = short.trim().to_string();
                if short.is_empty() {
                    continue;
                }
                if let Some(previous) = abbreviations.insert(short.clone(), name.clone()) {
                    if previous != name {
                        return Err(RollcallError::Config(format!(
                            "abbreviation '{}' maps to both '{}' and '{}'",
                            short, previous, name
                        )));
                    }
                }
            }
            roster.insert(name, entry.enrollment);
        }

        Ok(Self {
            report: file.report,
            roster,
            abbreviations,
        })
    }
}
