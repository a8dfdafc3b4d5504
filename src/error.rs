use thiserror::Error;

pub type RollcallResult<T> = Result<T, RollcallError>;

#[derive(Error, Debug)]
pub enum RollcallError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    UnknownProgram(UnknownProgramContext),

    #[error("No attendance records found in the submitted text")]
    NoRecords,

    #[error("Program '{0}' has zero enrollment; attendance rate is undefined")]
    ZeroEnrollment(String),

    #[error("Invalid day '{0}' (expected 周一..周六 / Monday..Saturday)")]
    InvalidDay(String),

    #[error("Export error: {0}")]
    Export(String),
}

/// Details for a program name that is missing from the roster
#[derive(Debug, Clone, PartialEq)]
pub struct UnknownProgramContext {
    pub program: String,
    pub suggestion: Option<String>,
}

impl UnknownProgramContext {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            suggestion: None,
        }
    }

    /// Attach the closest known program, if any
    pub fn with_candidates<'a>(mut self, candidates: impl IntoIterator<Item = &'a str>) -> Self {
        self.suggestion = find_similar(&self.program, candidates);
        self
    }
}

impl std::fmt::Display for UnknownProgramContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unknown program '{}'", self.program)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " (did you mean '{}'?)", s)?;
        }
        Ok(())
    }
}

/// Find a similar name: exact match ignoring case, then prefix, then containment
/// in either direction.
pub fn find_similar<'a>(
    name: &str,
    candidates: impl IntoIterator<Item = &'a str>,
) -> Option<String> {
    let candidates: Vec<&str> = candidates.into_iter().collect();
    let lower = name.to_lowercase();

    if let Some(c) = candidates.iter().find(|c| c.to_lowercase() == lower) {
        return Some(c.to_string());
    }
    if let Some(c) = candidates.iter().find(|c| c.starts_with(name)) {
        return Some(c.to_string());
    }
    candidates
        .iter()
        .find(|c| !name.is_empty() && (c.contains(name) || name.contains(**c)))
        .map(|c| c.to_string())
}
