//! Attendance aggregation
//!
//! `AttendanceSession` is the aggregation context for one interactive session.
//! It is created by the caller at session start and cleared on an explicit
//! reset. Records are keyed by `(day, program)`; submitting the same key again
//! replaces the stored record (last write wins).

use crate::config::RollcallConfig;
use crate::error::{RollcallError, RollcallResult, UnknownProgramContext};
use crate::parser::parse_roster_text;
use crate::types::{AttendanceRecord, AttendanceStats, ProgramRoster, Weekday, NAME_JOINER};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Attendance percentage rounded to 2 decimals.
///
/// `(enrollment - absent) / enrollment * 100`
pub fn attendance_rate(enrollment: u32, absent: usize) -> RollcallResult<f64> {
    if enrollment == 0 {
        return Err(RollcallError::ZeroEnrollment(String::new()));
    }
    let enrollment = enrollment as f64;
    let rate = (enrollment - absent as f64) / enrollment * 100.0;
    round2(rate)
}

// Rounds the exact binary value, ties to even (90.625 -> 90.62)
fn round2(value: f64) -> RollcallResult<f64> {
    format!("{:.2}", value)
        .parse::<f64>()
        .map_err(|e| RollcallError::Parse(format!("Rate rounding error: {}", e)))
}

/// Statistics for one record
pub fn record_stats(record: &AttendanceRecord) -> RollcallResult<AttendanceStats> {
    let absent_count = record.absent_count();
    let rate = attendance_rate(record.enrollment, absent_count).map_err(|e| match e {
        RollcallError::ZeroEnrollment(_) => RollcallError::ZeroEnrollment(record.program.clone()),
        other => other,
    })?;
    if absent_count > record.enrollment as usize {
        warn!(
            program = %record.program,
            day = %record.day,
            absent_count,
            enrollment = record.enrollment,
            "more absentees than enrolled students"
        );
    }
    Ok(AttendanceStats {
        day: record.day,
        program: record.program.clone(),
        enrollment: record.enrollment,
        absent_count,
        rate,
        absentees: record.absentees.join(NAME_JOINER),
    })
}

/// Statistics for a set of records, ordered by day then roster order
pub fn compute_stats<'r>(
    records: impl IntoIterator<Item = &'r AttendanceRecord>,
    roster: &ProgramRoster,
) -> RollcallResult<Vec<AttendanceStats>> {
    let mut records: Vec<&AttendanceRecord> = records.into_iter().collect();
    records.sort_by_key(|r| (r.day, roster.position(&r.program).unwrap_or(usize::MAX)));
    records.into_iter().map(record_stats).collect()
}

/// What one submission did to the session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmitOutcome {
    /// Programs stored by this submission
    pub stored: Vec<String>,
    /// Stored programs that replaced an earlier record for the same day
    pub overwritten: Vec<String>,
    /// Programs dropped because they are not in the roster
    pub rejected: Vec<UnknownProgramContext>,
}

/// In-memory attendance store for one session
#[derive(Debug, Clone, Default)]
pub struct AttendanceSession {
    records: HashMap<(Weekday, String), AttendanceRecord>,
}

impl AttendanceSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `text` and store its records under `day`.
    ///
    /// Unknown programs are dropped with a warning and listed in the outcome.
    /// Fails with [`RollcallError::NoRecords`] when the text holds no
    /// recognizable group; nothing is stored in that case.
    pub fn submit(
        &mut self,
        day: Weekday,
        text: &str,
        config: &RollcallConfig,
    ) -> RollcallResult<SubmitOutcome> {
        let parsed = parse_roster_text(text, &config.abbreviations, &config.roster)?;
        if parsed.is_empty() {
            return Err(RollcallError::NoRecords);
        }

        let mut outcome = SubmitOutcome::default();
        for entry in parsed {
            match self.record(day, &entry.program, entry.absentees, &config.roster) {
                Ok(previous) => {
                    if previous.is_some() {
                        outcome.overwritten.push(entry.program.clone());
                    }
                    outcome.stored.push(entry.program);
                }
                Err(RollcallError::UnknownProgram(ctx)) => {
                    warn!(program = %ctx.program, day = %day, "{}; record dropped", ctx);
                    outcome.rejected.push(ctx);
                }
                Err(e) => return Err(e),
            }
        }

        debug!(
            day = %day,
            stored = outcome.stored.len(),
            rejected = outcome.rejected.len(),
            "submission processed"
        );
        Ok(outcome)
    }

    /// Store one record. Returns the record it replaced, if any.
    pub fn record(
        &mut self,
        day: Weekday,
        program: &str,
        absentees: Vec<String>,
        roster: &ProgramRoster,
    ) -> RollcallResult<Option<AttendanceRecord>> {
        let enrollment = roster.enrollment(program).ok_or_else(|| {
            RollcallError::UnknownProgram(
                UnknownProgramContext::new(program).with_candidates(roster.names()),
            )
        })?;

        let record = AttendanceRecord {
            day,
            program: program.to_string(),
            absentees,
            enrollment,
        };
        let previous = self.records.insert((day, program.to_string()), record);
        if let Some(ref old) = previous {
            info!(
                program = %program,
                day = %day,
                previous_absent = old.absent_count(),
                "replacing earlier record for the same day"
            );
        }
        Ok(previous)
    }

    pub fn get(&self, day: Weekday, program: &str) -> Option<&AttendanceRecord> {
        self.records.get(&(day, program.to_string()))
    }

    /// Statistics for every stored record, ordered by day then roster order
    pub fn stats(&self, roster: &ProgramRoster) -> RollcallResult<Vec<AttendanceStats>> {
        compute_stats(self.records.values(), roster)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        info!(records = self.records.len(), "clearing attendance session");
        self.records.clear();
    }
}
