//! Attendance aggregation and roster collection

pub mod aggregator;
pub mod collector;

pub use aggregator::{attendance_rate, compute_stats, AttendanceSession, SubmitOutcome};
pub use collector::RosterCollector;
