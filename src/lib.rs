//! Rollcall - weekly attendance statistics from chat-style roll-call text
//!
//! Class monitors post absences as free text ("机械2班：张三、李四（缺勤）").
//! This library turns that text into per-program records, keeps them per day,
//! computes attendance rates and writes the weekly report workbook.
//!
//! # Example
//!
//! ```no_run
//! use rollcall::config::RollcallConfig;
//! use rollcall::core::AttendanceSession;
//! use rollcall::excel::{ReportExporter, ReportLayout};
//! use rollcall::types::Weekday;
//! use std::path::Path;
//!
//! let config = RollcallConfig::builtin()?;
//! let mut session = AttendanceSession::new();
//! session.submit(Weekday::Monday, "机械2班：张三、李四（缺勤）", &config)?;
//!
//! let stats = session.stats(&config.roster)?;
//! ReportExporter::new(ReportLayout::weekly(), &config.roster, &config.report)
//!     .export(&stats, Path::new("weekly.xlsx"))?;
//! # Ok::<(), rollcall::error::RollcallError>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod excel;
pub mod parser;
pub mod types;

// Re-export commonly used types
pub use crate::config::RollcallConfig;
pub use crate::core::AttendanceSession;
pub use error::{RollcallError, RollcallResult};
pub use types::{AttendanceRecord, AttendanceStats, ProgramAbsences, Weekday};
