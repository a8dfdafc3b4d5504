//! CLI command handlers

pub mod commands;
pub mod session;

pub use commands::{collect, parse, report, roster};
pub use session::{run_interactive, Session};
