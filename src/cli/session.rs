//! Interactive session
//!
//! A line-oriented stand-in for the two input forms. Each command runs to
//! completion before the next prompt; state lives only as long as the session.
//!
//! ```text
//! rollcall> day 周二
//! rollcall> submit
//! 机械2班：张三、李四（缺勤）
//! .
//! rollcall> export weekly.xlsx
//! ```

use super::commands::{print_collected, print_outcome, print_stats_table};
use crate::config::RollcallConfig;
use crate::core::{AttendanceSession, RosterCollector};
use crate::error::RollcallResult;
use crate::excel::{ReportExporter, ReportLayout, RosterSheetExporter};
use crate::types::Weekday;
use colored::Colorize;
use std::io::{BufRead, Write};
use std::path::Path;
use tracing::debug;

const PROMPT: &str = "rollcall> ";
const END_OF_BLOCK: &str = ".";

const HELP: &str = "\
Attendance report:
  day <day>              set the day for submissions (周一..周六, mon..sat)
  submit                 paste attendance text, end with a line containing only '.'
  stats                  show stored records with attendance rates
  export <file.xlsx>     write the weekly report
  reset                  clear stored attendance records

Roster collection:
  collect                paste '<专业>专业：<名字>、<名字>' lines, end with '.'
  names                  show collected names
  collect-export <file>  write collected names to .xlsx
  collect-reset          clear collected names

  help                   show this help
  quit                   end the session";

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// State owned by one interactive session
pub struct Session<'c> {
    config: &'c RollcallConfig,
    day: Weekday,
    attendance: AttendanceSession,
    collector: RosterCollector,
}

impl<'c> Session<'c> {
    pub fn new(config: &'c RollcallConfig, day: Weekday) -> RollcallResult<Self> {
        Ok(Self {
            config,
            day,
            attendance: AttendanceSession::new(),
            collector: RosterCollector::new()?,
        })
    }

    pub fn attendance(&self) -> &AttendanceSession {
        &self.attendance
    }

    pub fn collector(&self) -> &RosterCollector {
        &self.collector
    }

    /// Run commands from `input` until `quit` or end of input
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> RollcallResult<()> {
        writeln!(out, "{}", "📋 Rollcall - interactive session".bold().green())?;
        writeln!(out, "   Day: {}. Type 'help' for commands.", self.day)?;

        let mut lines = input.lines();
        loop {
            write!(out, "{}", PROMPT)?;
            out.flush()?;

            let Some(line) = lines.next() else {
                writeln!(out)?;
                break;
            };
            let line = line?;
            let command = line.trim();
            if command.is_empty() {
                continue;
            }

            debug!(command = %command, "session command");
            match self.handle(command, &mut lines, out) {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                // Errors are shown and the session carries on
                Err(e) => writeln!(out, "{} {}", "❌".red(), e.to_string().red())?,
            }
        }
        Ok(())
    }

    fn handle<I, W>(&mut self, command: &str, lines: &mut I, out: &mut W) -> RollcallResult<Flow>
    where
        I: Iterator<Item = std::io::Result<String>>,
        W: Write,
    {
        let (verb, arg) = match command.split_once(char::is_whitespace) {
            Some((v, a)) => (v, a.trim()),
            None => (command, ""),
        };

        match verb {
            "day" => {
                self.day = arg.parse()?;
                writeln!(out, "   Day set to {}", self.day.to_string().bright_yellow())?;
            }
            "submit" => {
                let text = read_block(lines)?;
                let outcome = self.attendance.submit(self.day, &text, self.config)?;
                print_outcome(out, &outcome, true)?;
            }
            "stats" => {
                let stats = self.attendance.stats(&self.config.roster)?;
                print_stats_table(out, &stats)?;
            }
            "export" => {
                let path = required_path(arg)?;
                let stats = self.attendance.stats(&self.config.roster)?;
                ReportExporter::new(ReportLayout::weekly(), &self.config.roster, &self.config.report)
                    .export(&stats, path)?;
                writeln!(out, "   {} Report written to {}", "✅".green(), path.display())?;
            }
            "reset" => {
                self.attendance.clear();
                writeln!(out, "   Attendance records cleared")?;
            }
            "collect" => {
                let text = read_block(lines)?;
                let added = self.collector.submit(&text)?;
                writeln!(out, "   Added {} name(s)", added)?;
            }
            "names" => print_collected(out, &self.collector)?,
            "collect-export" => {
                let path = required_path(arg)?;
                RosterSheetExporter::new(self.collector.entries()).export(path)?;
                writeln!(out, "   {} Roster written to {}", "✅".green(), path.display())?;
            }
            "collect-reset" => {
                self.collector.reset();
                writeln!(out, "   Collected names cleared")?;
            }
            "help" => writeln!(out, "{}", HELP)?,
            "quit" | "exit" => return Ok(Flow::Quit),
            other => writeln!(
                out,
                "   {} Unknown command '{}'. Type 'help' for commands.",
                "⚠️".yellow(),
                other
            )?,
        }
        Ok(Flow::Continue)
    }
}

/// Execute the session command on stdin/stdout
pub fn run_interactive(config: &RollcallConfig, day: Option<Weekday>) -> RollcallResult<()> {
    let day = match day {
        Some(d) => d,
        None => Weekday::today().unwrap_or(Weekday::Monday),
    };
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    Session::new(config, day)?.run(stdin.lock(), &mut stdout)
}

/// Lines up to a line holding only "." (or end of input)
fn read_block<I>(lines: &mut I) -> RollcallResult<String>
where
    I: Iterator<Item = std::io::Result<String>>,
{
    let mut block = Vec::new();
    for line in lines {
        let line = line?;
        if line.trim() == END_OF_BLOCK {
            break;
        }
        block.push(line);
    }
    Ok(block.join("\n"))
}

fn required_path(arg: &str) -> RollcallResult<&Path> {
    if arg.is_empty() {
        return Err(crate::error::RollcallError::Parse(
            "missing output file path".to_string(),
        ));
    }
    Ok(Path::new(arg))
}
