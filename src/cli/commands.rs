use crate::config::RollcallConfig;
use crate::core::{AttendanceSession, RosterCollector, SubmitOutcome};
use crate::error::{RollcallError, RollcallResult};
use crate::excel::{ReportExporter, ReportLayout, RosterSheetExporter};
use crate::parser::parse_roster_text;
use crate::types::{AttendanceStats, Weekday};
use colored::Colorize;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// Read a whole input file, or stdin for `-`
pub fn read_input(path: &Path) -> RollcallResult<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    Ok(std::fs::read_to_string(path)?)
}

/// Execute the parse command - show what the parser extracts
pub fn parse(input: PathBuf, json: bool, config: &RollcallConfig) -> RollcallResult<()> {
    let text = read_input(&input)?;
    let records = parse_roster_text(&text, &config.abbreviations, &config.roster)?;

    let mut out = io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut out, &records)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "{}", "📋 Rollcall - Parsed records".bold().green())?;
    writeln!(out, "   Input: {}\n", input.display())?;
    if records.is_empty() {
        writeln!(out, "{}", "⚠️  No attendance groups recognized".yellow())?;
        return Ok(());
    }
    for record in &records {
        let known = config.roster.contains(&record.program);
        let program = if known {
            record.program.bright_blue().bold()
        } else {
            record.program.red().bold()
        };
        writeln!(out, "   {} ({} absent)", program, record.absentees.len())?;
        if !record.absentees.is_empty() {
            writeln!(out, "      {}", record.absentees.join("、"))?;
        }
        if !known {
            writeln!(out, "      {}", "not in roster - would be dropped".yellow())?;
        }
    }
    Ok(())
}

/// Execute the report command - submit each input for its day and export
pub fn report(
    inputs: Vec<PathBuf>,
    days: Vec<Weekday>,
    output: PathBuf,
    verbose: bool,
    config: &RollcallConfig,
) -> RollcallResult<()> {
    let days = match (days.is_empty(), inputs.len()) {
        (true, 1) => vec![Weekday::today()?],
        (false, n) if days.len() == n => days,
        _ => {
            return Err(RollcallError::Parse(format!(
                "{} input file(s) but {} --day value(s); give one day per file",
                inputs.len(),
                days.len()
            )))
        }
    };

    let mut out = io::stdout().lock();
    writeln!(out, "{}", "📋 Rollcall - Weekly attendance report".bold().green())?;

    let mut session = AttendanceSession::new();
    for (input, day) in inputs.iter().zip(days) {
        writeln!(out, "\n   {} {}", day.to_string().bright_yellow().bold(), input.display())?;
        let text = read_input(input)?;
        let outcome = session.submit(day, &text, config)?;
        print_outcome(&mut out, &outcome, verbose)?;
    }

    let stats = session.stats(&config.roster)?;
    print_stats_table(&mut out, &stats)?;

    ReportExporter::new(ReportLayout::weekly(), &config.roster, &config.report)
        .export(&stats, &output)?;
    writeln!(
        out,
        "\n{}",
        format!("✅ Report exported to {}", output.display()).bold().green()
    )?;
    Ok(())
}

/// Execute the collect command - gather name lists per program
pub fn collect(inputs: Vec<PathBuf>, output: Option<PathBuf>) -> RollcallResult<()> {
    let mut collector = RosterCollector::new()?;
    for input in &inputs {
        let text = read_input(input)?;
        collector.submit(&text)?;
    }

    let mut out = io::stdout().lock();
    print_collected(&mut out, &collector)?;

    if let Some(path) = output {
        RosterSheetExporter::new(collector.entries()).export(&path)?;
        writeln!(
            out,
            "\n{}",
            format!("✅ Roster exported to {}", path.display()).bold().green()
        )?;
    }
    Ok(())
}

/// Execute the roster command - show the configured programs
pub fn roster(config: &RollcallConfig) -> RollcallResult<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{}", "📚 Rollcall - Program roster".bold().green())?;
    writeln!(out, "   {}\n", config.report.title)?;
    for (i, (program, enrollment)) in config.roster.iter().enumerate() {
        let shorts = config.abbreviations.abbreviations_of(program);
        writeln!(
            out,
            "   {:>2}. {} {} {}",
            i + 1,
            program.bright_blue(),
            format!("({} students)", enrollment).cyan(),
            if shorts.is_empty() {
                String::new()
            } else {
                format!("← {}", shorts.join(", "))
            }
        )?;
    }
    Ok(())
}

pub(crate) fn print_outcome<W: Write>(
    out: &mut W,
    outcome: &SubmitOutcome,
    verbose: bool,
) -> RollcallResult<()> {
    for program in &outcome.stored {
        if outcome.overwritten.contains(program) {
            writeln!(out, "   {} {} (replaced earlier record)", "↻".yellow(), program)?;
        } else if verbose {
            writeln!(out, "   {} {}", "✓".green(), program)?;
        }
    }
    for rejected in &outcome.rejected {
        writeln!(out, "   {} {}, dropped", "⚠️".yellow(), rejected.to_string().yellow())?;
    }
    writeln!(
        out,
        "   Stored {} program(s), rejected {}",
        outcome.stored.len(),
        outcome.rejected.len()
    )?;
    Ok(())
}

pub(crate) fn print_stats_table<W: Write>(out: &mut W, stats: &[AttendanceStats]) -> RollcallResult<()> {
    writeln!(out, "\n{}", "📊 Attendance:".bold().cyan())?;
    if stats.is_empty() {
        writeln!(out, "   (no records)")?;
        return Ok(());
    }
    writeln!(out, "{}", "─".repeat(72))?;
    for s in stats {
        let rate = format!("{:.2}%", s.rate);
        let rate = if s.absent_count == 0 {
            rate.green()
        } else {
            rate.yellow()
        };
        writeln!(
            out,
            "{}  {}  {}/{}  {}  {}",
            s.day,
            s.program.bright_blue(),
            s.absent_count,
            s.enrollment,
            rate,
            s.absentees
        )?;
    }
    writeln!(out, "{}", "─".repeat(72))?;
    Ok(())
}

pub(crate) fn print_collected<W: Write>(out: &mut W, collector: &RosterCollector) -> RollcallResult<()> {
    writeln!(out, "{}", "📚 Collected names:".bold().cyan())?;
    if collector.is_empty() {
        writeln!(out, "   (empty)")?;
        return Ok(());
    }
    for (program, names) in collector.entries() {
        writeln!(
            out,
            "   {} ({}): {}",
            program.bright_blue(),
            names.len(),
            names.join("、")
        )?;
    }
    writeln!(out, "   Total: {}", collector.total())?;
    Ok(())
}
