use anyhow::Context;
use clap::{Parser, Subcommand};
use rollcall::cli;
use rollcall::config::RollcallConfig;
use rollcall::types::Weekday;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rollcall")]
#[command(about = "Weekly attendance statistics from roll-call text")]
#[command(long_about = "Rollcall - Weekly attendance statistics from roll-call text
Paste what class monitors post, get the weekly report workbook.

INPUT FORMAT:
  <label><separator><absentees>（缺勤）
  机械2班：张三、李四（缺勤）
  24计科 3班 共缺勤1人：王五（缺勤）

COMMANDS:
  parse    - Show what the parser extracts from a text file
  report   - Build the weekly .xlsx report from one file per day
  collect  - Gather '<专业>专业：<名字>' name lists
  roster   - Show configured programs and abbreviations
  session  - Interactive session (submit, stats, export, ...)

EXAMPLES:
  rollcall parse monday.txt --json
  rollcall report mon.txt tue.txt --day 周一 --day 周二 -o week.xlsx
  rollcall collect names.txt -o names.xlsx
  rollcall --config school.yaml session --day 周三")]
#[command(version)]
struct Cli {
    /// Roster configuration (YAML); the built-in roster is used when absent
    #[arg(long, global = true, env = "ROLLCALL_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse roll-call text and print the recognized programs
    Parse {
        /// Text file with roll-call messages ('-' for stdin)
        input: PathBuf,

        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },

    #[command(long_about = "Build the weekly attendance report.

Each input file holds one day of roll-call text. Pass one --day per file,
in the same order. With a single file and no --day, today is used.

Submitting the same program twice for a day keeps the later record.
Programs not in the roster are reported and dropped.")]
    /// Build the weekly .xlsx report
    Report {
        /// Text files, one per day ('-' for stdin)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Day for each input (周一..周六 or mon..sat)
        #[arg(short, long = "day")]
        days: Vec<Weekday>,

        /// Output workbook
        #[arg(short, long, default_value = "attendance.xlsx")]
        output: PathBuf,
    },

    /// Collect '<专业>专业：<名字>、<名字>' name lists
    Collect {
        /// Text files ('-' for stdin)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Write the collected names to an .xlsx file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show configured programs, enrollment and abbreviations
    Roster,

    /// Interactive session on stdin
    Session {
        /// Starting day (defaults to today)
        #[arg(short, long)]
        day: Option<Weekday>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "rollcall=debug"
    } else {
        "rollcall=warn"
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();

    let config = RollcallConfig::load(cli.config.as_deref()).with_context(|| match &cli.config {
        Some(path) => format!("Failed to load roster config {}", path.display()),
        None => "Failed to load built-in roster".to_string(),
    })?;

    match cli.command {
        Commands::Parse { input, json } => cli::parse(input, json, &config)?,

        Commands::Report {
            inputs,
            days,
            output,
        } => cli::report(inputs, days, output, cli.verbose, &config)?,

        Commands::Collect { inputs, output } => cli::collect(inputs, output)?,

        Commands::Roster => cli::roster(&config)?,

        Commands::Session { day } => cli::run_interactive(&config, day)?,
    }
    Ok(())
}
