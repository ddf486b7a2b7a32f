//! Lunar phase calendar generator.
//!
//! Writes per-locale lunar phase calendars (TSV, Markdown, iCalendar) from the
//! locale tables and templates of a project directory.

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use lunar::classify::{ClassifyOptions, classify_from_root};
use lunar::exit_codes;
use lunar::generate::{GenerateOptions, LocaleOutcome, generate_from_root};
use lunar::io::init::{InitOptions, init_project};
use lunar::logging;
use lunar::validate::validate_project;

#[derive(Parser)]
#[command(
    name = "lunar",
    version,
    about = "Lunar phase calendars as TSV, Markdown and iCalendar"
)]
struct Cli {
    /// Project root holding `lunar.toml`, `data/` and `templates/`.
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write `lunar.toml`, default locale tables and templates.
    Init {
        /// Overwrite existing files.
        #[arg(short, long)]
        force: bool,
    },
    /// Check config, locale tables and templates without writing output.
    Validate,
    /// Print phase age and code for a run of days.
    Classify {
        /// First day (YYYY-MM-DD); defaults to today (UTC).
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Number of days to print.
        #[arg(long, default_value_t = 30)]
        days: u32,
        /// Append the phase name in this language.
        #[arg(long)]
        lang: Option<String>,
    },
    /// Render every locale into the output directory.
    Generate {
        /// Reference date (YYYY-MM-DD); defaults to today (UTC).
        #[arg(long)]
        today: Option<NaiveDate>,
        /// Output directory; defaults to `output_dir` from `lunar.toml`.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    logging::init();
    // clap's own usage-error code would collide with `PARTIAL`.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            let code = if err.use_stderr() {
                exit_codes::INVALID
            } else {
                exit_codes::OK
            };
            std::process::exit(code);
        }
    };
    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Command::Init { force } => {
            init_project(&cli.root, &InitOptions { force })?;
            Ok(exit_codes::OK)
        }
        Command::Validate => cmd_validate(&cli.root),
        Command::Classify { date, days, lang } => {
            let options = ClassifyOptions {
                start: date.unwrap_or_else(|| Utc::now().date_naive()),
                days,
                lang,
            };
            for line in classify_from_root(&cli.root, &options)? {
                println!("{line}");
            }
            Ok(exit_codes::OK)
        }
        Command::Generate { today, output } => cmd_generate(&cli.root, today, output),
    }
}

fn cmd_validate(root: &Path) -> Result<i32> {
    let outcome = validate_project(root)?;
    for locale in &outcome.locales {
        println!("{locale}");
    }
    for problem in &outcome.problems {
        eprintln!("{problem}");
    }
    Ok(if outcome.is_ok() {
        exit_codes::OK
    } else {
        exit_codes::INVALID
    })
}

fn cmd_generate(
    root: &Path,
    today: Option<NaiveDate>,
    output: Option<PathBuf>,
) -> Result<i32> {
    let mut options = GenerateOptions::now();
    if let Some(today) = today {
        options.today = today;
    }
    options.output_dir = output;

    let report = generate_from_root(root, &options)?;
    for outcome in &report.outcomes {
        match outcome {
            LocaleOutcome::Written { target, .. } => println!("{target}"),
            LocaleOutcome::Failed { target, error } => eprintln!("{target}: {error:#}"),
        }
    }
    Ok(if report.has_failures() {
        exit_codes::PARTIAL
    } else {
        exit_codes::OK
    })
}
