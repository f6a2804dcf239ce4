//! propsubst CLI - substitute `${property}` placeholders in files

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use propsubst::{
    FixSuggestion, ReportFormat, RunConfig, Runner, SubstError, SubstitutionLimits, Target,
};

#[derive(Parser)]
#[command(name = "propsubst")]
#[command(about = "Substitute ${property} placeholders in files")]
#[command(version)]
struct Cli {
    /// Property file (name=value per line). Can be used multiple times
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    property_files: Vec<PathBuf>,

    /// Inline property declarations. Can be used multiple times; the output of `env` works
    #[arg(short = 'p', long = "property", value_name = "TEXT")]
    properties: Vec<String>,

    /// Use environment variables as properties (lowest precedence)
    #[arg(long)]
    env: bool,

    /// Do substitution in place
    #[arg(short = 'i', long)]
    in_place: bool,

    /// Fail if a property required by a placeholder is not found
    #[arg(long = "fail-not-found")]
    fail_not_found: bool,

    /// Format of the per-file summary printed in place mode
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    report: ReportFormat,

    /// Do not print the per-file summary
    #[arg(short, long)]
    quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Maximum number of placeholders rewritten per file
    #[arg(long, value_name = "N", default_value_t = propsubst::limits::DEFAULT_MAX_FRAMES)]
    max_frames: usize,

    /// Files to process ('-' reads standard input)
    #[arg(value_name = "FILE")]
    targets: Vec<String>,
}

impl Cli {
    fn into_config(self) -> RunConfig {
        let mut config = RunConfig::with_sources(self.env, self.property_files, self.properties);
        config.targets = self.targets.iter().map(|t| Target::parse(t)).collect();
        config.in_place = self.in_place;
        config.fail_if_not_found = self.fail_not_found;
        config.report_format = self.report;
        config.quiet = self.quiet;
        config.limits = SubstitutionLimits::with_max_frames(self.max_frames);
        config
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // stdout carries substituted text
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), SubstError> {
    let stdout = io::stdout();
    let mut stdout = stdout.lock();
    Runner::new(cli.into_config()).run(&mut stdout)?;
    stdout.flush()?;
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        if let Some(suggestion) = e.fix_suggestion() {
            eprintln!("  {} {}", "Fix:".yellow(), suggestion);
        }
        std::process::exit(1);
    }
}
