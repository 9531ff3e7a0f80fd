pub mod build;
pub mod completions;
pub mod init;
pub mod lint;
pub mod trace;

use clap::{Parser, Subcommand};

use crate::lint::LintReport;

/// sassy - Theme compiler for structured editor themes
#[derive(Parser, Debug)]
#[command(name = "sassy")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log pipeline stages (-v debug, -vv trace); overrides SASSY_LOG
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile themes to JSON
    Build(build::BuildArgs),

    /// Report dead rules, duplicate scopes, and malformed selectors
    Lint(lint::LintArgs),

    /// Show how a single key resolves
    Trace(trace::TraceArgs),

    /// Initialize a sassy project (generates sassy.yaml)
    Init(init::InitArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Exit status for a set of findings: 2 with errors, 1 with warnings only.
pub fn findings_exit_code(report: &LintReport) -> u8 {
    if report.has_errors() {
        2
    } else if report.has_warnings() {
        1
    } else {
        0
    }
}
