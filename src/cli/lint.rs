//! Lint command implementation.
//!
//! Merges each theme's import chain and reports findings without resolving
//! colour expressions.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use crate::discovery::{discover, discover_paths, entry_chains, load_chain_with_paths, FsLoader};
use crate::error::{Result, SassyError};
use crate::lint::{lint, print_findings, Finding};
use crate::merge::merge_chain;
use crate::output::{display_path, plural, Printer};

use super::findings_exit_code;

/// Report dead rules, duplicate scopes, and malformed selectors
#[derive(Args, Debug)]
pub struct LintArgs {
    /// Theme files or directories (default: discover from sassy.yaml or the current directory)
    pub paths: Vec<PathBuf>,

    /// Print findings as JSON to stdout
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct ThemeFindings<'a> {
    theme: String,
    findings: Vec<&'a Finding>,
}

/// Returns 2 if any theme has lint errors, 1 for warnings only, else 0.
pub fn run(args: LintArgs, printer: &Printer) -> Result<u8> {
    let discovery = if args.paths.is_empty() {
        discover(".")?
    } else {
        discover_paths(&args.paths)
    };

    if discovery.themes.is_empty() {
        printer.warning("Warning", "no theme sources found");
        return Ok(0);
    }

    let chains = discovery
        .themes
        .iter()
        .map(|theme| load_chain_with_paths(theme, &FsLoader))
        .collect::<Result<Vec<_>>>()?;

    let mut reports = Vec::with_capacity(chains.len());
    for chain in entry_chains(chains) {
        let effective = merge_chain(&chain.documents)?;
        reports.push((chain.root().to_path_buf(), lint(&effective)));
    }

    let worst = reports
        .iter()
        .map(|(_, report)| findings_exit_code(report))
        .max()
        .unwrap_or(0);

    if args.json {
        let entries: Vec<ThemeFindings> = reports
            .iter()
            .map(|(theme, report)| ThemeFindings {
                theme: display_path(theme),
                findings: report.iter().collect(),
            })
            .collect();
        let json = serde_json::to_string_pretty(&entries).map_err(|e| SassyError::Io {
            path: PathBuf::from("<stdout>"),
            message: format!("Failed to serialise findings: {}", e),
        })?;
        println!("{}", json);
        return Ok(worst);
    }

    let mut total = 0;
    for (theme, report) in &reports {
        if report.is_clean() {
            printer.status("Checked", &display_path(theme));
            continue;
        }
        printer.warning(
            "Checked",
            &format!("{} ({})", display_path(theme), plural(report.len(), "finding", "findings")),
        );
        print_findings(printer, report);
        total += report.len();
    }

    let summary = format!(
        "{}, {}",
        plural(reports.len(), "theme", "themes"),
        plural(total, "finding", "findings")
    );
    if worst == 2 {
        printer.error("Failed", &summary);
    } else {
        printer.success("Finished", &summary);
    }

    Ok(worst)
}
