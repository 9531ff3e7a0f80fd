//! Trace command implementation.
//!
//! Prints the resolution chain of a single key: the key itself, then every
//! name it depends on with its source expression and final value.

use std::path::PathBuf;

use clap::Args;

use crate::discovery::{load_chain, FsLoader};
use crate::error::{Result, SassyError};
use crate::merge::merge_chain;
use crate::output::{plural, Printer};
use crate::resolve::{resolve_trace, TraceStep};

/// Show how a single key resolves
#[derive(Args, Debug)]
pub struct TraceArgs {
    /// Theme file
    pub file: PathBuf,

    /// Key to trace, e.g. `colors.editor.background`, `$accent`, `tokenColors.0`
    pub key: String,

    /// Print the trace as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: TraceArgs, printer: &Printer) -> Result<u8> {
    let chain = load_chain(&args.file, &FsLoader)?;
    let effective = merge_chain(&chain)?;
    let steps = resolve_trace(&effective, &args.key)?;

    if args.json {
        let json = serde_json::to_string_pretty(&steps).map_err(|e| SassyError::Io {
            path: PathBuf::from("<stdout>"),
            message: format!("Failed to serialise trace: {}", e),
        })?;
        println!("{}", json);
    } else {
        print!("{}", format_steps(&Printer::for_stdout(), &steps));
    }
    printer.info("Traced", &format!("{} ({})", args.key, plural(steps.len(), "step", "steps")));

    Ok(0)
}

fn format_steps(printer: &Printer, steps: &[TraceStep]) -> String {
    let width = steps.iter().map(|s| s.name.len()).max().unwrap_or(0);
    let mut out = String::new();
    for (i, step) in steps.iter().enumerate() {
        let indent = if i == 0 { "" } else { "  " };
        let pad = width.saturating_sub(step.name.len()) + if i == 0 { 2 } else { 0 };
        out.push_str(&format!(
            "{}{}{}  {}  {}\n",
            indent,
            printer.bold(&step.name),
            " ".repeat(pad),
            step.expression,
            printer.colour(step.value),
        ));
    }
    out
}
