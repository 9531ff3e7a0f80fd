//! Terminal output for the sassy CLI.
//!
//! Status lines are Cargo-style: a right-aligned coloured verb, then the
//! message. They go to stderr; stdout carries compiled JSON and traces.
//! `NO_COLOR` disables ANSI styling on both streams.

use std::io::{self, IsTerminal, Write};
use std::path::Path;

use crate::types::Colour;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

/// Width of the verb column.
const VERB_WIDTH: usize = 12;

/// Terminal-aware printer.
pub struct Printer {
    color: bool,
}

impl Printer {
    /// A printer styled for stderr.
    pub fn new() -> Self {
        Self {
            color: color_enabled(io::stderr().is_terminal()),
        }
    }

    /// A printer styled for stdout.
    pub fn for_stdout() -> Self {
        Self {
            color: color_enabled(io::stdout().is_terminal()),
        }
    }

    /// A printer that never emits ANSI codes.
    pub fn plain() -> Self {
        Self { color: false }
    }

    /// e.g. "   Compiling themes/dark.sassy.yml"
    pub fn status(&self, verb: &str, message: &str) {
        self.print_line(GREEN, verb, message);
    }

    pub fn success(&self, verb: &str, message: &str) {
        self.print_line(GREEN, verb, message);
    }

    pub fn info(&self, verb: &str, message: &str) {
        self.print_line(CYAN, verb, message);
    }

    pub fn warning(&self, verb: &str, message: &str) {
        self.print_line(YELLOW, verb, message);
    }

    pub fn error(&self, verb: &str, message: &str) {
        self.print_line(RED, verb, message);
    }

    pub fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    pub fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    /// Lint severity label: red for errors, yellow for warnings.
    pub fn severity(&self, label: &str, is_error: bool) -> String {
        let color = if is_error { RED } else { YELLOW };
        self.paint(&format!("{BOLD}{color}"), label)
    }

    /// A colour's hex form, preceded by a truecolor swatch when styling.
    pub fn colour(&self, colour: Colour) -> String {
        if self.color {
            let (r, g, b) = (colour.r, colour.g, colour.b);
            format!("\x1b[48;2;{r};{g};{b}m  {RESET} {colour}")
        } else {
            colour.to_string()
        }
    }

    fn paint(&self, style: &str, text: &str) -> String {
        if self.color {
            format!("{style}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn print_line(&self, color: &str, verb: &str, message: &str) {
        let verb = format!("{verb:>VERB_WIDTH$}");
        let _ = writeln!(io::stderr().lock(), "{} {message}", self.paint(&format!("{BOLD}{color}"), &verb));
    }
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}

fn color_enabled(is_terminal: bool) -> bool {
    is_terminal && std::env::var_os("NO_COLOR").map_or(true, |v| v.is_empty())
}

/// `plural(1, "theme", "themes")` → "1 theme".
pub fn plural(n: usize, singular: &str, pluralized: &str) -> String {
    if n == 1 {
        format!("{} {}", n, singular)
    } else {
        format!("{} {}", n, pluralized)
    }
}

/// Path relative to the working directory when it is inside it.
pub fn display_path(path: &Path) -> String {
    let relative = std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(cwd).ok().map(Path::to_path_buf));
    match relative {
        Some(r) if r.as_os_str().is_empty() => ".".to_string(),
        Some(r) => r.display().to_string(),
        None => path.display().to_string(),
    }
}
