//! Build command implementation.
//!
//! Compiles theme sources (and their imports) to JSON theme files.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;

use crate::compile::{compile_with, CompileOptions};
use crate::discovery::{
    discover, discover_paths, entry_chains, load_chain_with_paths, theme_stem, FsLoader,
};
use crate::error::{Result, SassyError};
use crate::lint::print_findings;
use crate::output::{display_path, plural, Printer};

use super::findings_exit_code;

/// Compile themes to JSON
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Theme files or directories (default: discover from sassy.yaml or the current directory)
    pub paths: Vec<PathBuf>,

    /// Output directory (default: the manifest's `output`, or dist)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Write compiled JSON to stdout instead of files
    #[arg(long)]
    pub stdout: bool,

    /// Fail on lint warnings; themes with findings are not written
    #[arg(long)]
    pub strict: bool,

    /// Resolve on a single thread
    #[arg(long)]
    pub sequential: bool,
}

/// Returns the exit status: 0, or under `--strict` 1 for warnings and 2
/// for lint errors.
pub fn run(args: BuildArgs, printer: &Printer) -> Result<u8> {
    let discovery = if args.paths.is_empty() {
        discover(".")?
    } else {
        discover_paths(&args.paths)
    };

    let output = args.output.clone().unwrap_or_else(|| discovery.output_dir());
    let strict = args.strict || discovery.manifest.strict;
    let options = CompileOptions {
        parallel: discovery.manifest.parallel && !args.sequential,
    };

    if discovery.themes.is_empty() {
        printer.warning("Warning", "no theme sources found");
        return Ok(0);
    }

    if !args.stdout && !output.exists() {
        fs::create_dir_all(&output).map_err(|e| SassyError::Io {
            path: output.clone(),
            message: format!("Failed to create output directory: {}", e),
        })?;
    }

    let chains = discovery
        .themes
        .iter()
        .map(|theme| load_chain_with_paths(theme, &FsLoader))
        .collect::<Result<Vec<_>>>()?;

    let mut worst = 0u8;
    let mut written = 0usize;

    for chain in entry_chains(chains) {
        let theme = chain.root();
        printer.status("Compiling", &display_path(theme));
        let compiled = compile_with(&chain.documents, &options)?;

        print_findings(printer, &compiled.findings);
        let code = findings_exit_code(&compiled.findings);
        if strict && code > 0 {
            tracing::warn!(theme = %theme.display(), findings = compiled.findings.len(), "strict build skipped theme");
            printer.error(
                "Skipped",
                &format!(
                    "{} ({})",
                    display_path(theme),
                    plural(compiled.findings.len(), "finding", "findings")
                ),
            );
            worst = worst.max(code);
            continue;
        }

        let json = compiled.artifact.to_json().map_err(|e| SassyError::Io {
            path: theme.to_path_buf(),
            message: format!("Failed to serialise theme: {}", e),
        })?;

        if args.stdout {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(json.as_bytes()).map_err(|e| SassyError::Io {
                path: PathBuf::from("<stdout>"),
                message: e.to_string(),
            })?;
        } else {
            let target = output.join(output_name(theme));
            fs::write(&target, &json).map_err(|e| SassyError::Io {
                path: target.clone(),
                message: format!("Failed to write theme: {}", e),
            })?;
            printer.info("Wrote", &display_path(&target));
        }
        written += 1;
    }

    let summary = plural(written, "theme", "themes");
    if args.stdout {
        printer.success("Finished", &summary);
    } else {
        printer.success("Finished", &format!("{} to {}", summary, display_path(&output)));
    }

    Ok(worst)
}

/// `themes/dark.sassy.yml` → `dark.json`.
fn output_name(theme: &Path) -> String {
    let stem = theme_stem(theme)
        .or_else(|| theme.file_stem().and_then(|s| s.to_str()))
        .unwrap_or("theme");
    format!("{}.json", stem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const THEME: &str = r##"
name: Build Test
type: dark
palette:
  bg: "#1e1e1e"
colors:
  editor.background: $bg
tokenColors:
  - scope: comment
    settings: { fontStyle: italic }
"##;

    fn args(paths: Vec<PathBuf>, output: PathBuf) -> BuildArgs {
        BuildArgs {
            paths,
            output: Some(output),
            stdout: false,
            strict: false,
            sequential: false,
        }
    }

    #[test]
    fn test_build_writes_json() {
        let dir = tempdir().unwrap();
        let theme = dir.path().join("dark.sassy.yml");
        let output = dir.path().join("out");
        fs::write(&theme, THEME).unwrap();

        let code = run(args(vec![theme], output.clone()), &Printer::new()).unwrap();
        assert_eq!(code, 0);

        let json = fs::read_to_string(output.join("dark.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["name"], "Build Test");
        assert_eq!(value["colors"]["editor.background"], "#1e1e1e");
    }

    #[test]
    fn test_build_directory() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("themes")).unwrap();
        fs::write(dir.path().join("themes/a.sassy.yml"), THEME).unwrap();
        fs::write(dir.path().join("themes/b.sassy.yaml"), THEME).unwrap();
        let output = dir.path().join("dist");

        run(args(vec![dir.path().join("themes")], output.clone()), &Printer::new()).unwrap();
        assert!(output.join("a.json").exists());
        assert!(output.join("b.json").exists());
    }

    #[test]
    fn test_strict_skips_themes_with_findings() {
        let dir = tempdir().unwrap();
        let theme = dir.path().join("shadowed.sassy.yml");
        let output = dir.path().join("out");
        fs::write(
            &theme,
            format!("{}  - scope: comment.line\n    settings: {{ fontStyle: bold }}\n", THEME),
        )
        .unwrap();

        let mut strict = args(vec![theme], output.clone());
        strict.strict = true;
        let code = run(strict, &Printer::new()).unwrap();

        assert_eq!(code, 1);
        assert!(!output.join("shadowed.json").exists());
    }

    #[test]
    fn test_build_skips_imported_partials() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("out");
        fs::write(
            dir.path().join("dark.sassy.yml"),
            "name: Dark\ntype: dark\nimports: ./accent.sassy.yml\ncolors:\n  focusBorder: $accent\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("accent.sassy.yml"),
            "variables:\n  accent: \"#59c2ff\"\ncolors:\n  statusBar.background: $accent\n",
        )
        .unwrap();

        let code = run(args(vec![dir.path().to_path_buf()], output.clone()), &Printer::new()).unwrap();
        assert_eq!(code, 0);

        let json = fs::read_to_string(output.join("dark.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["colors"]["focusBorder"], "#59c2ff");
        assert_eq!(value["colors"]["statusBar.background"], "#59c2ff");
        assert!(!output.join("accent.json").exists());
    }

    #[test]
    fn test_build_fatal_error() {
        let dir = tempdir().unwrap();
        let theme = dir.path().join("broken.sassy.yml");
        fs::write(&theme, "name: Broken\ntype: dark\ncolors:\n  a: $missing\n").unwrap();

        let err = run(args(vec![theme], dir.path().join("out")), &Printer::new()).unwrap_err();
        assert!(matches!(err, SassyError::UnresolvedReference { .. }));
    }

    #[test]
    fn test_output_name() {
        assert_eq!(output_name(Path::new("themes/dark.sassy.yml")), "dark.json");
        assert_eq!(output_name(Path::new("custom.yml")), "custom.json");
    }
}
