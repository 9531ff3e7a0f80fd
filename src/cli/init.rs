//! Init command implementation.
//!
//! Generates a `sassy.yaml` manifest from discovered theme sources, and a
//! starter theme when the directory has none.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;

use crate::discovery::{discover, MANIFEST_FILENAME};
use crate::error::{Result, SassyError};
use crate::output::{display_path, plural, Printer};

/// Starter theme written into empty projects.
const STARTER_THEME: &str = r##"name: Starter
type: dark

palette:
  base: "#1e1e2e"
  text: "#cdd6f4"
  accent: "#89b4fa"

variables:
  selection: fade($accent, 0.3)

colors:
  editor.background: $base
  editor.foreground: $text
  editor.selectionBackground: $selection
  focusBorder: $accent

tokenColors:
  - name: Comments
    scope: comment
    settings:
      foreground: lighten($base, 40%)
      fontStyle: italic
  - name: Keywords
    scope: [keyword, storage.type]
    settings:
      foreground: $accent

semanticTokenColors:
  variable.readonly: $text
"##;

const STARTER_FILENAME: &str = "themes/starter.sassy.yml";

/// Initialize a sassy project by generating a sassy.yaml manifest
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to scan (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite existing sassy.yaml
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs, printer: &Printer) -> Result<u8> {
    let manifest_path = args.path.join(MANIFEST_FILENAME);

    if manifest_path.exists() && !args.force {
        return Err(SassyError::Io {
            path: manifest_path,
            message: format!("{} already exists (use --force to overwrite)", MANIFEST_FILENAME),
        });
    }

    printer.status("Scanning", &display_path(&args.path));
    let discovery = discover(&args.path)?;

    let mut themes = discovery.themes.clone();
    if themes.is_empty() {
        let starter = args.path.join(STARTER_FILENAME);
        write_file(&starter, STARTER_THEME)?;
        printer.info("Created", &display_path(&starter));
        themes.push(starter);
    }

    let source_dirs = source_dirs(&themes, &discovery.root);

    let mut yaml = String::new();
    if !(source_dirs.len() == 1 && source_dirs.contains(".")) {
        yaml.push_str("sources:\n");
        for dir in &source_dirs {
            yaml.push_str(&format!("  - \"{}\"\n", dir));
        }
    }
    yaml.push_str("output: dist\n");

    write_file(&manifest_path, &yaml)?;

    let dirs: Vec<&str> = source_dirs.iter().map(|s| s.as_str()).collect();
    printer.info("Discovered", &dirs.join(", "));
    printer.success(
        "Created",
        &format!("{} ({} found)", MANIFEST_FILENAME, plural(discovery.themes.len(), "theme", "themes")),
    );

    Ok(0)
}

/// Unique parent directories of `themes`, relative to `root`.
fn source_dirs(themes: &[PathBuf], root: &Path) -> BTreeSet<String> {
    themes
        .iter()
        .filter_map(|theme| theme.parent())
        .map(|parent| {
            let relative = parent.strip_prefix(root).unwrap_or(parent);
            if relative == Path::new("") {
                ".".to_string()
            } else {
                format!("{}/", relative.display())
            }
        })
        .collect()
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| SassyError::Io {
            path: parent.to_path_buf(),
            message: format!("Failed to create directory: {}", e),
        })?;
    }
    fs::write(path, content).map_err(|e| SassyError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to write file: {}", e),
    })
}
