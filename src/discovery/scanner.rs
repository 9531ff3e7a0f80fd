//! File system scanner for discovering theme sources.
//!
//! Recursively scans directories for `*.sassy.yml` / `*.sassy.yaml` files.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::manifest::Manifest;

/// File suffixes recognised as theme sources.
pub const THEME_SUFFIXES: [&str; 2] = [".sassy.yml", ".sassy.yaml"];

/// Check whether a path names a theme source.
pub fn is_theme_source(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| THEME_SUFFIXES.iter().any(|s| name.ends_with(s)))
}

/// Output stem for a theme source: `dark.sassy.yml` → `dark`.
pub fn theme_stem(path: &Path) -> Option<&str> {
    let name = path.file_name()?.to_str()?;
    THEME_SUFFIXES
        .iter()
        .find_map(|suffix| name.strip_suffix(suffix))
        .filter(|stem| !stem.is_empty())
}

/// Scan a directory for theme sources, sorted by path.
pub fn scan_directory(root: &Path, manifest: &Manifest) -> Vec<PathBuf> {
    if !root.exists() {
        return Vec::new();
    }

    let mut found: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!(error = %err, "skipping unreadable path");
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|path| !manifest.is_excluded(path) && is_theme_source(path))
        .collect();

    found.sort();
    found
}

/// Scan multiple source paths relative to `base_path`.
pub fn scan_sources(sources: &[String], base_path: &Path, manifest: &Manifest) -> Vec<PathBuf> {
    let mut found = Vec::new();

    for source in sources {
        let source_path = if Path::new(source).is_absolute() {
            PathBuf::from(source)
        } else {
            base_path.join(source)
        };

        for path in scan_directory(&source_path, manifest) {
            if !found.contains(&path) {
                found.push(path);
            }
        }
    }

    found
}
