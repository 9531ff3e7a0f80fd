//! Theme discovery and import loading.
//!
//! Finds theme sources in a project directory, either by convention
//! (`*.sassy.yml` anywhere under the root) or through a `sassy.yaml`
//! manifest, and loads each theme's import chain.
//!
//! # Example
//!
//! ```ignore
//! use sassy::discovery::{discover, load_chain, FsLoader};
//!
//! let project = discover("./my-themes")?;
//! for theme in &project.themes {
//!     let chain = load_chain(theme, &FsLoader)?;
//!     println!("{}: {} document(s)", theme.display(), chain.len());
//! }
//! ```

mod loader;
mod manifest;
mod scanner;

use std::path::{Path, PathBuf};

use crate::error::Result;

pub use loader::{
    entry_chains, load_chain, load_chain_with_paths, normalise_path, FsLoader, ImportLoader, LoadedChain,
};
pub use manifest::Manifest;
pub use scanner::{is_theme_source, scan_directory, scan_sources, theme_stem, THEME_SUFFIXES};

/// The name of the manifest file.
pub const MANIFEST_FILENAME: &str = "sassy.yaml";

/// Result of discovering themes in a project.
#[derive(Debug)]
pub struct DiscoveryResult {
    /// The project root directory.
    pub root: PathBuf,

    /// The loaded manifest (default if no sassy.yaml was found).
    pub manifest: Manifest,

    /// Whether a sassy.yaml manifest was found.
    pub has_manifest: bool,

    /// Discovered theme sources, sorted by path.
    pub themes: Vec<PathBuf>,
}

impl DiscoveryResult {
    /// Output directory, resolved against the project root.
    pub fn output_dir(&self) -> PathBuf {
        if self.manifest.output.is_absolute() {
            self.manifest.output.clone()
        } else {
            self.root.join(&self.manifest.output)
        }
    }
}

/// Discover themes in a project directory.
///
/// Uses the `sassy.yaml` manifest's sources if present, otherwise scans
/// the whole directory.
pub fn discover(root: impl AsRef<Path>) -> Result<DiscoveryResult> {
    let root = root.as_ref().to_path_buf();

    let manifest_path = root.join(MANIFEST_FILENAME);
    let (manifest, has_manifest) = if manifest_path.exists() {
        (Manifest::load(&manifest_path)?, true)
    } else {
        (Manifest::default(), false)
    };

    let themes = scan_sources(&manifest.effective_sources(), &root, &manifest);
    tracing::debug!(root = %root.display(), themes = themes.len(), has_manifest, "discovered themes");

    Ok(DiscoveryResult {
        root,
        manifest,
        has_manifest,
        themes,
    })
}

/// Discover themes from explicit paths (no manifest lookup).
///
/// Directories are scanned; files are taken as given, whatever their name.
pub fn discover_paths(paths: &[PathBuf]) -> DiscoveryResult {
    let manifest = Manifest::default();
    let mut themes = Vec::new();

    for path in paths {
        if path.is_dir() {
            themes.extend(scan_directory(path, &manifest));
        } else {
            themes.push(path.clone());
        }
    }

    let root = paths
        .first()
        .and_then(|p| p.parent())
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));

    DiscoveryResult {
        root,
        manifest,
        has_manifest: false,
        themes,
    }
}
