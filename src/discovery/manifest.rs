//! Project manifest (sassy.yaml) parsing.
//!
//! The manifest defines where theme sources live, where compiled themes go,
//! and the default compile options.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SassyError};

/// Project manifest loaded from sassy.yaml.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Manifest {
    /// Source directories to scan for themes.
    /// Defaults to the project root if empty.
    pub sources: Vec<String>,

    /// Output directory for compiled themes.
    pub output: PathBuf,

    /// Patterns to exclude from discovery.
    pub excludes: Vec<String>,

    /// Resolve independent names in parallel.
    pub parallel: bool,

    /// Treat lint warnings as build failures.
    pub strict: bool,
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            sources: vec![],
            output: PathBuf::from("dist"),
            excludes: vec![],
            parallel: true,
            strict: false,
        }
    }
}

impl Manifest {
    /// Load manifest from a sassy.yaml file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| SassyError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read manifest: {}", e),
        })?;

        Self::parse(&content).map_err(|e| match e {
            SassyError::Parse { message, help, .. } => SassyError::Parse {
                document: path.display().to_string(),
                message,
                help,
            },
            other => other,
        })
    }

    /// Parse manifest from YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| SassyError::Parse {
            document: super::MANIFEST_FILENAME.to_string(),
            message: format!("invalid manifest: {}", e),
            help: Some("Check sassy.yaml syntax".to_string()),
        })
    }

    /// Check if a path should be excluded based on exclude patterns.
    pub fn is_excluded(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();
        self.excludes
            .iter()
            .any(|pattern| matches_pattern(&path_str, pattern))
    }

    /// Source paths, defaulting to the project root.
    pub fn effective_sources(&self) -> Vec<String> {
        if self.sources.is_empty() {
            vec![".".to_string()]
        } else {
            self.sources.clone()
        }
    }
}

/// Simple glob matching for exclude patterns.
///
/// Supports `**/dir/*`, `*.ext`, `dir/*`, and plain substrings.
fn matches_pattern(path: &str, pattern: &str) -> bool {
    if let Some(suffix) = pattern.strip_prefix("**/") {
        if let Some(dir) = suffix.strip_suffix("/*") {
            return path.starts_with(&format!("{}/", dir)) || path.contains(&format!("/{}/", dir));
        }
        return path.ends_with(suffix);
    }

    if let Some(suffix) = pattern.strip_prefix('*') {
        if !pattern.contains('/') {
            return path.ends_with(suffix);
        }
    }

    if let Some(prefix) = pattern.strip_suffix("/*") {
        return path.starts_with(&format!("{}/", prefix)) || path.contains(&format!("/{}/", prefix));
    }

    path.contains(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_minimal_manifest() {
        let manifest = Manifest::parse("output: build").unwrap();

        assert_eq!(manifest.output, PathBuf::from("build"));
        assert!(manifest.sources.is_empty());
        assert!(manifest.parallel);
        assert!(!manifest.strict);
    }

    #[test]
    fn test_parse_full_manifest() {
        let yaml = r#"
sources:
  - themes/
  - vendor/
output: dist/themes
parallel: false
strict: true
excludes:
  - "*.bak"
  - "**/drafts/*"
"#;
        let manifest = Manifest::parse(yaml).unwrap();

        assert_eq!(manifest.sources, vec!["themes/", "vendor/"]);
        assert_eq!(manifest.output, PathBuf::from("dist/themes"));
        assert!(!manifest.parallel);
        assert!(manifest.strict);
        assert_eq!(manifest.excludes, vec!["*.bak", "**/drafts/*"]);
    }

    #[test]
    fn test_empty_manifest_is_default() {
        assert_eq!(Manifest::parse("").unwrap(), Manifest::default());
        assert_eq!(Manifest::default().output, PathBuf::from("dist"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = Manifest::parse("scale: 2").unwrap_err();
        assert!(matches!(err, SassyError::Parse { .. }));
    }

    #[test]
    fn test_effective_sources() {
        let mut manifest = Manifest::default();
        assert_eq!(manifest.effective_sources(), vec!["."]);

        manifest.sources = vec!["themes/".to_string()];
        assert_eq!(manifest.effective_sources(), vec!["themes/"]);
    }

    #[test]
    fn test_is_excluded() {
        let manifest = Manifest {
            excludes: vec![
                "*.bak".to_string(),
                "**/drafts/*".to_string(),
                "legacy".to_string(),
            ],
            ..Default::default()
        };

        assert!(manifest.is_excluded(Path::new("themes/dark.sassy.yml.bak")));
        assert!(manifest.is_excluded(Path::new("drafts/wip.sassy.yml")));
        assert!(manifest.is_excluded(Path::new("themes/drafts/wip.sassy.yml")));
        assert!(manifest.is_excluded(Path::new("themes/legacy/old.sassy.yml")));
        assert!(!manifest.is_excluded(Path::new("themes/dark.sassy.yml")));
    }
}
