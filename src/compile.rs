//! The compile pipeline: merge, resolve, then lint and emit side by side.

use std::path::Path;

use crate::discovery::{load_chain, ImportLoader};
use crate::emit::{emit, ThemeArtifact};
use crate::error::Result;
use crate::lint::{lint_resolved, LintReport};
use crate::merge::merge_chain;
use crate::resolve::resolve_document;
use crate::types::{EffectiveDocument, ThemeDocument};

/// Options for a single compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    /// Evaluate independent names, and lint alongside emit, on the rayon pool.
    pub parallel: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self { parallel: true }
    }
}

/// A compiled theme with its non-fatal findings.
#[derive(Debug, Clone, PartialEq)]
pub struct Compiled {
    pub artifact: ThemeArtifact,
    pub findings: LintReport,
}

/// Compile an import chain (base first) with default options.
pub fn compile(chain: &[ThemeDocument]) -> Result<Compiled> {
    compile_with(chain, &CompileOptions::default())
}

/// Compile an import chain (base first).
pub fn compile_with(chain: &[ThemeDocument], options: &CompileOptions) -> Result<Compiled> {
    let effective = merge_chain(chain)?;
    compile_effective(&effective, options)
}

/// Compile an already merged document.
pub fn compile_effective(effective: &EffectiveDocument, options: &CompileOptions) -> Result<Compiled> {
    let resolved = resolve_document(effective, options.parallel)?;

    let (findings, artifact) = if options.parallel {
        rayon::join(|| lint_resolved(&resolved), || emit(&resolved))
    } else {
        (lint_resolved(&resolved), emit(&resolved))
    };
    let artifact = artifact?;

    tracing::info!(
        theme = %artifact.name,
        documents = effective.sources.len(),
        findings = findings.len(),
        "compiled theme"
    );

    Ok(Compiled { artifact, findings })
}

/// Load a theme and its imports through `loader`, then compile it.
pub fn compile_file<L: ImportLoader>(path: &Path, loader: &L, options: &CompileOptions) -> Result<Compiled> {
    let chain = load_chain(path, loader)?;
    compile_with(&chain, options)
}
