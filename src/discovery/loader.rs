//! Import chain loading.
//!
//! A theme's chain is `[root] ++ chain(import_1) ++ chain(import_2) ...`.
//! A document already in the chain is not applied twice, and an import that
//! leads back to a document still being loaded is a cycle. The direct
//! imports of one document are read concurrently and applied in declared
//! order.

use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};

use rayon::prelude::*;

use crate::error::{Result, SassyError};
use crate::parser::parse_document;
use crate::types::{Origin, ThemeDocument};

/// Source of theme documents.
pub trait ImportLoader: Sync {
    /// Locate `import` as written in the document at `importer`.
    fn resolve(&self, import: &str, importer: &Path) -> PathBuf;

    /// Read the source text at `path`.
    fn read(&self, path: &Path) -> Result<String>;
}

/// Loads documents from the file system, relative to the importing file.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLoader;

impl ImportLoader for FsLoader {
    fn resolve(&self, import: &str, importer: &Path) -> PathBuf {
        let base = importer.parent().unwrap_or_else(|| Path::new(""));
        normalise_path(&base.join(import))
    }

    fn read(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|e| SassyError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read theme: {}", e),
        })
    }
}

/// Lexically normalise a path: drop `.` and fold `..` where possible.
pub fn normalise_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = matches!(out.components().next_back(), Some(Component::Normal(_)))
                    && out.pop();
                if !popped {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// A loaded import chain with the normalised path of each document.
#[derive(Debug, Clone)]
pub struct LoadedChain {
    /// Paths in chain order; the first is the root.
    pub paths: Vec<PathBuf>,
    pub documents: Vec<ThemeDocument>,
}

impl LoadedChain {
    pub fn root(&self) -> &Path {
        &self.paths[0]
    }

    /// Paths pulled in through imports, excluding the root.
    pub fn imported(&self) -> &[PathBuf] {
        &self.paths[1..]
    }
}

/// Load `root` and its transitive imports as an ordered chain.
pub fn load_chain<L: ImportLoader>(root: &Path, loader: &L) -> Result<Vec<ThemeDocument>> {
    Ok(load_chain_with_paths(root, loader)?.documents)
}

/// Like [`load_chain`], also reporting where each document was read from.
pub fn load_chain_with_paths<L: ImportLoader>(root: &Path, loader: &L) -> Result<LoadedChain> {
    let root = normalise_path(root);
    let source = loader.read(&root)?;
    let doc = parse_document(&source, Origin::new(root.display().to_string()))?;

    let mut builder = ChainBuilder {
        loader,
        seen: HashSet::new(),
        loading: Vec::new(),
        chain: Vec::new(),
    };
    builder.visit(root, doc)?;

    tracing::debug!(documents = builder.chain.len(), "loaded import chain");
    let (paths, documents): (Vec<PathBuf>, Vec<ThemeDocument>) = builder.chain.into_iter().unzip();
    Ok(LoadedChain { paths, documents })
}

/// Drop chains whose root is imported by another chain in the set.
///
/// Partials (documents that only exist to be imported) live next to the
/// themes that import them; they are not themes on their own.
pub fn entry_chains(chains: Vec<LoadedChain>) -> Vec<LoadedChain> {
    let imported: HashSet<&PathBuf> = chains
        .iter()
        .flat_map(|chain| chain.imported())
        .collect();
    let partials: HashSet<PathBuf> = chains
        .iter()
        .map(LoadedChain::root)
        .filter(|root| imported.contains(&root.to_path_buf()))
        .map(Path::to_path_buf)
        .collect();

    for partial in &partials {
        tracing::debug!(path = %partial.display(), "skipping imported partial");
    }
    chains
        .into_iter()
        .filter(|chain| !partials.contains(chain.root()))
        .collect()
}

struct ChainBuilder<'l, L> {
    loader: &'l L,
    /// Every document already placed in the chain.
    seen: HashSet<PathBuf>,
    /// Documents whose imports are still being loaded, outermost first.
    loading: Vec<(PathBuf, Origin)>,
    chain: Vec<(PathBuf, ThemeDocument)>,
}

impl<L: ImportLoader> ChainBuilder<'_, L> {
    fn visit(&mut self, path: PathBuf, doc: ThemeDocument) -> Result<()> {
        let origin = doc.origin.clone();
        let imports: Vec<(String, PathBuf)> = doc
            .imports
            .iter()
            .map(|import| (import.clone(), self.loader.resolve(import, &path)))
            .collect();

        self.seen.insert(path.clone());
        self.loading.push((path.clone(), origin.clone()));
        self.chain.push((path, doc));

        for (_, target) in &imports {
            if let Some(pos) = self.loading.iter().position(|(p, _)| p == target) {
                let mut cycle: Vec<String> = self.loading[pos..]
                    .iter()
                    .map(|(p, _)| p.display().to_string())
                    .collect();
                cycle.push(target.display().to_string());
                return Err(SassyError::CyclicReference {
                    document: origin.to_string(),
                    chain: cycle,
                });
            }
        }

        let fetch: Vec<&(String, PathBuf)> = imports
            .iter()
            .filter(|(_, target)| !self.seen.contains(target))
            .collect();
        let loader = self.loader;
        let sources: Vec<Result<String>> = fetch
            .par_iter()
            .map(|(_, target)| loader.read(target))
            .collect();

        for ((label, target), source) in fetch.into_iter().zip(sources) {
            if self.seen.contains(target) {
                tracing::trace!(import = %label, "already in chain");
                continue;
            }
            let source = source.map_err(|e| match e {
                SassyError::Io { path, message } => SassyError::Io {
                    path,
                    message: format!("{} (imported by {})", message, origin),
                },
                other => other,
            })?;
            let doc = parse_document(&source, Origin::imported(target.display().to_string(), &origin))?;
            self.visit(target.clone(), doc)?;
        }

        self.loading.pop();
        Ok(())
    }
}
