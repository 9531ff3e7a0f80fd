use miette::Diagnostic;
use thiserror::Error;

/// Main error type for sassy operations.
///
/// Every variant except `Io` names the document it originated from. For
/// documents pulled in through imports the label carries the import path,
/// e.g. `base.sassy.yml (imported by theme.sassy.yml)`.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum SassyError {
    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(sassy::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("{document}: parse error: {message}")]
    #[diagnostic(code(sassy::parse))]
    Parse {
        document: String,
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("{document}: unresolved reference `{name}` in {site}")]
    #[diagnostic(code(sassy::unresolved_reference))]
    UnresolvedReference {
        document: String,
        name: String,
        site: String,
        #[help]
        help: Option<String>,
    },

    #[error("{document}: cyclic reference: {}", .chain.join(" -> "))]
    #[diagnostic(
        code(sassy::cyclic_reference),
        help("Break the cycle by giving one of these names a literal value")
    )]
    CyclicReference { document: String, chain: Vec<String> },

    #[error("{document}: type error in {site}: {context} expected {expected}, found {found}")]
    #[diagnostic(code(sassy::type_error))]
    Type {
        document: String,
        site: String,
        /// What was being evaluated, e.g. `fade() argument 1`.
        context: String,
        expected: String,
        found: String,
    },

    #[error("{document}: duplicate key `{key}`")]
    #[diagnostic(code(sassy::duplicate_key))]
    DuplicateKey {
        document: String,
        key: String,
        #[help]
        help: Option<String>,
    },

    #[error("{document}: merge conflict on `{key}`: {message}")]
    #[diagnostic(code(sassy::merge_conflict))]
    MergeConflict {
        document: String,
        key: String,
        message: String,
    },
}

impl SassyError {
    /// Shorthand for a parse error without help text.
    pub(crate) fn parse(document: impl Into<String>, message: impl Into<String>) -> Self {
        SassyError::Parse {
            document: document.into(),
            message: message.into(),
            help: None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SassyError>;
