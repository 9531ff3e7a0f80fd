//! Document origins for error messages.

use std::fmt;
use std::sync::Arc;

/// Label of the document a value came from.
///
/// For imported documents the label includes the import path, so errors
/// raised after merging still point at the right file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Origin(Arc<str>);

impl Origin {
    pub fn new(label: impl AsRef<str>) -> Self {
        Self(Arc::from(label.as_ref()))
    }

    /// Label for a document pulled in by `importer`.
    pub fn imported(label: impl AsRef<str>, importer: &Origin) -> Self {
        Self::new(format!("{} (imported by {})", label.as_ref(), importer))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Origin {
    fn default() -> Self {
        Self::new("<inline>")
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Origin {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Origin {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// A value tagged with the document it was declared in.
#[derive(Debug, Clone, PartialEq)]
pub struct Sourced<T> {
    pub value: T,
    pub origin: Origin,
}

impl<T> Sourced<T> {
    pub fn new(value: T, origin: Origin) -> Self {
        Self { value, origin }
    }

    /// Map the inner value, keeping the origin.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Sourced<U> {
        Sourced {
            value: f(self.value),
            origin: self.origin,
        }
    }
}

impl<T> std::ops::Deref for Sourced<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}
