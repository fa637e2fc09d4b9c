//! Source identity and statement locations.
//!
//! Every diagnostic produced by the reactor carries a [`StatementRef`]
//! pointing at the statement that caused it.

use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::qname::Revision;

/// Identity of one module source: its name and optional revision.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SourceId {
    /// Module or submodule name.
    pub name: Arc<str>,
    /// Revision, if the source declares one.
    pub revision: Option<Revision>,
}

impl SourceId {
    /// Creates a source identity.
    #[must_use]
    pub fn new(name: impl AsRef<str>, revision: Option<Revision>) -> Self {
        Self {
            name: name.as_ref().into(),
            revision,
        }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.revision {
            Some(rev) => write!(f, "{}@{rev}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

impl fmt::Debug for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SourceId({self})")
    }
}

/// Location of a statement in its source text.
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StatementRef {
    /// Source name (typically the module file name).
    pub source: Arc<str>,
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number.
    pub column: u32,
}

impl StatementRef {
    /// Creates a statement reference.
    #[must_use]
    pub fn new(source: impl AsRef<str>, line: u32, column: u32) -> Self {
        Self {
            source: source.as_ref().into(),
            line,
            column,
        }
    }
}

impl fmt::Display for StatementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.source, self.line, self.column)
    }
}

impl fmt::Debug for StatementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StatementRef({self})")
    }
}
