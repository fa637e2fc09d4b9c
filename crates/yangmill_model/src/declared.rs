//! The as-written statement tree.

use std::sync::Arc;

use yangmill_foundation::StatementRef;

use crate::arg::Arg;
use crate::statement::StatementKind;
use crate::substatements::Substatements;

/// One declared statement: the syntactic form, frozen after the reactor's
/// declaration phases complete.
#[derive(Clone, Debug, PartialEq)]
pub struct DeclaredStatement {
    /// Statement kind.
    pub kind: StatementKind,
    /// Keyword as written; differs from `kind.keyword()` only for
    /// extension instances (`prefix:keyword`).
    pub keyword: Arc<str>,
    /// Raw argument text, if the statement had one.
    pub raw_arg: Option<Arc<str>>,
    /// Parsed argument value.
    pub arg: Arg,
    /// Location of the statement in its source.
    pub reference: StatementRef,
    /// Declared substatements, in source order.
    pub substatements: Substatements<Arc<DeclaredStatement>>,
}

impl DeclaredStatement {
    /// Returns the first substatement of the given kind.
    #[must_use]
    pub fn find_first(&self, kind: StatementKind) -> Option<&Arc<DeclaredStatement>> {
        self.substatements.iter().find(|s| s.kind == kind)
    }

    /// Returns all substatements of the given kind.
    pub fn find_all(&self, kind: StatementKind) -> impl Iterator<Item = &Arc<DeclaredStatement>> {
        self.substatements.iter().filter(move |s| s.kind == kind)
    }

    /// Returns the raw argument of the first substatement of `kind`.
    #[must_use]
    pub fn substatement_arg(&self, kind: StatementKind) -> Option<&str> {
        self.find_first(kind)
            .and_then(|s| s.raw_arg.as_deref())
    }
}
