//! Statement contexts: the mutable nodes of the in-progress model.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use yangmill_foundation::{QNameModule, StatementRef};
use yangmill_model::{Arg, StatementKind, YangVersion};
use yangmill_parser::Keyword;

use crate::namespace::NamespaceStorage;
use crate::phase::ModelProcessingPhase;

/// Identifier of a statement context within one build session's arena.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CtxId(u32);

impl CtxId {
    /// Creates an id from a raw index.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw arena index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for CtxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CtxId({})", self.0)
    }
}

/// How a context came to exist.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CopyType {
    /// Written in source.
    Original,
    /// Instantiated by a `uses` statement.
    AddedByUses,
    /// Injected by an `augment` statement.
    AddedByAugmentation,
}

/// A mutable node in the in-progress statement tree.
///
/// Substatement lists are append-only until the owning phase completes;
/// once the effective model freezes, contexts are only read.
pub struct StatementContext {
    /// This context's id.
    pub id: CtxId,
    /// Parent context; `None` for root statements.
    pub parent: Option<CtxId>,
    /// Root of the tree this context belongs to.
    pub root: CtxId,
    /// Index of the owning source.
    pub source_index: usize,
    /// Statement kind.
    pub kind: StatementKind,
    /// Keyword as written.
    pub keyword: Keyword,
    /// Raw argument text.
    pub raw_arg: Option<Arc<str>>,
    /// Parsed argument; `Arg::None` until the definition phase runs.
    pub arg: Arg,
    /// Source location.
    pub reference: StatementRef,
    /// Declared substatements, in source order.
    pub declared: Vec<CtxId>,
    /// Effective substatements added during inference.
    pub effective: Vec<CtxId>,
    /// Highest phase this context has completed.
    pub completed_phase: ModelProcessingPhase,
    /// Whether this phase's declaration callbacks have run.
    pub callbacks_run: HashMap<ModelProcessingPhase, bool>,
    /// Outstanding mutations per phase; a phase cannot complete while
    /// its count is non-zero.
    pub mutations: HashMap<ModelProcessingPhase, u32>,
    /// Statement-local and tree-scoped namespace storage.
    pub storage: NamespaceStorage,
    /// The original context, if this one is a copy.
    pub origin: Option<CtxId>,
    /// How this context came to exist.
    pub copy_type: CopyType,
    /// Modules whose augments have injected children into this context.
    pub augmented_by: Vec<QNameModule>,
    /// Module identity; set on root contexts during linkage.
    pub module_id: Option<QNameModule>,
    /// Language version; set on root contexts.
    pub yang_version: YangVersion,
    /// Whether this statement is supported (if-feature pruning).
    pub supported: bool,
}

impl StatementContext {
    /// Creates a fresh context.
    #[must_use]
    pub fn new(
        id: CtxId,
        parent: Option<CtxId>,
        root: CtxId,
        source_index: usize,
        kind: StatementKind,
        keyword: Keyword,
        raw_arg: Option<Arc<str>>,
        reference: StatementRef,
    ) -> Self {
        Self {
            id,
            parent,
            root,
            source_index,
            kind,
            keyword,
            raw_arg,
            arg: Arg::None,
            reference,
            declared: Vec::new(),
            effective: Vec::new(),
            completed_phase: ModelProcessingPhase::Init,
            callbacks_run: HashMap::new(),
            mutations: HashMap::new(),
            storage: NamespaceStorage::new(),
            origin: None,
            copy_type: CopyType::Original,
            augmented_by: Vec::new(),
            module_id: None,
            yang_version: YangVersion::default(),
            supported: true,
        }
    }

    /// Returns declared and effective substatement ids, declared first.
    pub fn all_substatements(&self) -> impl Iterator<Item = CtxId> + '_ {
        self.declared.iter().chain(self.effective.iter()).copied()
    }

    /// Returns true if this context has completed the given phase.
    #[must_use]
    pub fn is_phase_complete(&self, phase: ModelProcessingPhase) -> bool {
        self.completed_phase.execution_order() >= phase.execution_order()
    }

    /// Returns the number of pending mutations for a phase.
    #[must_use]
    pub fn pending_mutations(&self, phase: ModelProcessingPhase) -> u32 {
        self.mutations.get(&phase).copied().unwrap_or(0)
    }
}

impl fmt::Debug for StatementContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatementContext")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("raw_arg", &self.raw_arg)
            .field("completed_phase", &self.completed_phase)
            .finish_non_exhaustive()
    }
}
