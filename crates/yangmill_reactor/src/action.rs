//! Inference actions: deferred cross-reference resolution.
//!
//! An inference action is a set of prerequisites plus an apply callback.
//! The session retries pending actions whenever namespace entries are
//! registered or statement phases complete; an action whose prerequisites
//! can never be satisfied is converted into an inference error when the
//! reactor runs out of progress.

use std::fmt;

use yangmill_foundation::{QName, StatementRef};

use crate::context::CtxId;
use crate::namespace::{NamespaceId, NamespaceKey, NamespaceValue};
use crate::phase::ModelProcessingPhase;
use crate::session::BuildSession;

/// Identifier of a registered action.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct ActionId(pub(crate) u32);

impl fmt::Debug for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ActionId({})", self.0)
    }
}

/// Handle to one prerequisite within an action; used to pick resolved
/// values out of the apply callback's argument.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PrereqHandle(pub(crate) usize);

/// One prerequisite specification.
#[derive(Clone, Debug)]
pub(crate) enum PrereqSpec {
    /// A namespace entry must exist, resolved through `scope`'s chain;
    /// optionally the found context must also complete a phase.
    NamespaceItem {
        scope: CtxId,
        ns: NamespaceId,
        key: NamespaceKey,
        wait_phase: Option<ModelProcessingPhase>,
    },
    /// A schema-tree path must resolve step by step from `scope`.
    SchemaPath { scope: CtxId, path: Vec<QName> },
    /// A context must complete a phase.
    PhaseFinished {
        ctx: CtxId,
        phase: ModelProcessingPhase,
    },
    /// This action mutates `target`; the target cannot complete `phase`
    /// until the action applies.
    Mutation {
        target: CtxId,
        phase: ModelProcessingPhase,
    },
}

/// Runtime state of one prerequisite.
#[derive(Debug)]
pub(crate) struct PrereqState {
    pub(crate) spec: PrereqSpec,
    /// Resolved value once satisfied.
    pub(crate) resolved: Option<NamespaceValue>,
    /// For [`PrereqSpec::SchemaPath`]: number of steps resolved.
    pub(crate) path_progress: usize,
    /// For [`PrereqSpec::SchemaPath`]: context currently carrying the
    /// path's mutation guard.
    pub(crate) path_current: CtxId,
}

/// The apply callback type.
pub type ApplyFn = Box<dyn FnOnce(&mut BuildSession, &ResolvedPrereqs) -> yangmill_foundation::Result<()>>;

/// Resolved prerequisite values handed to an apply callback.
pub struct ResolvedPrereqs {
    pub(crate) values: Vec<NamespaceValue>,
}

impl ResolvedPrereqs {
    /// Returns the context resolved for a prerequisite.
    #[must_use]
    pub fn ctx(&self, handle: PrereqHandle) -> CtxId {
        self.values[handle.0].ctx()
    }
}

/// Builder for an inference action.
///
/// Collect prerequisites, then hand the builder together with an apply
/// callback to [`BuildSession::register_action`].
pub struct InferenceAction {
    pub(crate) phase: ModelProcessingPhase,
    pub(crate) prereqs: Vec<PrereqSpec>,
    pub(crate) fail_message: String,
    pub(crate) fail_reference: StatementRef,
}

impl InferenceAction {
    /// Creates an action that must resolve within the given phase.
    ///
    /// `fail_message` and `fail_reference` describe the blocking statement
    /// if the action never applies.
    #[must_use]
    pub fn new(
        phase: ModelProcessingPhase,
        fail_message: impl Into<String>,
        fail_reference: StatementRef,
    ) -> Self {
        Self {
            phase,
            prereqs: Vec::new(),
            fail_message: fail_message.into(),
            fail_reference,
        }
    }

    /// Requires a namespace entry, resolved through `scope`'s chain.
    pub fn require_namespace_item(
        &mut self,
        scope: CtxId,
        ns: NamespaceId,
        key: NamespaceKey,
    ) -> PrereqHandle {
        self.push(PrereqSpec::NamespaceItem {
            scope,
            ns,
            key,
            wait_phase: None,
        })
    }

    /// Requires a namespace entry whose context has also completed `phase`.
    pub fn require_namespace_item_at(
        &mut self,
        scope: CtxId,
        ns: NamespaceId,
        key: NamespaceKey,
        phase: ModelProcessingPhase,
    ) -> PrereqHandle {
        self.push(PrereqSpec::NamespaceItem {
            scope,
            ns,
            key,
            wait_phase: Some(phase),
        })
    }

    /// Requires a schema-tree path to resolve from `scope`, one child
    /// lookup per step. The action additionally guards the resolved
    /// target against completing the effective-model phase early.
    pub fn require_schema_path(&mut self, scope: CtxId, path: Vec<QName>) -> PrereqHandle {
        self.push(PrereqSpec::SchemaPath { scope, path })
    }

    /// Requires a context to complete a phase.
    pub fn require_phase(&mut self, ctx: CtxId, phase: ModelProcessingPhase) -> PrereqHandle {
        self.push(PrereqSpec::PhaseFinished { ctx, phase })
    }

    /// Declares that this action mutates `target` during `phase`.
    pub fn mutates(&mut self, target: CtxId, phase: ModelProcessingPhase) -> PrereqHandle {
        self.push(PrereqSpec::Mutation { target, phase })
    }

    fn push(&mut self, spec: PrereqSpec) -> PrereqHandle {
        self.prereqs.push(spec);
        PrereqHandle(self.prereqs.len() - 1)
    }
}

/// Registered action state owned by the session.
pub(crate) struct ActionState {
    pub(crate) id: ActionId,
    pub(crate) phase: ModelProcessingPhase,
    pub(crate) source_index: usize,
    pub(crate) prereqs: Vec<PrereqState>,
    pub(crate) apply: Option<ApplyFn>,
    pub(crate) fail_message: String,
    pub(crate) fail_reference: StatementRef,
    pub(crate) applied: bool,
    /// Root context blocked from completing `phase` until this action
    /// applies; every action holds this guard so a source cannot finish
    /// a phase with unresolved modifiers.
    pub(crate) guard: CtxId,
}

impl ActionState {
    /// Returns true if every prerequisite is satisfied.
    pub(crate) fn is_ready(&self) -> bool {
        self.prereqs.iter().all(|p| p.resolved.is_some())
    }
}

impl fmt::Debug for ActionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionState")
            .field("id", &self.id)
            .field("phase", &self.phase)
            .field("applied", &self.applied)
            .field("prereqs", &self.prereqs.len())
            .finish()
    }
}
