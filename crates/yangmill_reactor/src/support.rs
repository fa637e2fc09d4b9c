//! Statement support: the per-statement-kind strategy interface.

use std::collections::HashMap;
use std::sync::Arc;

use yangmill_foundation::Result;
use yangmill_model::{Arg, StatementKind};

use crate::context::CtxId;
use crate::session::BuildSession;
use crate::validator::SubstatementValidator;

/// Strategy object for one statement kind.
///
/// Supports are stateless singletons. They parse raw arguments into typed
/// values, declare substatement cardinality, and hook the phase
/// transitions of contexts of their kind, registering inference actions
/// for any cross-reference work.
pub trait StatementSupport {
    /// The statement kind this support handles.
    fn kind(&self) -> StatementKind;

    /// Returns the cardinality validator, if this kind constrains its
    /// substatements.
    fn validator(&self) -> Option<&SubstatementValidator> {
        None
    }

    /// Parses the raw argument into a typed value.
    ///
    /// The default treats the argument as a free-form string.
    ///
    /// # Errors
    /// Returns a source error for malformed arguments.
    fn parse_argument(&self, session: &mut BuildSession, ctx: CtxId) -> Result<Arg> {
        let raw = session.ctx(ctx).raw_arg.clone();
        Ok(raw.map_or(Arg::None, Arg::Str))
    }

    /// Invoked when the context enters the pre-linkage phase.
    ///
    /// # Errors
    /// Returns a source error if the statement is unusable this early.
    fn on_pre_linkage_declared(&self, _session: &mut BuildSession, _ctx: CtxId) -> Result<()> {
        Ok(())
    }

    /// Invoked when the context enters the linkage phase.
    ///
    /// # Errors
    /// Returns a source error for linkage-level problems.
    fn on_linkage_declared(&self, _session: &mut BuildSession, _ctx: CtxId) -> Result<()> {
        Ok(())
    }

    /// Invoked when the context enters full declaration, after cardinality
    /// validation has passed.
    ///
    /// # Errors
    /// Returns a source error for declaration-level problems.
    fn on_full_definition_declared(&self, _session: &mut BuildSession, _ctx: CtxId) -> Result<()> {
        Ok(())
    }
}

/// The set of supports driving one reactor build.
pub struct SupportBundle {
    supports: HashMap<StatementKind, Arc<dyn StatementSupport>>,
    unknown: Arc<dyn StatementSupport>,
}

impl SupportBundle {
    /// Creates a bundle with the given fallback for extension statements.
    #[must_use]
    pub fn new(unknown: Arc<dyn StatementSupport>) -> Self {
        Self {
            supports: HashMap::new(),
            unknown,
        }
    }

    /// Registers a support, replacing any previous one for the same kind.
    pub fn register(&mut self, support: Arc<dyn StatementSupport>) {
        self.supports.insert(support.kind(), support);
    }

    /// Returns the support for a statement kind.
    ///
    /// Unregistered kinds fall back to the extension support so that
    /// well-formed but uninterpreted statements survive the build.
    #[must_use]
    pub fn support_for(&self, kind: StatementKind) -> Arc<dyn StatementSupport> {
        self.supports
            .get(&kind)
            .unwrap_or(&self.unknown)
            .clone()
    }

    /// Returns true if a kind has a dedicated support.
    #[must_use]
    pub fn is_registered(&self, kind: StatementKind) -> bool {
        self.supports.contains_key(&kind)
    }
}
