//! The build session: all mutable state of one reactor build.
//!
//! A session owns the statement-context arena, the scoped namespace
//! storages, and the inference-action engine. One session is driven by
//! one thread; the immutable effective model is the only thing that
//! survives it.

use std::collections::{HashMap, VecDeque};
use std::mem;
use std::sync::Arc;

use log::{debug, trace};

use yangmill_foundation::{
    Error, InferenceError, Interner, QName, QNameModule, Result, StatementRef,
};
use yangmill_model::{Arg, StatementKind};
use yangmill_parser::RawStatement;

use crate::action::{
    ActionId, ActionState, ApplyFn, InferenceAction, PrereqSpec, PrereqState, ResolvedPrereqs,
};
use crate::context::{CopyType, CtxId, StatementContext};
use crate::namespace::{
    NamespaceBehaviour, NamespaceEntry, NamespaceId, NamespaceKey, NamespaceStorage, NamespaceValue,
};
use crate::phase::{ModelProcessingPhase, PhaseProgress};
use crate::support::SupportBundle;

/// Per-source state: the root context and source-local namespace storage.
pub(crate) struct SourceState {
    /// Source name for diagnostics.
    pub(crate) name: Arc<str>,
    /// Root statement context of this source.
    pub(crate) root: CtxId,
    /// Source-local namespace storage.
    pub(crate) storage: NamespaceStorage,
}

/// Internal notifications driving action re-evaluation.
#[derive(Clone, Debug)]
enum Event {
    NamespaceAdded(NamespaceId, NamespaceKey),
    PhaseCompleted(CtxId),
}

/// All mutable state of one reactor build.
pub struct BuildSession {
    bundle: Arc<SupportBundle>,
    contexts: Vec<StatementContext>,
    pub(crate) sources: Vec<SourceState>,
    global_storage: NamespaceStorage,
    actions: Vec<ActionState>,
    ns_watchers: HashMap<(NamespaceId, NamespaceKey), Vec<ActionId>>,
    phase_watchers: HashMap<CtxId, Vec<ActionId>>,
    events: VecDeque<Event>,
    /// Monotonic counter bumped on every observable state change; the
    /// fixed-point loop uses it to detect lack of progress.
    progress: u64,
    interner: Interner,
}

impl BuildSession {
    /// Creates a session driven by the given support bundle.
    #[must_use]
    pub fn new(bundle: Arc<SupportBundle>) -> Self {
        Self {
            bundle,
            contexts: Vec::new(),
            sources: Vec::new(),
            global_storage: NamespaceStorage::new(),
            actions: Vec::new(),
            ns_watchers: HashMap::new(),
            phase_watchers: HashMap::new(),
            events: VecDeque::new(),
            progress: 0,
            interner: Interner::new(),
        }
    }

    // =========================================================================
    // Context arena
    // =========================================================================

    /// Returns a context by id.
    ///
    /// # Panics
    /// Panics if the id does not belong to this session.
    #[must_use]
    pub fn ctx(&self, id: CtxId) -> &StatementContext {
        &self.contexts[id.index()]
    }

    /// Returns a mutable context by id.
    ///
    /// # Panics
    /// Panics if the id does not belong to this session.
    pub fn ctx_mut(&mut self, id: CtxId) -> &mut StatementContext {
        &mut self.contexts[id.index()]
    }

    /// Interns a string in the session pool.
    pub fn intern(&mut self, s: &str) -> Arc<str> {
        self.interner.intern(s)
    }

    /// Materializes a source's raw statement tree into contexts.
    ///
    /// # Errors
    /// Returns a source error if the root is not a module or submodule,
    /// or if an unprefixed keyword is not a known statement.
    pub fn add_source(&mut self, name: &str, root: &RawStatement) -> Result<usize> {
        let source_index = self.sources.len();
        let root_id = self.create_context(source_index, None, None, root)?;

        let root_kind = self.ctx(root_id).kind;
        if !matches!(root_kind, StatementKind::Module | StatementKind::Submodule) {
            return Err(Error::source(
                format!("expected module or submodule at source root, found \"{root_kind}\""),
                root.reference.clone(),
            ));
        }

        self.sources.push(SourceState {
            name: self.interner.intern(name),
            root: root_id,
            storage: NamespaceStorage::new(),
        });
        Ok(source_index)
    }

    fn create_context(
        &mut self,
        source_index: usize,
        parent: Option<CtxId>,
        root: Option<CtxId>,
        raw: &RawStatement,
    ) -> Result<CtxId> {
        let kind = if raw.keyword.is_extension() {
            StatementKind::Unknown
        } else {
            StatementKind::from_keyword(&raw.keyword.identifier).ok_or_else(|| {
                Error::source(
                    format!("unknown statement \"{}\"", raw.keyword),
                    raw.reference.clone(),
                )
            })?
        };

        let id = CtxId::new(u32::try_from(self.contexts.len()).expect("context arena overflow"));
        let raw_arg = raw.argument.as_deref().map(|a| self.interner.intern(a));
        self.contexts.push(StatementContext::new(
            id,
            parent,
            root.unwrap_or(id),
            source_index,
            kind,
            raw.keyword.clone(),
            raw_arg,
            raw.reference.clone(),
        ));

        for sub in &raw.substatements {
            let child = self.create_context(source_index, Some(id), Some(root.unwrap_or(id)), sub)?;
            self.ctx_mut(id).declared.push(child);
        }
        Ok(id)
    }

    /// Returns the i-th substatement (declared, then effective), if any.
    fn nth_substatement(&self, id: CtxId, i: usize) -> Option<CtxId> {
        let ctx = self.ctx(id);
        if i < ctx.declared.len() {
            Some(ctx.declared[i])
        } else {
            ctx.effective.get(i - ctx.declared.len()).copied()
        }
    }

    /// Deep-copies a statement subtree under a new parent.
    ///
    /// Node-identifier arguments are rebound to `target_module` when one
    /// is given (grouping instantiation across modules). Phase callbacks
    /// up to and including `callbacks_done` are suppressed on the copies;
    /// the copied subtree's namespace registrations are then served by
    /// on-demand schema-tree resolution instead.
    ///
    /// The copy is recorded as an effective substatement of `new_parent`.
    ///
    /// # Errors
    /// Currently infallible; kept fallible to match the mutation surface
    /// of its callers.
    pub fn copy_subtree(
        &mut self,
        src: CtxId,
        new_parent: CtxId,
        target_module: Option<&QNameModule>,
        copy_type: CopyType,
        callbacks_done: ModelProcessingPhase,
    ) -> Result<CtxId> {
        let copy = self.copy_subtree_inner(src, new_parent, target_module, copy_type, callbacks_done);
        self.ctx_mut(new_parent).effective.push(copy);
        self.progress += 1;
        Ok(copy)
    }

    fn copy_subtree_inner(
        &mut self,
        src: CtxId,
        new_parent: CtxId,
        target_module: Option<&QNameModule>,
        copy_type: CopyType,
        callbacks_done: ModelProcessingPhase,
    ) -> CtxId {
        let (kind, keyword, raw_arg, reference, arg, supported, source_index, root) = {
            let parent = self.ctx(new_parent);
            let src_ctx = self.ctx(src);
            (
                src_ctx.kind,
                src_ctx.keyword.clone(),
                src_ctx.raw_arg.clone(),
                src_ctx.reference.clone(),
                src_ctx.arg.clone(),
                src_ctx.supported,
                parent.source_index,
                parent.root,
            )
        };

        let arg = match (&arg, target_module) {
            (Arg::QName(qname), Some(module)) if kind.is_schema_tree() => {
                Arg::QName(qname.rebind(module))
            }
            (Arg::QNames(qnames), Some(module)) if kind == StatementKind::Key => {
                Arg::QNames(qnames.iter().map(|q| q.rebind(module)).collect())
            }
            _ => arg,
        };

        let id = CtxId::new(u32::try_from(self.contexts.len()).expect("context arena overflow"));
        let mut ctx = StatementContext::new(
            id,
            Some(new_parent),
            root,
            source_index,
            kind,
            keyword,
            raw_arg,
            reference,
        );
        ctx.arg = arg;
        ctx.origin = Some(src);
        ctx.copy_type = copy_type;
        ctx.supported = supported;
        for phase in ModelProcessingPhase::EXECUTION_ORDER {
            if phase.execution_order() <= callbacks_done.execution_order() {
                ctx.callbacks_run.insert(phase, true);
            }
        }
        self.contexts.push(ctx);

        let children: Vec<CtxId> = self.ctx(src).all_substatements().collect();
        for child in children {
            let copied =
                self.copy_subtree_inner(child, id, target_module, copy_type, callbacks_done);
            self.ctx_mut(id).declared.push(copied);
        }
        id
    }

    /// Adds an effective substatement to a context.
    pub fn add_effective_substatement(&mut self, parent: CtxId, child: CtxId) {
        self.ctx_mut(parent).effective.push(child);
        self.progress += 1;
    }

    /// Creates an undeclared substatement (for example an `rpc`'s implicit
    /// `input`), already argued and past its declaration callbacks.
    pub fn create_undeclared_substatement(
        &mut self,
        parent: CtxId,
        kind: StatementKind,
        arg: Arg,
    ) -> CtxId {
        let (source_index, root, reference) = {
            let p = self.ctx(parent);
            (p.source_index, p.root, p.reference.clone())
        };
        let id = CtxId::new(u32::try_from(self.contexts.len()).expect("context arena overflow"));
        let mut ctx = StatementContext::new(
            id,
            Some(parent),
            root,
            source_index,
            kind,
            yangmill_parser::Keyword::core(kind.keyword()),
            None,
            reference,
        );
        ctx.arg = arg;
        for phase in [
            ModelProcessingPhase::SourcePreLinkage,
            ModelProcessingPhase::SourceLinkage,
            ModelProcessingPhase::StatementDefinition,
        ] {
            ctx.callbacks_run.insert(phase, true);
        }
        self.contexts.push(ctx);
        self.ctx_mut(parent).effective.push(id);
        self.progress += 1;
        id
    }

    // =========================================================================
    // Namespace access
    // =========================================================================

    /// Registers a value in a namespace, enforcing single registration.
    /// Re-registering the value already stored under the key is a no-op.
    ///
    /// `what` is a short noun phrase naming the registration for the
    /// duplicate diagnostic (for example `module "foo"`).
    ///
    /// # Errors
    /// Returns a source error carrying both the new and the prior
    /// declaration's references if the key is taken by a different value.
    pub fn add_to_namespace(
        &mut self,
        scope: CtxId,
        ns: NamespaceId,
        key: NamespaceKey,
        value: NamespaceValue,
        reference: StatementRef,
        what: &str,
    ) -> Result<()> {
        trace!("registering {what} in {ns}");
        let entry = NamespaceEntry {
            value: value.clone(),
            registered_at: reference.clone(),
        };
        let storage = self.storage_for_mut(ns.behaviour(), scope);
        if let Some(prior) = storage.insert(ns, key.clone(), entry) {
            // An on-demand lookup may have materialized this exact entry
            // already; only a different statement is a duplicate.
            if prior.value == value {
                return Ok(());
            }
            return Err(Error::source_related(
                format!("duplicate {what}"),
                reference,
                prior.registered_at,
            ));
        }
        self.progress += 1;
        self.events.push_back(Event::NamespaceAdded(ns, key));
        Ok(())
    }

    /// Looks up a namespace value, walking the scope chain declared by
    /// the namespace's behaviour.
    #[must_use]
    pub fn get_from_namespace(
        &self,
        scope: CtxId,
        ns: NamespaceId,
        key: &NamespaceKey,
    ) -> Option<NamespaceValue> {
        match ns.behaviour() {
            NamespaceBehaviour::Global => self.global_storage.get(ns, key),
            NamespaceBehaviour::SourceLocal => {
                let source_index = self.ctx(scope).source_index;
                self.sources[source_index].storage.get(ns, key)
            }
            NamespaceBehaviour::RootStatementLocal => {
                let root = self.ctx(scope).root;
                self.ctx(root).storage.get(ns, key)
            }
            NamespaceBehaviour::StatementLocal => self.ctx(scope).storage.get(ns, key),
            NamespaceBehaviour::TreeScoped => {
                let mut current = Some(scope);
                while let Some(id) = current {
                    if let Some(entry) = self.ctx(id).storage.get(ns, key) {
                        return Some(entry.value.clone());
                    }
                    current = self.ctx(id).parent;
                }
                None
            }
        }
        .map(|entry| entry.value.clone())
    }

    fn storage_for_mut(
        &mut self,
        behaviour: NamespaceBehaviour,
        scope: CtxId,
    ) -> &mut NamespaceStorage {
        match behaviour {
            NamespaceBehaviour::Global => &mut self.global_storage,
            NamespaceBehaviour::SourceLocal => {
                let source_index = self.ctx(scope).source_index;
                &mut self.sources[source_index].storage
            }
            NamespaceBehaviour::RootStatementLocal => {
                let root = self.ctx(scope).root;
                &mut self.contexts[root.index()].storage
            }
            NamespaceBehaviour::StatementLocal | NamespaceBehaviour::TreeScoped => {
                &mut self.contexts[scope.index()].storage
            }
        }
    }

    /// Looks up a schema-tree child of `owner`, materializing the entry
    /// on demand.
    ///
    /// A miss in the owner's local storage falls back to scanning the
    /// owner's substatements for a matching data node; this is what makes
    /// children instantiated by `uses` and `augment` copies resolvable
    /// without eagerly re-registering every copied subtree.
    pub fn get_schema_tree_child(&mut self, owner: CtxId, qname: &QName) -> Option<CtxId> {
        let key = NamespaceKey::QName(qname.clone());
        if let Some(entry) = self.ctx(owner).storage.get(NamespaceId::SchemaTreeChild, &key) {
            return Some(entry.value.ctx());
        }

        let mut found = None;
        let mut i = 0;
        while let Some(child) = self.nth_substatement(owner, i) {
            i += 1;
            let ctx = self.ctx(child);
            if !ctx.supported || !ctx.kind.is_schema_tree() {
                continue;
            }
            if let Arg::QName(q) = &ctx.arg {
                if q == qname {
                    found = Some(child);
                    break;
                }
            }
        }

        let child = found?;
        let reference = self.ctx(child).reference.clone();
        let entry = NamespaceEntry {
            value: NamespaceValue::Ctx(child),
            registered_at: reference,
        };
        self.ctx_mut(owner)
            .storage
            .insert(NamespaceId::SchemaTreeChild, key.clone(), entry);
        self.events
            .push_back(Event::NamespaceAdded(NamespaceId::SchemaTreeChild, key));
        Some(child)
    }

    /// Registers a schema-tree child into its parent's local storage,
    /// reporting duplicates with both statement references.
    ///
    /// # Errors
    /// Returns the duplicate-child source error.
    pub fn register_schema_child(&mut self, parent: CtxId, child: CtxId, qname: QName) -> Result<()> {
        let what = {
            let p = self.ctx(parent);
            match &p.raw_arg {
                Some(arg) => format!("schema-tree child {qname} in {} \"{arg}\"", p.kind),
                None => format!("schema-tree child {qname} in {}", p.kind),
            }
        };
        let reference = self.ctx(child).reference.clone();
        self.add_to_namespace(
            parent,
            NamespaceId::SchemaTreeChild,
            NamespaceKey::QName(qname),
            NamespaceValue::Ctx(child),
            reference,
            &what,
        )
    }

    // =========================================================================
    // Module identity helpers
    // =========================================================================

    /// Returns the module identity of the tree `ctx` belongs to.
    ///
    /// # Errors
    /// Returns a verification error if linkage has not resolved the
    /// identity yet; callers run at statement-definition or later.
    pub fn current_module_id(&self, ctx: CtxId) -> Result<QNameModule> {
        let root = self.ctx(ctx).root;
        self.ctx(root).module_id.clone().ok_or_else(|| {
            Error::verify(format!(
                "module identity of {} not resolved before use",
                self.ctx(root)
                    .raw_arg
                    .as_deref()
                    .unwrap_or("<unnamed source>")
            ))
        })
    }

    /// Parses the context's raw argument as a node identifier bound to
    /// the current module.
    ///
    /// # Errors
    /// Returns a source error for missing or malformed identifiers.
    pub fn node_qname(&mut self, ctx: CtxId) -> Result<QName> {
        let reference = self.ctx(ctx).reference.clone();
        let raw = self.ctx(ctx).raw_arg.clone().ok_or_else(|| {
            Error::source(
                format!("statement \"{}\" requires an argument", self.ctx(ctx).kind),
                reference.clone(),
            )
        })?;
        let module = self.current_module_id(ctx)?;
        module.bind(raw.as_ref()).map_err(|e| e.at(reference))
    }

    /// Parses a possibly-prefixed reference (`foo` or `pfx:foo`) into a
    /// QName, resolving the prefix through the source's prefix namespace.
    ///
    /// # Errors
    /// Returns a source error for unknown prefixes or malformed names.
    pub fn parse_reference_qname(&mut self, ctx: CtxId, text: &str) -> Result<QName> {
        let reference = self.ctx(ctx).reference.clone();
        match text.split_once(':') {
            None => {
                let module = self.current_module_id(ctx)?;
                module.bind(text).map_err(|e| e.at(reference))
            }
            Some((prefix, local)) => {
                let target = self
                    .get_from_namespace(ctx, NamespaceId::PrefixToModule, &NamespaceKey::str(prefix))
                    .ok_or_else(|| {
                        Error::source(format!("unknown prefix \"{prefix}\""), reference.clone())
                    })?;
                let module = self.ctx(target.ctx()).module_id.clone().ok_or_else(|| {
                    Error::verify(format!("prefix \"{prefix}\" resolved to an unlinked module"))
                })?;
                module.bind(local).map_err(|e| e.at(reference))
            }
        }
    }

    /// Returns the raw argument of the first declared substatement of the
    /// given kind.
    #[must_use]
    pub fn find_substatement_arg(&self, ctx: CtxId, kind: StatementKind) -> Option<Arc<str>> {
        self.ctx(ctx)
            .declared
            .iter()
            .map(|id| self.ctx(*id))
            .find(|c| c.kind == kind)
            .and_then(|c| c.raw_arg.clone())
    }

    /// Returns the first declared substatement of the given kind.
    #[must_use]
    pub fn find_substatement(&self, ctx: CtxId, kind: StatementKind) -> Option<CtxId> {
        self.ctx(ctx)
            .declared
            .iter()
            .copied()
            .find(|id| self.ctx(*id).kind == kind)
    }

    // =========================================================================
    // Inference actions
    // =========================================================================

    /// Registers an inference action with its apply callback.
    ///
    /// Prerequisites already satisfiable are resolved immediately; the
    /// action may thus apply before this call returns.
    ///
    /// # Errors
    /// Propagates errors from an immediately-applied callback.
    pub fn register_action(
        &mut self,
        owner: CtxId,
        action: InferenceAction,
        apply: ApplyFn,
    ) -> Result<()> {
        let id = ActionId(u32::try_from(self.actions.len()).expect("action overflow"));
        let source_index = self.ctx(owner).source_index;

        // Block the owning source's root from finishing this action's
        // phase until the action applies.
        let guard = self.ctx(owner).root;
        *self
            .ctx_mut(guard)
            .mutations
            .entry(action.phase)
            .or_insert(0) += 1;

        let mut prereqs = Vec::with_capacity(action.prereqs.len());
        for spec in action.prereqs {
            let mut state = PrereqState {
                path_current: match &spec {
                    PrereqSpec::SchemaPath { scope, .. } => *scope,
                    _ => owner,
                },
                spec,
                resolved: None,
                path_progress: 0,
            };
            match &state.spec {
                PrereqSpec::Mutation { target, phase } => {
                    *self.ctx_mut(*target).mutations.entry(*phase).or_insert(0) += 1;
                    state.resolved = Some(NamespaceValue::Ctx(*target));
                }
                PrereqSpec::SchemaPath { scope, .. } => {
                    // The path guards its current position against
                    // completing the effective model until it advances.
                    *self
                        .ctx_mut(*scope)
                        .mutations
                        .entry(ModelProcessingPhase::EffectiveModel)
                        .or_insert(0) += 1;
                }
                PrereqSpec::NamespaceItem { ns, key, .. } => {
                    self.watch_namespace(*ns, key.clone(), id);
                }
                PrereqSpec::PhaseFinished { ctx, .. } => {
                    self.watch_phase(*ctx, id);
                }
            }
            prereqs.push(state);
        }

        self.actions.push(ActionState {
            id,
            phase: action.phase,
            source_index,
            prereqs,
            apply: Some(apply),
            fail_message: action.fail_message,
            fail_reference: action.fail_reference,
            applied: false,
            guard,
        });
        trace!("registered action {id:?} for phase {}", action.phase);

        self.try_apply_action(id)?;
        Ok(())
    }

    fn watch_namespace(&mut self, ns: NamespaceId, key: NamespaceKey, id: ActionId) {
        let watchers = self.ns_watchers.entry((ns, key)).or_default();
        if !watchers.contains(&id) {
            watchers.push(id);
        }
    }

    fn watch_phase(&mut self, ctx: CtxId, id: ActionId) {
        let watchers = self.phase_watchers.entry(ctx).or_default();
        if !watchers.contains(&id) {
            watchers.push(id);
        }
    }

    /// Re-evaluates one action's prerequisites, applying it when all are
    /// satisfied. Returns true if the action applied during this call.
    fn try_apply_action(&mut self, id: ActionId) -> Result<bool> {
        let index = id.0 as usize;
        if self.actions[index].applied || self.actions[index].apply.is_none() {
            return Ok(false);
        }

        let mut prereqs = mem::take(&mut self.actions[index].prereqs);
        for prereq in &mut prereqs {
            if prereq.resolved.is_some() {
                continue;
            }
            match prereq.spec.clone() {
                PrereqSpec::NamespaceItem {
                    scope,
                    ns,
                    key,
                    wait_phase,
                } => {
                    if let Some(value) = self.get_from_namespace(scope, ns, &key) {
                        match wait_phase {
                            Some(phase) if !self.ctx(value.ctx()).is_phase_complete(phase) => {
                                self.watch_phase(value.ctx(), id);
                            }
                            _ => prereq.resolved = Some(value),
                        }
                    }
                }
                PrereqSpec::SchemaPath { scope: _, path } => {
                    while prereq.path_progress < path.len() {
                        let step = &path[prereq.path_progress];
                        let current = prereq.path_current;
                        let Some(next) = self.get_schema_tree_child(current, step) else {
                            self.watch_namespace(
                                NamespaceId::SchemaTreeChild,
                                NamespaceKey::QName(step.clone()),
                                id,
                            );
                            break;
                        };
                        // Move the effective-model guard one step along.
                        self.move_mutation_guard(current, next);
                        prereq.path_current = next;
                        prereq.path_progress += 1;
                        self.progress += 1;
                    }
                    if prereq.path_progress == path.len() {
                        prereq.resolved = Some(NamespaceValue::Ctx(prereq.path_current));
                    }
                }
                PrereqSpec::PhaseFinished { ctx, phase } => {
                    if self.ctx(ctx).is_phase_complete(phase) {
                        prereq.resolved = Some(NamespaceValue::Ctx(ctx));
                    } else {
                        self.watch_phase(ctx, id);
                    }
                }
                PrereqSpec::Mutation { .. } => {}
            }
        }

        let ready = prereqs.iter().all(|p| p.resolved.is_some());
        self.actions[index].prereqs = prereqs;

        if !ready {
            return Ok(false);
        }

        let apply = self.actions[index].apply.take().expect("apply checked above");
        self.actions[index].applied = true;
        let values: Vec<NamespaceValue> = self.actions[index]
            .prereqs
            .iter()
            .map(|p| p.resolved.clone().expect("all resolved"))
            .collect();
        debug!("applying action {id:?}");
        apply(self, &ResolvedPrereqs { values })?;

        // Release mutation guards now that the mutation has happened.
        let mut guards: Vec<(CtxId, ModelProcessingPhase)> = self.actions[index]
            .prereqs
            .iter()
            .filter_map(|p| match &p.spec {
                PrereqSpec::Mutation { target, phase } => Some((*target, *phase)),
                PrereqSpec::SchemaPath { .. } => {
                    Some((p.path_current, ModelProcessingPhase::EffectiveModel))
                }
                _ => None,
            })
            .collect();
        guards.push((self.actions[index].guard, self.actions[index].phase));
        for (target, phase) in guards {
            self.release_mutation_guard(target, phase);
        }

        self.progress += 1;
        Ok(true)
    }

    fn move_mutation_guard(&mut self, from: CtxId, to: CtxId) {
        self.release_mutation_guard(from, ModelProcessingPhase::EffectiveModel);
        *self
            .ctx_mut(to)
            .mutations
            .entry(ModelProcessingPhase::EffectiveModel)
            .or_insert(0) += 1;
    }

    fn release_mutation_guard(&mut self, target: CtxId, phase: ModelProcessingPhase) {
        if let Some(count) = self.ctx_mut(target).mutations.get_mut(&phase) {
            *count = count.saturating_sub(1);
        }
    }

    /// Drains pending events, re-evaluating the actions watching them.
    fn process_events(&mut self) -> Result<()> {
        while let Some(event) = self.events.pop_front() {
            let watchers: Vec<ActionId> = match &event {
                Event::NamespaceAdded(ns, key) => self
                    .ns_watchers
                    .get(&(*ns, key.clone()))
                    .cloned()
                    .unwrap_or_default(),
                Event::PhaseCompleted(ctx) => self
                    .phase_watchers
                    .get(ctx)
                    .cloned()
                    .unwrap_or_default(),
            };
            for id in watchers {
                self.try_apply_action(id)?;
            }
        }
        Ok(())
    }

    // =========================================================================
    // Phase driving
    // =========================================================================

    /// Attempts to advance one source through the given phase.
    ///
    /// # Errors
    /// Propagates source errors raised by declaration callbacks or
    /// applied actions.
    pub fn try_complete_phase(
        &mut self,
        source_index: usize,
        phase: ModelProcessingPhase,
    ) -> Result<PhaseProgress> {
        let before = self.progress;
        let root = self.sources[source_index].root;
        let complete = self.try_complete_ctx(root, phase)?;
        self.process_events()?;

        if complete {
            debug!(
                "source {} finished phase {phase}",
                self.sources[source_index].name
            );
            Ok(PhaseProgress::Finished)
        } else if self.progress > before {
            Ok(PhaseProgress::Progress)
        } else {
            Ok(PhaseProgress::NoProgress)
        }
    }

    fn try_complete_ctx(&mut self, id: CtxId, phase: ModelProcessingPhase) -> Result<bool> {
        if self.ctx(id).is_phase_complete(phase) {
            return Ok(true);
        }

        if !self.ctx(id).callbacks_run.get(&phase).copied().unwrap_or(false) {
            self.ctx_mut(id).callbacks_run.insert(phase, true);
            self.run_phase_callback(id, phase)?;
        }

        let mut all_children_done = true;
        let mut i = 0;
        while let Some(child) = self.nth_substatement(id, i) {
            i += 1;
            if !self.try_complete_ctx(child, phase)? {
                all_children_done = false;
            }
        }

        if !all_children_done || self.ctx(id).pending_mutations(phase) > 0 {
            return Ok(false);
        }

        self.ctx_mut(id).completed_phase = phase;
        self.progress += 1;
        self.events.push_back(Event::PhaseCompleted(id));
        trace!("{:?} completed {phase}", self.ctx(id));
        Ok(true)
    }

    fn run_phase_callback(&mut self, id: CtxId, phase: ModelProcessingPhase) -> Result<()> {
        if !self.ctx(id).supported {
            return Ok(());
        }
        let kind = self.ctx(id).kind;
        let bundle = Arc::clone(&self.bundle);
        let support = bundle.support_for(kind);

        match phase {
            ModelProcessingPhase::SourcePreLinkage => support.on_pre_linkage_declared(self, id),
            ModelProcessingPhase::SourceLinkage => support.on_linkage_declared(self, id),
            ModelProcessingPhase::StatementDefinition => {
                let arg = support.parse_argument(self, id)?;
                self.ctx_mut(id).arg = arg;
                Ok(())
            }
            ModelProcessingPhase::FullDeclaration => {
                if let Some(validator) = support.validator() {
                    let kinds: Vec<StatementKind> = self
                        .ctx(id)
                        .declared
                        .iter()
                        .map(|c| self.ctx(*c).kind)
                        .collect();
                    let reference = self.ctx(id).reference.clone();
                    validator.validate(kind, &kinds, &reference)?;
                }
                support.on_full_definition_declared(self, id)
            }
            ModelProcessingPhase::Init | ModelProcessingPhase::EffectiveModel => Ok(()),
        }
    }

    /// Converts every unapplied action of a source into its inference
    /// error, consuming the actions.
    pub fn fail_modifiers(
        &mut self,
        source_index: usize,
        phase: ModelProcessingPhase,
    ) -> Vec<InferenceError> {
        let mut causes = Vec::new();
        for action in &mut self.actions {
            if action.applied
                || action.source_index != source_index
                || action.phase.execution_order() > phase.execution_order()
            {
                continue;
            }
            action.apply = None;
            causes.push(InferenceError {
                message: action.fail_message.clone(),
                reference: action.fail_reference.clone(),
            });
        }
        causes
    }

    /// Returns true if any unapplied action remains at or before `phase`
    /// for the given source.
    #[must_use]
    pub fn has_pending_actions(&self, source_index: usize, phase: ModelProcessingPhase) -> bool {
        self.actions.iter().any(|a| {
            !a.applied
                && a.apply.is_some()
                && a.source_index == source_index
                && a.phase.execution_order() <= phase.execution_order()
        })
    }
}
