//! Supports for reuse statements: `grouping`, `uses`, `augment`.
//!
//! `uses` and `augment` are the statements that inject schema-tree
//! children into nodes defined elsewhere; both are expressed as
//! inference actions so that forward and cross-module references resolve
//! regardless of source order.

use yangmill_foundation::{Error, QName, Result};
use yangmill_model::{Arg, StatementKind};

use crate::action::InferenceAction;
use crate::context::{CopyType, CtxId};
use crate::namespace::{NamespaceId, NamespaceKey};
use crate::phase::ModelProcessingPhase;
use crate::session::BuildSession;
use crate::support::StatementSupport;
use crate::validator::SubstatementValidator;

/// Resolves the context whose subtree a cross-module reference should be
/// looked up in: the defining module's root for foreign names, the
/// referencing statement itself otherwise.
pub(crate) fn reference_scope(session: &mut BuildSession, ctx: CtxId, qname: &QName) -> Result<CtxId> {
    let current = session.current_module_id(ctx)?;
    if qname.module == current {
        return Ok(ctx);
    }
    let key = NamespaceKey::Module(qname.module.clone());
    session
        .get_from_namespace(ctx, NamespaceId::ModuleByNamespace, &key)
        .map(|value| value.ctx())
        .ok_or_else(|| {
            Error::verify(format!(
                "reference {qname} names a module that passed linkage but is not registered"
            ))
        })
}

/// Returns the schema-tree statement children of a context, declared and
/// effective alike.
fn schema_children(session: &BuildSession, ctx: CtxId) -> Vec<CtxId> {
    session
        .ctx(ctx)
        .all_substatements()
        .filter(|id| session.ctx(*id).kind.is_schema_tree())
        .collect()
}

// =============================================================================
// grouping
// =============================================================================

pub(crate) struct GroupingSupport {
    validator: SubstatementValidator,
}

impl GroupingSupport {
    pub(crate) fn new() -> Self {
        Self {
            validator: SubstatementValidator::new()
                .optional(StatementKind::Status)
                .optional(StatementKind::Description)
                .optional(StatementKind::Reference)
                .any(StatementKind::Typedef)
                .any(StatementKind::Grouping)
                .any(StatementKind::Container)
                .any(StatementKind::Leaf)
                .any(StatementKind::LeafList)
                .any(StatementKind::List)
                .any(StatementKind::Choice)
                .any(StatementKind::Uses),
        }
    }
}

impl StatementSupport for GroupingSupport {
    fn kind(&self) -> StatementKind {
        StatementKind::Grouping
    }

    fn validator(&self) -> Option<&SubstatementValidator> {
        Some(&self.validator)
    }

    fn parse_argument(&self, session: &mut BuildSession, ctx: CtxId) -> Result<Arg> {
        Ok(Arg::QName(session.node_qname(ctx)?))
    }

    fn on_full_definition_declared(&self, session: &mut BuildSession, ctx: CtxId) -> Result<()> {
        let Some(parent) = session.ctx(ctx).parent else {
            return Ok(());
        };
        let Arg::QName(qname) = session.ctx(ctx).arg.clone() else {
            return Err(Error::verify(
                "grouping reached full declaration without a parsed name",
            ));
        };
        let reference = session.ctx(ctx).reference.clone();
        session.add_to_namespace(
            parent,
            NamespaceId::GroupingByQName,
            NamespaceKey::QName(qname.clone()),
            crate::namespace::NamespaceValue::Ctx(ctx),
            reference,
            &format!("grouping {qname}"),
        )
    }
}

// =============================================================================
// uses
// =============================================================================

pub(crate) struct UsesSupport {
    validator: SubstatementValidator,
}

impl UsesSupport {
    pub(crate) fn new() -> Self {
        Self {
            validator: SubstatementValidator::new()
                .optional(StatementKind::Status)
                .optional(StatementKind::Description)
                .optional(StatementKind::Reference)
                .optional(StatementKind::When)
                .any(StatementKind::IfFeature),
        }
    }
}

impl StatementSupport for UsesSupport {
    fn kind(&self) -> StatementKind {
        StatementKind::Uses
    }

    fn validator(&self) -> Option<&SubstatementValidator> {
        Some(&self.validator)
    }

    fn parse_argument(&self, session: &mut BuildSession, ctx: CtxId) -> Result<Arg> {
        let reference = session.ctx(ctx).reference.clone();
        let raw = session.ctx(ctx).raw_arg.clone().ok_or_else(|| {
            Error::source("uses requires a grouping name argument", reference)
        })?;
        Ok(Arg::QName(session.parse_reference_qname(ctx, &raw)?))
    }

    fn on_full_definition_declared(&self, session: &mut BuildSession, ctx: CtxId) -> Result<()> {
        let reference = session.ctx(ctx).reference.clone();
        let Arg::QName(grouping_name) = session.ctx(ctx).arg.clone() else {
            return Err(Error::verify(
                "uses reached full declaration without a parsed grouping name",
            ));
        };
        let Some(parent) = session.ctx(ctx).parent else {
            return Err(Error::source(
                "uses cannot appear as a root statement",
                reference,
            ));
        };
        let target_module = session.current_module_id(ctx)?;
        let scope = reference_scope(session, ctx, &grouping_name)?;

        let mut action = InferenceAction::new(
            ModelProcessingPhase::FullDeclaration,
            format!("grouping {grouping_name} referenced by uses was not found"),
            reference.clone(),
        );
        // The grouping must have fully declared so that its own nested
        // `uses` expansions are already part of its subtree.
        let grouping = action.require_namespace_item_at(
            scope,
            NamespaceId::GroupingByQName,
            NamespaceKey::QName(grouping_name),
            ModelProcessingPhase::FullDeclaration,
        );
        action.mutates(parent, ModelProcessingPhase::FullDeclaration);

        session.register_action(
            ctx,
            action,
            Box::new(move |session, resolved| {
                let grouping_ctx = resolved.ctx(grouping);
                for child in schema_children(session, grouping_ctx) {
                    let copy = session.copy_subtree(
                        child,
                        parent,
                        Some(&target_module),
                        CopyType::AddedByUses,
                        ModelProcessingPhase::FullDeclaration,
                    )?;
                    let Arg::QName(child_name) = session.ctx(copy).arg.clone() else {
                        continue;
                    };
                    session.register_schema_child(parent, copy, child_name)?;
                }
                Ok(())
            }),
        )
    }
}

// =============================================================================
// augment
// =============================================================================

pub(crate) struct AugmentSupport {
    validator: SubstatementValidator,
}

impl AugmentSupport {
    pub(crate) fn new() -> Self {
        Self {
            validator: SubstatementValidator::new()
                .optional(StatementKind::Status)
                .optional(StatementKind::Description)
                .optional(StatementKind::Reference)
                .optional(StatementKind::When)
                .any(StatementKind::IfFeature)
                .any(StatementKind::Case)
                .any(StatementKind::Container)
                .any(StatementKind::Leaf)
                .any(StatementKind::LeafList)
                .any(StatementKind::List)
                .any(StatementKind::Choice)
                .any(StatementKind::Uses),
        }
    }
}

impl StatementSupport for AugmentSupport {
    fn kind(&self) -> StatementKind {
        StatementKind::Augment
    }

    fn validator(&self) -> Option<&SubstatementValidator> {
        Some(&self.validator)
    }

    fn parse_argument(&self, session: &mut BuildSession, ctx: CtxId) -> Result<Arg> {
        let reference = session.ctx(ctx).reference.clone();
        let raw = session.ctx(ctx).raw_arg.clone().ok_or_else(|| {
            Error::source("augment requires a target path argument", reference.clone())
        })?;
        let Some(path) = raw.strip_prefix('/') else {
            return Err(Error::source(
                format!("augment target \"{raw}\" must be an absolute schema path"),
                reference,
            ));
        };
        let mut steps = Vec::new();
        for step in path.split('/') {
            if step.is_empty() {
                return Err(Error::source(
                    format!("augment target \"{raw}\" has an empty path step"),
                    reference,
                ));
            }
            steps.push(session.parse_reference_qname(ctx, step)?);
        }
        Ok(Arg::QNames(steps.into_boxed_slice()))
    }

    fn on_full_definition_declared(&self, session: &mut BuildSession, ctx: CtxId) -> Result<()> {
        let reference = session.ctx(ctx).reference.clone();
        let raw = session.ctx(ctx).raw_arg.clone().unwrap_or_else(|| "?".into());
        let Arg::QNames(steps) = session.ctx(ctx).arg.clone() else {
            return Err(Error::verify(
                "augment reached full declaration without a parsed target path",
            ));
        };
        let augmenting_module = session.current_module_id(ctx)?;
        // The path walks downward, so resolution starts at the target
        // module's root: the local root for same-module targets, the
        // imported module's root otherwise.
        let scope = if steps[0].module == augmenting_module {
            session.ctx(ctx).root
        } else {
            reference_scope(session, ctx, &steps[0])?
        };

        let mut action = InferenceAction::new(
            ModelProcessingPhase::EffectiveModel,
            format!("augment target path \"{raw}\" could not be resolved"),
            reference.clone(),
        );
        let target = action.require_schema_path(scope, steps.to_vec());

        session.register_action(
            ctx,
            action,
            Box::new(move |session, resolved| {
                let target_ctx = resolved.ctx(target);
                for child in schema_children(session, ctx) {
                    let copy = session.copy_subtree(
                        child,
                        target_ctx,
                        None,
                        CopyType::AddedByAugmentation,
                        ModelProcessingPhase::FullDeclaration,
                    )?;
                    let Arg::QName(child_name) = session.ctx(copy).arg.clone() else {
                        continue;
                    };
                    session.register_schema_child(target_ctx, copy, child_name)?;
                }
                session
                    .ctx_mut(target_ctx)
                    .augmented_by
                    .push(augmenting_module);
                Ok(())
            }),
        )
    }
}
