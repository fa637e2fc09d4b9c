//! Supports for cross-source linkage: `import`, `include`, `belongs-to`.
//!
//! These are the statements whose resolution is genuinely deferred: the
//! target source may appear anywhere in the input set, so each registers
//! an inference action and lets the reactor's fixed point find the
//! moment the target becomes visible.

use yangmill_foundation::{Error, Result, Revision, SourceId};
use yangmill_model::{Arg, StatementKind};

use crate::action::InferenceAction;
use crate::context::{CopyType, CtxId};
use crate::namespace::{NamespaceId, NamespaceKey, NamespaceValue};
use crate::phase::ModelProcessingPhase;
use crate::session::BuildSession;
use crate::support::StatementSupport;
use crate::validator::SubstatementValidator;

// =============================================================================
// import
// =============================================================================

pub(crate) struct ImportSupport {
    validator: SubstatementValidator,
}

impl ImportSupport {
    pub(crate) fn new() -> Self {
        Self {
            validator: SubstatementValidator::new()
                .mandatory(StatementKind::Prefix)
                .optional(StatementKind::RevisionDate)
                .optional(StatementKind::Description)
                .optional(StatementKind::Reference),
        }
    }
}

impl StatementSupport for ImportSupport {
    fn kind(&self) -> StatementKind {
        StatementKind::Import
    }

    fn validator(&self) -> Option<&SubstatementValidator> {
        Some(&self.validator)
    }

    fn parse_argument(&self, session: &mut BuildSession, ctx: CtxId) -> Result<Arg> {
        let reference = session.ctx(ctx).reference.clone();
        let raw = session.ctx(ctx).raw_arg.clone().ok_or_else(|| {
            Error::source("import requires a module name argument", reference)
        })?;
        Ok(Arg::Identifier(raw))
    }

    fn on_linkage_declared(&self, session: &mut BuildSession, ctx: CtxId) -> Result<()> {
        let reference = session.ctx(ctx).reference.clone();
        let name = session.ctx(ctx).raw_arg.clone().ok_or_else(|| {
            Error::source("import requires a module name argument", reference.clone())
        })?;
        let prefix = session
            .find_substatement_arg(ctx, StatementKind::Prefix)
            .ok_or_else(|| {
                Error::source(
                    format!("import of \"{name}\" is missing its prefix statement"),
                    reference.clone(),
                )
            })?;

        // A revision-date pins the exact source; otherwise any revision
        // of the named module satisfies the import.
        let key = match session.find_substatement_arg(ctx, StatementKind::RevisionDate) {
            Some(raw) => {
                let revision =
                    Revision::new(raw.as_ref()).map_err(|e| e.at(reference.clone()))?;
                NamespaceKey::SourceId(SourceId::new(name.as_ref(), Some(revision)))
            }
            None => NamespaceKey::str(&name),
        };
        let namespace = match &key {
            NamespaceKey::SourceId(_) => NamespaceId::ModuleBySourceId,
            _ => NamespaceId::ModuleByName,
        };

        let mut action = InferenceAction::new(
            ModelProcessingPhase::SourceLinkage,
            format!("imported module \"{name}\" was not found"),
            reference.clone(),
        );
        let target = action.require_namespace_item(ctx, namespace, key);

        let prefix_for_apply = prefix.clone();
        let name_for_apply = name.clone();
        session.register_action(
            ctx,
            action,
            Box::new(move |session, resolved| {
                let module_ctx = resolved.ctx(target);
                session.add_to_namespace(
                    ctx,
                    NamespaceId::PrefixToModule,
                    NamespaceKey::str(&prefix_for_apply),
                    NamespaceValue::Ctx(module_ctx),
                    reference.clone(),
                    &format!("prefix \"{prefix_for_apply}\""),
                )?;
                session.add_to_namespace(
                    ctx,
                    NamespaceId::ImportedModuleByName,
                    NamespaceKey::str(&name_for_apply),
                    NamespaceValue::Ctx(module_ctx),
                    reference.clone(),
                    &format!("import of module \"{name_for_apply}\""),
                )
            }),
        )
    }
}

// =============================================================================
// include
// =============================================================================

/// Statement kinds that stay behind when a submodule's body is spliced
/// into its including module.
const SUBMODULE_HEADER: &[StatementKind] = &[
    StatementKind::BelongsTo,
    StatementKind::YangVersion,
    StatementKind::Revision,
    StatementKind::Organization,
    StatementKind::Contact,
    StatementKind::Description,
    StatementKind::Reference,
    StatementKind::Import,
    StatementKind::Include,
];

pub(crate) struct IncludeSupport {
    validator: SubstatementValidator,
}

impl IncludeSupport {
    pub(crate) fn new() -> Self {
        Self {
            validator: SubstatementValidator::new()
                .optional(StatementKind::RevisionDate)
                .optional(StatementKind::Description)
                .optional(StatementKind::Reference),
        }
    }
}

impl StatementSupport for IncludeSupport {
    fn kind(&self) -> StatementKind {
        StatementKind::Include
    }

    fn validator(&self) -> Option<&SubstatementValidator> {
        Some(&self.validator)
    }

    fn parse_argument(&self, session: &mut BuildSession, ctx: CtxId) -> Result<Arg> {
        let reference = session.ctx(ctx).reference.clone();
        let raw = session.ctx(ctx).raw_arg.clone().ok_or_else(|| {
            Error::source("include requires a submodule name argument", reference)
        })?;
        Ok(Arg::Identifier(raw))
    }

    fn on_linkage_declared(&self, session: &mut BuildSession, ctx: CtxId) -> Result<()> {
        let reference = session.ctx(ctx).reference.clone();
        let name = session.ctx(ctx).raw_arg.clone().ok_or_else(|| {
            Error::source("include requires a submodule name argument", reference.clone())
        })?;
        let module_root = session.ctx(ctx).root;
        let module_name = session
            .ctx(module_root)
            .raw_arg
            .clone()
            .unwrap_or_else(|| "?".into());

        let mut action = InferenceAction::new(
            ModelProcessingPhase::SourceLinkage,
            format!("included submodule \"{name}\" was not found"),
            reference.clone(),
        );
        let target = action.require_namespace_item(
            ctx,
            NamespaceId::SubmoduleByName,
            NamespaceKey::str(&name),
        );

        session.register_action(
            ctx,
            action,
            Box::new(move |session, resolved| {
                let submodule = resolved.ctx(target);
                let belongs_to = session
                    .find_substatement_arg(submodule, StatementKind::BelongsTo)
                    .unwrap_or_else(|| "?".into());
                if belongs_to.as_ref() != module_name.as_ref() {
                    return Err(Error::source(
                        format!(
                            "submodule \"{name}\" belongs to \"{belongs_to}\", not \"{module_name}\""
                        ),
                        reference.clone(),
                    ));
                }

                let body: Vec<CtxId> = session
                    .ctx(submodule)
                    .declared
                    .iter()
                    .copied()
                    .filter(|id| !SUBMODULE_HEADER.contains(&session.ctx(*id).kind))
                    .collect();
                for child in body {
                    session.copy_subtree(
                        child,
                        module_root,
                        None,
                        CopyType::Original,
                        ModelProcessingPhase::SourcePreLinkage,
                    )?;
                }
                Ok(())
            }),
        )
    }
}

// =============================================================================
// belongs-to
// =============================================================================

pub(crate) struct BelongsToSupport {
    validator: SubstatementValidator,
}

impl BelongsToSupport {
    pub(crate) fn new() -> Self {
        Self {
            validator: SubstatementValidator::new().mandatory(StatementKind::Prefix),
        }
    }
}

impl StatementSupport for BelongsToSupport {
    fn kind(&self) -> StatementKind {
        StatementKind::BelongsTo
    }

    fn validator(&self) -> Option<&SubstatementValidator> {
        Some(&self.validator)
    }

    fn parse_argument(&self, session: &mut BuildSession, ctx: CtxId) -> Result<Arg> {
        let reference = session.ctx(ctx).reference.clone();
        let raw = session.ctx(ctx).raw_arg.clone().ok_or_else(|| {
            Error::source("belongs-to requires a module name argument", reference)
        })?;
        Ok(Arg::Identifier(raw))
    }

    fn on_linkage_declared(&self, session: &mut BuildSession, ctx: CtxId) -> Result<()> {
        let reference = session.ctx(ctx).reference.clone();
        let name = session.ctx(ctx).raw_arg.clone().ok_or_else(|| {
            Error::source("belongs-to requires a module name argument", reference.clone())
        })?;
        let prefix = session
            .find_substatement_arg(ctx, StatementKind::Prefix)
            .ok_or_else(|| {
                Error::source(
                    "belongs-to is missing its prefix statement",
                    reference.clone(),
                )
            })?;
        let submodule_root = session.ctx(ctx).root;
        let submodule_name = session
            .ctx(submodule_root)
            .raw_arg
            .clone()
            .unwrap_or_else(|| "?".into());

        let mut action = InferenceAction::new(
            ModelProcessingPhase::SourceLinkage,
            format!(
                "module \"{name}\" to which submodule \"{submodule_name}\" belongs was not found"
            ),
            reference.clone(),
        );
        let target = action.require_namespace_item(
            ctx,
            NamespaceId::ModuleByName,
            NamespaceKey::str(&name),
        );

        session.register_action(
            ctx,
            action,
            Box::new(move |session, resolved| {
                let module_ctx = resolved.ctx(target);
                // The submodule shares the identity of its module.
                let module_id = session.ctx(module_ctx).module_id.clone().ok_or_else(|| {
                    Error::verify(format!(
                        "module \"{name}\" registered before its identity resolved"
                    ))
                })?;
                session.ctx_mut(submodule_root).module_id = Some(module_id);
                session.add_to_namespace(
                    ctx,
                    NamespaceId::PrefixToModule,
                    NamespaceKey::str(&prefix),
                    NamespaceValue::Ctx(module_ctx),
                    reference.clone(),
                    &format!("prefix \"{prefix}\""),
                )
            }),
        )
    }
}
