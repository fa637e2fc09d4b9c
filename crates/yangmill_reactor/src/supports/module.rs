//! Supports for module and submodule structure statements.

use std::str::FromStr;

use yangmill_foundation::{Error, QNameModule, Result, Revision, SourceId, XmlNamespace};
use yangmill_model::{Arg, StatementKind, YangVersion};

use crate::context::CtxId;
use crate::namespace::{NamespaceId, NamespaceKey, NamespaceValue};
use crate::session::BuildSession;
use crate::support::StatementSupport;
use crate::validator::SubstatementValidator;

fn body_validator(validator: SubstatementValidator) -> SubstatementValidator {
    validator
        .any(StatementKind::Revision)
        .any(StatementKind::Organization)
        .any(StatementKind::Contact)
        .optional(StatementKind::Description)
        .optional(StatementKind::Reference)
        .any(StatementKind::Typedef)
        .any(StatementKind::Grouping)
        .any(StatementKind::Container)
        .any(StatementKind::Leaf)
        .any(StatementKind::LeafList)
        .any(StatementKind::List)
        .any(StatementKind::Choice)
        .any(StatementKind::Uses)
        .any(StatementKind::Augment)
        .any(StatementKind::Identity)
        .any(StatementKind::Feature)
        .any(StatementKind::Rpc)
        .any(StatementKind::Extension)
}

/// Reads the declared revisions of a root statement, newest first.
fn declared_revisions(session: &BuildSession, root: CtxId) -> Result<Vec<Revision>> {
    let mut revisions = Vec::new();
    for child in &session.ctx(root).declared {
        let ctx = session.ctx(*child);
        if ctx.kind != StatementKind::Revision {
            continue;
        }
        let raw = ctx.raw_arg.clone().ok_or_else(|| {
            Error::source("revision requires a date argument", ctx.reference.clone())
        })?;
        revisions.push(Revision::new(raw.as_ref()).map_err(|e| e.at(ctx.reference.clone()))?);
    }
    revisions.sort();
    revisions.reverse();
    Ok(revisions)
}

// =============================================================================
// module
// =============================================================================

pub(crate) struct ModuleSupport {
    validator: SubstatementValidator,
}

impl ModuleSupport {
    pub(crate) fn new() -> Self {
        Self {
            validator: body_validator(
                SubstatementValidator::new()
                    .optional(StatementKind::YangVersion)
                    .mandatory(StatementKind::Namespace)
                    .mandatory(StatementKind::Prefix)
                    .any(StatementKind::Import)
                    .any(StatementKind::Include),
            ),
        }
    }
}

impl StatementSupport for ModuleSupport {
    fn kind(&self) -> StatementKind {
        StatementKind::Module
    }

    fn validator(&self) -> Option<&SubstatementValidator> {
        Some(&self.validator)
    }

    fn parse_argument(&self, session: &mut BuildSession, ctx: CtxId) -> Result<Arg> {
        let reference = session.ctx(ctx).reference.clone();
        let raw = session.ctx(ctx).raw_arg.clone().ok_or_else(|| {
            Error::source("module requires a name argument", reference.clone())
        })?;
        Ok(Arg::Identifier(raw))
    }

    fn on_pre_linkage_declared(&self, session: &mut BuildSession, ctx: CtxId) -> Result<()> {
        let reference = session.ctx(ctx).reference.clone();
        let name = session.ctx(ctx).raw_arg.clone().ok_or_else(|| {
            Error::source("module requires a name argument", reference.clone())
        })?;
        session.add_to_namespace(
            ctx,
            NamespaceId::PreLinkageModuleByName,
            NamespaceKey::str(&name),
            NamespaceValue::Ctx(ctx),
            reference,
            &format!("module \"{name}\""),
        )
    }

    fn on_linkage_declared(&self, session: &mut BuildSession, ctx: CtxId) -> Result<()> {
        let reference = session.ctx(ctx).reference.clone();
        let name = session.ctx(ctx).raw_arg.clone().ok_or_else(|| {
            Error::source("module requires a name argument", reference.clone())
        })?;

        let namespace_raw = session
            .find_substatement_arg(ctx, StatementKind::Namespace)
            .ok_or_else(|| {
                Error::source(
                    format!("module \"{name}\" is missing its namespace statement"),
                    reference.clone(),
                )
            })?;
        let namespace =
            XmlNamespace::new(namespace_raw.as_ref()).map_err(|e| e.at(reference.clone()))?;

        let revisions = declared_revisions(session, ctx)?;
        let module_id = QNameModule::new(namespace, revisions.first().cloned());

        let yang_version = match session.find_substatement_arg(ctx, StatementKind::YangVersion) {
            Some(raw) => {
                YangVersion::from_str(raw.as_ref()).map_err(|e| e.at(reference.clone()))?
            }
            None => YangVersion::default(),
        };

        {
            let root = session.ctx_mut(ctx);
            root.module_id = Some(module_id.clone());
            root.yang_version = yang_version;
        }

        session.add_to_namespace(
            ctx,
            NamespaceId::ModuleByName,
            NamespaceKey::str(&name),
            NamespaceValue::Ctx(ctx),
            reference.clone(),
            &format!("module \"{name}\""),
        )?;
        session.add_to_namespace(
            ctx,
            NamespaceId::ModuleByNamespace,
            NamespaceKey::Module(module_id.clone()),
            NamespaceValue::Ctx(ctx),
            reference.clone(),
            &format!("module namespace {module_id}"),
        )?;
        session.add_to_namespace(
            ctx,
            NamespaceId::ModuleBySourceId,
            NamespaceKey::SourceId(SourceId::new(&name, module_id.revision.clone())),
            NamespaceValue::Ctx(ctx),
            reference.clone(),
            &format!("module source {name}"),
        )?;

        let prefix = session
            .find_substatement_arg(ctx, StatementKind::Prefix)
            .ok_or_else(|| {
                Error::source(
                    format!("module \"{name}\" is missing its prefix statement"),
                    reference.clone(),
                )
            })?;
        session.add_to_namespace(
            ctx,
            NamespaceId::PrefixToModule,
            NamespaceKey::str(&prefix),
            NamespaceValue::Ctx(ctx),
            reference,
            &format!("prefix \"{prefix}\""),
        )
    }
}

// =============================================================================
// submodule
// =============================================================================

pub(crate) struct SubmoduleSupport {
    validator: SubstatementValidator,
}

impl SubmoduleSupport {
    pub(crate) fn new() -> Self {
        Self {
            validator: body_validator(
                SubstatementValidator::new()
                    .optional(StatementKind::YangVersion)
                    .mandatory(StatementKind::BelongsTo)
                    .any(StatementKind::Import)
                    .any(StatementKind::Include),
            ),
        }
    }
}

impl StatementSupport for SubmoduleSupport {
    fn kind(&self) -> StatementKind {
        StatementKind::Submodule
    }

    fn validator(&self) -> Option<&SubstatementValidator> {
        Some(&self.validator)
    }

    fn parse_argument(&self, session: &mut BuildSession, ctx: CtxId) -> Result<Arg> {
        let reference = session.ctx(ctx).reference.clone();
        let raw = session.ctx(ctx).raw_arg.clone().ok_or_else(|| {
            Error::source("submodule requires a name argument", reference)
        })?;
        Ok(Arg::Identifier(raw))
    }

    fn on_pre_linkage_declared(&self, session: &mut BuildSession, ctx: CtxId) -> Result<()> {
        let reference = session.ctx(ctx).reference.clone();
        let name = session.ctx(ctx).raw_arg.clone().ok_or_else(|| {
            Error::source("submodule requires a name argument", reference.clone())
        })?;
        session.add_to_namespace(
            ctx,
            NamespaceId::SubmoduleByName,
            NamespaceKey::str(&name),
            NamespaceValue::Ctx(ctx),
            reference,
            &format!("submodule \"{name}\""),
        )
    }
}

// =============================================================================
// Small structural statements
// =============================================================================

pub(crate) struct YangVersionSupport;

impl StatementSupport for YangVersionSupport {
    fn kind(&self) -> StatementKind {
        StatementKind::YangVersion
    }

    fn parse_argument(&self, session: &mut BuildSession, ctx: CtxId) -> Result<Arg> {
        let reference = session.ctx(ctx).reference.clone();
        let raw = session.ctx(ctx).raw_arg.clone().ok_or_else(|| {
            Error::source("yang-version requires an argument", reference.clone())
        })?;
        let version = YangVersion::from_str(raw.as_ref()).map_err(|e| e.at(reference))?;
        Ok(Arg::Version(version))
    }
}

pub(crate) struct NamespaceSupport;

impl StatementSupport for NamespaceSupport {
    fn kind(&self) -> StatementKind {
        StatementKind::Namespace
    }

    fn parse_argument(&self, session: &mut BuildSession, ctx: CtxId) -> Result<Arg> {
        let reference = session.ctx(ctx).reference.clone();
        let raw = session.ctx(ctx).raw_arg.clone().ok_or_else(|| {
            Error::source("namespace requires a URI argument", reference.clone())
        })?;
        let namespace = XmlNamespace::new(raw.as_ref()).map_err(|e| e.at(reference))?;
        Ok(Arg::Namespace(namespace))
    }
}

pub(crate) struct PrefixSupport;

impl StatementSupport for PrefixSupport {
    fn kind(&self) -> StatementKind {
        StatementKind::Prefix
    }

    fn parse_argument(&self, session: &mut BuildSession, ctx: CtxId) -> Result<Arg> {
        let reference = session.ctx(ctx).reference.clone();
        let raw = session.ctx(ctx).raw_arg.clone().ok_or_else(|| {
            Error::source("prefix requires an argument", reference)
        })?;
        Ok(Arg::Identifier(raw))
    }
}

pub(crate) struct RevisionSupport;

impl StatementSupport for RevisionSupport {
    fn kind(&self) -> StatementKind {
        StatementKind::Revision
    }

    fn parse_argument(&self, session: &mut BuildSession, ctx: CtxId) -> Result<Arg> {
        let reference = session.ctx(ctx).reference.clone();
        let raw = session.ctx(ctx).raw_arg.clone().ok_or_else(|| {
            Error::source("revision requires a date argument", reference.clone())
        })?;
        let revision = Revision::new(raw.as_ref()).map_err(|e| e.at(reference))?;
        Ok(Arg::Revision(revision))
    }
}

pub(crate) struct RevisionDateSupport;

impl StatementSupport for RevisionDateSupport {
    fn kind(&self) -> StatementKind {
        StatementKind::RevisionDate
    }

    fn parse_argument(&self, session: &mut BuildSession, ctx: CtxId) -> Result<Arg> {
        let reference = session.ctx(ctx).reference.clone();
        let raw = session.ctx(ctx).raw_arg.clone().ok_or_else(|| {
            Error::source("revision-date requires a date argument", reference.clone())
        })?;
        let revision = Revision::new(raw.as_ref()).map_err(|e| e.at(reference))?;
        Ok(Arg::Revision(revision))
    }
}
