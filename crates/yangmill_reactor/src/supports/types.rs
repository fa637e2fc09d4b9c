//! Supports for type, identity, feature, and extension statements.

use yangmill_foundation::{Error, Result};
use yangmill_model::{Arg, BuiltinType, StatementKind};

use crate::action::InferenceAction;
use crate::context::{CopyType, CtxId};
use crate::namespace::{NamespaceId, NamespaceKey, NamespaceValue};
use crate::phase::ModelProcessingPhase;
use crate::session::BuildSession;
use crate::support::StatementSupport;
use crate::validator::SubstatementValidator;

use super::grouping::reference_scope;

// =============================================================================
// typedef
// =============================================================================

pub(crate) struct TypedefSupport {
    validator: SubstatementValidator,
}

impl TypedefSupport {
    pub(crate) fn new() -> Self {
        Self {
            validator: SubstatementValidator::new()
                .mandatory(StatementKind::Type)
                .optional(StatementKind::Default)
                .optional(StatementKind::Units)
                .optional(StatementKind::Status)
                .optional(StatementKind::Description)
                .optional(StatementKind::Reference),
        }
    }
}

impl StatementSupport for TypedefSupport {
    fn kind(&self) -> StatementKind {
        StatementKind::Typedef
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
                "typedef reached full declaration without a parsed name",
            ));
        };
        let reference = session.ctx(ctx).reference.clone();
        session.add_to_namespace(
            parent,
            NamespaceId::TypedefByQName,
            NamespaceKey::QName(qname.clone()),
            NamespaceValue::Ctx(ctx),
            reference,
            &format!("typedef {qname}"),
        )
    }
}

// =============================================================================
// type
// =============================================================================

pub(crate) struct TypeSupport {
    validator: SubstatementValidator,
}

impl TypeSupport {
    pub(crate) fn new() -> Self {
        Self {
            validator: SubstatementValidator::new()
                .optional(StatementKind::FractionDigits)
                .optional(StatementKind::Path)
                .optional(StatementKind::Range)
                .optional(StatementKind::Length)
                .any(StatementKind::Pattern)
                .any(StatementKind::Enum)
                .any(StatementKind::Base)
                .any(StatementKind::Type),
        }
    }
}

impl StatementSupport for TypeSupport {
    fn kind(&self) -> StatementKind {
        StatementKind::Type
    }

    fn validator(&self) -> Option<&SubstatementValidator> {
        Some(&self.validator)
    }

    fn parse_argument(&self, session: &mut BuildSession, ctx: CtxId) -> Result<Arg> {
        let reference = session.ctx(ctx).reference.clone();
        let raw = session.ctx(ctx).raw_arg.clone().ok_or_else(|| {
            Error::source("type requires a name argument", reference)
        })?;
        if BuiltinType::from_name(&raw).is_some() {
            return Ok(Arg::Identifier(raw));
        }
        Ok(Arg::QName(session.parse_reference_qname(ctx, &raw)?))
    }

    fn on_full_definition_declared(&self, session: &mut BuildSession, ctx: CtxId) -> Result<()> {
        // Built-in types need no resolution; derived types must name a
        // reachable typedef.
        let Arg::QName(type_name) = session.ctx(ctx).arg.clone() else {
            return Ok(());
        };
        if session.ctx(ctx).origin.is_some() {
            return Ok(());
        }
        let reference = session.ctx(ctx).reference.clone();
        let scope = reference_scope(session, ctx, &type_name)?;

        let mut action = InferenceAction::new(
            ModelProcessingPhase::FullDeclaration,
            format!("type {type_name} was not found"),
            reference,
        );
        action.require_namespace_item(scope, NamespaceId::TypedefByQName, NamespaceKey::QName(type_name));
        session.register_action(ctx, action, Box::new(|_, _| Ok(())))
    }
}

// =============================================================================
// identity / base
// =============================================================================

pub(crate) struct IdentitySupport {
    validator: SubstatementValidator,
}

impl IdentitySupport {
    pub(crate) fn new() -> Self {
        Self {
            validator: SubstatementValidator::new()
                .any(StatementKind::Base)
                .any(StatementKind::IfFeature)
                .optional(StatementKind::Status)
                .optional(StatementKind::Description)
                .optional(StatementKind::Reference),
        }
    }
}

impl StatementSupport for IdentitySupport {
    fn kind(&self) -> StatementKind {
        StatementKind::Identity
    }

    fn validator(&self) -> Option<&SubstatementValidator> {
        Some(&self.validator)
    }

    fn parse_argument(&self, session: &mut BuildSession, ctx: CtxId) -> Result<Arg> {
        Ok(Arg::QName(session.node_qname(ctx)?))
    }

    fn on_full_definition_declared(&self, session: &mut BuildSession, ctx: CtxId) -> Result<()> {
        // Global namespaces register from original declarations only;
        // include-splices would otherwise register the same QName twice.
        if session.ctx(ctx).copy_type != CopyType::Original || session.ctx(ctx).origin.is_some() {
            return Ok(());
        }
        let Arg::QName(qname) = session.ctx(ctx).arg.clone() else {
            return Err(Error::verify(
                "identity reached full declaration without a parsed name",
            ));
        };
        let reference = session.ctx(ctx).reference.clone();
        session.add_to_namespace(
            ctx,
            NamespaceId::IdentityByQName,
            NamespaceKey::QName(qname.clone()),
            NamespaceValue::Ctx(ctx),
            reference,
            &format!("identity {qname}"),
        )
    }
}

pub(crate) struct BaseSupport;

impl StatementSupport for BaseSupport {
    fn kind(&self) -> StatementKind {
        StatementKind::Base
    }

    fn parse_argument(&self, session: &mut BuildSession, ctx: CtxId) -> Result<Arg> {
        let reference = session.ctx(ctx).reference.clone();
        let raw = session.ctx(ctx).raw_arg.clone().ok_or_else(|| {
            Error::source("base requires an identity name argument", reference)
        })?;
        Ok(Arg::QName(session.parse_reference_qname(ctx, &raw)?))
    }

    fn on_full_definition_declared(&self, session: &mut BuildSession, ctx: CtxId) -> Result<()> {
        if session.ctx(ctx).origin.is_some() {
            return Ok(());
        }
        let Arg::QName(base_name) = session.ctx(ctx).arg.clone() else {
            return Err(Error::verify(
                "base reached full declaration without a parsed name",
            ));
        };
        let reference = session.ctx(ctx).reference.clone();

        let mut action = InferenceAction::new(
            ModelProcessingPhase::FullDeclaration,
            format!("base identity {base_name} was not found"),
            reference,
        );
        action.require_namespace_item(ctx, NamespaceId::IdentityByQName, NamespaceKey::QName(base_name));
        session.register_action(ctx, action, Box::new(|_, _| Ok(())))
    }
}

// =============================================================================
// feature / if-feature
// =============================================================================

pub(crate) struct FeatureSupport {
    validator: SubstatementValidator,
}

impl FeatureSupport {
    pub(crate) fn new() -> Self {
        Self {
            validator: SubstatementValidator::new()
                .any(StatementKind::IfFeature)
                .optional(StatementKind::Status)
                .optional(StatementKind::Description)
                .optional(StatementKind::Reference),
        }
    }
}

impl StatementSupport for FeatureSupport {
    fn kind(&self) -> StatementKind {
        StatementKind::Feature
    }

    fn validator(&self) -> Option<&SubstatementValidator> {
        Some(&self.validator)
    }

    fn parse_argument(&self, session: &mut BuildSession, ctx: CtxId) -> Result<Arg> {
        Ok(Arg::QName(session.node_qname(ctx)?))
    }

    fn on_full_definition_declared(&self, session: &mut BuildSession, ctx: CtxId) -> Result<()> {
        if session.ctx(ctx).origin.is_some() {
            return Ok(());
        }
        let Arg::QName(qname) = session.ctx(ctx).arg.clone() else {
            return Err(Error::verify(
                "feature reached full declaration without a parsed name",
            ));
        };
        let reference = session.ctx(ctx).reference.clone();
        session.add_to_namespace(
            ctx,
            NamespaceId::FeatureByQName,
            NamespaceKey::QName(qname.clone()),
            NamespaceValue::Ctx(ctx),
            reference,
            &format!("feature {qname}"),
        )
    }
}

pub(crate) struct IfFeatureSupport;

impl StatementSupport for IfFeatureSupport {
    fn kind(&self) -> StatementKind {
        StatementKind::IfFeature
    }

    fn parse_argument(&self, session: &mut BuildSession, ctx: CtxId) -> Result<Arg> {
        let reference = session.ctx(ctx).reference.clone();
        let raw = session.ctx(ctx).raw_arg.clone().ok_or_else(|| {
            Error::source("if-feature requires a feature name argument", reference)
        })?;
        Ok(Arg::QName(session.parse_reference_qname(ctx, &raw)?))
    }

    fn on_full_definition_declared(&self, session: &mut BuildSession, ctx: CtxId) -> Result<()> {
        if session.ctx(ctx).origin.is_some() {
            return Ok(());
        }
        let Arg::QName(feature) = session.ctx(ctx).arg.clone() else {
            return Err(Error::verify(
                "if-feature reached full declaration without a parsed name",
            ));
        };
        let reference = session.ctx(ctx).reference.clone();

        let mut action = InferenceAction::new(
            ModelProcessingPhase::FullDeclaration,
            format!("feature {feature} referenced by if-feature was not found"),
            reference,
        );
        action.require_namespace_item(ctx, NamespaceId::FeatureByQName, NamespaceKey::QName(feature));
        session.register_action(ctx, action, Box::new(|_, _| Ok(())))
    }
}

// =============================================================================
// extension / argument
// =============================================================================

pub(crate) struct ExtensionSupport {
    validator: SubstatementValidator,
}

impl ExtensionSupport {
    pub(crate) fn new() -> Self {
        Self {
            validator: SubstatementValidator::new()
                .optional(StatementKind::Argument)
                .optional(StatementKind::Status)
                .optional(StatementKind::Description)
                .optional(StatementKind::Reference),
        }
    }
}

impl StatementSupport for ExtensionSupport {
    fn kind(&self) -> StatementKind {
        StatementKind::Extension
    }

    fn validator(&self) -> Option<&SubstatementValidator> {
        Some(&self.validator)
    }

    fn parse_argument(&self, session: &mut BuildSession, ctx: CtxId) -> Result<Arg> {
        Ok(Arg::QName(session.node_qname(ctx)?))
    }

    fn on_full_definition_declared(&self, session: &mut BuildSession, ctx: CtxId) -> Result<()> {
        if session.ctx(ctx).origin.is_some() {
            return Ok(());
        }
        let Arg::QName(qname) = session.ctx(ctx).arg.clone() else {
            return Err(Error::verify(
                "extension reached full declaration without a parsed name",
            ));
        };
        let reference = session.ctx(ctx).reference.clone();
        session.add_to_namespace(
            ctx,
            NamespaceId::ExtensionByQName,
            NamespaceKey::QName(qname.clone()),
            NamespaceValue::Ctx(ctx),
            reference,
            &format!("extension {qname}"),
        )
    }
}

pub(crate) struct ArgumentSupport;

impl StatementSupport for ArgumentSupport {
    fn kind(&self) -> StatementKind {
        StatementKind::Argument
    }
}
