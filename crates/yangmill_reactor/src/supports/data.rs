//! Supports for data definition statements.

use std::collections::HashSet;

use yangmill_foundation::{Error, QName, Result};
use yangmill_model::{Arg, StatementKind};

use crate::context::CtxId;
use crate::session::BuildSession;
use crate::support::StatementSupport;
use crate::validator::SubstatementValidator;

/// Registers a data node into its parent's schema-tree namespace.
pub(crate) fn register_in_parent(session: &mut BuildSession, ctx: CtxId) -> Result<()> {
    let Some(parent) = session.ctx(ctx).parent else {
        return Ok(());
    };
    let qname = match &session.ctx(ctx).arg {
        Arg::QName(qname) => qname.clone(),
        _ => {
            return Err(Error::verify(format!(
                "schema node \"{}\" reached full declaration without a parsed name",
                session.ctx(ctx).kind
            )));
        }
    };
    session.register_schema_child(parent, ctx, qname)
}

fn common_body(validator: SubstatementValidator) -> SubstatementValidator {
    validator
        .optional(StatementKind::Config)
        .optional(StatementKind::Status)
        .optional(StatementKind::Description)
        .optional(StatementKind::Reference)
        .optional(StatementKind::When)
        .any(StatementKind::IfFeature)
}

fn container_like(validator: SubstatementValidator) -> SubstatementValidator {
    common_body(validator)
        .any(StatementKind::Must)
        .any(StatementKind::Typedef)
        .any(StatementKind::Grouping)
        .any(StatementKind::Container)
        .any(StatementKind::Leaf)
        .any(StatementKind::LeafList)
        .any(StatementKind::List)
        .any(StatementKind::Choice)
        .any(StatementKind::Uses)
}

// =============================================================================
// container
// =============================================================================

pub(crate) struct ContainerSupport {
    validator: SubstatementValidator,
}

impl ContainerSupport {
    pub(crate) fn new() -> Self {
        Self {
            validator: container_like(
                SubstatementValidator::new().optional(StatementKind::Presence),
            ),
        }
    }
}

impl StatementSupport for ContainerSupport {
    fn kind(&self) -> StatementKind {
        StatementKind::Container
    }

    fn validator(&self) -> Option<&SubstatementValidator> {
        Some(&self.validator)
    }

    fn parse_argument(&self, session: &mut BuildSession, ctx: CtxId) -> Result<Arg> {
        Ok(Arg::QName(session.node_qname(ctx)?))
    }

    fn on_full_definition_declared(&self, session: &mut BuildSession, ctx: CtxId) -> Result<()> {
        register_in_parent(session, ctx)
    }
}

// =============================================================================
// leaf
// =============================================================================

pub(crate) struct LeafSupport {
    validator: SubstatementValidator,
}

impl LeafSupport {
    pub(crate) fn new() -> Self {
        Self {
            validator: common_body(
                SubstatementValidator::new()
                    .mandatory(StatementKind::Type)
                    .optional(StatementKind::Default)
                    .optional(StatementKind::Mandatory)
                    .optional(StatementKind::Units)
                    .any(StatementKind::Must),
            ),
        }
    }
}

impl StatementSupport for LeafSupport {
    fn kind(&self) -> StatementKind {
        StatementKind::Leaf
    }

    fn validator(&self) -> Option<&SubstatementValidator> {
        Some(&self.validator)
    }

    fn parse_argument(&self, session: &mut BuildSession, ctx: CtxId) -> Result<Arg> {
        Ok(Arg::QName(session.node_qname(ctx)?))
    }

    fn on_full_definition_declared(&self, session: &mut BuildSession, ctx: CtxId) -> Result<()> {
        register_in_parent(session, ctx)
    }
}

// =============================================================================
// leaf-list
// =============================================================================

pub(crate) struct LeafListSupport {
    validator: SubstatementValidator,
}

impl LeafListSupport {
    pub(crate) fn new() -> Self {
        Self {
            validator: common_body(
                SubstatementValidator::new()
                    .mandatory(StatementKind::Type)
                    .optional(StatementKind::MinElements)
                    .optional(StatementKind::MaxElements)
                    .optional(StatementKind::OrderedBy)
                    .optional(StatementKind::Units)
                    .any(StatementKind::Default)
                    .any(StatementKind::Must),
            ),
        }
    }
}

impl StatementSupport for LeafListSupport {
    fn kind(&self) -> StatementKind {
        StatementKind::LeafList
    }

    fn validator(&self) -> Option<&SubstatementValidator> {
        Some(&self.validator)
    }

    fn parse_argument(&self, session: &mut BuildSession, ctx: CtxId) -> Result<Arg> {
        Ok(Arg::QName(session.node_qname(ctx)?))
    }

    fn on_full_definition_declared(&self, session: &mut BuildSession, ctx: CtxId) -> Result<()> {
        register_in_parent(session, ctx)
    }
}

// =============================================================================
// list
// =============================================================================

pub(crate) struct ListSupport {
    validator: SubstatementValidator,
}

impl ListSupport {
    pub(crate) fn new() -> Self {
        Self {
            validator: container_like(
                SubstatementValidator::new()
                    .optional(StatementKind::Key)
                    .any(StatementKind::Unique)
                    .optional(StatementKind::MinElements)
                    .optional(StatementKind::MaxElements)
                    .optional(StatementKind::OrderedBy),
            ),
        }
    }
}

impl StatementSupport for ListSupport {
    fn kind(&self) -> StatementKind {
        StatementKind::List
    }

    fn validator(&self) -> Option<&SubstatementValidator> {
        Some(&self.validator)
    }

    fn parse_argument(&self, session: &mut BuildSession, ctx: CtxId) -> Result<Arg> {
        Ok(Arg::QName(session.node_qname(ctx)?))
    }

    fn on_full_definition_declared(&self, session: &mut BuildSession, ctx: CtxId) -> Result<()> {
        register_in_parent(session, ctx)
    }
}

// =============================================================================
// key
// =============================================================================

pub(crate) struct KeySupport;

impl StatementSupport for KeySupport {
    fn kind(&self) -> StatementKind {
        StatementKind::Key
    }

    fn parse_argument(&self, session: &mut BuildSession, ctx: CtxId) -> Result<Arg> {
        let reference = session.ctx(ctx).reference.clone();
        let raw = session.ctx(ctx).raw_arg.clone().ok_or_else(|| {
            Error::source("key requires a leaf name argument", reference.clone())
        })?;
        let module = session.current_module_id(ctx)?;

        let mut seen: HashSet<QName> = HashSet::new();
        let mut keys = Vec::new();
        for name in raw.split_whitespace() {
            let qname = module.bind(name).map_err(|e| e.at(reference.clone()))?;
            if !seen.insert(qname.clone()) {
                return Err(Error::source(
                    format!("leaf \"{name}\" listed twice in key"),
                    reference,
                ));
            }
            keys.push(qname);
        }
        if keys.is_empty() {
            return Err(Error::source("key requires at least one leaf name", reference));
        }
        Ok(Arg::QNames(keys.into_boxed_slice()))
    }
}

// =============================================================================
// choice
// =============================================================================

pub(crate) struct ChoiceSupport {
    validator: SubstatementValidator,
}

impl ChoiceSupport {
    pub(crate) fn new() -> Self {
        Self {
            validator: common_body(
                SubstatementValidator::new()
                    .optional(StatementKind::Default)
                    .optional(StatementKind::Mandatory)
                    .any(StatementKind::Case)
                    .any(StatementKind::Container)
                    .any(StatementKind::Leaf)
                    .any(StatementKind::LeafList)
                    .any(StatementKind::List),
            ),
        }
    }
}

impl StatementSupport for ChoiceSupport {
    fn kind(&self) -> StatementKind {
        StatementKind::Choice
    }

    fn validator(&self) -> Option<&SubstatementValidator> {
        Some(&self.validator)
    }

    fn parse_argument(&self, session: &mut BuildSession, ctx: CtxId) -> Result<Arg> {
        Ok(Arg::QName(session.node_qname(ctx)?))
    }

    fn on_full_definition_declared(&self, session: &mut BuildSession, ctx: CtxId) -> Result<()> {
        register_in_parent(session, ctx)
    }
}

// =============================================================================
// case
// =============================================================================

pub(crate) struct CaseSupport {
    validator: SubstatementValidator,
}

impl CaseSupport {
    pub(crate) fn new() -> Self {
        Self {
            validator: common_body(
                SubstatementValidator::new()
                    .any(StatementKind::Container)
                    .any(StatementKind::Leaf)
                    .any(StatementKind::LeafList)
                    .any(StatementKind::List)
                    .any(StatementKind::Choice)
                    .any(StatementKind::Uses),
            ),
        }
    }
}

impl StatementSupport for CaseSupport {
    fn kind(&self) -> StatementKind {
        StatementKind::Case
    }

    fn validator(&self) -> Option<&SubstatementValidator> {
        Some(&self.validator)
    }

    fn parse_argument(&self, session: &mut BuildSession, ctx: CtxId) -> Result<Arg> {
        Ok(Arg::QName(session.node_qname(ctx)?))
    }

    fn on_full_definition_declared(&self, session: &mut BuildSession, ctx: CtxId) -> Result<()> {
        register_in_parent(session, ctx)
    }
}
