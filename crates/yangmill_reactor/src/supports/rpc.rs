//! Supports for operation statements: `rpc`, `input`, `output`.

use yangmill_foundation::{Error, Result};
use yangmill_model::{Arg, StatementKind};

use super::data::register_in_parent;
use crate::context::CtxId;
use crate::session::BuildSession;
use crate::support::StatementSupport;
use crate::validator::SubstatementValidator;

fn io_validator() -> SubstatementValidator {
    SubstatementValidator::new()
        .any(StatementKind::Typedef)
        .any(StatementKind::Grouping)
        .any(StatementKind::Container)
        .any(StatementKind::Leaf)
        .any(StatementKind::LeafList)
        .any(StatementKind::List)
        .any(StatementKind::Choice)
        .any(StatementKind::Uses)
        .any(StatementKind::Must)
}

// =============================================================================
// rpc
// =============================================================================

pub(crate) struct RpcSupport {
    validator: SubstatementValidator,
}

impl RpcSupport {
    pub(crate) fn new() -> Self {
        Self {
            validator: SubstatementValidator::new()
                .optional(StatementKind::Input)
                .optional(StatementKind::Output)
                .optional(StatementKind::Status)
                .optional(StatementKind::Description)
                .optional(StatementKind::Reference)
                .any(StatementKind::IfFeature)
                .any(StatementKind::Typedef)
                .any(StatementKind::Grouping),
        }
    }
}

impl StatementSupport for RpcSupport {
    fn kind(&self) -> StatementKind {
        StatementKind::Rpc
    }

    fn validator(&self) -> Option<&SubstatementValidator> {
        Some(&self.validator)
    }

    fn parse_argument(&self, session: &mut BuildSession, ctx: CtxId) -> Result<Arg> {
        Ok(Arg::QName(session.node_qname(ctx)?))
    }

    fn on_full_definition_declared(&self, session: &mut BuildSession, ctx: CtxId) -> Result<()> {
        register_in_parent(session, ctx)?;

        // Operations always have input and output subtrees, declared or
        // not; materialize the missing ones as undeclared substatements.
        // Each registers itself into the rpc's schema tree when its own
        // full-declaration callback runs.
        let module = session.current_module_id(ctx)?;
        if session.find_substatement(ctx, StatementKind::Input).is_none() {
            let qname = module
                .bind("input")
                .map_err(|e| e.at(session.ctx(ctx).reference.clone()))?;
            session.create_undeclared_substatement(ctx, StatementKind::Input, Arg::QName(qname));
        }
        if session.find_substatement(ctx, StatementKind::Output).is_none() {
            let qname = module
                .bind("output")
                .map_err(|e| e.at(session.ctx(ctx).reference.clone()))?;
            session.create_undeclared_substatement(ctx, StatementKind::Output, Arg::QName(qname));
        }
        Ok(())
    }
}

// =============================================================================
// input / output
// =============================================================================

pub(crate) struct InputSupport {
    validator: SubstatementValidator,
}

impl InputSupport {
    pub(crate) fn new() -> Self {
        Self {
            validator: io_validator(),
        }
    }
}

impl StatementSupport for InputSupport {
    fn kind(&self) -> StatementKind {
        StatementKind::Input
    }

    fn validator(&self) -> Option<&SubstatementValidator> {
        Some(&self.validator)
    }

    fn parse_argument(&self, session: &mut BuildSession, ctx: CtxId) -> Result<Arg> {
        let module = session.current_module_id(ctx)?;
        let qname = module
            .bind("input")
            .map_err(|e| e.at(session.ctx(ctx).reference.clone()))?;
        Ok(Arg::QName(qname))
    }

    fn on_full_definition_declared(&self, session: &mut BuildSession, ctx: CtxId) -> Result<()> {
        let parent_is_rpc = session
            .ctx(ctx)
            .parent
            .is_some_and(|p| session.ctx(p).kind == StatementKind::Rpc);
        if !parent_is_rpc {
            return Err(Error::source(
                "input is valid only within an rpc",
                session.ctx(ctx).reference.clone(),
            ));
        }
        register_in_parent(session, ctx)
    }
}

pub(crate) struct OutputSupport {
    validator: SubstatementValidator,
}

impl OutputSupport {
    pub(crate) fn new() -> Self {
        Self {
            validator: io_validator(),
        }
    }
}

impl StatementSupport for OutputSupport {
    fn kind(&self) -> StatementKind {
        StatementKind::Output
    }

    fn validator(&self) -> Option<&SubstatementValidator> {
        Some(&self.validator)
    }

    fn parse_argument(&self, session: &mut BuildSession, ctx: CtxId) -> Result<Arg> {
        let module = session.current_module_id(ctx)?;
        let qname = module
            .bind("output")
            .map_err(|e| e.at(session.ctx(ctx).reference.clone()))?;
        Ok(Arg::QName(qname))
    }

    fn on_full_definition_declared(&self, session: &mut BuildSession, ctx: CtxId) -> Result<()> {
        let parent_is_rpc = session
            .ctx(ctx)
            .parent
            .is_some_and(|p| session.ctx(p).kind == StatementKind::Rpc);
        if !parent_is_rpc {
            return Err(Error::source(
                "output is valid only within an rpc",
                session.ctx(ctx).reference.clone(),
            ));
        }
        register_in_parent(session, ctx)
    }
}
