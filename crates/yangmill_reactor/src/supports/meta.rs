//! Supports for metadata and per-node property statements.
//!
//! Most of these carry a free-form string argument and need no phase
//! hooks; the handful with typed arguments parse them here so that
//! malformed values fail at statement definition with a precise source
//! reference.

use std::str::FromStr;

use yangmill_foundation::{Error, Result};
use yangmill_model::{Arg, MaxElements, OrderedBy, StatementKind, Status};

use super::simple_support;
use crate::context::CtxId;
use crate::session::BuildSession;
use crate::support::StatementSupport;

simple_support!(DescriptionSupport, Description);
simple_support!(ReferenceSupport, Reference);
simple_support!(OrganizationSupport, Organization);
simple_support!(ContactSupport, Contact);
simple_support!(PresenceSupport, Presence);
simple_support!(UnitsSupport, Units);
simple_support!(DefaultSupport, Default);
simple_support!(WhenSupport, When);
simple_support!(MustSupport, Must);
simple_support!(ErrorMessageSupport, ErrorMessage);
simple_support!(ErrorAppTagSupport, ErrorAppTag);
simple_support!(RangeSupport, Range);
simple_support!(LengthSupport, Length);
simple_support!(PatternSupport, Pattern);
simple_support!(EnumSupport, Enum);
simple_support!(ValueSupport, Value);
simple_support!(PathSupport, Path);
simple_support!(UniqueSupport, Unique);

/// Fallback for extension instances (`prefix:keyword`); the statement
/// and its subtree are kept verbatim.
pub(crate) struct UnknownSupport;

impl StatementSupport for UnknownSupport {
    fn kind(&self) -> StatementKind {
        StatementKind::Unknown
    }
}

fn required_raw(session: &BuildSession, ctx: CtxId) -> Result<std::sync::Arc<str>> {
    let c = session.ctx(ctx);
    c.raw_arg.clone().ok_or_else(|| {
        Error::source(
            format!("statement \"{}\" requires an argument", c.kind),
            c.reference.clone(),
        )
    })
}

pub(crate) struct ConfigSupport;

impl StatementSupport for ConfigSupport {
    fn kind(&self) -> StatementKind {
        StatementKind::Config
    }

    fn parse_argument(&self, session: &mut BuildSession, ctx: CtxId) -> Result<Arg> {
        let raw = required_raw(session, ctx)?;
        match raw.as_ref() {
            "true" => Ok(Arg::Bool(true)),
            "false" => Ok(Arg::Bool(false)),
            other => Err(Error::invalid_value("config", other)
                .at(session.ctx(ctx).reference.clone())),
        }
    }
}

pub(crate) struct MandatorySupport;

impl StatementSupport for MandatorySupport {
    fn kind(&self) -> StatementKind {
        StatementKind::Mandatory
    }

    fn parse_argument(&self, session: &mut BuildSession, ctx: CtxId) -> Result<Arg> {
        let raw = required_raw(session, ctx)?;
        match raw.as_ref() {
            "true" => Ok(Arg::Bool(true)),
            "false" => Ok(Arg::Bool(false)),
            other => Err(Error::invalid_value("mandatory", other)
                .at(session.ctx(ctx).reference.clone())),
        }
    }
}

pub(crate) struct StatusSupport;

impl StatementSupport for StatusSupport {
    fn kind(&self) -> StatementKind {
        StatementKind::Status
    }

    fn parse_argument(&self, session: &mut BuildSession, ctx: CtxId) -> Result<Arg> {
        let raw = required_raw(session, ctx)?;
        let status =
            Status::from_str(&raw).map_err(|e| e.at(session.ctx(ctx).reference.clone()))?;
        Ok(Arg::Status(status))
    }
}

pub(crate) struct OrderedBySupport;

impl StatementSupport for OrderedBySupport {
    fn kind(&self) -> StatementKind {
        StatementKind::OrderedBy
    }

    fn parse_argument(&self, session: &mut BuildSession, ctx: CtxId) -> Result<Arg> {
        let raw = required_raw(session, ctx)?;
        let ordered =
            OrderedBy::from_str(&raw).map_err(|e| e.at(session.ctx(ctx).reference.clone()))?;
        Ok(Arg::OrderedBy(ordered))
    }
}

pub(crate) struct MinElementsSupport;

impl StatementSupport for MinElementsSupport {
    fn kind(&self) -> StatementKind {
        StatementKind::MinElements
    }

    fn parse_argument(&self, session: &mut BuildSession, ctx: CtxId) -> Result<Arg> {
        let raw = required_raw(session, ctx)?;
        let count: u64 = raw.parse().map_err(|_| {
            Error::invalid_value("min-elements", raw.as_ref())
                .at(session.ctx(ctx).reference.clone())
        })?;
        Ok(Arg::Uint(count))
    }
}

pub(crate) struct MaxElementsSupport;

impl StatementSupport for MaxElementsSupport {
    fn kind(&self) -> StatementKind {
        StatementKind::MaxElements
    }

    fn parse_argument(&self, session: &mut BuildSession, ctx: CtxId) -> Result<Arg> {
        let raw = required_raw(session, ctx)?;
        let max =
            MaxElements::from_str(&raw).map_err(|e| e.at(session.ctx(ctx).reference.clone()))?;
        Ok(Arg::Max(max))
    }
}

pub(crate) struct FractionDigitsSupport;

impl StatementSupport for FractionDigitsSupport {
    fn kind(&self) -> StatementKind {
        StatementKind::FractionDigits
    }

    fn parse_argument(&self, session: &mut BuildSession, ctx: CtxId) -> Result<Arg> {
        let raw = required_raw(session, ctx)?;
        match raw.parse::<u64>() {
            Ok(digits) if (1..=18).contains(&digits) => Ok(Arg::Uint(digits)),
            _ => Err(Error::invalid_value("fraction-digits", raw.as_ref())
                .at(session.ctx(ctx).reference.clone())),
        }
    }
}
