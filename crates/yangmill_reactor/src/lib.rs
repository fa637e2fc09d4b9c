//! Multi-phase statement reactor for yangmill.
//!
//! This crate provides:
//! - [`Reactor`] - The cross-source build driver
//! - [`BuildSession`] - Mutable state of one build
//! - [`ModelProcessingPhase`] - The phase state machine
//! - [`NamespaceId`] / [`NamespaceBehaviour`] - Scoped cross-reference registries
//! - [`InferenceAction`] - Deferred resolution with prerequisites
//! - [`StatementSupport`] / [`SupportBundle`] - Per-statement strategies
//! - [`SubstatementValidator`] - Cardinality enforcement

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod action;
mod context;
mod effective;
mod namespace;
mod phase;
mod reactor;
mod session;
mod support;
mod supports;
mod validator;

pub use action::{InferenceAction, PrereqHandle, ResolvedPrereqs};
pub use context::{CopyType, CtxId, StatementContext};
pub use namespace::{
    NamespaceBehaviour, NamespaceEntry, NamespaceId, NamespaceKey, NamespaceStorage, NamespaceValue,
};
pub use phase::{ModelProcessingPhase, PhaseProgress};
pub use reactor::Reactor;
pub use session::BuildSession;
pub use support::{StatementSupport, SupportBundle};
pub use supports::vanilla_bundle;
pub use validator::SubstatementValidator;
