//! Statement kinds, declared statements, and the effective schema model.
//!
//! This crate provides:
//! - [`StatementKind`] - The closed set of supported YANG statements
//! - [`Arg`] - Typed, parsed statement arguments
//! - [`Substatements`] - Size-optimized substatement storage
//! - [`DeclaredStatement`] - The as-written statement tree
//! - [`SchemaNode`] / [`SchemaChildren`] - Effective schema-tree nodes
//! - [`EffectiveModelContext`] - The frozen, queryable model

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod arg;
mod declared;
mod module;
mod schema;
mod statement;
mod substatements;
mod value;

pub use arg::{Arg, BuiltinType, MaxElements, OrderedBy, Status, YangVersion};
pub use declared::DeclaredStatement;
pub use module::{
    EffectiveModelContext, GroupingEffective, IdentityEffective, ModuleEffective, RpcEffective,
    TypedefEffective,
};
pub use schema::{SchemaChildren, SchemaNode, SchemaNodeKind, TypeEffective};
pub use statement::StatementKind;
pub use substatements::Substatements;
pub use value::Value;
