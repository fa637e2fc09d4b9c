//! Runtime-type index over the effective model.
//!
//! This crate provides:
//! - [`TypeName`] / [`GeneratedType`] - Generated-binding type identity
//! - [`BindingMapper`] - Derives binding types from an effective model
//! - [`CompositeRuntimeType`] / [`ChoiceRuntimeType`] - Schema-indexed shapes
//! - [`BindingRuntimeTypes`] - The global, built-once lookup index

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod index;
mod name;
mod runtime;

pub use index::{BindingMapper, BindingRuntimeTypes, RpcRuntimeType};
pub use name::{GeneratedType, TypeName};
pub use runtime::{ChoiceRuntimeType, CompositeRuntimeType, LeafRuntimeType, RuntimeType};
