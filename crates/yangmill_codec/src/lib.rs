//! Binding object serializers and the normalized data tree.
//!
//! This crate provides:
//! - [`BindingStreamWriter`] - The structural event sink serializers emit to
//! - [`NormalizedNode`] / [`NormalizedTreeBuilder`] - The schema-aware tree
//! - [`DataObject`] - Dynamic binding instances with accessor metadata
//! - [`SerializerRegistry`] - Per-class, built-once serializer cache

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod builder;
mod normalized;
mod object;
mod serializer;
mod stream;

pub use builder::NormalizedTreeBuilder;
pub use normalized::NormalizedNode;
pub use object::DataObject;
pub use serializer::{ObjectSerializer, SerializerRegistry};
pub use stream::BindingStreamWriter;
