//! Yangmill - YANG schema compiler
//!
//! This crate re-exports all layers of the yangmill system for convenient
//! access. For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 4: yangmill_codec      — Binding serializers, normalized data tree
//! Layer 3: yangmill_binding    — Runtime-type index over the effective model
//! Layer 2: yangmill_reactor    — Statement contexts, namespaces, phases, inference
//! Layer 1: yangmill_parser     — YANG text lexer, raw statement stream
//! Layer 0: yangmill_model      — Statement kinds, declared/effective model
//!          yangmill_foundation — Core types (QName, SourceId, Error)
//! ```

pub use yangmill_binding as binding;
pub use yangmill_codec as codec;
pub use yangmill_foundation as foundation;
pub use yangmill_model as model;
pub use yangmill_parser as parser;
pub use yangmill_reactor as reactor;
