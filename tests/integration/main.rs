//! Cross-layer integration tests for yangmill
//!
//! Tests that drive the full pipeline: YANG text through the reactor,
//! the runtime-type index, and the serializer registry.

mod pipeline;
