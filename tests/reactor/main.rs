//! Integration tests for Layer 2: Reactor
//!
//! Tests for the multi-phase statement reactor: cross-reference
//! resolution, namespace scoping, and build-failure diagnostics.

mod build;
mod namespaces;
