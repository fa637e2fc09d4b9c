//! Integration tests for the error taxonomy
//!
//! Source errors point at user input, inference errors at unsatisfiable
//! cross-references, reactor errors at a build that ran out of progress,
//! and verify errors at internal invariant violations.

use yangmill_foundation::{Error, ErrorKind, InferenceError, SourceId, StatementRef};

fn at(source: &str, line: u32) -> StatementRef {
    StatementRef::new(source, line, 5)
}

// =============================================================================
// Source errors
// =============================================================================

#[test]
fn source_error_names_the_offending_statement() {
    let err = Error::source("unexpected keyword \"contaner\"", at("typo.yang", 12));
    let msg = err.to_string();
    assert!(msg.contains("unexpected keyword"));
    assert!(msg.contains("typo.yang:12:5"));
    assert!(matches!(err.kind, ErrorKind::Source(_)));
}

#[test]
fn collision_error_names_both_declarations() {
    let err = Error::source_related(
        "duplicate leaf \"name\"",
        at("dup.yang", 20),
        at("dup.yang", 8),
    );
    let msg = err.to_string();
    assert!(msg.contains("dup.yang:20:5"));
    assert!(msg.contains("already declared at dup.yang:8:5"));

    let ErrorKind::Source(source) = &err.kind else {
        panic!("collision is not a source error");
    };
    assert_eq!(source.reference.line, 20);
    assert_eq!(source.related.as_ref().map(|r| r.line), Some(8));
}

#[test]
fn invalid_value_gains_a_reference_via_at() {
    let bare = Error::invalid_value("revision date", "yesterday");
    assert!(matches!(bare.kind, ErrorKind::InvalidValue { .. }));

    let located = Error::invalid_value("revision date", "yesterday").at(at("rev.yang", 3));
    assert!(matches!(located.kind, ErrorKind::Source(_)));
    assert!(located.to_string().contains("rev.yang:3:5"));
    assert!(located.to_string().contains("yesterday"));
}

#[test]
fn at_does_not_relocate_source_errors() {
    let err = Error::source("original location", at("a.yang", 1)).at(at("b.yang", 99));
    let msg = err.to_string();
    assert!(msg.contains("a.yang:1:5"));
    assert!(!msg.contains("b.yang"));
}

// =============================================================================
// Inference and reactor errors
// =============================================================================

#[test]
fn inference_error_displays_its_reference() {
    let err = Error::inference(
        "imported module \"ietf-yang-types\" was not found",
        at("consumer.yang", 4),
    );
    let msg = err.to_string();
    assert!(msg.contains("ietf-yang-types"));
    assert!(msg.contains("consumer.yang:4:5"));
}

#[test]
fn reactor_error_aggregates_every_unresolved_cause() {
    let causes = vec![
        InferenceError {
            message: "imported module \"a\" was not found".to_string(),
            reference: at("m.yang", 4),
        },
        InferenceError {
            message: "grouping (urn:x)g referenced by uses was not found".to_string(),
            reference: at("m.yang", 9),
        },
    ];
    let err = Error::reactor("SourceLinkage", SourceId::new("m", None), causes);

    let msg = err.to_string();
    assert!(msg.contains("SourceLinkage"));
    assert!(msg.contains("2 modifier(s) unresolved"));
    assert!(msg.contains("m.yang:4:5"));
    assert!(msg.contains("m.yang:9:5"));

    let ErrorKind::Reactor(reactor) = &err.kind else {
        panic!("not a reactor error");
    };
    assert_eq!(reactor.causes.len(), 2);
    assert_eq!(reactor.phase, "SourceLinkage");
}

// =============================================================================
// Verify errors
// =============================================================================

#[test]
fn verify_error_is_a_defect_not_user_input() {
    let err = Error::verify("duplicate schema-tree child (urn:x)a");
    assert!(matches!(err.kind, ErrorKind::Verify(_)));
    assert!(err.to_string().starts_with("verification failed"));
}
