//! Error types for the yangmill system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//! The taxonomy follows the build pipeline: source errors point at user
//! input, inference errors at unsatisfiable cross-references, reactor
//! errors at a build that ran out of progress, and verify errors at
//! internal invariant violations.

use std::fmt;

use thiserror::Error;

use crate::source::{SourceId, StatementRef};

/// Result alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for yangmill operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind }
    }

    /// Creates a source error at the given statement.
    #[must_use]
    pub fn source(message: impl Into<String>, reference: StatementRef) -> Self {
        Self::new(ErrorKind::Source(SourceError {
            message: message.into(),
            reference,
            related: None,
        }))
    }

    /// Creates a source error that also points at a prior declaration,
    /// as produced by duplicate namespace registrations.
    #[must_use]
    pub fn source_related(
        message: impl Into<String>,
        reference: StatementRef,
        related: StatementRef,
    ) -> Self {
        Self::new(ErrorKind::Source(SourceError {
            message: message.into(),
            reference,
            related: Some(related),
        }))
    }

    /// Creates an inference error at the given statement.
    #[must_use]
    pub fn inference(message: impl Into<String>, reference: StatementRef) -> Self {
        Self::new(ErrorKind::Inference(InferenceError {
            message: message.into(),
            reference,
        }))
    }

    /// Creates a reactor failure aggregating unresolved inference errors.
    #[must_use]
    pub fn reactor(phase: &'static str, source: SourceId, causes: Vec<InferenceError>) -> Self {
        Self::new(ErrorKind::Reactor(ReactorError {
            phase,
            source,
            causes,
        }))
    }

    /// Creates an internal invariant violation.
    #[must_use]
    pub fn verify(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Verify(VerifyError {
            message: message.into(),
        }))
    }

    /// Creates an invalid-value error for a malformed literal.
    #[must_use]
    pub fn invalid_value(what: &'static str, value: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidValue {
            what,
            value: value.into(),
        })
    }

    /// Attaches a statement reference, turning location-free errors into
    /// source errors. Errors that already carry a reference are returned
    /// unchanged.
    #[must_use]
    pub fn at(self, reference: StatementRef) -> Self {
        match self.kind {
            ErrorKind::InvalidValue { .. } | ErrorKind::Verify(_) => {
                let message = self.kind.to_string();
                Self::source(message, reference)
            }
            kind => Self::new(kind),
        }
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// Malformed or semantically invalid statement input.
    #[error(transparent)]
    Source(SourceError),

    /// A cross-reference prerequisite could not be satisfied.
    #[error(transparent)]
    Inference(InferenceError),

    /// The reactor ran all phases to fixed point with work outstanding.
    #[error(transparent)]
    Reactor(ReactorError),

    /// Internal invariant violation; a defect, not a user input error.
    #[error(transparent)]
    Verify(VerifyError),

    /// A malformed literal outside any statement context.
    #[error("invalid {what}: {value:?}")]
    InvalidValue {
        /// What was being parsed.
        what: &'static str,
        /// The offending text.
        value: String,
    },
}

/// A malformed or semantically invalid statement.
///
/// Always carries the offending statement's location; collision errors
/// additionally carry the location of the prior declaration.
#[derive(Debug, Error)]
pub struct SourceError {
    /// Human-readable description.
    pub message: String,
    /// The offending statement.
    pub reference: StatementRef,
    /// The prior conflicting declaration, if this is a collision.
    pub related: Option<StatementRef>,
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at {})", self.message, self.reference)?;
        if let Some(related) = &self.related {
            write!(f, " (already declared at {related})")?;
        }
        Ok(())
    }
}

/// A cross-reference that could never be satisfied.
#[derive(Debug, Clone, Error)]
#[error("{message} (at {reference})")]
pub struct InferenceError {
    /// Human-readable description naming the blocking statement.
    pub message: String,
    /// The statement that could not be completed.
    pub reference: StatementRef,
}

/// The reactor gave up: a full pass over all sources made no progress
/// while inference actions remained unapplied.
#[derive(Debug, Error)]
pub struct ReactorError {
    /// The phase that failed to complete.
    pub phase: &'static str,
    /// The first source with outstanding work.
    pub source: SourceId,
    /// The unresolved prerequisites, one per failed action.
    pub causes: Vec<InferenceError>,
}

impl fmt::Display for ReactorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to complete phase {} of source {}: {} modifier(s) unresolved",
            self.phase,
            self.source,
            self.causes.len()
        )?;
        for cause in &self.causes {
            write!(f, "\n  {cause}")?;
        }
        Ok(())
    }
}

/// An internal invariant violation.
#[derive(Debug, Error)]
#[error("verification failed: {message}")]
pub struct VerifyError {
    /// Description of the violated invariant.
    pub message: String,
}
