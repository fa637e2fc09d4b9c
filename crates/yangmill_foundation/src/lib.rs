//! Core types, source references, and errors for yangmill.
//!
//! This crate provides:
//! - [`QName`] / [`QNameModule`] - Namespace-qualified schema names
//! - [`Revision`] - YANG revision dates
//! - [`SourceId`] / [`StatementRef`] - Source identity and diagnostics locations
//! - [`Error`] - Rich error types with source references
//! - [`Interner`] - Deduplicating string pool

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod error;
mod intern;
mod qname;
mod source;

pub use error::{Error, ErrorKind, InferenceError, ReactorError, Result, SourceError, VerifyError};
pub use intern::Interner;
pub use qname::{QName, QNameModule, Revision, XmlNamespace};
pub use source::{SourceId, StatementRef};
