//! The abstract statement producer consumed by the reactor.

use yangmill_foundation::Result;

use crate::statement::{RawStatement, StatementParser};

/// An upstream producer of raw statement trees.
///
/// The reactor consumes only this trait; where the statements come from
/// (module text, a pre-parsed representation, a test fixture) is opaque
/// to it.
pub trait StatementSource {
    /// Returns the source name used in diagnostics.
    fn name(&self) -> &str;

    /// Produces the root statement of this source.
    ///
    /// # Errors
    /// Returns a source error if the underlying representation is
    /// malformed.
    fn root(&self) -> Result<RawStatement>;
}

/// A statement source backed by YANG module text.
pub struct TextSource {
    name: String,
    text: String,
}

impl TextSource {
    /// Creates a text source.
    #[must_use]
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

impl StatementSource for TextSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn root(&self) -> Result<RawStatement> {
        StatementParser::new(&self.name, &self.text).parse_root()
    }
}
