//! String interning for local names and namespace URIs.
//!
//! Module schemas repeat the same identifiers many times over; interning
//! lets every [`crate::QName`] share one allocation per distinct string.

use std::collections::HashSet;
use std::sync::Arc;

/// Deduplicating pool of shared strings.
///
/// Not thread-safe; one build session is driven by one thread and owns
/// its interner.
#[derive(Clone, Debug, Default)]
pub struct Interner {
    strings: HashSet<Arc<str>>,
}

impl Interner {
    /// Creates an empty interner.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns a string, returning a shared handle.
    ///
    /// Repeated calls with equal strings return handles pointing at the
    /// same allocation.
    pub fn intern(&mut self, s: &str) -> Arc<str> {
        if let Some(existing) = self.strings.get(s) {
            return Arc::clone(existing);
        }
        let arc: Arc<str> = s.into();
        self.strings.insert(Arc::clone(&arc));
        arc
    }

    /// Returns the number of distinct interned strings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Returns true if nothing has been interned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}
