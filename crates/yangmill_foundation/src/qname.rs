//! Namespace-qualified names for schema nodes.
//!
//! Every resolved statement argument that names a schema entity is a
//! [`QName`]: a local name bound to the namespace and revision of its
//! defining module.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// An XML namespace URI identifying a module.
///
/// Stored as a shared string; cloning is cheap.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct XmlNamespace(Arc<str>);

impl XmlNamespace {
    /// Creates a namespace from a URI string.
    ///
    /// # Errors
    /// Returns an error if the string is empty or contains whitespace.
    pub fn new(uri: impl AsRef<str>) -> Result<Self, Error> {
        let uri = uri.as_ref();
        if uri.is_empty() || uri.chars().any(char::is_whitespace) {
            return Err(Error::invalid_value("namespace URI", uri));
        }
        Ok(Self(uri.into()))
    }

    /// Returns the URI string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for XmlNamespace {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for XmlNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for XmlNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "XmlNamespace({})", self.0)
    }
}

/// A YANG revision date in `YYYY-MM-DD` form.
///
/// Valid revision strings compare correctly under lexicographic order, so
/// the ordering is a plain string comparison.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Revision(Arc<str>);

impl Revision {
    /// Parses a revision date.
    ///
    /// # Errors
    /// Returns an error unless the string is exactly `YYYY-MM-DD` with a
    /// plausible month and day.
    pub fn new(date: impl AsRef<str>) -> Result<Self, Error> {
        let date = date.as_ref();
        if Self::is_valid(date) {
            Ok(Self(date.into()))
        } else {
            Err(Error::invalid_value("revision date", date))
        }
    }

    /// Returns the `YYYY-MM-DD` string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn is_valid(date: &str) -> bool {
        let bytes = date.as_bytes();
        if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
            return false;
        }
        let digits = |range: std::ops::Range<usize>| {
            bytes[range].iter().all(u8::is_ascii_digit)
        };
        if !digits(0..4) || !digits(5..7) || !digits(8..10) {
            return false;
        }
        let month: u8 = date[5..7].parse().unwrap_or(0);
        let day: u8 = date[8..10].parse().unwrap_or(0);
        (1..=12).contains(&month) && (1..=31).contains(&day)
    }
}

impl FromStr for Revision {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Revision({})", self.0)
    }
}

/// The (namespace, revision) pair identifying one module instance.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct QNameModule {
    /// Namespace URI of the module.
    pub namespace: XmlNamespace,
    /// Revision of the module, if any.
    pub revision: Option<Revision>,
}

impl QNameModule {
    /// Creates a module identity.
    #[must_use]
    pub const fn new(namespace: XmlNamespace, revision: Option<Revision>) -> Self {
        Self {
            namespace,
            revision,
        }
    }

    /// Binds a local name to this module, producing a [`QName`].
    ///
    /// # Errors
    /// Returns an error if `local_name` is not a valid YANG identifier.
    pub fn bind(&self, local_name: impl AsRef<str>) -> Result<QName, Error> {
        QName::new(self.clone(), local_name)
    }
}

impl PartialOrd for QNameModule {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QNameModule {
    fn cmp(&self, other: &Self) -> Ordering {
        // Absent revision sorts before any concrete revision.
        self.namespace
            .cmp(&other.namespace)
            .then_with(|| self.revision.cmp(&other.revision))
    }
}

impl fmt::Display for QNameModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.revision {
            Some(rev) => write!(f, "{}?revision={rev}", self.namespace),
            None => write!(f, "{}", self.namespace),
        }
    }
}

/// A namespace-qualified schema name.
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct QName {
    /// The defining module.
    pub module: QNameModule,
    /// The local name within the module.
    pub local_name: Arc<str>,
}

impl QName {
    /// Creates a qualified name.
    ///
    /// # Errors
    /// Returns an error if `local_name` is not a valid YANG identifier:
    /// a letter or underscore followed by letters, digits, underscores,
    /// hyphens, or dots.
    pub fn new(module: QNameModule, local_name: impl AsRef<str>) -> Result<Self, Error> {
        let local_name = local_name.as_ref();
        if !is_identifier(local_name) {
            return Err(Error::invalid_value("identifier", local_name));
        }
        Ok(Self {
            module,
            local_name: local_name.into(),
        })
    }

    /// Returns the local name.
    #[must_use]
    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// Returns a copy of this name rebound to `module`.
    ///
    /// Used when grouping contents are instantiated under a `uses` in a
    /// different module.
    #[must_use]
    pub fn rebind(&self, module: &QNameModule) -> Self {
        Self {
            module: module.clone(),
            local_name: self.local_name.clone(),
        }
    }
}

impl PartialOrd for QName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.module
            .cmp(&other.module)
            .then_with(|| self.local_name.cmp(&other.local_name))
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}){}", self.module, self.local_name)
    }
}

impl fmt::Debug for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QName({self})")
    }
}

/// Returns true if `s` is a valid YANG identifier.
#[must_use]
pub(crate) fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}
