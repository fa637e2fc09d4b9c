//! Generated-binding type identity.

use std::cmp::Ordering;
use std::fmt;

use yangmill_foundation::QNameModule;

/// Identity of one generated binding type: its package and simple name.
///
/// Ordered by package first so that sorted maps over type names support
/// package-prefix floor lookups.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TypeName {
    /// Dotted package path.
    pub package: String,
    /// Simple type name within the package.
    pub simple: String,
}

impl TypeName {
    /// Creates a type name.
    #[must_use]
    pub fn new(package: impl Into<String>, simple: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            simple: simple.into(),
        }
    }

    /// Returns the name of a type nested in this type's subpackage.
    #[must_use]
    pub fn nested(&self, segment: &str, simple: impl Into<String>) -> Self {
        Self {
            package: format!("{}.{}", self.package, package_segment(segment)),
            simple: simple.into(),
        }
    }
}

impl PartialOrd for TypeName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TypeName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.package
            .cmp(&other.package)
            .then_with(|| self.simple.cmp(&other.simple))
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.package, self.simple)
    }
}

impl fmt::Debug for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeName({self})")
    }
}

/// A generated binding type descriptor, as consumed by the runtime-type
/// index and the codec layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedType {
    /// The type's identity.
    pub name: TypeName,
}

impl GeneratedType {
    /// Creates a descriptor.
    #[must_use]
    pub fn new(name: TypeName) -> Self {
        Self { name }
    }
}

/// Derives the root package of a module from its identity.
///
/// The namespace URI is normalized segment by segment and the revision,
/// when present, becomes a trailing `rev`-prefixed segment.
#[must_use]
pub fn module_package(module: &QNameModule) -> String {
    let mut package = String::from("gen");
    for segment in module
        .namespace
        .as_str()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|s| !s.is_empty())
    {
        package.push('.');
        package.push_str(&package_segment(segment));
    }
    if let Some(revision) = &module.revision {
        package.push_str(".rev");
        for part in revision.as_str().split('-') {
            package.push_str(part);
        }
    }
    package
}

/// Normalizes one package segment: lowercase, digits-first segments get
/// an underscore prefix.
fn package_segment(segment: &str) -> String {
    let lowered: String = segment
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    if lowered.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        format!("_{lowered}")
    } else {
        lowered
    }
}

/// Converts a YANG identifier to a generated simple type name
/// (`foo-bar.baz` becomes `FooBarBaz`).
#[must_use]
pub fn simple_name(identifier: &str) -> String {
    let mut out = String::with_capacity(identifier.len());
    let mut upper_next = true;
    for c in identifier.chars() {
        if matches!(c, '-' | '.' | '_') {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}
