//! Typed statement arguments.
//!
//! Statement supports parse raw argument strings into these values during
//! the reactor's declaration phases.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use yangmill_foundation::{Error, QName, Revision, XmlNamespace};

/// A parsed statement argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Arg {
    /// No argument (`input`, `output`).
    None,
    /// Free-form string (`description`, `presence`, ...).
    Str(Arc<str>),
    /// A bare identifier (`prefix`, `module` name, ...).
    Identifier(Arc<str>),
    /// A resolved qualified name (`leaf`, `container`, `grouping`, ...).
    QName(QName),
    /// An ordered set of qualified names (`key`).
    QNames(Box<[QName]>),
    /// A schema-node path, one step per element (`augment`).
    Path(Box<[Arc<str>]>),
    /// `true` / `false` (`config`, `mandatory`).
    Bool(bool),
    /// Definition lifecycle (`status`).
    Status(Status),
    /// List entry ordering (`ordered-by`).
    OrderedBy(OrderedBy),
    /// Non-negative count (`min-elements`, `value`, `fraction-digits`).
    Uint(u64),
    /// `max-elements` bound.
    Max(MaxElements),
    /// Language version (`yang-version`).
    Version(YangVersion),
    /// A revision date (`revision`, `revision-date`).
    Revision(Revision),
    /// A namespace URI (`namespace`).
    Namespace(XmlNamespace),
}

impl Arg {
    /// Returns the qualified name, if this argument carries one.
    #[must_use]
    pub fn as_qname(&self) -> Option<&QName> {
        match self {
            Self::QName(qname) => Some(qname),
            _ => None,
        }
    }

    /// Returns the string payload, if this argument carries one.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) | Self::Identifier(s) => Some(s),
            _ => None,
        }
    }
}

/// Definition lifecycle of a statement.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Status {
    /// Valid and current (the default).
    #[default]
    Current,
    /// Obsolescent; may be removed.
    Deprecated,
    /// Must not be implemented.
    Obsolete,
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "current" => Ok(Self::Current),
            "deprecated" => Ok(Self::Deprecated),
            "obsolete" => Ok(Self::Obsolete),
            other => Err(Error::invalid_value("status", other)),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Current => "current",
            Self::Deprecated => "deprecated",
            Self::Obsolete => "obsolete",
        })
    }
}

/// Ordering of `list` and `leaf-list` entries.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum OrderedBy {
    /// Order is implementation-determined (the default).
    #[default]
    System,
    /// Order is significant and controlled by the user.
    User,
}

impl FromStr for OrderedBy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "system" => Ok(Self::System),
            "user" => Ok(Self::User),
            other => Err(Error::invalid_value("ordered-by", other)),
        }
    }
}

/// Upper bound on list cardinality.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum MaxElements {
    /// No bound (the default).
    #[default]
    Unbounded,
    /// At most this many entries.
    Bounded(u64),
}

impl FromStr for MaxElements {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "unbounded" {
            return Ok(Self::Unbounded);
        }
        match s.parse::<u64>() {
            Ok(n) if n >= 1 => Ok(Self::Bounded(n)),
            _ => Err(Error::invalid_value("max-elements", s)),
        }
    }
}

impl fmt::Display for MaxElements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unbounded => f.write_str("unbounded"),
            Self::Bounded(n) => write!(f, "{n}"),
        }
    }
}

/// YANG language version.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum YangVersion {
    /// RFC 6020.
    #[default]
    V1,
    /// RFC 7950.
    V1_1,
}

impl FromStr for YangVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1" => Ok(Self::V1),
            "1.1" => Ok(Self::V1_1),
            other => Err(Error::invalid_value("yang-version", other)),
        }
    }
}

impl fmt::Display for YangVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::V1 => "1",
            Self::V1_1 => "1.1",
        })
    }
}

/// The YANG built-in types.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BuiltinType {
    /// `binary`
    Binary,
    /// `bits`
    Bits,
    /// `boolean`
    Boolean,
    /// `decimal64`
    Decimal64,
    /// `empty`
    Empty,
    /// `enumeration`
    Enumeration,
    /// `identityref`
    IdentityRef,
    /// `instance-identifier`
    InstanceIdentifier,
    /// `int8`
    Int8,
    /// `int16`
    Int16,
    /// `int32`
    Int32,
    /// `int64`
    Int64,
    /// `leafref`
    LeafRef,
    /// `string`
    String,
    /// `uint8`
    Uint8,
    /// `uint16`
    Uint16,
    /// `uint32`
    Uint32,
    /// `uint64`
    Uint64,
    /// `union`
    Union,
}

impl BuiltinType {
    /// Looks up a built-in type by name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "binary" => Self::Binary,
            "bits" => Self::Bits,
            "boolean" => Self::Boolean,
            "decimal64" => Self::Decimal64,
            "empty" => Self::Empty,
            "enumeration" => Self::Enumeration,
            "identityref" => Self::IdentityRef,
            "instance-identifier" => Self::InstanceIdentifier,
            "int8" => Self::Int8,
            "int16" => Self::Int16,
            "int32" => Self::Int32,
            "int64" => Self::Int64,
            "leafref" => Self::LeafRef,
            "string" => Self::String,
            "uint8" => Self::Uint8,
            "uint16" => Self::Uint16,
            "uint32" => Self::Uint32,
            "uint64" => Self::Uint64,
            "union" => Self::Union,
            _ => return None,
        })
    }

    /// Returns the type's keyword name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Binary => "binary",
            Self::Bits => "bits",
            Self::Boolean => "boolean",
            Self::Decimal64 => "decimal64",
            Self::Empty => "empty",
            Self::Enumeration => "enumeration",
            Self::IdentityRef => "identityref",
            Self::InstanceIdentifier => "instance-identifier",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::LeafRef => "leafref",
            Self::String => "string",
            Self::Uint8 => "uint8",
            Self::Uint16 => "uint16",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::Union => "union",
        }
    }
}

impl fmt::Display for BuiltinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
