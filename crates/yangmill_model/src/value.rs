//! Leaf values carried by binding objects and normalized nodes.

use std::fmt;
use std::sync::Arc;

use yangmill_foundation::QName;

/// A typed leaf value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// `boolean`
    Bool(bool),
    /// Signed integer types (`int8` through `int64`).
    Int(i64),
    /// Unsigned integer types (`uint8` through `uint64`).
    Uint(u64),
    /// `decimal64`: scaled integer plus fraction digits.
    Decimal64 {
        /// The unscaled value.
        value: i64,
        /// Number of fraction digits (1..=18).
        fraction_digits: u8,
    },
    /// `string` and string-shaped derived types.
    Str(Arc<str>),
    /// `binary` octets.
    Binary(Box<[u8]>),
    /// `empty`: presence-only.
    Empty,
    /// One `enumeration` member name.
    Enumeration(Arc<str>),
    /// A resolved `identityref`.
    IdentityRef(QName),
    /// A set of `bits` member names.
    Bits(Box<[Arc<str>]>),
}

impl Value {
    /// Creates a string value.
    #[must_use]
    pub fn str(s: impl AsRef<str>) -> Self {
        Self::Str(s.as_ref().into())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Uint(n) => write!(f, "{n}"),
            Self::Decimal64 {
                value,
                fraction_digits,
            } => {
                let divisor = 10i64.pow(u32::from(*fraction_digits));
                write!(f, "{}.{:0width$}", value / divisor, (value % divisor).abs(),
                    width = *fraction_digits as usize)
            }
            Self::Str(s) | Self::Enumeration(s) => f.write_str(s),
            Self::Binary(bytes) => {
                for byte in bytes {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
            Self::Empty => Ok(()),
            Self::IdentityRef(qname) => write!(f, "{qname}"),
            Self::Bits(names) => {
                let mut first = true;
                for name in names {
                    if !first {
                        f.write_str(" ")?;
                    }
                    f.write_str(name)?;
                    first = false;
                }
                Ok(())
            }
        }
    }
}
