//! Substatement cardinality validation.

use std::collections::HashMap;

use yangmill_foundation::{Error, Result, StatementRef};
use yangmill_model::StatementKind;

/// Cardinality bounds for one child statement kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Cardinality {
    min: u32,
    max: u32,
}

/// Declares which child statement kinds a statement accepts and how many
/// of each; enforced when the statement reaches full declaration.
#[derive(Debug, Default)]
pub struct SubstatementValidator {
    allowed: HashMap<StatementKind, Cardinality>,
    /// Whether unknown (extension) substatements are tolerated.
    allow_unknown: bool,
}

impl SubstatementValidator {
    /// Creates a validator accepting extension substatements and nothing
    /// else.
    #[must_use]
    pub fn new() -> Self {
        Self {
            allowed: HashMap::new(),
            allow_unknown: true,
        }
    }

    /// Accepts exactly one child of `kind`.
    #[must_use]
    pub fn mandatory(self, kind: StatementKind) -> Self {
        self.bounded(kind, 1, 1)
    }

    /// Accepts zero or one child of `kind`.
    #[must_use]
    pub fn optional(self, kind: StatementKind) -> Self {
        self.bounded(kind, 0, 1)
    }

    /// Accepts any number of children of `kind`.
    #[must_use]
    pub fn any(self, kind: StatementKind) -> Self {
        self.bounded(kind, 0, u32::MAX)
    }

    /// Accepts at least one child of `kind`.
    #[must_use]
    pub fn at_least_one(self, kind: StatementKind) -> Self {
        self.bounded(kind, 1, u32::MAX)
    }

    /// Accepts between `min` and `max` children of `kind`.
    #[must_use]
    pub fn bounded(mut self, kind: StatementKind, min: u32, max: u32) -> Self {
        self.allowed.insert(kind, Cardinality { min, max });
        self
    }

    /// Validates the observed child kinds of a statement.
    ///
    /// # Errors
    /// Returns a source error naming the statement, the offending child
    /// kind, and the expected cardinality.
    pub fn validate(
        &self,
        parent: StatementKind,
        children: &[StatementKind],
        reference: &StatementRef,
    ) -> Result<()> {
        let mut counts: HashMap<StatementKind, u32> = HashMap::new();
        for child in children {
            *counts.entry(*child).or_insert(0) += 1;
        }

        for (kind, count) in &counts {
            if *kind == StatementKind::Unknown {
                if self.allow_unknown {
                    continue;
                }
                return Err(Error::source(
                    format!("statement \"{parent}\" does not accept extension substatements"),
                    reference.clone(),
                ));
            }
            let Some(cardinality) = self.allowed.get(kind) else {
                return Err(Error::source(
                    format!("statement \"{kind}\" is not valid within \"{parent}\""),
                    reference.clone(),
                ));
            };
            if *count > cardinality.max {
                return Err(Error::source(
                    format!(
                        "statement \"{parent}\" accepts at most {} \"{kind}\" substatement(s), found {count}",
                        cardinality.max
                    ),
                    reference.clone(),
                ));
            }
        }

        for (kind, cardinality) in &self.allowed {
            let count = counts.get(kind).copied().unwrap_or(0);
            if count < cardinality.min {
                return Err(Error::source(
                    format!(
                        "statement \"{parent}\" requires at least {} \"{kind}\" substatement(s), found {count}",
                        cardinality.min
                    ),
                    reference.clone(),
                ));
            }
        }

        Ok(())
    }
}
