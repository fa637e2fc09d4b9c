//! Effective schema-tree nodes.
//!
//! The schema tree is the data-bearing hierarchy after groupings have been
//! expanded and augmentations applied. Composite nodes index their children
//! by QName at construction time; duplicate child names are a verification
//! failure, caught when the node is built rather than at lookup time.

use std::sync::Arc;

use yangmill_foundation::{Error, QName, QNameModule, Result};

use crate::arg::{BuiltinType, MaxElements, OrderedBy, Status};
use crate::declared::DeclaredStatement;

/// Resolved type of a leaf or leaf-list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeEffective {
    /// The type name as resolved (built-in name or typedef QName string).
    pub name: Arc<str>,
    /// The fully-resolved base built-in type.
    pub base: BuiltinType,
}

impl TypeEffective {
    /// Creates a type referring directly to a built-in.
    #[must_use]
    pub fn builtin(base: BuiltinType) -> Self {
        Self {
            name: base.name().into(),
            base,
        }
    }
}

/// Per-kind payload of a schema node.
#[derive(Clone, Debug, PartialEq)]
pub enum SchemaNodeKind {
    /// An interior data node.
    Container {
        /// Presence description; `Some` makes the container a presence
        /// container.
        presence: Option<Arc<str>>,
    },
    /// A single typed value.
    Leaf {
        /// Resolved value type.
        ty: TypeEffective,
        /// Default value, if declared.
        default: Option<Arc<str>>,
        /// Units string, if declared.
        units: Option<Arc<str>>,
        /// Whether a value must be present.
        mandatory: bool,
    },
    /// A sequence of typed values.
    LeafList {
        /// Resolved value type.
        ty: TypeEffective,
        /// Entry ordering.
        ordered_by: OrderedBy,
        /// Lower cardinality bound.
        min_elements: u64,
        /// Upper cardinality bound.
        max_elements: MaxElements,
    },
    /// A sequence of entries, keyed or unkeyed.
    List {
        /// Key leaf names, in declared order; empty for unkeyed lists.
        keys: Box<[QName]>,
        /// Entry ordering.
        ordered_by: OrderedBy,
        /// Lower cardinality bound.
        min_elements: u64,
        /// Upper cardinality bound.
        max_elements: MaxElements,
    },
    /// A choice between cases; only case children may appear below it.
    Choice {
        /// Default case, if declared.
        default: Option<QName>,
        /// Whether one case must be present.
        mandatory: bool,
    },
    /// One alternative under a choice.
    Case,
    /// An operation; children are its input and output.
    Rpc,
    /// Operation input.
    Input,
    /// Operation output.
    Output,
}

impl SchemaNodeKind {
    /// Returns true if nodes of this kind may carry children.
    #[must_use]
    pub const fn is_composite(&self) -> bool {
        !matches!(self, Self::Leaf { .. } | Self::LeafList { .. })
    }
}

/// One effective schema-tree node.
#[derive(Clone, Debug, PartialEq)]
pub struct SchemaNode {
    /// Qualified name of the node.
    pub qname: QName,
    /// Per-kind payload.
    pub kind: SchemaNodeKind,
    /// Whether this node represents configuration (`config true`).
    pub config: bool,
    /// Definition lifecycle.
    pub status: Status,
    /// Description text, if declared.
    pub description: Option<Arc<str>>,
    /// Child schema-tree nodes, sorted by QName.
    pub children: SchemaChildren,
    /// Modules whose augments contributed children to this node.
    pub augmented_by: Box<[QNameModule]>,
    /// The statement this node was built from.
    pub statement: Arc<DeclaredStatement>,
}

impl SchemaNode {
    /// Looks up a direct schema-tree child by QName.
    #[must_use]
    pub fn schema_tree_child(&self, qname: &QName) -> Option<&Arc<SchemaNode>> {
        self.children.child(qname)
    }

    /// Returns the case children of a choice node.
    ///
    /// Empty for non-choice nodes, since only case statements may appear
    /// under a choice.
    pub fn case_children(&self) -> impl Iterator<Item = &Arc<SchemaNode>> {
        self.children
            .iter()
            .filter(|c| matches!(c.kind, SchemaNodeKind::Case))
    }
}

/// QName-sorted child array supporting binary-search lookup.
///
/// Construction verifies that all child QNames are pairwise distinct;
/// a duplicate is a modeling defect surfaced as a [`Error::verify`] at
/// build time.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct SchemaChildren {
    sorted: Box<[Arc<SchemaNode>]>,
}

impl SchemaChildren {
    /// Creates an empty child set.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds the sorted index from a list of children.
    ///
    /// # Errors
    /// Returns a verification error naming both occurrences if two
    /// children share a QName.
    pub fn new(mut children: Vec<Arc<SchemaNode>>) -> Result<Self> {
        children.sort_by(|a, b| a.qname.cmp(&b.qname));
        for pair in children.windows(2) {
            if pair[0].qname == pair[1].qname {
                return Err(Error::verify(format!(
                    "duplicate schema-tree child {}",
                    pair[0].qname
                )));
            }
        }
        Ok(Self {
            sorted: children.into_boxed_slice(),
        })
    }

    /// Looks up a child by QName via binary search.
    #[must_use]
    pub fn child(&self, qname: &QName) -> Option<&Arc<SchemaNode>> {
        self.sorted
            .binary_search_by(|c| c.qname.cmp(qname))
            .ok()
            .map(|idx| &self.sorted[idx])
    }

    /// Returns the number of children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    /// Returns true if there are no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    /// Returns an iterator over the children in QName order.
    pub fn iter(&self) -> std::slice::Iter<'_, Arc<SchemaNode>> {
        self.sorted.iter()
    }
}

impl<'a> IntoIterator for &'a SchemaChildren {
    type Item = &'a Arc<SchemaNode>;
    type IntoIter = std::slice::Iter<'a, Arc<SchemaNode>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
