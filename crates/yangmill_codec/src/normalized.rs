//! The normalized, schema-aware data tree.
//!
//! Child maps are persistent structures; cloning a subtree is cheap and
//! shares storage with the original.

use std::sync::Arc;

use yangmill_foundation::QName;
use yangmill_model::Value;

/// One node of the normalized data tree.
#[derive(Clone, Debug, PartialEq)]
pub enum NormalizedNode {
    /// An interior container.
    Container {
        /// Node name.
        qname: QName,
        /// Children keyed by QName.
        children: im::OrdMap<QName, Arc<NormalizedNode>>,
    },
    /// A keyed list holding its entries in emission order.
    Map {
        /// List name.
        qname: QName,
        /// Entries, each a [`NormalizedNode::MapEntry`].
        entries: im::Vector<Arc<NormalizedNode>>,
    },
    /// One keyed list entry.
    MapEntry {
        /// List name.
        qname: QName,
        /// Key leaf values, in key declaration order.
        key: Vec<(QName, Value)>,
        /// Children keyed by QName.
        children: im::OrdMap<QName, Arc<NormalizedNode>>,
    },
    /// An unkeyed list holding its items in emission order.
    UnkeyedList {
        /// List name.
        qname: QName,
        /// Items, each a [`NormalizedNode::UnkeyedListItem`].
        entries: im::Vector<Arc<NormalizedNode>>,
    },
    /// One unkeyed list item.
    UnkeyedListItem {
        /// List name.
        qname: QName,
        /// Children keyed by QName.
        children: im::OrdMap<QName, Arc<NormalizedNode>>,
    },
    /// A choice with its active case's children inlined.
    Choice {
        /// Choice name.
        qname: QName,
        /// The case that was active, if one was emitted.
        case: Option<QName>,
        /// Children keyed by QName.
        children: im::OrdMap<QName, Arc<NormalizedNode>>,
    },
    /// A single leaf value.
    Leaf {
        /// Leaf name.
        qname: QName,
        /// The value.
        value: Value,
    },
    /// A leaf-list with its values in order.
    LeafSet {
        /// Leaf-list name.
        qname: QName,
        /// Values in emission order.
        values: im::Vector<Value>,
    },
}

impl NormalizedNode {
    /// Returns the node's QName.
    #[must_use]
    pub fn qname(&self) -> &QName {
        match self {
            Self::Container { qname, .. }
            | Self::Map { qname, .. }
            | Self::MapEntry { qname, .. }
            | Self::UnkeyedList { qname, .. }
            | Self::UnkeyedListItem { qname, .. }
            | Self::Choice { qname, .. }
            | Self::Leaf { qname, .. }
            | Self::LeafSet { qname, .. } => qname,
        }
    }

    /// Returns a named child of a container-like node.
    #[must_use]
    pub fn child(&self, qname: &QName) -> Option<&Arc<NormalizedNode>> {
        match self {
            Self::Container { children, .. }
            | Self::MapEntry { children, .. }
            | Self::UnkeyedListItem { children, .. }
            | Self::Choice { children, .. } => children.get(qname),
            _ => None,
        }
    }

    /// Returns the entries of a list node.
    #[must_use]
    pub fn entries(&self) -> Option<&im::Vector<Arc<NormalizedNode>>> {
        match self {
            Self::Map { entries, .. } | Self::UnkeyedList { entries, .. } => Some(entries),
            _ => None,
        }
    }

    /// Returns the leaf value, if this is a leaf.
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Leaf { value, .. } => Some(value),
            _ => None,
        }
    }
}
