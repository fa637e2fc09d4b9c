//! Runtime-type shapes: generated binding types paired with their schema
//! nodes and indexed for fast lookup in both directions.

use std::collections::HashMap;
use std::sync::Arc;

use yangmill_foundation::{Error, QName, Result};
use yangmill_model::SchemaNode;

use crate::name::{GeneratedType, TypeName};

/// A resolved pairing of a generated binding type with its schema
/// statement.
#[derive(Clone, Debug)]
pub enum RuntimeType {
    /// A composite node: container, list entry, case, input, output.
    Composite(Arc<CompositeRuntimeType>),
    /// A choice node.
    Choice(Arc<ChoiceRuntimeType>),
    /// A leaf or leaf-list.
    Leaf(Arc<LeafRuntimeType>),
}

impl RuntimeType {
    /// Returns the binding type name of this runtime type, if it has a
    /// generated class of its own.
    #[must_use]
    pub fn binding_type(&self) -> Option<&TypeName> {
        match self {
            Self::Composite(c) => Some(&c.binding_type.name),
            Self::Choice(c) => Some(&c.binding_type.name),
            Self::Leaf(_) => None,
        }
    }

    /// Returns the schema-tree QName of this runtime type.
    #[must_use]
    pub fn qname(&self) -> &QName {
        match self {
            Self::Composite(c) => &c.statement.qname,
            Self::Choice(c) => &c.statement.qname,
            Self::Leaf(l) => &l.statement.qname,
        }
    }

    /// Returns the originating schema statement.
    #[must_use]
    pub fn statement(&self) -> &Arc<SchemaNode> {
        match self {
            Self::Composite(c) => &c.statement,
            Self::Choice(c) => &c.statement,
            Self::Leaf(l) => &l.statement,
        }
    }
}

/// A leaf or leaf-list runtime type.
#[derive(Clone, Debug)]
pub struct LeafRuntimeType {
    /// The originating schema statement.
    pub statement: Arc<SchemaNode>,
}

/// A composite runtime type: a generated binding type over a composite
/// schema node, with both indices built once at construction.
#[derive(Clone, Debug)]
pub struct CompositeRuntimeType {
    /// The generated binding type.
    pub binding_type: GeneratedType,
    /// The originating schema statement.
    pub statement: Arc<SchemaNode>,
    /// Children sorted by QName; binary-searchable.
    schema_children: Box<[RuntimeType]>,
    /// Class-identity index into `schema_children`.
    by_class: HashMap<TypeName, usize>,
}

impl CompositeRuntimeType {
    /// Builds the composite's indices over its children.
    ///
    /// # Errors
    /// Returns a verification error if two children share a QName; the
    /// data modeling error is caught here, at construction, rather than
    /// surfacing as a wrong binary-search result later.
    pub fn new(
        binding_type: GeneratedType,
        statement: Arc<SchemaNode>,
        mut children: Vec<RuntimeType>,
    ) -> Result<Arc<Self>> {
        children.sort_by(|a, b| a.qname().cmp(b.qname()));
        for pair in children.windows(2) {
            if pair[0].qname() == pair[1].qname() {
                return Err(Error::verify(format!(
                    "schema-tree children of {} share QName {}",
                    binding_type.name,
                    pair[0].qname()
                )));
            }
        }

        let mut by_class = HashMap::new();
        for (index, child) in children.iter().enumerate() {
            if let Some(name) = child.binding_type() {
                by_class.insert(name.clone(), index);
            }
        }

        Ok(Arc::new(Self {
            binding_type,
            statement,
            schema_children: children.into_boxed_slice(),
            by_class,
        }))
    }

    /// Looks up a child by schema-tree QName via binary search.
    #[must_use]
    pub fn schema_tree_child(&self, qname: &QName) -> Option<&RuntimeType> {
        self.schema_children
            .binary_search_by(|c| c.qname().cmp(qname))
            .ok()
            .map(|index| &self.schema_children[index])
    }

    /// Looks up a child by its generated type name.
    #[must_use]
    pub fn child_by_class(&self, name: &TypeName) -> Option<&RuntimeType> {
        self.by_class.get(name).map(|index| &self.schema_children[*index])
    }

    /// Returns all children in QName order.
    pub fn children(&self) -> impl Iterator<Item = &RuntimeType> {
        self.schema_children.iter()
    }
}

/// A choice runtime type with its valid cases.
///
/// A choice instantiated from another declaration (for example through a
/// grouping) keeps a reference to its original; augmentation-added cases
/// visible through the original but absent locally are reported as
/// additional cases.
#[derive(Clone, Debug)]
pub struct ChoiceRuntimeType {
    /// The generated binding type.
    pub binding_type: GeneratedType,
    /// The originating schema statement.
    pub statement: Arc<SchemaNode>,
    /// Cases declared or augmented directly on this instantiation.
    valid_cases: Box<[Arc<CompositeRuntimeType>]>,
    /// The original declaration's runtime type, if this is derived.
    original: Option<Arc<ChoiceRuntimeType>>,
}

impl ChoiceRuntimeType {
    /// Creates a choice runtime type for an original declaration.
    #[must_use]
    pub fn new(
        binding_type: GeneratedType,
        statement: Arc<SchemaNode>,
        valid_cases: Vec<Arc<CompositeRuntimeType>>,
    ) -> Arc<Self> {
        Arc::new(Self {
            binding_type,
            statement,
            valid_cases: valid_cases.into_boxed_slice(),
            original: None,
        })
    }

    /// Creates a derived choice runtime type pointing at its original.
    #[must_use]
    pub fn derived(
        binding_type: GeneratedType,
        statement: Arc<SchemaNode>,
        valid_cases: Vec<Arc<CompositeRuntimeType>>,
        original: Arc<ChoiceRuntimeType>,
    ) -> Arc<Self> {
        Arc::new(Self {
            binding_type,
            statement,
            valid_cases: valid_cases.into_boxed_slice(),
            original: Some(original),
        })
    }

    /// Returns the cases contributed directly to this instantiation.
    pub fn valid_case_children(&self) -> impl Iterator<Item = &Arc<CompositeRuntimeType>> {
        self.valid_cases.iter()
    }

    /// Looks up a case by its generated type name, considering both
    /// direct and additional cases.
    #[must_use]
    pub fn case_by_class(&self, name: &TypeName) -> Option<Arc<CompositeRuntimeType>> {
        if let Some(found) = self
            .valid_cases
            .iter()
            .find(|c| &c.binding_type.name == name)
        {
            return Some(Arc::clone(found));
        }
        self.additional_case_children()
            .into_iter()
            .find(|c| &c.binding_type.name == name)
    }

    /// Computes the cases visible through the original declaration but
    /// not contributed to this instantiation directly.
    ///
    /// Recomputed on every call; augmentation sets are small and the
    /// saving of a cached copy has not been worth the footprint.
    #[must_use]
    pub fn additional_case_children(&self) -> Vec<Arc<CompositeRuntimeType>> {
        let Some(original) = &self.original else {
            return Vec::new();
        };

        let mut additional = Vec::new();
        for case in original
            .valid_case_children()
            .cloned()
            .chain(original.additional_case_children())
        {
            let local = self
                .valid_cases
                .iter()
                .any(|own| own.binding_type.name == case.binding_type.name);
            let seen = additional
                .iter()
                .any(|a: &Arc<CompositeRuntimeType>| a.binding_type.name == case.binding_type.name);
            if !local && !seen {
                additional.push(case);
            }
        }
        additional
    }
}
