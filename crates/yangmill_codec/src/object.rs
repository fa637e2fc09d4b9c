//! Dynamic binding instances.
//!
//! A [`DataObject`] stands in for a generated binding class: it carries
//! its generated type's identity plus accessor metadata the interpreted
//! serializer walks at call time. Choice content and augmentations are
//! carried by the *instance*, not the static type, which is why the
//! serializer resolves their classes through the registry at emission
//! time.

use std::collections::BTreeMap;

use yangmill_binding::TypeName;
use yangmill_foundation::QName;
use yangmill_model::Value;

/// A dynamic binding instance.
#[derive(Clone, Debug, PartialEq)]
pub struct DataObject {
    binding_type: TypeName,
    leaves: BTreeMap<QName, Value>,
    leaf_lists: BTreeMap<QName, Vec<Value>>,
    containers: BTreeMap<QName, DataObject>,
    lists: BTreeMap<QName, Vec<DataObject>>,
    choices: BTreeMap<QName, DataObject>,
    augmentations: Vec<DataObject>,
}

impl DataObject {
    /// Creates an empty instance of the given binding type.
    #[must_use]
    pub fn new(binding_type: TypeName) -> Self {
        Self {
            binding_type,
            leaves: BTreeMap::new(),
            leaf_lists: BTreeMap::new(),
            containers: BTreeMap::new(),
            lists: BTreeMap::new(),
            choices: BTreeMap::new(),
            augmentations: Vec::new(),
        }
    }

    /// Returns the instance's binding type.
    #[must_use]
    pub fn binding_type(&self) -> &TypeName {
        &self.binding_type
    }

    /// Sets a leaf value.
    #[must_use]
    pub fn with_leaf(mut self, qname: QName, value: Value) -> Self {
        self.leaves.insert(qname, value);
        self
    }

    /// Sets a leaf-list's values.
    #[must_use]
    pub fn with_leaf_list(mut self, qname: QName, values: Vec<Value>) -> Self {
        self.leaf_lists.insert(qname, values);
        self
    }

    /// Sets a child container object.
    #[must_use]
    pub fn with_container(mut self, qname: QName, child: DataObject) -> Self {
        self.containers.insert(qname, child);
        self
    }

    /// Sets a list's entry objects.
    #[must_use]
    pub fn with_list(mut self, qname: QName, entries: Vec<DataObject>) -> Self {
        self.lists.insert(qname, entries);
        self
    }

    /// Sets the active case object of a choice. The case object's
    /// binding type identifies which case is active.
    #[must_use]
    pub fn with_choice(mut self, choice: QName, case: DataObject) -> Self {
        self.choices.insert(choice, case);
        self
    }

    /// Attaches an augmentation instance.
    #[must_use]
    pub fn with_augmentation(mut self, augmentation: DataObject) -> Self {
        self.augmentations.push(augmentation);
        self
    }

    /// Returns a leaf value.
    #[must_use]
    pub fn leaf(&self, qname: &QName) -> Option<&Value> {
        self.leaves.get(qname)
    }

    /// Returns a leaf-list's values.
    #[must_use]
    pub fn leaf_list(&self, qname: &QName) -> Option<&[Value]> {
        self.leaf_lists.get(qname).map(Vec::as_slice)
    }

    /// Returns a child container object.
    #[must_use]
    pub fn container(&self, qname: &QName) -> Option<&DataObject> {
        self.containers.get(qname)
    }

    /// Returns a list's entries.
    #[must_use]
    pub fn list(&self, qname: &QName) -> Option<&[DataObject]> {
        self.lists.get(qname).map(Vec::as_slice)
    }

    /// Returns the active case object of a choice.
    #[must_use]
    pub fn choice(&self, qname: &QName) -> Option<&DataObject> {
        self.choices.get(qname)
    }

    /// Returns the attached augmentations.
    #[must_use]
    pub fn augmentations(&self) -> &[DataObject] {
        &self.augmentations
    }

    /// Iterates over all leaf values in QName order.
    pub fn leaves(&self) -> impl Iterator<Item = (&QName, &Value)> {
        self.leaves.iter()
    }

    /// Iterates over all leaf-lists in QName order.
    pub fn leaf_lists(&self) -> impl Iterator<Item = (&QName, &[Value])> {
        self.leaf_lists.iter().map(|(q, v)| (q, v.as_slice()))
    }

    /// Iterates over all child containers in QName order.
    pub fn containers(&self) -> impl Iterator<Item = (&QName, &DataObject)> {
        self.containers.iter()
    }

    /// Iterates over all lists in QName order.
    pub fn lists(&self) -> impl Iterator<Item = (&QName, &[DataObject])> {
        self.lists.iter().map(|(q, v)| (q, v.as_slice()))
    }
}
