//! Schema-driven serializer plans and their per-class registry.
//!
//! Instead of generating code at runtime, a serializer here is an
//! interpreted step table derived once from the (generated type, schema
//! node) pair. The contract matches the generated-class design it
//! replaces: one serializer per binding class, built at most once,
//! resolved recursively through the registry so cyclic schema structures
//! terminate, with choice and augmentation content dispatched on the
//! instance's actual class at emission time.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use log::debug;

use yangmill_binding::{BindingRuntimeTypes, CompositeRuntimeType, RuntimeType, TypeName};
use yangmill_foundation::{Error, QName, QNameModule, Result};
use yangmill_model::SchemaNodeKind;

use crate::object::DataObject;
use crate::stream::BindingStreamWriter;

/// The event opening a serialized node.
#[derive(Clone, Debug)]
enum StartEvent {
    Container(QName),
    MapEntry { qname: QName, keys: Box<[QName]> },
    UnkeyedListItem(QName),
    Case(QName),
}

/// One emission step of a serializer plan.
#[derive(Clone, Debug)]
enum Step {
    Leaf(QName),
    LeafList(QName),
    Container { qname: QName, child_type: TypeName },
    List {
        qname: QName,
        entry_type: TypeName,
        keyed: bool,
    },
    Choice { qname: QName, choice_type: TypeName },
    Augmentations,
}

/// An interpreted serializer for one binding class.
pub struct ObjectSerializer {
    binding_type: TypeName,
    start: StartEvent,
    steps: Box<[Step]>,
}

impl ObjectSerializer {
    /// Walks a binding instance, emitting its structure to the writer.
    ///
    /// # Errors
    /// Returns a verification error when the instance does not match the
    /// plan's binding class, and propagates writer failures.
    pub fn serialize(
        &self,
        registry: &SerializerRegistry,
        object: &DataObject,
        writer: &mut dyn BindingStreamWriter,
    ) -> Result<()> {
        if object.binding_type() != &self.binding_type {
            return Err(Error::verify(format!(
                "serializer for {} applied to an instance of {}",
                self.binding_type,
                object.binding_type()
            )));
        }

        match &self.start {
            StartEvent::Container(qname) => writer.start_container(qname.clone())?,
            StartEvent::MapEntry { qname, keys } => {
                let mut key = Vec::with_capacity(keys.len());
                for k in keys {
                    let value = object.leaf(k).ok_or_else(|| {
                        Error::invalid_value("map entry key", k.to_string())
                    })?;
                    key.push((k.clone(), value.clone()));
                }
                writer.start_map_entry(qname.clone(), key)?;
            }
            StartEvent::UnkeyedListItem(qname) => {
                writer.start_unkeyed_list_item(qname.clone())?;
            }
            StartEvent::Case(qname) => writer.start_case(qname.clone())?,
        }

        for step in &self.steps {
            match step {
                Step::Leaf(qname) => {
                    if let Some(value) = object.leaf(qname) {
                        writer.leaf(qname.clone(), value.clone())?;
                    }
                }
                Step::LeafList(qname) => {
                    if let Some(values) = object.leaf_list(qname) {
                        writer.leaf_list(qname.clone(), values.to_vec())?;
                    }
                }
                Step::Container { qname, child_type } => {
                    if let Some(child) = object.container(qname) {
                        let serializer = registry.get_serializer(child_type)?;
                        serializer.serialize(registry, child, writer)?;
                    }
                }
                Step::List {
                    qname,
                    entry_type,
                    keyed,
                } => {
                    let Some(entries) = object.list(qname) else {
                        continue;
                    };
                    if *keyed {
                        writer.start_map(qname.clone())?;
                    } else {
                        writer.start_unkeyed_list(qname.clone())?;
                    }
                    let serializer = registry.get_serializer(entry_type)?;
                    for entry in entries {
                        serializer.serialize(registry, entry, writer)?;
                    }
                    writer.end_node()?;
                }
                Step::Choice { qname, choice_type } => {
                    if let Some(case_object) = object.choice(qname) {
                        writer.start_choice(qname.clone())?;
                        registry.stream_case(choice_type, case_object, writer)?;
                        writer.end_node()?;
                    }
                }
                Step::Augmentations => {
                    for augmentation in object.augmentations() {
                        registry.stream_augmentation(&self.binding_type, augmentation, writer)?;
                    }
                }
            }
        }

        writer.end_node()
    }
}

/// Per-class serializer cache over a runtime-type index.
///
/// Entries are built lazily on first request and live as long as the
/// registry. Concurrent misses on one class may race to build; the cache
/// insert deduplicates, so the loser's product is discarded and every
/// caller observes the same serializer instance.
pub struct SerializerRegistry {
    types: Arc<BindingRuntimeTypes>,
    cache: RwLock<HashMap<TypeName, Arc<ObjectSerializer>>>,
}

impl SerializerRegistry {
    /// Creates a registry over a runtime-type index.
    #[must_use]
    pub fn new(types: Arc<BindingRuntimeTypes>) -> Self {
        Self {
            types,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the underlying runtime-type index.
    #[must_use]
    pub fn runtime_types(&self) -> &Arc<BindingRuntimeTypes> {
        &self.types
    }

    /// Returns the serializer for a binding class, building it on first
    /// use.
    ///
    /// # Errors
    /// Returns a verification error if the class has no runtime type or
    /// is not a serializable composite.
    pub fn get_serializer(&self, name: &TypeName) -> Result<Arc<ObjectSerializer>> {
        if let Some(hit) = self.read_cache()?.get(name) {
            return Ok(Arc::clone(hit));
        }

        // Built outside the lock; a concurrent builder may win the
        // insert below, in which case this product is dropped.
        let built = self.build_serializer(name)?;
        let mut cache = self
            .cache
            .write()
            .map_err(|_| Error::verify("serializer cache poisoned"))?;
        Ok(Arc::clone(cache.entry(name.clone()).or_insert(built)))
    }

    fn read_cache(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, HashMap<TypeName, Arc<ObjectSerializer>>>> {
        self.cache
            .read()
            .map_err(|_| Error::verify("serializer cache poisoned"))
    }

    /// Builds a plan from the class's runtime type, dispatching on its
    /// schema-node kind.
    fn build_serializer(&self, name: &TypeName) -> Result<Arc<ObjectSerializer>> {
        let Some(RuntimeType::Composite(composite)) = self.types.type_for_class(name) else {
            return Err(Error::verify(format!(
                "no serializable runtime type for class {name}"
            )));
        };
        debug!("building serializer for {name}");

        let statement = &composite.statement;
        let qname = statement.qname.clone();
        let start = match &statement.kind {
            SchemaNodeKind::Container { .. }
            | SchemaNodeKind::Input
            | SchemaNodeKind::Output => StartEvent::Container(qname),
            SchemaNodeKind::List { keys, .. } if !keys.is_empty() => StartEvent::MapEntry {
                qname,
                keys: keys.clone(),
            },
            SchemaNodeKind::List { .. } => StartEvent::UnkeyedListItem(qname),
            SchemaNodeKind::Case => StartEvent::Case(qname),
            other => {
                return Err(Error::verify(format!(
                    "schema node kind {other:?} of {name} is not serializable"
                )));
            }
        };

        let mut steps = Vec::new();
        for child in composite.children() {
            match child {
                RuntimeType::Leaf(leaf) => match &leaf.statement.kind {
                    SchemaNodeKind::LeafList { .. } => {
                        steps.push(Step::LeafList(leaf.statement.qname.clone()));
                    }
                    _ => steps.push(Step::Leaf(leaf.statement.qname.clone())),
                },
                RuntimeType::Composite(child_composite) => {
                    let child_qname = child_composite.statement.qname.clone();
                    match &child_composite.statement.kind {
                        SchemaNodeKind::List { keys, .. } => steps.push(Step::List {
                            qname: child_qname,
                            entry_type: child_composite.binding_type.name.clone(),
                            keyed: !keys.is_empty(),
                        }),
                        _ => steps.push(Step::Container {
                            qname: child_qname,
                            child_type: child_composite.binding_type.name.clone(),
                        }),
                    }
                }
                RuntimeType::Choice(choice) => steps.push(Step::Choice {
                    qname: choice.statement.qname.clone(),
                    choice_type: choice.binding_type.name.clone(),
                }),
            }
        }
        steps.push(Step::Augmentations);

        Ok(Arc::new(ObjectSerializer {
            binding_type: name.clone(),
            start,
            steps: steps.into_boxed_slice(),
        }))
    }

    /// Choice dispatch: resolves the instance's actual case class at
    /// emission time, since the static choice type cannot know which
    /// case is present.
    fn stream_case(
        &self,
        choice_type: &TypeName,
        case_object: &DataObject,
        writer: &mut dyn BindingStreamWriter,
    ) -> Result<()> {
        let Some(RuntimeType::Choice(choice)) = self.types.type_for_class(choice_type) else {
            return Err(Error::verify(format!(
                "no choice runtime type for class {choice_type}"
            )));
        };
        let case = choice
            .case_by_class(case_object.binding_type())
            .ok_or_else(|| {
                Error::invalid_value(
                    "choice case class",
                    format!("{} is not a case of {choice_type}", case_object.binding_type()),
                )
            })?;
        let serializer = self.get_serializer(&case.binding_type.name)?;
        serializer.serialize(self, case_object, writer)
    }

    /// Augmentation dispatch: the augmentation's children are schema
    /// children of the augmented composite, resolved through the parent's
    /// runtime type at emission time.
    fn stream_augmentation(
        &self,
        parent_type: &TypeName,
        augmentation: &DataObject,
        writer: &mut dyn BindingStreamWriter,
    ) -> Result<()> {
        let Some(module) = augmentation_module(augmentation) else {
            // An augmentation instance with no content emits nothing.
            return Ok(());
        };
        let Some(RuntimeType::Composite(parent)) = self.types.type_for_class(parent_type) else {
            return Err(Error::verify(format!(
                "no composite runtime type for augmented class {parent_type}"
            )));
        };

        writer.start_augmentation(module)?;
        for (qname, value) in augmentation.leaves() {
            writer.leaf(qname.clone(), value.clone())?;
        }
        for (qname, values) in augmentation.leaf_lists() {
            writer.leaf_list(qname.clone(), values.to_vec())?;
        }
        for (qname, child) in augmentation.containers() {
            let composite = self.augmented_child(parent, qname)?;
            let serializer = self.get_serializer(&composite.binding_type.name)?;
            serializer.serialize(self, child, writer)?;
        }
        for (qname, entries) in augmentation.lists() {
            let composite = self.augmented_child(parent, qname)?;
            let keyed = matches!(
                &composite.statement.kind,
                SchemaNodeKind::List { keys, .. } if !keys.is_empty()
            );
            if keyed {
                writer.start_map(qname.clone())?;
            } else {
                writer.start_unkeyed_list(qname.clone())?;
            }
            let serializer = self.get_serializer(&composite.binding_type.name)?;
            for entry in entries {
                serializer.serialize(self, entry, writer)?;
            }
            writer.end_node()?;
        }
        writer.end_node()
    }

    fn augmented_child<'a>(
        &self,
        parent: &'a CompositeRuntimeType,
        qname: &QName,
    ) -> Result<&'a Arc<CompositeRuntimeType>> {
        match parent.schema_tree_child(qname) {
            Some(RuntimeType::Composite(composite)) => Ok(composite),
            _ => Err(Error::invalid_value(
                "augmentation child",
                qname.to_string(),
            )),
        }
    }
}

/// Derives the augmenting module from an augmentation instance's
/// populated children; they all carry the augmenting module's namespace.
fn augmentation_module(augmentation: &DataObject) -> Option<QNameModule> {
    augmentation
        .leaves()
        .map(|(q, _)| q)
        .chain(augmentation.leaf_lists().map(|(q, _)| q))
        .chain(augmentation.containers().map(|(q, _)| q))
        .chain(augmentation.lists().map(|(q, _)| q))
        .next()
        .map(|q| q.module.clone())
}
