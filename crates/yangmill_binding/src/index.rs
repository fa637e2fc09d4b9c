//! The global runtime-type index.
//!
//! Built once, atomically, from a frozen effective model; never mutated
//! afterward. All consumers see one consistent snapshot.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use yangmill_foundation::{Error, QName, QNameModule, Result};
use yangmill_model::{
    EffectiveModelContext, IdentityEffective, SchemaNode, SchemaNodeKind,
};

use crate::name::{GeneratedType, TypeName, module_package, simple_name};
use crate::runtime::{ChoiceRuntimeType, CompositeRuntimeType, LeafRuntimeType, RuntimeType};

/// Runtime view of one RPC: its input and output composites.
#[derive(Clone, Debug)]
pub struct RpcRuntimeType {
    /// The operation's QName.
    pub qname: QName,
    /// Input composite.
    pub input: Arc<CompositeRuntimeType>,
    /// Output composite.
    pub output: Arc<CompositeRuntimeType>,
}

/// The global, built-once index over generated binding types.
#[derive(Debug, Default)]
pub struct BindingRuntimeTypes {
    modules_by_namespace: BTreeMap<QNameModule, String>,
    modules_by_package: BTreeMap<String, QNameModule>,
    identities_by_qname: HashMap<QName, IdentityEffective>,
    rpcs_by_qname: HashMap<QName, RpcRuntimeType>,
    choice_cases: HashMap<TypeName, Vec<TypeName>>,
    types_by_class: HashMap<TypeName, RuntimeType>,
}

impl BindingRuntimeTypes {
    /// Builds the index from a frozen effective model.
    ///
    /// # Errors
    /// Returns a verification error if the model maps two nodes onto the
    /// same generated type name.
    pub fn create(context: &EffectiveModelContext) -> Result<Self> {
        BindingMapper::new().map(context)
    }

    /// Returns the generated package of a module.
    #[must_use]
    pub fn find_module_package(&self, module: &QNameModule) -> Option<&str> {
        self.modules_by_namespace.get(module).map(String::as_str)
    }

    /// Returns the module owning a package, by longest-prefix (floor)
    /// lookup over the sorted package map; nested subpackages resolve to
    /// their module.
    #[must_use]
    pub fn find_module_for_package(&self, package: &str) -> Option<&QNameModule> {
        let (candidate, module) = self
            .modules_by_package
            .range(..=package.to_string())
            .next_back()?;
        if package == candidate || package.starts_with(&format!("{candidate}.")) {
            Some(module)
        } else {
            None
        }
    }

    /// Looks up an identity by QName.
    #[must_use]
    pub fn identity(&self, qname: &QName) -> Option<&IdentityEffective> {
        self.identities_by_qname.get(qname)
    }

    /// Looks up an RPC by QName.
    #[must_use]
    pub fn rpc(&self, qname: &QName) -> Option<&RpcRuntimeType> {
        self.rpcs_by_qname.get(qname)
    }

    /// Looks up a runtime type by its generated type name.
    #[must_use]
    pub fn type_for_class(&self, name: &TypeName) -> Option<&RuntimeType> {
        self.types_by_class.get(name)
    }

    /// Returns the schema node paired with a generated type name.
    #[must_use]
    pub fn schema_for_class(&self, name: &TypeName) -> Option<&Arc<SchemaNode>> {
        self.types_by_class.get(name).map(RuntimeType::statement)
    }

    /// Returns the valid case types of a choice type.
    #[must_use]
    pub fn choice_cases(&self, choice: &TypeName) -> &[TypeName] {
        self.choice_cases
            .get(choice)
            .map_or(&[], Vec::as_slice)
    }

    /// Returns the number of indexed generated types.
    #[must_use]
    pub fn type_count(&self) -> usize {
        self.types_by_class.len()
    }
}

/// Derives generated binding types from an effective model and builds
/// the runtime-type index over them.
#[derive(Debug, Default)]
pub struct BindingMapper {
    index: BindingRuntimeTypes,
}

impl BindingMapper {
    /// Creates a mapper.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps every module of the context.
    ///
    /// # Errors
    /// Returns a verification error on generated-type name collisions.
    pub fn map(mut self, context: &EffectiveModelContext) -> Result<BindingRuntimeTypes> {
        for module in context.modules() {
            let package = module_package(&module.module);
            self.index
                .modules_by_namespace
                .insert(module.module.clone(), package.clone());
            self.index
                .modules_by_package
                .insert(package.clone(), module.module.clone());

            for identity in &module.identities {
                self.index
                    .identities_by_qname
                    .insert(identity.qname.clone(), identity.clone());
            }

            let module_type = TypeName::new(package, "Data");
            for child in &module.children {
                self.map_node(&module_type, child)?;
            }

            for rpc in &module.rpcs {
                let rpc_type =
                    TypeName::new(module_type.package.clone(), simple_name(rpc.qname.local_name()));
                let input = self.map_composite(&rpc_type, &rpc.input)?;
                let output = self.map_composite(&rpc_type, &rpc.output)?;
                self.index.rpcs_by_qname.insert(
                    rpc.qname.clone(),
                    RpcRuntimeType {
                        qname: rpc.qname.clone(),
                        input,
                        output,
                    },
                );
            }
        }
        Ok(self.index)
    }

    /// Maps one schema node under its parent's type, returning the
    /// runtime type for the parent's child index.
    fn map_node(&mut self, parent: &TypeName, node: &Arc<SchemaNode>) -> Result<RuntimeType> {
        match &node.kind {
            SchemaNodeKind::Leaf { .. } | SchemaNodeKind::LeafList { .. } => {
                Ok(RuntimeType::Leaf(Arc::new(LeafRuntimeType {
                    statement: Arc::clone(node),
                })))
            }
            SchemaNodeKind::Choice { .. } => {
                let name =
                    TypeName::new(parent.package.clone(), simple_name(node.qname.local_name()));
                let choice_pkg = child_package(&name);

                let mut cases = Vec::new();
                let mut case_names = Vec::new();
                for case in node.case_children() {
                    let case_type = TypeName::new(
                        choice_pkg.clone(),
                        simple_name(case.qname.local_name()),
                    );
                    let composite = self.build_composite(case_type.clone(), case)?;
                    case_names.push(case_type);
                    cases.push(composite);
                }

                let runtime = ChoiceRuntimeType::new(
                    GeneratedType::new(name.clone()),
                    Arc::clone(node),
                    cases,
                );
                self.index.choice_cases.insert(name.clone(), case_names);
                self.register(name, RuntimeType::Choice(Arc::clone(&runtime)))?;
                Ok(RuntimeType::Choice(runtime))
            }
            _ => {
                let name =
                    TypeName::new(parent.package.clone(), simple_name(node.qname.local_name()));
                let composite = self.build_composite(name, node)?;
                Ok(RuntimeType::Composite(composite))
            }
        }
    }

    /// Maps a composite living under another type's subpackage (rpc
    /// input and output live under the operation's segment).
    fn map_composite(
        &mut self,
        owner: &TypeName,
        node: &Arc<SchemaNode>,
    ) -> Result<Arc<CompositeRuntimeType>> {
        let name = TypeName::new(child_package(owner), simple_name(node.qname.local_name()));
        self.build_composite(name, node)
    }

    fn build_composite(
        &mut self,
        name: TypeName,
        node: &Arc<SchemaNode>,
    ) -> Result<Arc<CompositeRuntimeType>> {
        let child_parent = TypeName::new(child_package(&name), name.simple.clone());
        let mut children = Vec::new();
        for child in &node.children {
            children.push(self.map_node(&child_parent, child)?);
        }
        let composite = CompositeRuntimeType::new(
            GeneratedType::new(name.clone()),
            Arc::clone(node),
            children,
        )?;
        self.register(name, RuntimeType::Composite(Arc::clone(&composite)))?;
        Ok(composite)
    }

    fn register(&mut self, name: TypeName, runtime: RuntimeType) -> Result<()> {
        if self.index.types_by_class.contains_key(&name) {
            return Err(Error::verify(format!(
                "generated type {name} produced by two schema nodes"
            )));
        }
        self.index.types_by_class.insert(name, runtime);
        Ok(())
    }
}

/// Package that children of the given type live in: the type's own
/// subpackage, named after its lowercased simple name.
fn child_package(name: &TypeName) -> String {
    format!("{}.{}", name.package, name.simple.to_ascii_lowercase())
}
