//! Effective modules and the frozen model context.

use std::sync::Arc;

use yangmill_foundation::{QName, QNameModule, Revision};

use crate::arg::{Status, YangVersion};
use crate::schema::{SchemaChildren, SchemaNode, TypeEffective};

/// A fully-resolved grouping definition.
///
/// Groupings keep their expanded schema-tree children so that `uses`
/// instantiation and tooling can inspect them after the build.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupingEffective {
    /// Qualified name of the grouping.
    pub qname: QName,
    /// Expanded schema-tree children.
    pub children: SchemaChildren,
}

/// A fully-resolved typedef.
#[derive(Clone, Debug, PartialEq)]
pub struct TypedefEffective {
    /// Qualified name of the typedef.
    pub qname: QName,
    /// The resolved type, with its built-in base.
    pub ty: TypeEffective,
    /// Default value, if declared.
    pub default: Option<Arc<str>>,
    /// Units string, if declared.
    pub units: Option<Arc<str>>,
}

/// A fully-resolved identity with its resolved bases.
#[derive(Clone, Debug, PartialEq)]
pub struct IdentityEffective {
    /// Qualified name of the identity.
    pub qname: QName,
    /// Base identities this one derives from.
    pub bases: Box<[QName]>,
    /// Definition lifecycle.
    pub status: Status,
}

/// A fully-resolved RPC with materialized input and output.
#[derive(Clone, Debug, PartialEq)]
pub struct RpcEffective {
    /// Qualified name of the operation.
    pub qname: QName,
    /// Input subtree; present even when not declared in source.
    pub input: Arc<SchemaNode>,
    /// Output subtree; present even when not declared in source.
    pub output: Arc<SchemaNode>,
}

/// One effective module: the resolved output of a module source.
#[derive(Clone, Debug, PartialEq)]
pub struct ModuleEffective {
    /// Module name.
    pub name: Arc<str>,
    /// Namespace and revision identity.
    pub module: QNameModule,
    /// Declared prefix.
    pub prefix: Arc<str>,
    /// Language version.
    pub yang_version: YangVersion,
    /// All declared revisions, newest first.
    pub revisions: Box<[Revision]>,
    /// Names of modules this one imports.
    pub imports: Box<[Arc<str>]>,
    /// Resolved groupings.
    pub groupings: Box<[GroupingEffective]>,
    /// Resolved typedefs.
    pub typedefs: Box<[TypedefEffective]>,
    /// Resolved identities.
    pub identities: Box<[IdentityEffective]>,
    /// Declared features.
    pub features: Box<[QName]>,
    /// Resolved operations.
    pub rpcs: Box<[RpcEffective]>,
    /// Top-level data nodes, sorted by QName.
    pub children: SchemaChildren,
}

impl ModuleEffective {
    /// Looks up a top-level schema-tree child.
    #[must_use]
    pub fn schema_tree_child(&self, qname: &QName) -> Option<&Arc<SchemaNode>> {
        self.children.child(qname)
    }
}

/// The frozen, queryable effective model: this subsystem's primary output.
///
/// Built once by the reactor and immutable afterward; safe to share and
/// read from arbitrary threads.
#[derive(Clone, Debug, Default)]
pub struct EffectiveModelContext {
    modules: im::OrdMap<QNameModule, Arc<ModuleEffective>>,
    modules_by_name: im::OrdMap<Arc<str>, Arc<ModuleEffective>>,
}

impl EffectiveModelContext {
    /// Builds a context from resolved modules.
    #[must_use]
    pub fn new(modules: Vec<Arc<ModuleEffective>>) -> Self {
        let mut by_id = im::OrdMap::new();
        let mut by_name = im::OrdMap::new();
        for module in modules {
            by_id.insert(module.module.clone(), Arc::clone(&module));
            by_name.insert(Arc::clone(&module.name), module);
        }
        Self {
            modules: by_id,
            modules_by_name: by_name,
        }
    }

    /// Looks up a module by its namespace and revision.
    #[must_use]
    pub fn find_module(&self, id: &QNameModule) -> Option<&Arc<ModuleEffective>> {
        self.modules.get(id)
    }

    /// Looks up a module by name.
    #[must_use]
    pub fn find_module_by_name(&self, name: &str) -> Option<&Arc<ModuleEffective>> {
        self.modules_by_name.get(name)
    }

    /// Returns all modules in namespace order.
    pub fn modules(&self) -> impl Iterator<Item = &Arc<ModuleEffective>> {
        self.modules.values()
    }

    /// Returns the number of modules.
    #[must_use]
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    /// Descends the schema tree along an absolute path of QNames.
    ///
    /// The first step selects a top-level node in the module owning that
    /// QName; each further step selects a child of the previous node.
    #[must_use]
    pub fn find_schema_node(&self, path: &[QName]) -> Option<&Arc<SchemaNode>> {
        let (first, rest) = path.split_first()?;
        let module = self.find_module(&first.module)?;
        let mut current = module.schema_tree_child(first)?;
        for step in rest {
            current = current.schema_tree_child(step)?;
        }
        Some(current)
    }

    /// Looks up an identity anywhere in the model.
    #[must_use]
    pub fn find_identity(&self, qname: &QName) -> Option<&IdentityEffective> {
        self.find_module(&qname.module)?
            .identities
            .iter()
            .find(|i| &i.qname == qname)
    }

    /// Looks up an RPC anywhere in the model.
    #[must_use]
    pub fn find_rpc(&self, qname: &QName) -> Option<&RpcEffective> {
        self.find_module(&qname.module)?
            .rpcs
            .iter()
            .find(|r| &r.qname == qname)
    }
}
