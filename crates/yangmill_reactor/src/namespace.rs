//! Namespace storage with behaviour-scoped resolution.
//!
//! A namespace is a typed key space used to resolve cross-references.
//! Each namespace declares a [`NamespaceBehaviour`] governing which
//! storage node registrations land in and how lookups walk the scope
//! chain. Resolution is an explicit walk, not virtual dispatch.

use std::collections::HashMap;
use std::fmt;

use yangmill_foundation::{QName, QNameModule, SourceId, StatementRef};

use crate::context::CtxId;

/// Visibility scope of a namespace.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NamespaceBehaviour {
    /// One reactor-wide map.
    Global,
    /// Visible anywhere within one source.
    SourceLocal,
    /// Stored on the defining statement; visible to all descendants of
    /// the defining subtree.
    TreeScoped,
    /// Visible only on the owning statement itself.
    StatementLocal,
    /// Stored on and visible from the root statement of the owning tree.
    RootStatementLocal,
}

/// The namespaces known to the reactor.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NamespaceId {
    /// Module name advertised during pre-linkage.
    PreLinkageModuleByName,
    /// Module context by name, available once linkage runs.
    ModuleByName,
    /// Module context by (namespace, revision) identity.
    ModuleByNamespace,
    /// Module context by source identity.
    ModuleBySourceId,
    /// Submodule context by name.
    SubmoduleByName,
    /// Import prefix to imported module context.
    PrefixToModule,
    /// Imported module context by module name.
    ImportedModuleByName,
    /// Grouping definition by QName.
    GroupingByQName,
    /// Typedef definition by QName.
    TypedefByQName,
    /// Identity definition by QName.
    IdentityByQName,
    /// Feature definition by QName.
    FeatureByQName,
    /// Extension definition by QName.
    ExtensionByQName,
    /// Schema-tree child of a composite statement by QName.
    SchemaTreeChild,
}

impl NamespaceId {
    /// Returns the declared behaviour of this namespace.
    #[must_use]
    pub const fn behaviour(self) -> NamespaceBehaviour {
        match self {
            Self::PreLinkageModuleByName
            | Self::ModuleByName
            | Self::ModuleByNamespace
            | Self::ModuleBySourceId
            | Self::SubmoduleByName
            | Self::IdentityByQName
            | Self::FeatureByQName
            | Self::ExtensionByQName => NamespaceBehaviour::Global,
            Self::PrefixToModule => NamespaceBehaviour::SourceLocal,
            Self::ImportedModuleByName => NamespaceBehaviour::RootStatementLocal,
            Self::GroupingByQName | Self::TypedefByQName => NamespaceBehaviour::TreeScoped,
            Self::SchemaTreeChild => NamespaceBehaviour::StatementLocal,
        }
    }
}

impl fmt::Display for NamespaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// A key within a namespace.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NamespaceKey {
    /// A plain string key (names, prefixes).
    Str(String),
    /// A qualified-name key.
    QName(QName),
    /// A module-identity key.
    Module(QNameModule),
    /// A source-identity key.
    SourceId(SourceId),
}

impl NamespaceKey {
    /// Creates a string key.
    #[must_use]
    pub fn str(s: impl AsRef<str>) -> Self {
        Self::Str(s.as_ref().to_string())
    }
}

impl fmt::Display for NamespaceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "{s:?}"),
            Self::QName(q) => write!(f, "{q}"),
            Self::Module(m) => write!(f, "{m}"),
            Self::SourceId(s) => write!(f, "{s}"),
        }
    }
}

/// A value registered in a namespace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NamespaceValue {
    /// A statement context.
    Ctx(CtxId),
}

impl NamespaceValue {
    /// Returns the context id carried by this value.
    #[must_use]
    pub const fn ctx(&self) -> CtxId {
        match self {
            Self::Ctx(id) => *id,
        }
    }
}

/// One registered entry: the value plus the registering statement's
/// location, kept for collision diagnostics.
#[derive(Clone, Debug)]
pub struct NamespaceEntry {
    /// The registered value.
    pub value: NamespaceValue,
    /// Where the registration came from.
    pub registered_at: StatementRef,
}

/// One storage node: the per-scope slice of every namespace.
///
/// Storage nodes hang off statement contexts, sources, and the session
/// itself; the behaviour of a namespace decides which node a
/// registration or lookup touches.
#[derive(Debug, Default)]
pub struct NamespaceStorage {
    maps: HashMap<NamespaceId, HashMap<NamespaceKey, NamespaceEntry>>,
}

impl NamespaceStorage {
    /// Creates empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up an entry in this node only.
    #[must_use]
    pub fn get(&self, ns: NamespaceId, key: &NamespaceKey) -> Option<&NamespaceEntry> {
        self.maps.get(&ns)?.get(key)
    }

    /// Inserts an entry, returning the pre-existing entry on collision.
    ///
    /// The caller turns a collision into a source error carrying both
    /// statement references.
    pub fn insert(
        &mut self,
        ns: NamespaceId,
        key: NamespaceKey,
        entry: NamespaceEntry,
    ) -> Option<NamespaceEntry> {
        let map = self.maps.entry(ns).or_default();
        if let Some(existing) = map.get(&key) {
            return Some(existing.clone());
        }
        map.insert(key, entry);
        None
    }

    /// Returns all entries of one namespace in this node.
    pub fn entries(
        &self,
        ns: NamespaceId,
    ) -> impl Iterator<Item = (&NamespaceKey, &NamespaceEntry)> {
        self.maps.get(&ns).into_iter().flat_map(HashMap::iter)
    }
}
