//! Freezing completed statement contexts into the effective model.
//!
//! Runs after every source has completed the effective-model phase. The
//! reactor tree itself is transient; what this module produces is the
//! only artifact that survives the build.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use yangmill_foundation::{Error, QName, Result};
use yangmill_model::{
    Arg, BuiltinType, DeclaredStatement, EffectiveModelContext, GroupingEffective,
    IdentityEffective, MaxElements, ModuleEffective, OrderedBy, RpcEffective, SchemaChildren,
    SchemaNode, SchemaNodeKind, StatementKind, Status, Substatements, TypeEffective,
    TypedefEffective,
};

use crate::context::CtxId;
use crate::namespace::{NamespaceId, NamespaceKey};
use crate::session::BuildSession;

/// Builds the frozen model from a session whose phases have all run.
pub(crate) fn build_effective_model(session: &BuildSession) -> Result<EffectiveModelContext> {
    let mut builder = EffectiveBuilder {
        session,
        declared: HashMap::new(),
        schema: HashMap::new(),
    };

    let mut modules = Vec::new();
    for source in &session.sources {
        if session.ctx(source.root).kind == StatementKind::Module {
            modules.push(builder.build_module(source.root)?);
        }
    }
    Ok(EffectiveModelContext::new(modules))
}

struct EffectiveBuilder<'a> {
    session: &'a BuildSession,
    declared: HashMap<CtxId, Arc<DeclaredStatement>>,
    schema: HashMap<CtxId, Arc<SchemaNode>>,
}

impl EffectiveBuilder<'_> {
    fn build_module(&mut self, root: CtxId) -> Result<Arc<ModuleEffective>> {
        let session = self.session;
        let ctx = session.ctx(root);
        let reference = ctx.reference.clone();
        let name = ctx.raw_arg.clone().ok_or_else(|| {
            Error::source("module is missing its name", reference.clone())
        })?;
        let module_id = ctx.module_id.clone().ok_or_else(|| {
            Error::verify(format!("module \"{name}\" completed without an identity"))
        })?;
        let prefix = session
            .find_substatement_arg(root, StatementKind::Prefix)
            .ok_or_else(|| {
                Error::source(
                    format!("module \"{name}\" is missing its prefix"),
                    reference.clone(),
                )
            })?;

        let mut revisions = Vec::new();
        let mut imports = Vec::new();
        let mut groupings = Vec::new();
        let mut typedefs = Vec::new();
        let mut identities = Vec::new();
        let mut features = Vec::new();
        let mut rpcs = Vec::new();
        let mut children = Vec::new();

        let subs: Vec<CtxId> = session.ctx(root).all_substatements().collect();
        for id in subs {
            let sub = session.ctx(id);
            if !sub.supported {
                continue;
            }
            match sub.kind {
                StatementKind::Revision => {
                    if let Arg::Revision(rev) = &sub.arg {
                        revisions.push(rev.clone());
                    }
                }
                StatementKind::Import => {
                    if let Some(target) = &sub.raw_arg {
                        imports.push(target.clone());
                    }
                }
                StatementKind::Grouping => groupings.push(self.build_grouping(id)?),
                StatementKind::Typedef => typedefs.push(self.build_typedef(id)?),
                StatementKind::Identity => identities.push(self.build_identity(id)?),
                StatementKind::Feature => {
                    if let Arg::QName(qname) = &sub.arg {
                        features.push(qname.clone());
                    }
                }
                StatementKind::Rpc => rpcs.push(self.build_rpc(id)?),
                kind if kind.is_schema_tree() => {
                    children.push(self.build_schema_node(id, true)?);
                }
                _ => {}
            }
        }

        revisions.sort();
        revisions.reverse();

        Ok(Arc::new(ModuleEffective {
            name,
            module: module_id,
            prefix,
            yang_version: session.ctx(root).yang_version,
            revisions: revisions.into_boxed_slice(),
            imports: imports.into_boxed_slice(),
            groupings: groupings.into_boxed_slice(),
            typedefs: typedefs.into_boxed_slice(),
            identities: identities.into_boxed_slice(),
            features: features.into_boxed_slice(),
            rpcs: rpcs.into_boxed_slice(),
            children: SchemaChildren::new(children)?,
        }))
    }

    fn build_grouping(&mut self, id: CtxId) -> Result<GroupingEffective> {
        let qname = self.expect_qname(id)?;
        let mut children = Vec::new();
        let subs: Vec<CtxId> = self.session.ctx(id).all_substatements().collect();
        for sub in subs {
            let ctx = self.session.ctx(sub);
            if ctx.supported && ctx.kind.is_schema_tree() {
                children.push(self.build_schema_node(sub, true)?);
            }
        }
        Ok(GroupingEffective {
            qname,
            children: SchemaChildren::new(children)?,
        })
    }

    fn build_typedef(&mut self, id: CtxId) -> Result<TypedefEffective> {
        let qname = self.expect_qname(id)?;
        let type_ctx = self
            .session
            .find_substatement(id, StatementKind::Type)
            .ok_or_else(|| {
                Error::source(
                    format!("typedef {qname} is missing its type"),
                    self.session.ctx(id).reference.clone(),
                )
            })?;
        Ok(TypedefEffective {
            qname,
            ty: self.resolve_type(type_ctx, &mut HashSet::new())?,
            default: self
                .session
                .find_substatement_arg(id, StatementKind::Default),
            units: self.session.find_substatement_arg(id, StatementKind::Units),
        })
    }

    fn build_identity(&mut self, id: CtxId) -> Result<IdentityEffective> {
        let qname = self.expect_qname(id)?;
        let mut bases = Vec::new();
        for sub in &self.session.ctx(id).declared {
            let ctx = self.session.ctx(*sub);
            if ctx.kind == StatementKind::Base {
                if let Arg::QName(base) = &ctx.arg {
                    bases.push(base.clone());
                }
            }
        }
        Ok(IdentityEffective {
            qname,
            bases: bases.into_boxed_slice(),
            status: self.status_of(id),
        })
    }

    fn build_rpc(&mut self, id: CtxId) -> Result<RpcEffective> {
        let qname = self.expect_qname(id)?;
        let input = self
            .session
            .ctx(id)
            .all_substatements()
            .find(|s| self.session.ctx(*s).kind == StatementKind::Input)
            .ok_or_else(|| Error::verify(format!("rpc {qname} has no input subtree")))?;
        let output = self
            .session
            .ctx(id)
            .all_substatements()
            .find(|s| self.session.ctx(*s).kind == StatementKind::Output)
            .ok_or_else(|| Error::verify(format!("rpc {qname} has no output subtree")))?;
        Ok(RpcEffective {
            qname,
            input: self.build_schema_node(input, false)?,
            output: self.build_schema_node(output, false)?,
        })
    }

    /// Builds one schema-tree node, recursing through its children.
    ///
    /// `inherited_config` is the effective `config` of the parent; a node
    /// without its own `config` statement inherits it.
    fn build_schema_node(&mut self, id: CtxId, inherited_config: bool) -> Result<Arc<SchemaNode>> {
        if let Some(done) = self.schema.get(&id) {
            return Ok(Arc::clone(done));
        }

        let session = self.session;
        let qname = self.expect_qname(id)?;
        let reference = session.ctx(id).reference.clone();
        let kind_stmt = session.ctx(id).kind;

        let config = match self.arg_of(id, StatementKind::Config) {
            Some(Arg::Bool(value)) => *value,
            _ => match kind_stmt {
                // Operation subtrees never carry configuration.
                StatementKind::Rpc | StatementKind::Input | StatementKind::Output => false,
                _ => inherited_config,
            },
        };

        let kind = match kind_stmt {
            StatementKind::Container => SchemaNodeKind::Container {
                presence: session.find_substatement_arg(id, StatementKind::Presence),
            },
            StatementKind::Leaf => SchemaNodeKind::Leaf {
                ty: self.leaf_type(id, &qname)?,
                default: session.find_substatement_arg(id, StatementKind::Default),
                units: session.find_substatement_arg(id, StatementKind::Units),
                mandatory: matches!(self.arg_of(id, StatementKind::Mandatory), Some(Arg::Bool(true))),
            },
            StatementKind::LeafList => SchemaNodeKind::LeafList {
                ty: self.leaf_type(id, &qname)?,
                ordered_by: self.ordered_by_of(id),
                min_elements: self.min_elements_of(id),
                max_elements: self.max_elements_of(id),
            },
            StatementKind::List => {
                let keys = match self.arg_of(id, StatementKind::Key) {
                    Some(Arg::QNames(keys)) => keys.clone(),
                    _ => Box::new([]) as Box<[QName]>,
                };
                // Every key must name a direct leaf child.
                for key in &keys {
                    let has_leaf = session.ctx(id).all_substatements().any(|s| {
                        let c = session.ctx(s);
                        c.kind == StatementKind::Leaf
                            && matches!(&c.arg, Arg::QName(q) if q == key)
                    });
                    if !has_leaf {
                        return Err(Error::source(
                            format!(
                                "key leaf \"{}\" is not a child of list \"{}\"",
                                key.local_name(),
                                qname.local_name()
                            ),
                            reference,
                        ));
                    }
                }
                SchemaNodeKind::List {
                    keys,
                    ordered_by: self.ordered_by_of(id),
                    min_elements: self.min_elements_of(id),
                    max_elements: self.max_elements_of(id),
                }
            }
            StatementKind::Choice => {
                let default = match session.find_substatement_arg(id, StatementKind::Default) {
                    Some(name) => Some(
                        session
                            .current_module_id(id)?
                            .bind(name.as_ref())
                            .map_err(|e| e.at(reference.clone()))?,
                    ),
                    None => None,
                };
                SchemaNodeKind::Choice {
                    default,
                    mandatory: matches!(
                        self.arg_of(id, StatementKind::Mandatory),
                        Some(Arg::Bool(true))
                    ),
                }
            }
            StatementKind::Case => SchemaNodeKind::Case,
            StatementKind::Rpc => SchemaNodeKind::Rpc,
            StatementKind::Input => SchemaNodeKind::Input,
            StatementKind::Output => SchemaNodeKind::Output,
            other => {
                return Err(Error::verify(format!(
                    "statement \"{other}\" is not a schema-tree node"
                )));
            }
        };

        let is_choice = matches!(kind, SchemaNodeKind::Choice { .. });
        let mut children = Vec::new();
        let subs: Vec<CtxId> = session.ctx(id).all_substatements().collect();
        for sub in subs {
            let ctx = session.ctx(sub);
            if !ctx.supported || !ctx.kind.is_schema_tree() {
                continue;
            }
            let child = self.build_schema_node(sub, config)?;
            if is_choice && !matches!(child.kind, SchemaNodeKind::Case) {
                // Shorthand case: a data node directly under a choice
                // stands for a case of the same name wrapping it.
                children.push(implicit_case(&child)?);
            } else {
                children.push(child);
            }
        }

        let mut augmented_by: Vec<_> = session.ctx(id).augmented_by.clone();
        augmented_by.dedup();

        let node = Arc::new(SchemaNode {
            qname,
            kind,
            config,
            status: self.status_of(id),
            description: session.find_substatement_arg(id, StatementKind::Description),
            children: SchemaChildren::new(children)?,
            augmented_by: augmented_by.into_boxed_slice(),
            statement: self.build_declared(id),
        });
        self.schema.insert(id, Arc::clone(&node));
        Ok(node)
    }

    /// Freezes the as-written statement tree of a context.
    fn build_declared(&mut self, id: CtxId) -> Arc<DeclaredStatement> {
        if let Some(done) = self.declared.get(&id) {
            return Arc::clone(done);
        }

        let ctx = self.session.ctx(id);
        let kind = ctx.kind;
        let keyword = ctx.keyword.clone();
        let raw_arg = ctx.raw_arg.clone();
        let arg = ctx.arg.clone();
        let reference = ctx.reference.clone();
        let children: Vec<CtxId> = ctx.declared.clone();

        let substatements: Vec<Arc<DeclaredStatement>> = children
            .into_iter()
            .map(|child| self.build_declared(child))
            .collect();

        let frozen = Arc::new(DeclaredStatement {
            kind,
            keyword: keyword.to_string().into(),
            raw_arg,
            arg,
            reference,
            substatements: Substatements::from_vec(substatements),
        });
        self.declared.insert(id, Arc::clone(&frozen));
        frozen
    }

    fn leaf_type(&mut self, id: CtxId, qname: &QName) -> Result<TypeEffective> {
        let type_ctx = self
            .session
            .find_substatement(id, StatementKind::Type)
            .ok_or_else(|| {
                Error::source(
                    format!("\"{}\" is missing its type", qname.local_name()),
                    self.session.ctx(id).reference.clone(),
                )
            })?;
        self.resolve_type(type_ctx, &mut HashSet::new())
    }

    /// Resolves a type statement to its built-in base, walking typedef
    /// chains. `visiting` detects circular typedefs.
    fn resolve_type(&mut self, type_ctx: CtxId, visiting: &mut HashSet<QName>) -> Result<TypeEffective> {
        let session = self.session;
        match session.ctx(type_ctx).arg.clone() {
            Arg::Identifier(name) => {
                let base = BuiltinType::from_name(&name).ok_or_else(|| {
                    Error::verify(format!("type \"{name}\" parsed as neither builtin nor typedef"))
                })?;
                Ok(TypeEffective { name, base })
            }
            Arg::QName(typedef_name) => {
                if !visiting.insert(typedef_name.clone()) {
                    return Err(Error::source(
                        format!("typedef {typedef_name} is part of a circular definition"),
                        session.ctx(type_ctx).reference.clone(),
                    ));
                }
                let typedef = self.find_typedef(type_ctx, &typedef_name).ok_or_else(|| {
                    Error::source(
                        format!("type {typedef_name} was not found"),
                        session.ctx(type_ctx).reference.clone(),
                    )
                })?;
                let inner = session
                    .find_substatement(typedef, StatementKind::Type)
                    .ok_or_else(|| {
                        Error::source(
                            format!("typedef {typedef_name} is missing its type"),
                            session.ctx(typedef).reference.clone(),
                        )
                    })?;
                let resolved = self.resolve_type(inner, visiting)?;
                Ok(TypeEffective {
                    name: typedef_name.local_name.clone(),
                    base: resolved.base,
                })
            }
            _ => Err(Error::verify("type statement without a parsed argument")),
        }
    }

    /// Finds a typedef definition visible from a type statement.
    ///
    /// Copied contexts fall back to their origin's scope, so grouping
    /// contents instantiated elsewhere still see the grouping's local
    /// typedefs.
    fn find_typedef(&self, from: CtxId, name: &QName) -> Option<CtxId> {
        let session = self.session;
        let mut current = Some(from);
        while let Some(ctx) = current {
            let scope = match session.current_module_id(ctx) {
                Ok(module) if module != name.module => session
                    .get_from_namespace(
                        ctx,
                        NamespaceId::ModuleByNamespace,
                        &NamespaceKey::Module(name.module.clone()),
                    )
                    .map(|v| v.ctx())?,
                _ => ctx,
            };
            if let Some(value) = session.get_from_namespace(
                scope,
                NamespaceId::TypedefByQName,
                &NamespaceKey::QName(name.clone()),
            ) {
                return Some(value.ctx());
            }
            current = session.ctx(ctx).origin;
        }
        None
    }

    fn expect_qname(&self, id: CtxId) -> Result<QName> {
        match &self.session.ctx(id).arg {
            Arg::QName(qname) => Ok(qname.clone()),
            _ => Err(Error::verify(format!(
                "statement \"{}\" completed without a qualified name",
                self.session.ctx(id).kind
            ))),
        }
    }

    fn arg_of(&self, id: CtxId, kind: StatementKind) -> Option<&Arg> {
        let session = self.session;
        session
            .ctx(id)
            .declared
            .iter()
            .map(|c| session.ctx(*c))
            .find(|c| c.kind == kind)
            .map(|c| &c.arg)
    }

    fn status_of(&self, id: CtxId) -> Status {
        match self.arg_of(id, StatementKind::Status) {
            Some(Arg::Status(status)) => *status,
            _ => Status::default(),
        }
    }

    fn ordered_by_of(&self, id: CtxId) -> OrderedBy {
        match self.arg_of(id, StatementKind::OrderedBy) {
            Some(Arg::OrderedBy(ordered)) => *ordered,
            _ => OrderedBy::default(),
        }
    }

    fn min_elements_of(&self, id: CtxId) -> u64 {
        match self.arg_of(id, StatementKind::MinElements) {
            Some(Arg::Uint(count)) => *count,
            _ => 0,
        }
    }

    fn max_elements_of(&self, id: CtxId) -> MaxElements {
        match self.arg_of(id, StatementKind::MaxElements) {
            Some(Arg::Max(max)) => *max,
            _ => MaxElements::Unbounded,
        }
    }
}

/// Wraps a shorthand choice child in its implicit case node.
fn implicit_case(child: &Arc<SchemaNode>) -> Result<Arc<SchemaNode>> {
    Ok(Arc::new(SchemaNode {
        qname: child.qname.clone(),
        kind: SchemaNodeKind::Case,
        config: child.config,
        status: child.status,
        description: None,
        children: SchemaChildren::new(vec![Arc::clone(child)])?,
        augmented_by: Box::new([]),
        statement: Arc::clone(&child.statement),
    }))
}
