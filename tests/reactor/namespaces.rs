//! Integration tests for namespace storage and scoping
//!
//! Namespaces are scoped registries: a key is unique within its scope,
//! and scopes isolate sources and subtrees from one another.

use proptest::prelude::*;

use yangmill_foundation::StatementRef;
use yangmill_model::EffectiveModelContext;
use yangmill_parser::TextSource;
use yangmill_reactor::{
    CtxId, NamespaceBehaviour, NamespaceEntry, NamespaceId, NamespaceKey, NamespaceStorage,
    NamespaceValue, Reactor,
};

fn build(sources: &[(&str, &str)]) -> EffectiveModelContext {
    let mut reactor = Reactor::vanilla();
    for (name, text) in sources {
        reactor.add_source(Box::new(TextSource::new(*name, *text)));
    }
    reactor.build().expect("model builds")
}

// =============================================================================
// Storage primitives
// =============================================================================

fn entry(ctx: u32, line: u32) -> NamespaceEntry {
    NamespaceEntry {
        value: NamespaceValue::Ctx(CtxId::new(ctx)),
        registered_at: StatementRef::new("ns.yang", line, 1),
    }
}

#[test]
fn first_registration_wins_and_is_reported() {
    let mut storage = NamespaceStorage::new();
    let key = NamespaceKey::str("system");

    assert!(
        storage
            .insert(NamespaceId::ModuleByName, key.clone(), entry(1, 10))
            .is_none()
    );

    let prior = storage
        .insert(NamespaceId::ModuleByName, key.clone(), entry(2, 40))
        .expect("collision reports the prior entry");
    assert_eq!(prior.registered_at.line, 10);
    assert_eq!(prior.value, NamespaceValue::Ctx(CtxId::new(1)));

    // The stored value is still the first registration.
    let found = storage.get(NamespaceId::ModuleByName, &key).unwrap();
    assert_eq!(found.value, NamespaceValue::Ctx(CtxId::new(1)));
}

#[test]
fn behaviour_table_matches_the_design() {
    for (ns, behaviour) in [
        (NamespaceId::ModuleByName, NamespaceBehaviour::Global),
        (NamespaceId::ModuleByNamespace, NamespaceBehaviour::Global),
        (NamespaceId::IdentityByQName, NamespaceBehaviour::Global),
        (NamespaceId::FeatureByQName, NamespaceBehaviour::Global),
        (NamespaceId::PrefixToModule, NamespaceBehaviour::SourceLocal),
        (NamespaceId::GroupingByQName, NamespaceBehaviour::TreeScoped),
        (NamespaceId::TypedefByQName, NamespaceBehaviour::TreeScoped),
        (
            NamespaceId::SchemaTreeChild,
            NamespaceBehaviour::StatementLocal,
        ),
        (
            NamespaceId::ImportedModuleByName,
            NamespaceBehaviour::RootStatementLocal,
        ),
    ] {
        assert_eq!(ns.behaviour(), behaviour, "behaviour of {ns}");
    }
}

proptest! {
    #[test]
    fn storage_round_trips_distinct_keys(
        names in prop::collection::hash_set("[a-z][a-z0-9-]{0,11}", 1..24)
    ) {
        let mut storage = NamespaceStorage::new();
        let names: Vec<String> = names.into_iter().collect();

        for (i, name) in names.iter().enumerate() {
            let inserted = storage.insert(
                NamespaceId::ModuleByName,
                NamespaceKey::str(name),
                entry(u32::try_from(i).unwrap(), 1),
            );
            prop_assert!(inserted.is_none());
        }

        for (i, name) in names.iter().enumerate() {
            let found = storage
                .get(NamespaceId::ModuleByName, &NamespaceKey::str(name))
                .expect("registered key resolves");
            prop_assert_eq!(
                &found.value,
                &NamespaceValue::Ctx(CtxId::new(u32::try_from(i).unwrap()))
            );
        }

        // Every second registration reports the first, for every key.
        for name in &names {
            let prior = storage.insert(
                NamespaceId::ModuleByName,
                NamespaceKey::str(name),
                entry(9999, 1),
            );
            prop_assert!(prior.is_some());
        }
    }
}

// =============================================================================
// Scoping through the reactor
// =============================================================================

#[test]
fn prefixes_are_source_local() {
    // Both modules bind the prefix "s" to different targets; the
    // source-local scope keeps them from colliding.
    let shared = r#"
        module shared {
          namespace "urn:example:shared";
          prefix sh;
          grouping g { leaf v { type string; } }
        }
    "#;
    let one = r#"
        module one {
          namespace "urn:example:one";
          prefix o;
          import shared { prefix s; }
          container c1 { uses s:g; }
        }
    "#;
    let two = r#"
        module two {
          namespace "urn:example:two";
          prefix t;
          import shared { prefix s; }
          container c2 { uses s:g; }
        }
    "#;

    let context = build(&[
        ("shared.yang", shared),
        ("one.yang", one),
        ("two.yang", two),
    ]);
    assert_eq!(context.module_count(), 3);
}

#[test]
fn groupings_are_tree_scoped_per_module() {
    // The same grouping name in two modules does not collide; each uses
    // resolves to its own module's definition.
    let left = r#"
        module left {
          namespace "urn:example:left";
          prefix l;
          grouping common { leaf from-left { type string; } }
          container c { uses common; }
        }
    "#;
    let right = r#"
        module right {
          namespace "urn:example:right";
          prefix r;
          grouping common { leaf from-right { type string; } }
          container c { uses common; }
        }
    "#;

    let context = build(&[("left.yang", left), ("right.yang", right)]);

    let left_mod = context.find_module_by_name("left").unwrap();
    let left_c = left_mod
        .schema_tree_child(&left_mod.module.bind("c").unwrap())
        .unwrap();
    assert!(
        left_c
            .schema_tree_child(&left_mod.module.bind("from-left").unwrap())
            .is_some()
    );
    assert!(
        left_c
            .schema_tree_child(&left_mod.module.bind("from-right").unwrap())
            .is_none()
    );
}

#[test]
fn nested_groupings_shadow_by_scope_walk() {
    // A grouping defined closer to the uses wins over a same-named one
    // further up the tree.
    let context = build(&[(
        "shadow.yang",
        r#"
        module shadow {
          namespace "urn:example:shadow";
          prefix sh;
          grouping g { leaf outer { type string; } }
          container c {
            grouping g { leaf inner { type string; } }
            uses g;
          }
        }
        "#,
    )]);

    let module = context.find_module_by_name("shadow").unwrap();
    let c = module
        .schema_tree_child(&module.module.bind("c").unwrap())
        .unwrap();
    assert!(
        c.schema_tree_child(&module.module.bind("inner").unwrap())
            .is_some()
    );
    assert!(
        c.schema_tree_child(&module.module.bind("outer").unwrap())
            .is_none()
    );
}

#[test]
fn duplicate_groupings_in_one_scope_collide() {
    let mut reactor = Reactor::vanilla();
    reactor.add_source(Box::new(TextSource::new(
        "dup.yang",
        r#"
        module dup {
          namespace "urn:example:dup";
          prefix d;
          grouping g { leaf a { type string; } }
          grouping g { leaf b { type string; } }
        }
        "#,
    )));

    let err = reactor.build().expect_err("duplicate groupings collide");
    let msg = err.to_string();
    assert!(msg.contains("duplicate grouping"));
    assert!(msg.contains("already declared at"));
}
