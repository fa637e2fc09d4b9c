//! Integration tests for the global runtime-type index
//!
//! The index is built once from a frozen effective model; these tests
//! exercise its module, identity, RPC, and floor-lookup surfaces.

use yangmill_binding::{BindingRuntimeTypes, RuntimeType, TypeName};
use yangmill_foundation::{QName, QNameModule, XmlNamespace};
use yangmill_model::EffectiveModelContext;
use yangmill_parser::TextSource;
use yangmill_reactor::Reactor;

fn build(sources: &[(&str, &str)]) -> (EffectiveModelContext, BindingRuntimeTypes) {
    let mut reactor = Reactor::vanilla();
    for (name, text) in sources {
        reactor.add_source(Box::new(TextSource::new(*name, *text)));
    }
    let context = reactor.build().expect("model builds");
    let types = BindingRuntimeTypes::create(&context).expect("index builds");
    (context, types)
}

fn qname(ns: &str, name: &str) -> QName {
    QNameModule::new(XmlNamespace::new(ns).unwrap(), None)
        .bind(name)
        .unwrap()
}

const NETWORK: &str = r#"
    module network {
      namespace "urn:example:network";
      prefix net;
      identity protocol;
      identity routing { base protocol; }
      container interfaces {
        list interface {
          key "name";
          leaf name { type string; }
          leaf mtu { type uint16; }
          container statistics {
            config false;
            leaf in-octets { type uint64; }
          }
        }
      }
      rpc ping {
        input { leaf destination { type string; } }
        output { leaf rtt { type uint32; } }
      }
    }
"#;

// =============================================================================
// Module and package lookups
// =============================================================================

#[test]
fn package_derivation_is_stable() {
    let (context, types) = build(&[("network.yang", NETWORK)]);
    let module = context.find_module_by_name("network").unwrap();
    assert_eq!(
        types.find_module_package(&module.module),
        Some("gen.urn.example.network")
    );
}

#[test]
fn floor_lookup_maps_nested_packages_to_their_module() {
    let (context, types) = build(&[("network.yang", NETWORK)]);
    let module = context.find_module_by_name("network").unwrap();

    for package in [
        "gen.urn.example.network",
        "gen.urn.example.network.interfaces",
        "gen.urn.example.network.interfaces.interface.statistics",
    ] {
        assert_eq!(
            types.find_module_for_package(package),
            Some(&module.module),
            "package {package}"
        );
    }

    // Prefix-shaped but unrelated packages resolve to nothing.
    assert!(types.find_module_for_package("gen.urn.example.networks").is_none());
    assert!(types.find_module_for_package("com.elsewhere").is_none());
}

#[test]
fn floor_lookup_distinguishes_sibling_modules() {
    let a = "module a { namespace \"urn:example:pkg:a\"; prefix a; container c { leaf x { type string; } } }";
    let b = "module b { namespace \"urn:example:pkg:b\"; prefix b; container c { leaf x { type string; } } }";
    let (context, types) = build(&[("a.yang", a), ("b.yang", b)]);

    let module_a = context.find_module_by_name("a").unwrap();
    let module_b = context.find_module_by_name("b").unwrap();
    assert_eq!(
        types.find_module_for_package("gen.urn.example.pkg.a.c"),
        Some(&module_a.module)
    );
    assert_eq!(
        types.find_module_for_package("gen.urn.example.pkg.b.c"),
        Some(&module_b.module)
    );
}

// =============================================================================
// Type lookups
// =============================================================================

#[test]
fn composites_are_indexed_by_generated_name() {
    let (_, types) = build(&[("network.yang", NETWORK)]);
    let ns = "urn:example:network";

    let interfaces_name = TypeName::new("gen.urn.example.network", "Interfaces");
    let Some(RuntimeType::Composite(interfaces)) = types.type_for_class(&interfaces_name) else {
        panic!("interfaces composite not indexed");
    };

    // Schema-oriented lookup by QName.
    let interface = interfaces
        .schema_tree_child(&qname(ns, "interface"))
        .expect("interface child resolves");
    // Binding-oriented lookup by class.
    let by_class = interfaces
        .child_by_class(&TypeName::new(
            "gen.urn.example.network.interfaces",
            "Interface",
        ))
        .expect("interface child resolves by class");
    assert_eq!(interface.qname(), by_class.qname());

    // The paired schema node is the originating statement.
    let schema = types.schema_for_class(&interfaces_name).unwrap();
    assert_eq!(schema.qname, qname(ns, "interfaces"));
}

#[test]
fn identities_and_rpcs_are_global_lookups() {
    let (_, types) = build(&[("network.yang", NETWORK)]);
    let ns = "urn:example:network";

    let routing = types.identity(&qname(ns, "routing")).unwrap();
    assert_eq!(routing.bases.as_ref(), &[qname(ns, "protocol")]);

    let ping = types.rpc(&qname(ns, "ping")).unwrap();
    assert!(ping.input.schema_tree_child(&qname(ns, "destination")).is_some());
    assert!(ping.output.schema_tree_child(&qname(ns, "rtt")).is_some());
    assert!(types.rpc(&qname(ns, "traceroute")).is_none());
}

// =============================================================================
// Choice indexing
// =============================================================================

#[test]
fn choice_case_multimap_reflects_the_schema() {
    let source = r#"
        module pick {
          namespace "urn:example:pick";
          prefix p;
          container cfg {
            choice mode {
              case automatic { leaf interval { type uint32; } }
              case manual { leaf operator { type string; } }
            }
          }
        }
    "#;
    let (_, types) = build(&[("pick.yang", source)]);

    let mode = TypeName::new("gen.urn.example.pick.cfg", "Mode");
    let cases = types.choice_cases(&mode);
    let mut simples: Vec<&str> = cases.iter().map(|c| c.simple.as_str()).collect();
    simples.sort_unstable();
    assert_eq!(simples, vec!["Automatic", "Manual"]);

    let Some(RuntimeType::Choice(choice)) = types.type_for_class(&mode) else {
        panic!("choice not indexed");
    };
    assert_eq!(choice.valid_case_children().count(), 2);
    assert!(choice.additional_case_children().is_empty());
}

// =============================================================================
// Snapshot semantics
// =============================================================================

#[test]
fn index_reflects_augments_applied_before_the_build() {
    let base = r#"
        module base {
          namespace "urn:example:snap";
          prefix b;
          container top { leaf stock { type string; } }
        }
    "#;
    let ext = r#"
        module ext {
          namespace "urn:example:snapext";
          prefix e;
          import base { prefix b; }
          augment "/b:top" { leaf grafted { type string; } }
        }
    "#;
    let (_, types) = build(&[("base.yang", base), ("ext.yang", ext)]);

    let top = TypeName::new("gen.urn.example.snap", "Top");
    let Some(RuntimeType::Composite(top)) = types.type_for_class(&top) else {
        panic!("top composite not indexed");
    };
    assert!(
        top.schema_tree_child(&qname("urn:example:snap", "stock"))
            .is_some()
    );
    assert!(
        top.schema_tree_child(&qname("urn:example:snapext", "grafted"))
            .is_some()
    );
}
