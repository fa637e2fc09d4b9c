//! Integration tests for successful model builds
//!
//! Each test feeds YANG text through the reactor and inspects the frozen
//! effective model.

use yangmill_foundation::{QName, QNameModule, Revision, XmlNamespace};
use yangmill_model::{
    EffectiveModelContext, MaxElements, OrderedBy, SchemaNodeKind, YangVersion,
};
use yangmill_parser::TextSource;
use yangmill_reactor::Reactor;

fn build(sources: &[(&str, &str)]) -> EffectiveModelContext {
    let mut reactor = Reactor::vanilla();
    for (name, text) in sources {
        reactor.add_source(Box::new(TextSource::new(*name, *text)));
    }
    reactor.build().expect("model builds")
}

fn module_id(ns: &str) -> QNameModule {
    QNameModule::new(XmlNamespace::new(ns).unwrap(), None)
}

fn qname(ns: &str, name: &str) -> QName {
    module_id(ns).bind(name).unwrap()
}

// =============================================================================
// Module structure
// =============================================================================

#[test]
fn minimal_module() {
    let context = build(&[(
        "m.yang",
        "module m { yang-version 1.1; namespace \"urn:example:m\"; prefix m; }",
    )]);

    assert_eq!(context.module_count(), 1);
    let module = context.find_module_by_name("m").unwrap();
    assert_eq!(&*module.prefix, "m");
    assert_eq!(module.yang_version, YangVersion::V1_1);
    assert_eq!(module.module, module_id("urn:example:m"));
    assert!(context.find_module(&module_id("urn:example:m")).is_some());
}

#[test]
fn newest_revision_becomes_module_identity() {
    let context = build(&[(
        "m.yang",
        r#"
        module m {
          namespace "urn:example:rev";
          prefix m;
          revision 2023-01-01;
          revision 2024-06-15;
          revision 2022-12-31;
        }
        "#,
    )]);

    let module = context.find_module_by_name("m").unwrap();
    assert_eq!(
        module.module.revision,
        Some(Revision::new("2024-06-15").unwrap())
    );
    let declared: Vec<&str> = module.revisions.iter().map(Revision::as_str).collect();
    assert_eq!(declared, vec!["2024-06-15", "2023-01-01", "2022-12-31"]);
}

#[test]
fn nested_data_tree_with_properties() {
    let context = build(&[(
        "sys.yang",
        r#"
        module sys {
          namespace "urn:example:sys";
          prefix s;
          container system {
            presence "system configuration exists";
            leaf hostname { type string; mandatory true; }
            leaf-list search {
              type string;
              ordered-by user;
              max-elements 8;
            }
            list user {
              key "name";
              min-elements 1;
              leaf name { type string; }
              leaf uid { type uint32; }
            }
          }
        }
        "#,
    )]);

    let ns = "urn:example:sys";
    let system = context.find_schema_node(&[qname(ns, "system")]).unwrap();
    let SchemaNodeKind::Container { presence } = &system.kind else {
        panic!("system is not a container");
    };
    assert!(presence.as_deref().unwrap().contains("exists"));
    assert_eq!(system.children.len(), 3);

    let hostname = system.schema_tree_child(&qname(ns, "hostname")).unwrap();
    let SchemaNodeKind::Leaf { mandatory, ty, .. } = &hostname.kind else {
        panic!("hostname is not a leaf");
    };
    assert!(mandatory);
    assert_eq!(&*ty.name, "string");

    let search = system.schema_tree_child(&qname(ns, "search")).unwrap();
    let SchemaNodeKind::LeafList {
        ordered_by,
        max_elements,
        ..
    } = &search.kind
    else {
        panic!("search is not a leaf-list");
    };
    assert_eq!(*ordered_by, OrderedBy::User);
    assert_eq!(*max_elements, MaxElements::Bounded(8));

    let user = system.schema_tree_child(&qname(ns, "user")).unwrap();
    let SchemaNodeKind::List {
        keys, min_elements, ..
    } = &user.kind
    else {
        panic!("user is not a list");
    };
    assert_eq!(keys.as_ref(), &[qname(ns, "name")]);
    assert_eq!(*min_elements, 1);
}

#[test]
fn config_false_is_inherited_by_descendants() {
    let context = build(&[(
        "state.yang",
        r#"
        module state {
          namespace "urn:example:state";
          prefix st;
          container counters {
            config false;
            leaf rx { type uint64; }
          }
          container settings {
            leaf speed { type uint32; }
          }
        }
        "#,
    )]);

    let ns = "urn:example:state";
    let counters = context.find_schema_node(&[qname(ns, "counters")]).unwrap();
    assert!(!counters.config);
    let rx = context
        .find_schema_node(&[qname(ns, "counters"), qname(ns, "rx")])
        .unwrap();
    assert!(!rx.config);

    let speed = context
        .find_schema_node(&[qname(ns, "settings"), qname(ns, "speed")])
        .unwrap();
    assert!(speed.config);
}

#[test]
fn key_leaves_keep_declaration_order() {
    let context = build(&[(
        "keys.yang",
        r#"
        module keys {
          namespace "urn:example:keys";
          prefix k;
          list route {
            key "prefix next-hop";
            leaf prefix { type string; }
            leaf next-hop { type string; }
          }
        }
        "#,
    )]);

    let ns = "urn:example:keys";
    let route = context.find_schema_node(&[qname(ns, "route")]).unwrap();
    let SchemaNodeKind::List { keys, .. } = &route.kind else {
        panic!("route is not a list");
    };
    assert_eq!(
        keys.as_ref(),
        &[qname(ns, "prefix"), qname(ns, "next-hop")]
    );
}

// =============================================================================
// Groupings and uses
// =============================================================================

#[test]
fn uses_resolves_a_forward_grouping_reference() {
    // The uses appears before the grouping it names.
    let context = build(&[(
        "fwd.yang",
        r#"
        module fwd {
          namespace "urn:example:fwd";
          prefix f;
          container endpoint { uses address; }
          grouping address {
            leaf host { type string; }
            leaf port { type uint16; }
          }
        }
        "#,
    )]);

    let ns = "urn:example:fwd";
    let endpoint = context.find_schema_node(&[qname(ns, "endpoint")]).unwrap();
    assert!(endpoint.schema_tree_child(&qname(ns, "host")).is_some());
    assert!(endpoint.schema_tree_child(&qname(ns, "port")).is_some());

    let module = context.find_module_by_name("fwd").unwrap();
    assert_eq!(module.groupings.len(), 1);
    assert_eq!(module.groupings[0].children.len(), 2);
}

const PROVIDER: &str = r#"
    module provider {
      namespace "urn:example:provider";
      prefix p;
      grouping endpoint {
        leaf host { type string; }
        leaf port { type uint16; }
      }
    }
"#;

const CONSUMER: &str = r#"
    module consumer {
      namespace "urn:example:consumer";
      prefix c;
      import provider { prefix p; }
      container server { uses p:endpoint; }
    }
"#;

#[test]
fn cross_module_uses_rebinds_names_to_the_using_module() {
    // Supply order must not matter: try provider-first and consumer-first.
    for sources in [
        [("provider.yang", PROVIDER), ("consumer.yang", CONSUMER)],
        [("consumer.yang", CONSUMER), ("provider.yang", PROVIDER)],
    ] {
        let context = build(&sources);
        let server = context
            .find_schema_node(&[qname("urn:example:consumer", "server")])
            .unwrap();

        // Instantiated children live in the consumer's namespace.
        assert!(
            server
                .schema_tree_child(&qname("urn:example:consumer", "host"))
                .is_some()
        );
        assert!(
            server
                .schema_tree_child(&qname("urn:example:provider", "host"))
                .is_none()
        );
    }
}

#[test]
fn mutual_imports_resolve_without_ordering() {
    let alpha = r#"
        module alpha {
          namespace "urn:example:alpha";
          prefix a;
          import beta { prefix b; }
          grouping ga { leaf from-alpha { type string; } }
          container top-a { uses b:gb; }
        }
    "#;
    let beta = r#"
        module beta {
          namespace "urn:example:beta";
          prefix bt;
          import alpha { prefix a; }
          grouping gb { leaf from-beta { type string; } }
          container top-b { uses a:ga; }
        }
    "#;

    let context = build(&[("alpha.yang", alpha), ("beta.yang", beta)]);

    let top_a = context
        .find_schema_node(&[qname("urn:example:alpha", "top-a")])
        .unwrap();
    assert!(
        top_a
            .schema_tree_child(&qname("urn:example:alpha", "from-beta"))
            .is_some()
    );

    let top_b = context
        .find_schema_node(&[qname("urn:example:beta", "top-b")])
        .unwrap();
    assert!(
        top_b
            .schema_tree_child(&qname("urn:example:beta", "from-alpha"))
            .is_some()
    );
}

#[test]
fn nested_uses_expand_transitively() {
    let context = build(&[(
        "nest.yang",
        r#"
        module nest {
          namespace "urn:example:nest";
          prefix n;
          grouping inner { leaf deep { type string; } }
          grouping outer {
            container wrapper { uses inner; }
          }
          container top { uses outer; }
        }
        "#,
    )]);

    let ns = "urn:example:nest";
    let deep = context.find_schema_node(&[
        qname(ns, "top"),
        qname(ns, "wrapper"),
        qname(ns, "deep"),
    ]);
    assert!(deep.is_some());
}

// =============================================================================
// Augmentation
// =============================================================================

#[test]
fn same_module_augment_extends_its_target() {
    let context = build(&[(
        "aug.yang",
        r#"
        module aug {
          namespace "urn:example:aug";
          prefix a;
          container top { leaf base { type string; } }
          augment "/top" { leaf extra { type string; } }
        }
        "#,
    )]);

    let ns = "urn:example:aug";
    let top = context.find_schema_node(&[qname(ns, "top")]).unwrap();
    assert!(top.schema_tree_child(&qname(ns, "base")).is_some());
    assert!(top.schema_tree_child(&qname(ns, "extra")).is_some());
    assert_eq!(top.augmented_by.as_ref(), &[module_id(ns)]);
}

#[test]
fn cross_module_augment_keeps_the_augmenting_namespace() {
    let base = r#"
        module base {
          namespace "urn:example:base";
          prefix b;
          container top { leaf stock { type string; } }
        }
    "#;
    let ext = r#"
        module ext {
          namespace "urn:example:ext";
          prefix e;
          import base { prefix b; }
          augment "/b:top" {
            leaf added { type string; }
            container extras { leaf more { type boolean; } }
          }
        }
    "#;

    // Either supply order works.
    for sources in [
        [("base.yang", base), ("ext.yang", ext)],
        [("ext.yang", ext), ("base.yang", base)],
    ] {
        let context = build(&sources);
        let top = context
            .find_schema_node(&[qname("urn:example:base", "top")])
            .unwrap();

        assert!(
            top.schema_tree_child(&qname("urn:example:base", "stock"))
                .is_some()
        );
        // Augment-injected children keep the augmenting module's names.
        assert!(
            top.schema_tree_child(&qname("urn:example:ext", "added"))
                .is_some()
        );
        let extras = top
            .schema_tree_child(&qname("urn:example:ext", "extras"))
            .unwrap();
        assert!(
            extras
                .schema_tree_child(&qname("urn:example:ext", "more"))
                .is_some()
        );
        assert_eq!(top.augmented_by.as_ref(), &[module_id("urn:example:ext")]);
    }
}

#[test]
fn augment_reaches_nested_targets() {
    let context = build(&[(
        "deep.yang",
        r#"
        module deep {
          namespace "urn:example:deep";
          prefix d;
          container l1 { container l2 { leaf existing { type string; } } }
          augment "/l1/l2" { leaf injected { type string; } }
        }
        "#,
    )]);

    let ns = "urn:example:deep";
    let injected = context.find_schema_node(&[
        qname(ns, "l1"),
        qname(ns, "l2"),
        qname(ns, "injected"),
    ]);
    assert!(injected.is_some());
}

// =============================================================================
// Choices
// =============================================================================

#[test]
fn choice_cases_and_shorthand() {
    let context = build(&[(
        "pick.yang",
        r#"
        module pick {
          namespace "urn:example:pick";
          prefix pk;
          container cfg {
            choice transport {
              default tcp;
              case tcp { leaf nodelay { type boolean; } }
              case tls { leaf cert { type string; } }
              leaf shorthand { type string; }
            }
          }
        }
        "#,
    )]);

    let ns = "urn:example:pick";
    let transport = context
        .find_schema_node(&[qname(ns, "cfg"), qname(ns, "transport")])
        .unwrap();

    let SchemaNodeKind::Choice { default, .. } = &transport.kind else {
        panic!("transport is not a choice");
    };
    assert_eq!(default.as_ref(), Some(&qname(ns, "tcp")));

    // The shorthand leaf is wrapped in an implicit case of its own name.
    assert_eq!(transport.case_children().count(), 3);
    let implicit = transport
        .schema_tree_child(&qname(ns, "shorthand"))
        .unwrap();
    assert!(matches!(implicit.kind, SchemaNodeKind::Case));
    assert!(
        implicit
            .schema_tree_child(&qname(ns, "shorthand"))
            .is_some()
    );
}

// =============================================================================
// RPCs
// =============================================================================

#[test]
fn rpc_materializes_missing_input_and_output() {
    let context = build(&[(
        "ops.yang",
        r#"
        module ops {
          namespace "urn:example:ops";
          prefix o;
          rpc reboot {
            input { leaf delay { type uint32; } }
          }
        }
        "#,
    )]);

    let ns = "urn:example:ops";
    let module = context.find_module_by_name("ops").unwrap();
    assert_eq!(module.rpcs.len(), 1);

    let reboot = context.find_rpc(&qname(ns, "reboot")).unwrap();
    assert!(
        reboot
            .input
            .schema_tree_child(&qname(ns, "delay"))
            .is_some()
    );
    // The undeclared output exists and is empty.
    assert!(matches!(reboot.output.kind, SchemaNodeKind::Output));
    assert!(reboot.output.children.is_empty());
    // Operation subtrees never carry configuration.
    assert!(!reboot.input.config);
}

// =============================================================================
// Typedefs
// =============================================================================

#[test]
fn typedef_chains_resolve_to_their_builtin_base() {
    let context = build(&[(
        "td.yang",
        r#"
        module td {
          namespace "urn:example:td";
          prefix t;
          typedef percent { type uint8; }
          typedef load { type percent; }
          leaf cpu { type load; }
        }
        "#,
    )]);

    let ns = "urn:example:td";
    let cpu = context.find_schema_node(&[qname(ns, "cpu")]).unwrap();
    let SchemaNodeKind::Leaf { ty, .. } = &cpu.kind else {
        panic!("cpu is not a leaf");
    };
    assert_eq!(&*ty.name, "load");
    assert_eq!(ty.base.name(), "uint8");

    let module = context.find_module_by_name("td").unwrap();
    assert_eq!(module.typedefs.len(), 2);
}

#[test]
fn imported_typedefs_are_reachable_by_prefix() {
    let types = r#"
        module types {
          namespace "urn:example:types";
          prefix t;
          typedef port { type uint16; }
        }
    "#;
    let app = r#"
        module app {
          namespace "urn:example:app";
          prefix ap;
          import types { prefix t; }
          leaf listen { type t:port; }
        }
    "#;

    let context = build(&[("app.yang", app), ("types.yang", types)]);
    let listen = context
        .find_schema_node(&[qname("urn:example:app", "listen")])
        .unwrap();
    let SchemaNodeKind::Leaf { ty, .. } = &listen.kind else {
        panic!("listen is not a leaf");
    };
    assert_eq!(&*ty.name, "port");
    assert_eq!(ty.base.name(), "uint16");
}

// =============================================================================
// Identities and features
// =============================================================================

#[test]
fn identity_bases_resolve_across_modules() {
    let base = r#"
        module idbase {
          namespace "urn:example:idbase";
          prefix ib;
          identity transport;
        }
    "#;
    let ext = r#"
        module idext {
          namespace "urn:example:idext";
          prefix ie;
          import idbase { prefix ib; }
          identity tcp { base ib:transport; }
        }
    "#;

    let context = build(&[("idext.yang", ext), ("idbase.yang", base)]);

    let tcp = context
        .find_identity(&qname("urn:example:idext", "tcp"))
        .unwrap();
    assert_eq!(
        tcp.bases.as_ref(),
        &[qname("urn:example:idbase", "transport")]
    );
    assert!(
        context
            .find_identity(&qname("urn:example:idbase", "transport"))
            .is_some()
    );
}

#[test]
fn features_and_if_features_build() {
    let context = build(&[(
        "feat.yang",
        r#"
        module feat {
          namespace "urn:example:feat";
          prefix f;
          feature logging;
          container log { if-feature logging; leaf level { type uint8; } }
        }
        "#,
    )]);

    let module = context.find_module_by_name("feat").unwrap();
    assert_eq!(
        module.features.as_ref(),
        &[qname("urn:example:feat", "logging")]
    );
    assert!(
        context
            .find_schema_node(&[qname("urn:example:feat", "log")])
            .is_some()
    );
}

// =============================================================================
// Submodules
// =============================================================================

#[test]
fn include_splices_the_submodule_body() {
    let module = r#"
        module host {
          namespace "urn:example:host";
          prefix h;
          include parts;
          container top { uses h:shared; }
        }
    "#;
    let submodule = r#"
        submodule parts {
          belongs-to host { prefix h; }
          grouping shared { leaf from-sub { type string; } }
          leaf direct { type string; }
        }
    "#;

    let context = build(&[("host.yang", module), ("parts.yang", submodule)]);
    assert_eq!(context.module_count(), 1);

    let ns = "urn:example:host";
    // Submodule data nodes are spliced into the module.
    assert!(context.find_schema_node(&[qname(ns, "direct")]).is_some());
    // Submodule groupings are usable from the module body.
    let top = context.find_schema_node(&[qname(ns, "top")]).unwrap();
    assert!(top.schema_tree_child(&qname(ns, "from-sub")).is_some());
}
