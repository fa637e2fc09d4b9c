//! Round-trip tests: binding object → events → normalized tree
//!
//! For every supported composite kind, serializing an instance and
//! feeding the events to the tree builder must reconstruct the node
//! structure the schema maps the object to.

use std::sync::Arc;

use yangmill_binding::{BindingRuntimeTypes, TypeName};
use yangmill_codec::{DataObject, NormalizedNode, NormalizedTreeBuilder, SerializerRegistry};
use yangmill_foundation::{QName, QNameModule, XmlNamespace};
use yangmill_model::Value;
use yangmill_parser::TextSource;
use yangmill_reactor::Reactor;

fn registry(sources: &[(&str, &str)]) -> SerializerRegistry {
    let mut reactor = Reactor::vanilla();
    for (name, text) in sources {
        reactor.add_source(Box::new(TextSource::new(*name, *text)));
    }
    let context = reactor.build().expect("model builds");
    let types = BindingRuntimeTypes::create(&context).expect("index builds");
    SerializerRegistry::new(Arc::new(types))
}

fn serialize(registry: &SerializerRegistry, object: &DataObject) -> Arc<NormalizedNode> {
    let serializer = registry
        .get_serializer(object.binding_type())
        .expect("serializer builds");
    let mut builder = NormalizedTreeBuilder::new();
    serializer
        .serialize(registry, object, &mut builder)
        .expect("serialization succeeds");
    builder.build().expect("balanced event stream")
}

fn qname(ns: &str, name: &str) -> QName {
    QNameModule::new(XmlNamespace::new(ns).unwrap(), None)
        .bind(name)
        .unwrap()
}

const DEVICE: &str = r#"
    module device {
      namespace "urn:example:device";
      prefix dev;
      container device {
        leaf hostname { type string; }
        leaf-list dns { type string; }
        list port {
          key "id";
          leaf id { type uint16; }
          leaf enabled { type boolean; }
        }
        list scratch {
          leaf note { type string; }
        }
        choice power {
          case battery { leaf capacity { type uint8; } }
          case mains { leaf voltage { type uint16; } }
        }
      }
    }
"#;

const NS: &str = "urn:example:device";

fn device_object() -> DataObject {
    let port = |id: u64, enabled: bool| {
        DataObject::new(TypeName::new("gen.urn.example.device.device", "Port"))
            .with_leaf(qname(NS, "id"), Value::Uint(id))
            .with_leaf(qname(NS, "enabled"), Value::Bool(enabled))
    };
    let scratch = DataObject::new(TypeName::new("gen.urn.example.device.device", "Scratch"))
        .with_leaf(qname(NS, "note"), Value::str("temporary"));
    let battery = DataObject::new(TypeName::new(
        "gen.urn.example.device.device.power",
        "Battery",
    ))
    .with_leaf(qname(NS, "capacity"), Value::Uint(80));

    DataObject::new(TypeName::new("gen.urn.example.device", "Device"))
        .with_leaf(qname(NS, "hostname"), Value::str("edge-1"))
        .with_leaf_list(
            qname(NS, "dns"),
            vec![Value::str("10.0.0.1"), Value::str("10.0.0.2")],
        )
        .with_list(qname(NS, "port"), vec![port(1, true), port(2, false)])
        .with_list(qname(NS, "scratch"), vec![scratch])
        .with_choice(qname(NS, "power"), battery)
}

// =============================================================================
// Containers, leaves, leaf-lists
// =============================================================================

#[test]
fn container_and_leaves_round_trip() {
    let registry = registry(&[("device.yang", DEVICE)]);
    let tree = serialize(&registry, &device_object());

    assert_eq!(tree.qname(), &qname(NS, "device"));
    assert_eq!(
        tree.child(&qname(NS, "hostname")).unwrap().value(),
        Some(&Value::str("edge-1"))
    );

    let dns = tree.child(&qname(NS, "dns")).unwrap();
    let NormalizedNode::LeafSet { values, .. } = dns.as_ref() else {
        panic!("dns is not a leaf-set");
    };
    let collected: Vec<&Value> = values.iter().collect();
    assert_eq!(
        collected,
        vec![&Value::str("10.0.0.1"), &Value::str("10.0.0.2")]
    );
}

#[test]
fn absent_children_are_simply_omitted() {
    let registry = registry(&[("device.yang", DEVICE)]);
    let sparse = DataObject::new(TypeName::new("gen.urn.example.device", "Device"))
        .with_leaf(qname(NS, "hostname"), Value::str("bare"));
    let tree = serialize(&registry, &sparse);

    assert!(tree.child(&qname(NS, "hostname")).is_some());
    assert!(tree.child(&qname(NS, "dns")).is_none());
    assert!(tree.child(&qname(NS, "port")).is_none());
    assert!(tree.child(&qname(NS, "power")).is_none());
}

// =============================================================================
// Lists
// =============================================================================

#[test]
fn keyed_list_entries_carry_their_keys() {
    let registry = registry(&[("device.yang", DEVICE)]);
    let tree = serialize(&registry, &device_object());

    let ports = tree.child(&qname(NS, "port")).unwrap();
    let NormalizedNode::Map { entries, .. } = ports.as_ref() else {
        panic!("port is not a keyed list");
    };
    assert_eq!(entries.len(), 2);

    let NormalizedNode::MapEntry { key, children, .. } = entries[0].as_ref() else {
        panic!("map holds a non-entry node");
    };
    assert_eq!(key, &vec![(qname(NS, "id"), Value::Uint(1))]);
    assert_eq!(
        children.get(&qname(NS, "enabled")).unwrap().value(),
        Some(&Value::Bool(true))
    );
}

#[test]
fn unkeyed_list_items_round_trip() {
    let registry = registry(&[("device.yang", DEVICE)]);
    let tree = serialize(&registry, &device_object());

    let scratch = tree.child(&qname(NS, "scratch")).unwrap();
    let NormalizedNode::UnkeyedList { entries, .. } = scratch.as_ref() else {
        panic!("scratch is not an unkeyed list");
    };
    assert_eq!(entries.len(), 1);
    let NormalizedNode::UnkeyedListItem { children, .. } = entries[0].as_ref() else {
        panic!("unkeyed list holds a non-item node");
    };
    assert_eq!(
        children.get(&qname(NS, "note")).unwrap().value(),
        Some(&Value::str("temporary"))
    );
}

#[test]
fn missing_key_leaf_fails_serialization() {
    let registry = registry(&[("device.yang", DEVICE)]);
    let keyless = DataObject::new(TypeName::new("gen.urn.example.device", "Device")).with_list(
        qname(NS, "port"),
        vec![DataObject::new(TypeName::new(
            "gen.urn.example.device.device",
            "Port",
        ))],
    );

    let serializer = registry.get_serializer(keyless.binding_type()).unwrap();
    let mut builder = NormalizedTreeBuilder::new();
    let err = serializer
        .serialize(&registry, &keyless, &mut builder)
        .unwrap_err();
    assert!(err.to_string().contains("map entry key"));
}

// =============================================================================
// Choices
// =============================================================================

#[test]
fn active_case_is_chosen_by_the_instance() {
    let registry = registry(&[("device.yang", DEVICE)]);

    let battery_tree = serialize(&registry, &device_object());
    let power = battery_tree.child(&qname(NS, "power")).unwrap();
    let NormalizedNode::Choice { case, children, .. } = power.as_ref() else {
        panic!("power is not a choice");
    };
    assert_eq!(case.as_ref(), Some(&qname(NS, "battery")));
    assert!(children.contains_key(&qname(NS, "capacity")));

    // Swapping the case object swaps the emitted case.
    let mains = DataObject::new(TypeName::new("gen.urn.example.device.device.power", "Mains"))
        .with_leaf(qname(NS, "voltage"), Value::Uint(230));
    let swapped = device_object().with_choice(qname(NS, "power"), mains);
    let mains_tree = serialize(&registry, &swapped);
    let power = mains_tree.child(&qname(NS, "power")).unwrap();
    let NormalizedNode::Choice { case, children, .. } = power.as_ref() else {
        panic!("power is not a choice");
    };
    assert_eq!(case.as_ref(), Some(&qname(NS, "mains")));
    assert!(children.contains_key(&qname(NS, "voltage")));
}

#[test]
fn foreign_case_class_is_rejected() {
    let registry = registry(&[("device.yang", DEVICE)]);
    let bogus_case = DataObject::new(TypeName::new("gen.somewhere.else", "NotACase"));
    let object = device_object().with_choice(qname(NS, "power"), bogus_case);

    let serializer = registry.get_serializer(object.binding_type()).unwrap();
    let mut builder = NormalizedTreeBuilder::new();
    let err = serializer
        .serialize(&registry, &object, &mut builder)
        .unwrap_err();
    assert!(err.to_string().contains("is not a case of"));
}

// =============================================================================
// Augmentations
// =============================================================================

#[test]
fn augmentation_content_round_trips() {
    let base = r#"
        module base {
          namespace "urn:example:codecbase";
          prefix b;
          container top { leaf stock { type string; } }
        }
    "#;
    let ext = r#"
        module ext {
          namespace "urn:example:codecext";
          prefix e;
          import base { prefix b; }
          augment "/b:top" {
            leaf grafted { type string; }
            container annex { leaf room { type uint8; } }
          }
        }
    "#;
    let registry = registry(&[("base.yang", base), ("ext.yang", ext)]);

    let base_ns = "urn:example:codecbase";
    let ext_ns = "urn:example:codecext";
    let annex = DataObject::new(TypeName::new("gen.urn.example.codecbase.top", "Annex"))
        .with_leaf(qname(ext_ns, "room"), Value::Uint(3));
    let augmentation = DataObject::new(TypeName::new("gen.urn.example.codecext", "TopAug"))
        .with_leaf(qname(ext_ns, "grafted"), Value::str("extension"))
        .with_container(qname(ext_ns, "annex"), annex);
    let object = DataObject::new(TypeName::new("gen.urn.example.codecbase", "Top"))
        .with_leaf(qname(base_ns, "stock"), Value::str("original"))
        .with_augmentation(augmentation);

    let tree = serialize(&registry, &object);

    // Augmentation children inline into the augmented container.
    assert_eq!(
        tree.child(&qname(ext_ns, "grafted")).unwrap().value(),
        Some(&Value::str("extension"))
    );
    let annex = tree.child(&qname(ext_ns, "annex")).unwrap();
    assert_eq!(
        annex.child(&qname(ext_ns, "room")).unwrap().value(),
        Some(&Value::Uint(3))
    );
    assert_eq!(
        tree.child(&qname(base_ns, "stock")).unwrap().value(),
        Some(&Value::str("original"))
    );
}

// =============================================================================
// Structural equality
// =============================================================================

#[test]
fn serialization_matches_a_hand_built_tree() {
    let registry = registry(&[("device.yang", DEVICE)]);
    let object = DataObject::new(TypeName::new("gen.urn.example.device", "Device"))
        .with_leaf(qname(NS, "hostname"), Value::str("edge-1"));

    let serialized = serialize(&registry, &object);

    let mut children = im::OrdMap::new();
    children.insert(
        qname(NS, "hostname"),
        Arc::new(NormalizedNode::Leaf {
            qname: qname(NS, "hostname"),
            value: Value::str("edge-1"),
        }),
    );
    let expected = NormalizedNode::Container {
        qname: qname(NS, "device"),
        children,
    };
    assert_eq!(serialized.as_ref(), &expected);
}
