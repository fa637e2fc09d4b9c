//! Full-pipeline tests
//!
//! Text sources go in; a frozen model, a runtime-type index, and working
//! serializers come out. These tests exercise the layers through the
//! `yangmill` facade the way downstream tooling would.

use std::sync::Arc;

use yangmill::binding::{BindingRuntimeTypes, RuntimeType, TypeName};
use yangmill::codec::{DataObject, NormalizedNode, NormalizedTreeBuilder, SerializerRegistry};
use yangmill::foundation::{QName, QNameModule, XmlNamespace};
use yangmill::model::{EffectiveModelContext, Value};
use yangmill::parser::TextSource;
use yangmill::reactor::Reactor;

const LIBRARY: &str = r#"
    module library {
      namespace "urn:example:library";
      prefix lib;
      grouping audit {
        leaf created-by { type string; }
        leaf created-at { type string; }
      }
    }
"#;

const CATALOG: &str = r#"
    module catalog {
      namespace "urn:example:catalog";
      prefix cat;
      import library { prefix lib; }

      container catalog {
        uses lib:audit;
        list book {
          key "isbn";
          leaf isbn { type string; }
          leaf title { type string; }
        }
        choice availability {
          case in-print { leaf publisher { type string; } }
          case archived { leaf location { type string; } }
        }
      }
    }
"#;

fn build(sources: &[(&str, &str)]) -> (EffectiveModelContext, Arc<BindingRuntimeTypes>) {
    let mut reactor = Reactor::vanilla();
    for (name, text) in sources {
        reactor.add_source(Box::new(TextSource::new(*name, *text)));
    }
    let context = reactor.build().expect("model builds");
    let types = Arc::new(BindingRuntimeTypes::create(&context).expect("index builds"));
    (context, types)
}

fn qname(ns: &str, name: &str) -> QName {
    QNameModule::new(XmlNamespace::new(ns).unwrap(), None)
        .bind(name)
        .unwrap()
}

fn catalog_object(ns: &str) -> DataObject {
    let book = DataObject::new(TypeName::new("gen.urn.example.catalog.catalog", "Book"))
        .with_leaf(qname(ns, "isbn"), Value::str("978-0134190440"))
        .with_leaf(qname(ns, "title"), Value::str("The Go Programming Language"));
    let in_print = DataObject::new(TypeName::new(
        "gen.urn.example.catalog.catalog.availability",
        "InPrint",
    ))
    .with_leaf(qname(ns, "publisher"), Value::str("Addison-Wesley"));

    DataObject::new(TypeName::new("gen.urn.example.catalog", "Catalog"))
        .with_leaf(qname(ns, "created-by"), Value::str("admin"))
        .with_list(qname(ns, "book"), vec![book])
        .with_choice(qname(ns, "availability"), in_print)
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

// =============================================================================
// Pipeline end to end
// =============================================================================

#[test]
fn text_to_normalized_tree() {
    let (context, types) = build(&[("library.yang", LIBRARY), ("catalog.yang", CATALOG)]);
    let ns = "urn:example:catalog";

    // The effective model resolved the cross-module grouping.
    let catalog = context.find_schema_node(&[qname(ns, "catalog")]).unwrap();
    assert!(catalog.schema_tree_child(&qname(ns, "created-by")).is_some());

    // The index pairs generated types with their schema nodes.
    let catalog_type = TypeName::new("gen.urn.example.catalog", "Catalog");
    assert!(matches!(
        types.type_for_class(&catalog_type),
        Some(RuntimeType::Composite(_))
    ));

    // Serialization reproduces the object's structure.
    let registry = SerializerRegistry::new(Arc::clone(&types));
    let tree = serialize(&registry, &catalog_object(ns));

    assert_eq!(
        tree.child(&qname(ns, "created-by")).unwrap().value(),
        Some(&Value::str("admin"))
    );

    let books = tree.child(&qname(ns, "book")).unwrap();
    let NormalizedNode::Map { entries, .. } = books.as_ref() else {
        panic!("book is not a keyed list");
    };
    assert_eq!(entries.len(), 1);

    let availability = tree.child(&qname(ns, "availability")).unwrap();
    let NormalizedNode::Choice { case, .. } = availability.as_ref() else {
        panic!("availability is not a choice");
    };
    assert_eq!(case.as_ref(), Some(&qname(ns, "in-print")));
}

#[test]
fn source_order_does_not_change_the_result() {
    let forward = build(&[("library.yang", LIBRARY), ("catalog.yang", CATALOG)]);
    let reverse = build(&[("catalog.yang", CATALOG), ("library.yang", LIBRARY)]);
    let ns = "urn:example:catalog";

    let object = catalog_object(ns);
    let from_forward = serialize(&SerializerRegistry::new(forward.1), &object);
    let from_reverse = serialize(&SerializerRegistry::new(reverse.1), &object);
    assert_eq!(from_forward, from_reverse);
}

#[test]
fn augmented_schema_flows_through_the_whole_pipeline() {
    let extension = r#"
        module shelf {
          namespace "urn:example:shelf";
          prefix sh;
          import catalog { prefix cat; }
          augment "/cat:catalog" { leaf shelf-count { type uint32; } }
        }
    "#;
    let (context, types) = build(&[
        ("library.yang", LIBRARY),
        ("catalog.yang", CATALOG),
        ("shelf.yang", extension),
    ]);
    let cat_ns = "urn:example:catalog";
    let shelf_ns = "urn:example:shelf";

    // The augment landed in the effective model.
    let catalog = context.find_schema_node(&[qname(cat_ns, "catalog")]).unwrap();
    assert!(
        catalog
            .schema_tree_child(&qname(shelf_ns, "shelf-count"))
            .is_some()
    );

    // And serializes through the augmentation dispatch path.
    let augmentation = DataObject::new(TypeName::new("gen.urn.example.shelf", "CatalogAug"))
        .with_leaf(qname(shelf_ns, "shelf-count"), Value::Uint(42));
    let object = catalog_object(cat_ns).with_augmentation(augmentation);

    let registry = SerializerRegistry::new(types);
    let tree = serialize(&registry, &object);
    assert_eq!(
        tree.child(&qname(shelf_ns, "shelf-count")).unwrap().value(),
        Some(&Value::Uint(42))
    );
}

#[test]
fn rejected_builds_leave_no_partial_artifacts() {
    let mut reactor = Reactor::vanilla();
    reactor.add_source(Box::new(TextSource::new("ok.yang", LIBRARY)));
    reactor.add_source(Box::new(TextSource::new(
        "broken.yang",
        "module broken { namespace \"urn:example:broken\"; prefix br; import absent { prefix ab; } }",
    )));

    // One bad source fails the whole build; there is no partial model to
    // observe.
    assert!(reactor.build().is_err());
}
