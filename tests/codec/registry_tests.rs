//! Integration tests for the serializer registry
//!
//! One serializer per binding class, built at most once, shared by every
//! caller, and safe to hit from multiple threads.

use std::sync::Arc;
use std::thread;

use yangmill_binding::{BindingRuntimeTypes, TypeName};
use yangmill_codec::{DataObject, NormalizedNode, NormalizedTreeBuilder, SerializerRegistry};
use yangmill_foundation::{QName, QNameModule, XmlNamespace};
use yangmill_model::Value;
use yangmill_parser::TextSource;
use yangmill_reactor::Reactor;

const TREE: &str = r#"
    module tree {
      namespace "urn:example:tree";
      prefix t;
      container root {
        leaf tag { type string; }
        list branch {
          key "name";
          leaf name { type string; }
          container twig { leaf length { type uint8; } }
        }
      }
    }
"#;

fn registry() -> SerializerRegistry {
    let mut reactor = Reactor::vanilla();
    reactor.add_source(Box::new(TextSource::new("tree.yang", TREE)));
    let context = reactor.build().expect("model builds");
    let types = BindingRuntimeTypes::create(&context).expect("index builds");
    SerializerRegistry::new(Arc::new(types))
}

fn qname(name: &str) -> QName {
    QNameModule::new(XmlNamespace::new("urn:example:tree").unwrap(), None)
        .bind(name)
        .unwrap()
}

fn sample() -> DataObject {
    let twig = DataObject::new(TypeName::new("gen.urn.example.tree.root.branch", "Twig"))
        .with_leaf(qname("length"), Value::Uint(12));
    let branch = DataObject::new(TypeName::new("gen.urn.example.tree.root", "Branch"))
        .with_leaf(qname("name"), Value::str("main"))
        .with_container(qname("twig"), twig);
    DataObject::new(TypeName::new("gen.urn.example.tree", "Root"))
        .with_leaf(qname("tag"), Value::str("oak"))
        .with_list(qname("branch"), vec![branch])
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
// Per-class singleton contract
// =============================================================================

#[test]
fn repeated_requests_return_the_same_serializer() {
    let registry = registry();
    let name = TypeName::new("gen.urn.example.tree", "Root");

    let first = registry.get_serializer(&name).unwrap();
    let second = registry.get_serializer(&name).unwrap();
    let third = registry.get_serializer(&name).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(&second, &third));
}

#[test]
fn child_serializers_resolve_through_the_same_cache() {
    let registry = registry();
    // Serializing the root forces its child serializers to be built.
    let tree = serialize(&registry, &sample());
    assert!(tree.child(&qname("branch")).is_some());

    // The lazily-built child entries are now cache hits.
    let branch = TypeName::new("gen.urn.example.tree.root", "Branch");
    let first = registry.get_serializer(&branch).unwrap();
    let second = registry.get_serializer(&branch).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn cache_hits_and_misses_produce_identical_output() {
    let cold = registry();
    let warm = registry();
    let object = sample();

    // Warm one registry up front.
    let _ = serialize(&warm, &object);

    let from_cold = serialize(&cold, &object);
    let from_warm = serialize(&warm, &object);
    assert_eq!(from_cold, from_warm);
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn concurrent_first_requests_converge_on_one_serializer() {
    let registry = Arc::new(registry());
    let name = TypeName::new("gen.urn.example.tree", "Root");

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = Arc::clone(&registry);
            let name = name.clone();
            thread::spawn(move || registry.get_serializer(&name).unwrap())
        })
        .collect();

    let serializers: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    // Racing builders all observe the winning insert.
    for serializer in &serializers[1..] {
        assert!(Arc::ptr_eq(&serializers[0], serializer));
    }
}

#[test]
fn concurrent_serialization_is_deterministic() {
    let registry = Arc::new(registry());
    let object = sample();
    let reference = serialize(&registry, &object);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let registry = Arc::clone(&registry);
            let object = object.clone();
            thread::spawn(move || serialize(&registry, &object))
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), reference);
    }
}
