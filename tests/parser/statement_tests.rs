//! Integration tests for raw statement parsing
//!
//! The parser produces (keyword, argument, position, substatements)
//! tuples with no semantic interpretation; these tests pin that shape.

use yangmill_parser::{Keyword, RawStatement, StatementParser, StatementSource, TextSource};

fn parse(source: &str) -> RawStatement {
    StatementParser::new("test.yang", source)
        .parse_root()
        .expect("source parses")
}

// =============================================================================
// Structure
// =============================================================================

#[test]
fn full_module_shape_survives_parsing() {
    let root = parse(
        r#"
        module example-system {
          yang-version 1.1;
          namespace "urn:example:system";
          prefix sys;

          container system {
            leaf hostname { type string; }
            leaf-list search { type string; ordered-by user; }
            list user {
              key "name";
              leaf name { type string; }
            }
          }
        }
        "#,
    );

    assert_eq!(root.keyword, Keyword::core("module"));
    assert_eq!(root.argument.as_deref(), Some("example-system"));
    assert_eq!(root.substatements.len(), 4);

    let system = &root.substatements[3];
    assert_eq!(system.keyword, Keyword::core("container"));
    assert_eq!(system.substatements.len(), 3);

    let user = &system.substatements[2];
    assert_eq!(user.keyword, Keyword::core("list"));
    assert_eq!(user.substatements[0].keyword, Keyword::core("key"));
    assert_eq!(user.substatements[0].argument.as_deref(), Some("name"));
}

#[test]
fn semicolon_and_block_forms_are_equivalent_shapes() {
    let with_semi = parse("module m { leaf x; }");
    let with_block = parse("module m { leaf x { } }");
    assert_eq!(with_semi.substatements[0].substatements.len(), 0);
    assert_eq!(with_block.substatements[0].substatements.len(), 0);
}

#[test]
fn quoted_arguments_concatenate_across_lines() {
    let root = parse(
        "module m {\n  description \"first part \"\n    + \"second part\";\n}",
    );
    assert_eq!(
        root.substatements[0].argument.as_deref(),
        Some("first part second part")
    );
}

#[test]
fn extension_keywords_keep_their_prefix() {
    let root = parse("module m { md:annotation last-modified { type string; } }");
    let ext = &root.substatements[0];
    assert!(ext.keyword.is_extension());
    assert_eq!(ext.keyword.prefix.as_deref(), Some("md"));
    assert_eq!(&*ext.keyword.identifier, "annotation");
    assert_eq!(ext.argument.as_deref(), Some("last-modified"));
    assert_eq!(ext.substatements.len(), 1);
}

// =============================================================================
// Source references
// =============================================================================

#[test]
fn every_statement_carries_its_position() {
    let root = parse("module m {\n  container c {\n    leaf x;\n  }\n}");
    assert_eq!((root.reference.line, root.reference.column), (1, 1));

    let container = &root.substatements[0];
    assert_eq!((container.reference.line, container.reference.column), (2, 3));

    let leaf = &container.substatements[0];
    assert_eq!((leaf.reference.line, leaf.reference.column), (3, 5));
    assert_eq!(&*leaf.reference.source, "test.yang");
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn parse_errors_carry_the_failure_position() {
    let err = StatementParser::new("broken.yang", "module m {\n  leaf x\n}")
        .parse_root()
        .unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("expected ';' or '{'"));
    assert!(msg.contains("broken.yang:3:1"));
}

#[test]
fn missing_root_statement_is_rejected() {
    assert!(StatementParser::new("empty.yang", "").parse_root().is_err());
    assert!(
        StatementParser::new("comment.yang", "/* nothing else */")
            .parse_root()
            .is_err()
    );
}

#[test]
fn two_root_statements_are_rejected() {
    let err = StatementParser::new("two.yang", "module a { } module b { }")
        .parse_root()
        .unwrap_err();
    assert!(err.to_string().contains("after root statement"));
}

#[test]
fn concatenation_requires_a_quoted_operand() {
    let err = StatementParser::new("cat.yang", "module m { description \"a\" + b; }")
        .parse_root()
        .unwrap_err();
    assert!(err.to_string().contains("expected quoted string after '+'"));
}

// =============================================================================
// Statement sources
// =============================================================================

#[test]
fn text_source_is_a_reusable_statement_producer() {
    let source = TextSource::new("m.yang", "module m { prefix m; }");
    assert_eq!(source.name(), "m.yang");

    let first = source.root().unwrap();
    let second = source.root().unwrap();
    assert_eq!(first, second);
}
