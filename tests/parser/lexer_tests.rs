//! Integration tests for the YANG lexer
//!
//! Covers the RFC 7950 lexical rules: quoting, escape processing,
//! concatenation, comments, and span tracking.

use yangmill_parser::{Lexer, TokenKind};

fn kinds(source: &str) -> Vec<TokenKind> {
    Lexer::tokenize_all(source)
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

// =============================================================================
// Strings and quoting
// =============================================================================

#[test]
fn double_quotes_process_escapes() {
    assert_eq!(
        kinds(r#""line one\nline two""#),
        vec![TokenKind::Quoted("line one\nline two".into()), TokenKind::Eof]
    );
    assert_eq!(
        kinds(r#""tab\there""#),
        vec![TokenKind::Quoted("tab\there".into()), TokenKind::Eof]
    );
}

#[test]
fn single_quotes_are_verbatim() {
    assert_eq!(
        kinds(r"'literal\nbackslash'"),
        vec![TokenKind::Quoted(r"literal\nbackslash".into()), TokenKind::Eof]
    );
}

#[test]
fn invalid_escape_is_a_lex_error() {
    let tokens = kinds(r#""bad \q escape""#);
    assert!(matches!(&tokens[0], TokenKind::Error(msg) if msg.contains("escape")));
}

#[test]
fn plus_between_quoted_strings_is_concatenation() {
    assert_eq!(
        kinds(r#""a" + 'b'"#),
        vec![
            TokenKind::Quoted("a".into()),
            TokenKind::Plus,
            TokenKind::Quoted("b".into()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn plus_inside_a_word_is_not_concatenation() {
    // A signed range bound keeps its plus sign.
    assert_eq!(
        kinds("+5..max"),
        vec![TokenKind::Word("+5..max".into()), TokenKind::Eof]
    );
}

// =============================================================================
// Words and delimiters
// =============================================================================

#[test]
fn words_stop_at_structural_delimiters() {
    assert_eq!(
        kinds("leaf name{type string;}"),
        vec![
            TokenKind::Word("leaf".into()),
            TokenKind::Word("name".into()),
            TokenKind::LBrace,
            TokenKind::Word("type".into()),
            TokenKind::Word("string".into()),
            TokenKind::Semicolon,
            TokenKind::RBrace,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn schema_paths_lex_as_single_words() {
    assert_eq!(
        kinds("/sys:system/sys:clock"),
        vec![TokenKind::Word("/sys:system/sys:clock".into()), TokenKind::Eof]
    );
}

// =============================================================================
// Comments
// =============================================================================

#[test]
fn comments_are_produced_as_trivia() {
    let tokens = kinds("// license header\nmodule /* inline */ m");
    assert!(matches!(&tokens[0], TokenKind::Comment(c) if c.contains("license")));
    assert_eq!(tokens[1], TokenKind::Word("module".into()));
    assert!(matches!(&tokens[2], TokenKind::Comment(c) if c.contains("inline")));
    assert_eq!(tokens[3], TokenKind::Word("m".into()));
    assert!(tokens.iter().all(|t| match t {
        TokenKind::Comment(_) => TokenKind::Comment(String::new()).is_trivia(),
        _ => true,
    }));
}

#[test]
fn unterminated_block_comment_is_an_error() {
    let tokens = kinds("/* never closed");
    assert!(matches!(&tokens[0], TokenKind::Error(msg) if msg.contains("unterminated")));
}

// =============================================================================
// Spans
// =============================================================================

#[test]
fn spans_track_lines_and_columns() {
    let mut lexer = Lexer::new("module m {\n  prefix p;\n}");
    let mut found_prefix = false;
    loop {
        let token = lexer.next_token();
        if token.kind == TokenKind::Word("prefix".into()) {
            assert_eq!(token.span.line, 2);
            assert_eq!(token.span.column, 3);
            found_prefix = true;
        }
        if token.kind == TokenKind::Eof {
            break;
        }
    }
    assert!(found_prefix);
}

#[test]
fn spans_cover_the_token_text() {
    let source = "container c;";
    let tokens = Lexer::tokenize_all(source);
    assert_eq!(tokens[0].span.text(source), "container");
    assert_eq!(tokens[1].span.text(source), "c");
}
