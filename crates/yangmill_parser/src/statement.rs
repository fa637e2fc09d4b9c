//! Raw statement trees.
//!
//! The parser converts a token stream into [`RawStatement`] trees: the
//! (keyword, argument, position, substatement nesting) tuples consumed by
//! the reactor. No semantic interpretation happens here.

use std::fmt;
use std::sync::Arc;

use yangmill_foundation::{Error, Result, StatementRef};

use crate::lexer::Lexer;
use crate::span::Span;
use crate::token::{Token, TokenKind};

/// A statement keyword: a core identifier or a `prefix:identifier`
/// extension keyword.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Keyword {
    /// Extension prefix, if present.
    pub prefix: Option<Arc<str>>,
    /// The keyword identifier.
    pub identifier: Arc<str>,
}

impl Keyword {
    /// Creates a core keyword.
    #[must_use]
    pub fn core(identifier: impl AsRef<str>) -> Self {
        Self {
            prefix: None,
            identifier: identifier.as_ref().into(),
        }
    }

    /// Parses a keyword from its token text.
    ///
    /// # Errors
    /// Returns an error if the text has more than one `:` separator or an
    /// empty prefix or identifier.
    pub fn parse(text: &str) -> Result<Self> {
        match text.split_once(':') {
            None => Ok(Self::core(text)),
            Some((prefix, identifier)) => {
                if prefix.is_empty() || identifier.is_empty() || identifier.contains(':') {
                    return Err(Error::invalid_value("statement keyword", text));
                }
                Ok(Self {
                    prefix: Some(prefix.into()),
                    identifier: identifier.into(),
                })
            }
        }
    }

    /// Returns true if this is an extension (prefixed) keyword.
    #[must_use]
    pub fn is_extension(&self) -> bool {
        self.prefix.is_some()
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.prefix {
            Some(prefix) => write!(f, "{prefix}:{}", self.identifier),
            None => f.write_str(&self.identifier),
        }
    }
}

/// One raw statement event: keyword, optional argument, source position,
/// and nested substatements.
#[derive(Clone, Debug, PartialEq)]
pub struct RawStatement {
    /// The statement keyword.
    pub keyword: Keyword,
    /// The argument text, with quoting and concatenation resolved.
    pub argument: Option<String>,
    /// Location of the keyword in the source.
    pub reference: StatementRef,
    /// Nested statements, in source order.
    pub substatements: Vec<RawStatement>,
}

/// Parser converting YANG tokens into raw statement trees.
pub struct StatementParser<'src> {
    /// The lexer providing tokens.
    lexer: Lexer<'src>,
    /// Current token (lookahead).
    current: Token,
    /// Source name used in statement references.
    source_name: Arc<str>,
}

impl<'src> StatementParser<'src> {
    /// Creates a new parser for the given source.
    #[must_use]
    pub fn new(source_name: impl AsRef<str>, source: &'src str) -> Self {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token();
        Self {
            lexer,
            current,
            source_name: source_name.as_ref().into(),
        }
    }

    /// Parses the single root statement of a module source.
    ///
    /// # Errors
    /// Returns an error if the source is empty, malformed, or has trailing
    /// content after the root statement.
    pub fn parse_root(&mut self) -> Result<RawStatement> {
        self.skip_trivia();
        if self.current.kind == TokenKind::Eof {
            return Err(self.error("expected a module or submodule statement"));
        }
        let root = self.parse_statement()?;
        self.skip_trivia();
        if self.current.kind != TokenKind::Eof {
            return Err(self.error(&format!(
                "unexpected {} after root statement",
                self.current.kind.name()
            )));
        }
        Ok(root)
    }

    /// Parses one statement: keyword, optional argument, then either `;`
    /// or a `{ ... }` block of substatements.
    fn parse_statement(&mut self) -> Result<RawStatement> {
        self.skip_trivia();

        let reference = self.reference_here();
        let keyword = match &self.current.kind {
            TokenKind::Word(text) => Keyword::parse(text).map_err(|e| e.at(reference.clone()))?,
            other => {
                return Err(self.error(&format!("expected statement keyword, found {}", other.name())));
            }
        };
        self.advance();
        self.skip_trivia();

        let argument = self.parse_argument()?;
        self.skip_trivia();

        let mut substatements = Vec::new();
        match &self.current.kind {
            TokenKind::Semicolon => {
                self.advance();
            }
            TokenKind::LBrace => {
                self.advance();
                loop {
                    self.skip_trivia();
                    match &self.current.kind {
                        TokenKind::RBrace => {
                            self.advance();
                            break;
                        }
                        TokenKind::Eof => {
                            return Err(self.error(&format!(
                                "unexpected end of input in block of \"{keyword}\""
                            )));
                        }
                        _ => substatements.push(self.parse_statement()?),
                    }
                }
            }
            other => {
                return Err(self.error(&format!(
                    "expected ';' or '{{' after \"{keyword}\", found {}",
                    other.name()
                )));
            }
        }

        Ok(RawStatement {
            keyword,
            argument,
            reference,
            substatements,
        })
    }

    /// Parses an optional argument: a word, or quoted strings joined by `+`.
    fn parse_argument(&mut self) -> Result<Option<String>> {
        match self.current.kind.clone() {
            TokenKind::Word(text) => {
                self.advance();
                Ok(Some(text))
            }
            TokenKind::Quoted(text) => {
                self.advance();
                let mut argument = text;
                loop {
                    self.skip_trivia();
                    if self.current.kind != TokenKind::Plus {
                        break;
                    }
                    self.advance();
                    self.skip_trivia();
                    match self.current.kind.clone() {
                        TokenKind::Quoted(next) => {
                            self.advance();
                            argument.push_str(&next);
                        }
                        other => {
                            return Err(self.error(&format!(
                                "expected quoted string after '+', found {}",
                                other.name()
                            )));
                        }
                    }
                }
                Ok(Some(argument))
            }
            TokenKind::Error(message) => Err(self.error(&message)),
            _ => Ok(None),
        }
    }

    /// Advances to the next token.
    fn advance(&mut self) {
        self.current = self.lexer.next_token();
    }

    /// Skips comments.
    fn skip_trivia(&mut self) {
        while self.current.kind.is_trivia() {
            self.advance();
        }
    }

    /// Builds a statement reference at the current token.
    fn reference_here(&self) -> StatementRef {
        let Span { line, column, .. } = self.current.span;
        StatementRef::new(self.source_name.as_ref(), line, column)
    }

    /// Builds a source error at the current token.
    fn error(&self, message: &str) -> Error {
        Error::source(message, self.reference_here())
    }
}
