//! YANG text lexer and raw statement stream.
//!
//! This crate provides:
//! - [`Lexer`] - Tokenization of YANG source text
//! - [`StatementParser`] - Parsing tokens into raw statement trees
//! - [`RawStatement`] - The (keyword, argument, position, substatements) tuple
//! - [`StatementSource`] / [`TextSource`] - The abstract statement producer

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod lexer;
mod source;
mod span;
mod statement;
mod token;

pub use lexer::Lexer;
pub use source::{StatementSource, TextSource};
pub use span::Span;
pub use statement::{Keyword, RawStatement, StatementParser};
pub use token::{Token, TokenKind};
