//! Lexer for YANG source text.
//!
//! The lexer converts module text into a stream of tokens following the
//! RFC 7950 lexical rules: unquoted strings, single-quoted strings
//! (verbatim), double-quoted strings (with escape processing), `+`
//! concatenation, statement delimiters, and both comment forms.

use crate::span::Span;
use crate::token::{Token, TokenKind};

/// Lexer for YANG source text.
pub struct Lexer<'src> {
    /// Source text being tokenized.
    source: &'src str,
    /// Remaining source text.
    rest: &'src str,
    /// Current byte offset in source.
    position: usize,
    /// Current line number (1-based).
    line: u32,
    /// Current column number (1-based).
    column: u32,
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer for the given source.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            rest: source,
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Returns the next token from the source.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let start = self.position;
        let start_line = self.line;
        let start_column = self.column;

        let Some(c) = self.peek_char() else {
            return Token::new(
                TokenKind::Eof,
                Span::new(start, start, start_line, start_column),
            );
        };

        let kind = match c {
            '{' => {
                self.advance();
                TokenKind::LBrace
            }
            '}' => {
                self.advance();
                TokenKind::RBrace
            }
            ';' => {
                self.advance();
                TokenKind::Semicolon
            }
            '+' if self.rest.len() == 1
                || self.peek_char_n(1).is_some_and(|c| c.is_whitespace() || c == '"' || c == '\'') =>
            {
                self.advance();
                TokenKind::Plus
            }
            '"' => self.scan_double_quoted(),
            '\'' => self.scan_single_quoted(),
            '/' if self.peek_char_n(1) == Some('/') => self.scan_line_comment(),
            '/' if self.peek_char_n(1) == Some('*') => self.scan_block_comment(),
            _ => self.scan_word(),
        };

        Token::new(
            kind,
            Span::new(start, self.position, start_line, start_column),
        )
    }

    /// Tokenizes all source and returns a vector of tokens.
    ///
    /// Comments are included in the output.
    #[must_use]
    pub fn tokenize_all(source: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }

    /// Peeks at the next character without consuming it.
    fn peek_char(&self) -> Option<char> {
        self.rest.chars().next()
    }

    /// Peeks at the character `n` positions ahead.
    fn peek_char_n(&self, n: usize) -> Option<char> {
        self.rest.chars().nth(n)
    }

    /// Advances past the next character.
    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            let len = c.len_utf8();
            self.rest = &self.rest[len..];
            self.position += len;
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek_char() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Scans a `//` comment to end of line.
    fn scan_line_comment(&mut self) -> TokenKind {
        self.advance();
        self.advance();
        let start = self.position;
        while let Some(c) = self.peek_char() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
        TokenKind::Comment(self.source[start..self.position].to_string())
    }

    /// Scans a `/* */` comment.
    fn scan_block_comment(&mut self) -> TokenKind {
        self.advance();
        self.advance();
        let start = self.position;
        loop {
            match self.peek_char() {
                Some('*') if self.peek_char_n(1) == Some('/') => {
                    let text = self.source[start..self.position].to_string();
                    self.advance();
                    self.advance();
                    return TokenKind::Comment(text);
                }
                Some(_) => self.advance(),
                None => return TokenKind::Error("unterminated block comment".into()),
            }
        }
    }

    /// Scans a double-quoted string, processing escape sequences.
    fn scan_double_quoted(&mut self) -> TokenKind {
        self.advance(); // consume opening '"'
        let mut text = String::new();
        loop {
            match self.peek_char() {
                Some('"') => {
                    self.advance();
                    return TokenKind::Quoted(text);
                }
                Some('\\') => {
                    self.advance();
                    match self.peek_char() {
                        Some('n') => {
                            self.advance();
                            text.push('\n');
                        }
                        Some('t') => {
                            self.advance();
                            text.push('\t');
                        }
                        Some('"') => {
                            self.advance();
                            text.push('"');
                        }
                        Some('\\') => {
                            self.advance();
                            text.push('\\');
                        }
                        Some(c) => {
                            return TokenKind::Error(format!("invalid escape sequence: \\{c}"));
                        }
                        None => {
                            return TokenKind::Error(
                                "unexpected end of input in string escape".into(),
                            );
                        }
                    }
                }
                Some(c) => {
                    self.advance();
                    text.push(c);
                }
                None => return TokenKind::Error("unterminated string literal".into()),
            }
        }
    }

    /// Scans a single-quoted string; contents are taken verbatim.
    fn scan_single_quoted(&mut self) -> TokenKind {
        self.advance(); // consume opening '\''
        let start = self.position;
        loop {
            match self.peek_char() {
                Some('\'') => {
                    let text = self.source[start..self.position].to_string();
                    self.advance();
                    return TokenKind::Quoted(text);
                }
                Some(_) => self.advance(),
                None => return TokenKind::Error("unterminated string literal".into()),
            }
        }
    }

    /// Scans an unquoted string (keyword or bare argument).
    ///
    /// Terminated by whitespace, a statement delimiter, a quote, or the
    /// start of a comment.
    fn scan_word(&mut self) -> TokenKind {
        let start = self.position;
        while let Some(c) = self.peek_char() {
            if c.is_whitespace() || matches!(c, ';' | '{' | '}' | '"' | '\'') {
                break;
            }
            if c == '/' && matches!(self.peek_char_n(1), Some('/' | '*')) {
                break;
            }
            self.advance();
        }
        if self.position == start {
            self.advance();
            return TokenKind::Error(format!(
                "unexpected character: {}",
                &self.source[start..self.position]
            ));
        }
        TokenKind::Word(self.source[start..self.position].to_string())
    }
}
