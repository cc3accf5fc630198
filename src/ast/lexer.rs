use crate::ast::OperatorTable;
use crate::error::{Error, Result};
use log::trace;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenKind {
    /// Literal value, parsed while lexing.
    Number(f64),
    Identifier,
    Operator,
    LParen,
    RParen,
    Comma,
    End,
}

/// One lexical unit. `position` is a byte offset into the source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub position: usize,
}

impl Token<'_> {
    /// Human-readable form used in diagnostics.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::End => "end of input".to_string(),
            _ => format!("'{}'", self.text),
        }
    }
}

pub(crate) fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

pub(crate) fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

pub(crate) fn is_symbol_char(c: char) -> bool {
    !c.is_alphanumeric() && !c.is_whitespace() && !matches!(c, '(' | ')' | ',' | '_')
}

/// Lazy tokenizer over an expression. Operator runs are split using the
/// longest operator text registered in `operators`.
#[derive(Clone)]
pub struct Lexer<'a> {
    source: &'a str,
    operators: &'a OperatorTable,
    offset: usize,
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, operators: &'a OperatorTable) -> Self {
        Self {
            source,
            operators,
            offset: 0,
            finished: false,
        }
    }

    /// Rewinds to the start of the source.
    pub fn restart(&mut self) {
        self.offset = 0;
        self.finished = false;
    }

    /// Scans the next token. Once the input is exhausted every call
    /// returns an `End` token.
    pub fn next_token(&mut self) -> Result<Token<'a>> {
        let rest = &self.source[self.offset..];
        let trimmed = rest.trim_start();
        self.offset += rest.len() - trimmed.len();
        let start = self.offset;

        let mut chars = trimmed.chars();
        let Some(c) = chars.next() else {
            self.finished = true;
            return Ok(Token {
                kind: TokenKind::End,
                text: "",
                position: start,
            });
        };

        let token = match c {
            '(' => self.single(TokenKind::LParen, start),
            ')' => self.single(TokenKind::RParen, start),
            ',' => self.single(TokenKind::Comma, start),
            c if c.is_ascii_digit() => self.lex_number(start)?,
            '.' if chars.next().is_some_and(|next| next.is_ascii_digit()) => {
                self.lex_number(start)?
            }
            c if is_ident_start(c) => self.lex_word(start),
            c if is_symbol_char(c) => self.lex_symbol(start)?,
            c => {
                return Err(Error::UnknownToken {
                    text: c.to_string(),
                    position: start,
                })
            }
        };

        trace!("token: {:?}", token);
        Ok(token)
    }

    fn single(&mut self, kind: TokenKind, start: usize) -> Token<'a> {
        self.offset = start + 1;
        Token {
            kind,
            text: &self.source[start..start + 1],
            position: start,
        }
    }

    fn lex_number(&mut self, start: usize) -> Result<Token<'a>> {
        let bytes = self.source.as_bytes();
        let digits_from = |mut end: usize| {
            while end < bytes.len() && bytes[end].is_ascii_digit() {
                end += 1;
            }
            end
        };

        let mut end = digits_from(start);
        if end < bytes.len() && bytes[end] == b'.' {
            end = digits_from(end + 1);
        }

        // An exponent only counts when digits follow it.
        if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
            let mut exponent = end + 1;
            if exponent < bytes.len() && matches!(bytes[exponent], b'+' | b'-') {
                exponent += 1;
            }
            let exponent_end = digits_from(exponent);
            if exponent_end > exponent {
                end = exponent_end;
            }
        }

        let text = &self.source[start..end];
        let value = text.parse::<f64>().map_err(|_| Error::UnknownToken {
            text: text.to_string(),
            position: start,
        })?;

        self.offset = end;
        Ok(Token {
            kind: TokenKind::Number(value),
            text,
            position: start,
        })
    }

    fn lex_word(&mut self, start: usize) -> Token<'a> {
        let end = self.scan_while(start, is_ident_continue);
        let text = &self.source[start..end];
        self.offset = end;

        let kind = if self.operators.is_word(text) {
            TokenKind::Operator
        } else {
            TokenKind::Identifier
        };
        Token {
            kind,
            text,
            position: start,
        }
    }

    fn lex_symbol(&mut self, start: usize) -> Result<Token<'a>> {
        let end = self.scan_while(start, is_symbol_char);
        let run = &self.source[start..end];

        let text = self
            .operators
            .longest_symbol(run)
            .ok_or_else(|| Error::UnknownToken {
                text: run.to_string(),
                position: start,
            })?;

        self.offset = start + text.len();
        Ok(Token {
            kind: TokenKind::Operator,
            text,
            position: start,
        })
    }

    fn scan_while(&self, start: usize, accept: fn(char) -> bool) -> usize {
        self.source[start..]
            .char_indices()
            .find(|&(_, c)| !accept(c))
            .map_or(self.source.len(), |(index, _)| start + index)
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token<'a>>;

    /// Yields tokens up to and including `End`, or up to the first error.
    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        if token.is_err() {
            self.finished = true;
        }
        Some(token)
    }
}
