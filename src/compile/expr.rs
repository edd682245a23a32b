//! Parses the body of an expression tag.
//!
//! This happens in two steps. [`parse_expression`] peels off the trailing
//! `| filter` suffixes and [`parse_base`] parses what remains using a small,
//! closed grammar: variable paths, string and number literals, `true`,
//! `false` and `none`.

use crate::compile::token::Raw;
use crate::types::ast;
use crate::types::span::Span;
use crate::{Error, Result, Value};

/// Splits an expression body into the base expression and the filter names.
///
/// Filters are stripped from the end one at a time, so a `|` inside a string
/// literal at the start of the expression is left alone. The returned filters
/// are in the order they are written.
pub fn parse_expression(source: &str, body: Span) -> (Raw<'_>, Vec<Raw<'_>>) {
    let mut filters = Vec::new();
    let mut end = body.n;

    loop {
        let s = source[body.m..end].trim_end();
        let name_end = body.m + s.len();
        let name_start = body.m + s.trim_end_matches(is_ident).len();
        if name_start == name_end {
            break;
        }
        let before = source[body.m..name_start].trim_end();
        if !before.ends_with('|') {
            break;
        }
        filters.insert(0, Raw::new(source, name_start..name_end));
        end = body.m + before.len() - 1;
    }

    let base = Span::from(body.m..end).trim(source);
    (Raw::new(source, base), filters)
}

/// Parses a base expression, i.e. a variable path or a literal.
pub fn parse_base(source: &str, span: Span) -> Result<ast::BaseExpr> {
    let mut parser = Parser {
        source,
        cursor: span.m,
        end: span.n,
    };
    let base = parser.parse_base()?;
    match parser.peek() {
        None => Ok(base),
        Some((i, c)) => Err(parser.err_unexpected_character(i, c)),
    }
}

/// A parser over a region of the template source.
struct Parser<'a> {
    source: &'a str,
    cursor: usize,
    end: usize,
}

impl Parser<'_> {
    fn parse_base(&mut self) -> Result<ast::BaseExpr> {
        let (i, c) = match self.peek() {
            Some(next) => next,
            None => {
                let span = Span::from(self.cursor..self.end);
                return Err(Error::syntax("expected expression", self.source, span));
            }
        };

        let literal = |value, span| ast::BaseExpr::Literal(ast::Literal { value, span });

        match c {
            '"' | '\'' => {
                let s = self.parse_string()?;
                Ok(literal(Value::String(s.value), s.span))
            }
            '+' | '-' => self.parse_number(),
            c if c.is_ascii_digit() => self.parse_number(),
            c if is_ident_start(c) => {
                let ident = self.parse_ident();
                match &self.source[ident.span] {
                    "true" => Ok(literal(Value::Bool(true), ident.span)),
                    "false" => Ok(literal(Value::Bool(false), ident.span)),
                    "none" => Ok(literal(Value::None, ident.span)),
                    _ => {
                        let rest = self.parse_path()?;
                        Ok(ast::BaseExpr::Var(ast::Var { name: ident, rest }))
                    }
                }
            }
            c => Err(self.err_unexpected_character(i, c)),
        }
    }

    /// Parses the member accesses following a variable name.
    fn parse_path(&mut self) -> Result<Vec<ast::Key>> {
        let mut path = Vec::new();
        while let Some((i, c)) = self.peek() {
            match c {
                '.' => {
                    self.bump(c);
                    match self.peek() {
                        Some((_, c)) if c.is_ascii_digit() => {
                            path.push(ast::Key::List(self.parse_index()?));
                        }
                        Some((_, c)) if is_ident_start(c) => {
                            path.push(ast::Key::Map(self.parse_ident()));
                        }
                        Some((j, c)) => return Err(self.err_unexpected_character(j, c)),
                        None => return Err(self.err_eof("expected identifier or index")),
                    }
                }
                '[' => {
                    self.bump(c);
                    self.skip_whitespace();
                    let key = match self.peek() {
                        Some((_, '"' | '\'')) => ast::Key::Str(self.parse_string()?),
                        Some((_, c)) if c.is_ascii_digit() => ast::Key::List(self.parse_index()?),
                        Some((j, c)) => return Err(self.err_unexpected_character(j, c)),
                        None => return Err(self.err_eof("expected string or index")),
                    };
                    self.skip_whitespace();
                    match self.peek() {
                        Some((_, ']')) => self.bump(']'),
                        Some((j, c)) => return Err(self.err_unexpected_character(j, c)),
                        None => return Err(self.err_eof("expected `]`")),
                    }
                    path.push(key);
                }
                c => return Err(self.err_unexpected_character(i, c)),
            }
        }
        Ok(path)
    }

    fn parse_ident(&mut self) -> ast::Ident {
        let i = self.cursor;
        let j = self.eat_while(is_ident);
        ast::Ident {
            span: Span::from(i..j),
        }
    }

    fn parse_index(&mut self) -> Result<ast::Index> {
        let i = self.cursor;
        let j = self.eat_while(|c| c.is_ascii_digit());
        let span = Span::from(i..j);
        match self.source[span].parse() {
            Ok(value) => Ok(ast::Index { value, span }),
            Err(_) => Err(Error::syntax("invalid index", self.source, span)),
        }
    }

    fn parse_number(&mut self) -> Result<ast::BaseExpr> {
        let i = self.cursor;
        if let Some((_, c @ ('+' | '-'))) = self.peek() {
            self.bump(c);
        }
        let j = self.eat_while(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.'));
        let span = Span::from(i..j);
        let raw = self.source[span].replace('_', "");

        let digits = raw.strip_prefix(['+', '-']).unwrap_or(raw.as_str());
        let value = if let Ok(int) = raw.parse::<i64>() {
            Value::Integer(int)
        } else if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::syntax("integer out of range", self.source, span));
        } else if let Ok(float) = raw.parse::<f64>() {
            Value::Float(float)
        } else {
            return Err(Error::syntax("invalid number", self.source, span));
        };
        Ok(ast::BaseExpr::Literal(ast::Literal { value, span }))
    }

    fn parse_string(&mut self) -> Result<ast::Str> {
        let i = self.cursor;
        let quote = match self.peek() {
            Some((_, q)) => q,
            None => return Err(self.err_eof("expected string")),
        };
        self.bump(quote);

        let mut value = String::new();
        loop {
            match self.peek() {
                None => {
                    let span = Span::from(i..self.end);
                    return Err(Error::syntax("undelimited string", self.source, span));
                }
                Some((_, c)) if c == quote => {
                    self.bump(c);
                    break;
                }
                Some((j, '\\')) => {
                    self.bump('\\');
                    let c = match self.peek() {
                        Some((_, c)) => c,
                        None => continue,
                    };
                    self.bump(c);
                    let escaped = match c {
                        'n' => '\n',
                        'r' => '\r',
                        't' => '\t',
                        '\\' | '"' | '\'' => c,
                        _ => {
                            let span = Span::from(j..self.cursor);
                            return Err(Error::syntax("unknown escape character", self.source, span));
                        }
                    };
                    value.push(escaped);
                }
                Some((_, c)) => {
                    self.bump(c);
                    value.push(c);
                }
            }
        }

        Ok(ast::Str {
            value,
            span: Span::from(i..self.cursor),
        })
    }

    fn skip_whitespace(&mut self) {
        self.eat_while(char::is_whitespace);
    }

    /// Advances the cursor while the predicate holds, returning the new
    /// cursor.
    fn eat_while<P>(&mut self, pred: P) -> usize
    where
        P: Fn(char) -> bool,
    {
        while let Some((_, c)) = self.peek() {
            if !pred(c) {
                break;
            }
            self.bump(c);
        }
        self.cursor
    }

    fn peek(&self) -> Option<(usize, char)> {
        self.source[self.cursor..self.end]
            .chars()
            .next()
            .map(|c| (self.cursor, c))
    }

    fn bump(&mut self, c: char) {
        self.cursor += c.len_utf8();
    }

    fn err_unexpected_character(&self, i: usize, c: char) -> Error {
        Error::syntax(
            "unexpected character",
            self.source,
            i..(i + c.len_utf8()),
        )
    }

    fn err_eof(&self, msg: &str) -> Error {
        let span = Span::from(self.end..self.end);
        Error::syntax(format!("{msg}, found end of expression"), self.source, span)
    }
}

#[cfg(feature = "unicode")]
pub(crate) fn is_ident_start(c: char) -> bool {
    c == '_' || unicode_ident::is_xid_start(c)
}

#[cfg(feature = "unicode")]
pub(crate) fn is_ident(c: char) -> bool {
    unicode_ident::is_xid_continue(c)
}

#[cfg(not(feature = "unicode"))]
pub(crate) fn is_ident_start(c: char) -> bool {
    matches!(c, 'A'..='Z' | 'a'..='z' | '_')
}

#[cfg(not(feature = "unicode"))]
pub(crate) fn is_ident(c: char) -> bool {
    matches!(c, '0'..='9' | 'A'..='Z' | 'a'..='z' | '_')
}
