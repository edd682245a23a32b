//! Converts raw segments into tokens.
//!
//! Text and comments pass through unchanged, expressions are split into the
//! base expression and its filters, and blocks are dispatched on their
//! keyword.

use std::fmt;

use crate::compile::expr::{self, is_ident, is_ident_start};
use crate::compile::lex::{self, Kind, Segment};
use crate::types::span::Span;
use crate::{Error, Result};

/// A classified piece of the template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// Raw template text to emit verbatim.
    Text(Raw<'a>),

    /// `{{ var | filter | ... }}`
    Expr { var: Raw<'a>, filters: Vec<Raw<'a>> },

    /// `{# ... #}` with surrounding whitespace trimmed, discarded by the
    /// compiler.
    Comment(Raw<'a>),

    /// `{% for var in iterable %}`
    LoopBegin { var: Raw<'a>, iterable: Raw<'a> },

    /// `{% endfor %}`
    LoopEnd,
}

/// A slice of the template source along with its location.
///
/// Two slices are equal if their text is equal, regardless of where in the
/// source they are.
#[derive(Clone, Copy)]
pub struct Raw<'a> {
    pub raw: &'a str,
    pub span: Span,
}

/// Lexes and classifies the entire template source.
pub fn tokenize(source: &str) -> Result<Vec<(Token<'_>, Span)>> {
    lex::tokenize_raw(source)?
        .iter()
        .map(|seg| parse_token(source, seg))
        .collect()
}

/// Classifies a single raw segment.
pub fn parse_token<'a>(source: &'a str, seg: &Segment) -> Result<(Token<'a>, Span)> {
    let token = match seg.kind {
        Kind::Text => Token::Text(Raw::new(source, seg.body)),
        Kind::Comment => Token::Comment(Raw::new(source, seg.body.trim(source))),
        Kind::Expr => {
            let (var, filters) = expr::parse_expression(source, seg.body);
            Token::Expr { var, filters }
        }
        Kind::Block => parse_block(source, seg)?,
    };
    Ok((token, seg.span))
}

fn parse_block<'a>(source: &'a str, seg: &Segment) -> Result<Token<'a>> {
    let body = seg.body.trim(source);
    let words = words(source, body);

    let keyword = match words.first() {
        Some(word) if word.raw.starts_with(is_ident_start) => word,
        Some(word) => {
            return Err(Error::syntax(
                format!("expected keyword, found `{}`", word.raw),
                source,
                word.span,
            ));
        }
        None => return Err(Error::syntax("expected keyword", source, seg.span)),
    };

    match keyword.raw {
        "for" => match words.as_slice() {
            [_, var, in_, iterable] if in_.raw == "in" => {
                for ident in [var, iterable] {
                    if !is_identifier(ident.raw) {
                        return Err(Error::syntax(
                            format!("expected identifier, found `{}`", ident.raw),
                            source,
                            ident.span,
                        ));
                    }
                }
                if var.raw == "loop" {
                    return Err(Error::syntax(
                        "`loop` is reserved for loop state and cannot be used as a loop variable",
                        source,
                        var.span,
                    ));
                }
                Ok(Token::LoopBegin {
                    var: *var,
                    iterable: *iterable,
                })
            }
            _ => Err(Error::syntax(
                format!(
                    "expected `for <var> in <iterable>`, found `{}`",
                    &source[body]
                ),
                source,
                body,
            )),
        },
        "endfor" => match words.as_slice() {
            [_] => Ok(Token::LoopEnd),
            [_, extra, ..] => Err(Error::syntax(
                format!("unexpected `{}` after `endfor`", extra.raw),
                source,
                Span::from(extra.span.m..body.n),
            )),
            [] => Ok(Token::LoopEnd),
        },
        _ => Err(Error::syntax(
            format!("unknown block `{}`", &source[body]),
            source,
            body,
        )),
    }
}

/// Splits a region of the source into whitespace separated words.
fn words(source: &str, body: Span) -> Vec<Raw<'_>> {
    let mut words = Vec::new();
    let mut start = None;
    for (d, c) in source[body].char_indices() {
        let i = body.m + d;
        match (c.is_whitespace(), start) {
            (false, None) => start = Some(i),
            (true, Some(m)) => {
                words.push(Raw::new(source, m..i));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(m) = start {
        words.push(Raw::new(source, m..body.n));
    }
    words
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if is_ident_start(c)) && chars.all(is_ident)
}

impl<'a> Raw<'a> {
    pub fn new(source: &'a str, span: impl Into<Span>) -> Self {
        let span = span.into();
        Self {
            raw: &source[span],
            span,
        }
    }
}

impl PartialEq for Raw<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for Raw<'_> {}

impl fmt::Debug for Raw<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.raw, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_text() {
        let tokens = tokens("Hello, World!").unwrap();
        assert_eq!(tokens, [Token::Text(raw("Hello, World!"))]);
    }

    #[test]
    fn tokenize_expr() {
        let tokens = tokens("Hello, {{ name }}!").unwrap();
        assert_eq!(
            tokens,
            [
                Token::Text(raw("Hello, ")),
                Token::Expr {
                    var: raw("name"),
                    filters: vec![]
                },
                Token::Text(raw("!")),
            ]
        );
    }

    #[test]
    fn tokenize_expr_filters() {
        let tokens = tokens("{{ name | upper | strip }}").unwrap();
        assert_eq!(
            tokens,
            [Token::Expr {
                var: raw("name"),
                filters: vec![raw("upper"), raw("strip")]
            }]
        );
    }

    #[test]
    fn tokenize_comment() {
        let tokens = tokens("a {# note #} b").unwrap();
        assert_eq!(
            tokens,
            [
                Token::Text(raw("a ")),
                Token::Comment(raw("note")),
                Token::Text(raw(" b")),
            ]
        );
    }

    #[test]
    fn tokenize_loop() {
        let tokens = tokens("{% for name in names %}{{ name }}{%endfor%}").unwrap();
        assert_eq!(
            tokens,
            [
                Token::LoopBegin {
                    var: raw("name"),
                    iterable: raw("names")
                },
                Token::Expr {
                    var: raw("name"),
                    filters: vec![]
                },
                Token::LoopEnd,
            ]
        );
    }

    #[test]
    fn tokenize_loop_extra_whitespace() {
        let tokens = tokens("{%   for  x\n in\txs   %}{% endfor   %}").unwrap();
        assert_eq!(
            tokens,
            [
                Token::LoopBegin {
                    var: raw("x"),
                    iterable: raw("xs")
                },
                Token::LoopEnd,
            ]
        );
    }

    #[test]
    fn tokenize_spans() {
        let source = "ab{{ x }}cd";
        let spans: Vec<_> = tokenize(source)
            .unwrap()
            .into_iter()
            .map(|(_, span)| &source[span])
            .collect();
        assert_eq!(spans, ["ab", "{{ x }}", "cd"]);
    }

    #[test]
    fn tokenize_err_unknown_keyword() {
        let err = tokens("{% if user %}").unwrap_err();
        assert_eq!(err.message(), "unknown block `if user`");
    }

    #[test]
    fn tokenize_err_not_a_keyword() {
        let err = tokens("{% 123 %}").unwrap_err();
        assert_eq!(err.message(), "expected keyword, found `123`");
    }

    #[test]
    fn tokenize_err_empty_block() {
        let err = tokens("{%  %}").unwrap_err();
        assert_eq!(err.message(), "expected keyword");
    }

    #[test]
    fn tokenize_err_bad_for_header() {
        for source in [
            "{% for x %}",
            "{% for x of xs %}",
            "{% for x in xs ys %}",
            "{% for %}",
        ] {
            let err = tokens(source).unwrap_err();
            assert!(
                err.message().starts_with("expected `for <var> in <iterable>`"),
                "{source}: {err}"
            );
        }
    }

    #[test]
    fn tokenize_err_for_non_identifier() {
        let err = tokens("{% for x in user.names %}").unwrap_err();
        assert_eq!(err.message(), "expected identifier, found `user.names`");
    }

    #[test]
    fn tokenize_err_loop_variable_reserved() {
        let err = tokens("{% for loop in xs %}").unwrap_err();
        assert_eq!(
            format!("{:#}", err),
            "
   |
 1 | {% for loop in xs %}
   |        ^^^^ `loop` is reserved for loop state and cannot be used as a loop variable
"
        );
    }

    #[test]
    fn tokenize_err_endfor_with_content() {
        let err = tokens("{% endfor x %}").unwrap_err();
        assert_eq!(err.message(), "unexpected `x` after `endfor`");
    }

    fn tokens(source: &str) -> Result<Vec<Token<'_>>> {
        Ok(tokenize(source)?.into_iter().map(|(t, _)| t).collect())
    }

    fn raw(s: &str) -> Raw<'_> {
        Raw {
            raw: s,
            span: Span::from(0..s.len()),
        }
    }
}
