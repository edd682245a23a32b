use crate::types::span::Span;
use crate::{Error, Result};

/// The kind of a raw segment, determined by its delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Raw template text
    Text,
    /// `{{ ... }}`
    Expr,
    /// `{# ... #}`
    Comment,
    /// `{% ... %}`
    Block,
}

/// A region of the template source produced by the lexer.
#[derive(Debug, Clone, Copy)]
pub struct Segment {
    pub kind: Kind,
    /// The entire segment including any delimiters.
    pub span: Span,
    /// The text between the delimiters, equal to `span` for raw text.
    pub body: Span,
}

/// The begin and end delimiters of each tag kind.
const TAGS: [(Kind, &str, &str); 3] = [
    (Kind::Expr, "{{", "}}"),
    (Kind::Comment, "{#", "#}"),
    (Kind::Block, "{%", "%}"),
];

/// Chunks the template source into raw text and tag segments.
///
/// Tags are matched left to right, each begin delimiter is paired with the
/// first corresponding end delimiter after it. Raw text that is empty or only
/// whitespace is dropped.
pub fn tokenize_raw(source: &str) -> Result<Vec<Segment>> {
    // The following diagram helps describe the variable naming.
    //
    // xxxxxxx{{yyyyyy}}xxxxxx
    //    ^   ^ ^     ^ ^
    //    i   j k     m n

    let mut segments = Vec::new();
    let mut i = 0;

    while let Some((kind, begin, end, j)) = find_begin_tag(source, i) {
        push_text(source, &mut segments, i, j);

        let k = j + begin.len();
        let m = match source[k..].find(end) {
            Some(d) => k + d,
            None => return Err(err_unclosed(source, kind, end, j..k)),
        };
        let n = m + end.len();

        segments.push(Segment {
            kind,
            span: Span::from(j..n),
            body: Span::from(k..m),
        });
        i = n;
    }

    push_text(source, &mut segments, i, source.len());
    Ok(segments)
}

/// Finds the earliest begin delimiter at or after `i`.
fn find_begin_tag(source: &str, i: usize) -> Option<(Kind, &'static str, &'static str, usize)> {
    source[i..].match_indices('{').find_map(|(d, _)| {
        let j = i + d;
        TAGS.iter()
            .find(|(_, begin, _)| source[j..].starts_with(begin))
            .map(|&(kind, begin, end)| (kind, begin, end, j))
    })
}

fn push_text(source: &str, segments: &mut Vec<Segment>, i: usize, j: usize) {
    if source[i..j].trim().is_empty() {
        return;
    }
    let span = Span::from(i..j);
    segments.push(Segment {
        kind: Kind::Text,
        span,
        body: span,
    });
}

fn err_unclosed(source: &str, kind: Kind, end: &str, span: impl Into<Span>) -> Error {
    Error::syntax(
        format!("unclosed {}, expected `{end}`", kind.human()),
        source,
        span,
    )
}

impl Kind {
    pub fn human(&self) -> &'static str {
        match self {
            Self::Text => "raw template",
            Self::Expr => "expression",
            Self::Comment => "comment",
            Self::Block => "block",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lex_empty() {
        let segments = lex("").unwrap();
        assert!(segments.is_empty());
    }

    #[test]
    fn lex_raw() {
        let segments = lex("lorem ipsum").unwrap();
        assert_eq!(segments, [(Kind::Text, "lorem ipsum")]);
    }

    #[test]
    fn lex_raw_multiline() {
        let source = "lorem ipsum\ndolor sit amet\n";
        let segments = lex(source).unwrap();
        assert_eq!(segments, [(Kind::Text, source)]);
    }

    #[test]
    fn lex_expr() {
        let segments = lex("Hello, {{name}}!").unwrap();
        assert_eq!(
            segments,
            [
                (Kind::Text, "Hello, "),
                (Kind::Expr, "name"),
                (Kind::Text, "!"),
            ]
        );
    }

    #[test]
    fn lex_all_kinds() {
        let segments =
            lex("{% for x in xs %}lorem {{ x | upper }}{# ipsum #} dolor{% endfor %}").unwrap();
        assert_eq!(
            segments,
            [
                (Kind::Block, " for x in xs "),
                (Kind::Text, "lorem "),
                (Kind::Expr, " x | upper "),
                (Kind::Comment, " ipsum "),
                (Kind::Text, " dolor"),
                (Kind::Block, " endfor "),
            ]
        );
    }

    #[test]
    fn lex_drops_whitespace_only_text() {
        let segments = lex("  {{ a }} \n\t {{ b }}   ").unwrap();
        assert_eq!(segments, [(Kind::Expr, " a "), (Kind::Expr, " b ")]);
    }

    #[test]
    fn lex_keeps_surrounding_whitespace_in_text() {
        let segments = lex("{{ a }} in {{ b }}").unwrap();
        assert_eq!(
            segments,
            [(Kind::Expr, " a "), (Kind::Text, " in "), (Kind::Expr, " b ")]
        );
    }

    #[test]
    fn lex_shortest_match() {
        let segments = lex("{{ a }} }} {{ b }}").unwrap();
        assert_eq!(
            segments,
            [(Kind::Expr, " a "), (Kind::Text, " }} "), (Kind::Expr, " b ")]
        );
    }

    #[test]
    fn lex_comment_contains_other_delimiters() {
        let segments = lex("lorem {# {{ ipsum }} {% dolor #} sit").unwrap();
        assert_eq!(
            segments,
            [
                (Kind::Text, "lorem "),
                (Kind::Comment, " {{ ipsum }} {% dolor "),
                (Kind::Text, " sit"),
            ]
        );
    }

    #[test]
    fn lex_empty_tags() {
        let segments = lex("{{}}{##}{%%}").unwrap();
        assert_eq!(
            segments,
            [(Kind::Expr, ""), (Kind::Comment, ""), (Kind::Block, "")]
        );
    }

    #[test]
    fn lex_lone_brace_is_text() {
        let segments = lex("fn main() { {{ body }} }").unwrap();
        assert_eq!(
            segments,
            [
                (Kind::Text, "fn main() { "),
                (Kind::Expr, " body "),
                (Kind::Text, " }"),
            ]
        );
    }

    #[test]
    fn lex_err_unclosed_expr() {
        let err = lex("lorem {{ ipsum").unwrap_err();
        assert_eq!(
            format!("{:#}", err),
            "
   |
 1 | lorem {{ ipsum
   |       ^^ unclosed expression, expected `}}`
"
        );
    }

    #[test]
    fn lex_err_unclosed_comment() {
        let err = lex("lorem {# ipsum }}").unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Syntax);
        assert_eq!(err.message(), "unclosed comment, expected `#}`");
    }

    #[track_caller]
    fn lex(source: &str) -> Result<Vec<(Kind, &str)>> {
        let segments = tokenize_raw(source)?;
        Ok(segments
            .into_iter()
            .map(|seg| (seg.kind, &source[seg.body]))
            .collect())
    }
}
