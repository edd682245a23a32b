use std::cmp::max;
use std::fmt;
use std::io;

use crate::types::span::Span;

/// The category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The template source is malformed, e.g. an unclosed tag, an unknown
    /// block keyword or a `for` block without a matching `endfor`.
    Syntax,
    /// Rendering failed, e.g. a variable or filter could not be found.
    Render,
    /// The render context could not be converted to a [`Value`][crate::Value].
    Serialize,
    /// Writing the rendered output failed.
    Io,
}

/// An error that can occur during template compilation or rendering.
#[derive(Clone)]
pub struct Error {
    kind: ErrorKind,
    msg: String,
    pretty: Option<(String, Span)>,
}

impl Error {
    pub(crate) fn syntax(msg: impl Into<String>, source: &str, span: impl Into<Span>) -> Self {
        Self::new(ErrorKind::Syntax, msg, source, span)
    }

    pub(crate) fn render(msg: impl Into<String>, source: &str, span: impl Into<Span>) -> Self {
        Self::new(ErrorKind::Render, msg, source, span)
    }

    /// Constructs an error from a formatter failure.
    pub(crate) fn format(err: crate::fmt::Error, source: &str, span: Span) -> Self {
        let msg = err.into_message().unwrap_or_else(|| "format error".into());
        Self::render(msg, source, span)
    }

    fn new(kind: ErrorKind, msg: impl Into<String>, source: &str, span: impl Into<Span>) -> Self {
        Self {
            kind,
            msg: msg.into(),
            pretty: Some((source.to_owned(), span.into())),
        }
    }

    /// Attaches the template source and span if the error doesn't have them
    /// already.
    pub(crate) fn enrich(mut self, source: &str, span: Span) -> Self {
        if self.pretty.is_none() {
            self.pretty = Some((source.to_owned(), span));
        }
        self
    }

    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error message without any source information.
    pub fn message(&self) -> &str {
        &self.msg
    }
}

/// Filters can return custom errors using `Err("message".into())`.
impl From<String> for Error {
    fn from(msg: String) -> Self {
        Self {
            kind: ErrorKind::Render,
            msg,
            pretty: None,
        }
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Self::from(msg.to_owned())
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self {
            kind: ErrorKind::Io,
            msg: err.to_string(),
            pretty: None,
        }
    }
}

impl From<fmt::Error> for Error {
    fn from(_: fmt::Error) -> Self {
        Self {
            kind: ErrorKind::Io,
            msg: "format error".into(),
            pretty: None,
        }
    }
}

#[cfg(feature = "serde")]
impl serde::ser::Error for Error {
    fn custom<T>(msg: T) -> Self
    where
        T: fmt::Display,
    {
        Self {
            kind: ErrorKind::Serialize,
            msg: msg.to_string(),
            pretty: None,
        }
    }
}

impl std::error::Error for Error {}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.pretty {
            Some((source, span)) => fmt_pretty(&self.msg, source, *span, f),
            None => write!(f, "{}", self.msg),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.pretty {
            Some((source, span)) => {
                if f.alternate() {
                    fmt_pretty(&self.msg, source, *span, f)
                } else {
                    write!(f, "{} between bytes {} and {}", self.msg, span.m, span.n)
                }
            }
            None => write!(f, "{}", self.msg),
        }
    }
}

fn fmt_pretty(msg: &str, source: &str, span: Span, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let lines: Vec<_> = source.split_terminator('\n').collect();
    let (line, col) = to_line_col(&lines, span.m);
    let width = max(1, width(&source[span]));
    let code = lines
        .get(line)
        .or_else(|| lines.last())
        .copied()
        .unwrap_or_default();

    let num = (line + 1).to_string();
    let pad = num.len();
    let pipe = "|";
    let underline = "^".repeat(width);

    write!(
        f,
        "\n \
        {0:pad$} {pipe}\n \
        {num:>} {pipe} {code}\n \
        {0:pad$} {pipe} {underline:>width$} {msg}\n",
        "",
        pad = pad,
        pipe = pipe,
        num = num,
        code = code,
        underline = underline,
        width = col + width,
        msg = msg
    )
}

fn to_line_col(lines: &[&str], offset: usize) -> (usize, usize) {
    let mut n = 0;
    for (i, line) in lines.iter().enumerate() {
        let len = line.len() + 1;
        if n + len > offset {
            return (i, width(&line[..offset - n]));
        }
        n += len;
    }
    (
        lines.len().saturating_sub(1),
        lines.last().map(|l| width(l)).unwrap_or(0),
    )
}

#[cfg(feature = "unicode")]
fn width(s: &str) -> usize {
    unicode_width::UnicodeWidthStr::width(s)
}

#[cfg(not(feature = "unicode"))]
fn width(s: &str) -> usize {
    s.chars().count()
}
