//! Defines a [`Span`] which is used to represent a region in the template
//! source.

use std::cmp::{max, min};
use std::ops::{Index, Range};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub m: usize,
    pub n: usize,
}

impl Span {
    pub fn combine(self, other: Self) -> Self {
        let m = min(self.m, other.m);
        let n = max(self.n, other.n);
        Self { m, n }
    }

    /// Returns a span of the same region shrunk to exclude surrounding
    /// whitespace in `source`.
    pub fn trim(self, source: &str) -> Self {
        let s = &source[self];
        let m = self.m + (s.len() - s.trim_start().len());
        let n = self.n - (s.len() - s.trim_end().len());
        Self { m, n: max(m, n) }
    }
}

impl Index<Span> for str {
    type Output = str;

    fn index(&self, span: Span) -> &Self::Output {
        let Span { m, n } = span;
        &self[m..n]
    }
}

impl From<Range<usize>> for Span {
    fn from(r: Range<usize>) -> Self {
        Self {
            m: r.start,
            n: r.end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_trim() {
        let source = "{{  name  }}";
        let span = Span::from(2..10).trim(source);
        assert_eq!(&source[span], "name");
    }

    #[test]
    fn span_trim_whitespace_only() {
        let source = "{{   }}";
        let span = Span::from(2..5).trim(source);
        assert_eq!(&source[span], "");
    }
}
