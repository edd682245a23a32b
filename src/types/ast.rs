//! The closed expression grammar used inside `{{ ... }}` tags and as the
//! iterable of a `{% for %}` block.
//!
//! Identifiers reference the template source by span. Filters are folded
//! onto their receiver, so `x | a | b` is `Call(b, Call(a, x))`.

use crate::types::span::Span;
use crate::Value;

#[derive(Debug, Clone)]
pub enum Expr {
    Base(BaseExpr),
    Call(Call),
}

/// A filter applied to the result of another expression.
#[derive(Debug, Clone)]
pub struct Call {
    pub name: Ident,
    pub receiver: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum BaseExpr {
    Var(Var),
    Literal(Literal),
}

/// A variable path, e.g. `user.names[0]`.
#[derive(Debug, Clone)]
pub struct Var {
    pub name: Ident,
    /// Member accesses following the name.
    pub rest: Vec<Key>,
}

#[derive(Debug, Clone)]
pub enum Key {
    /// `.0` or `[0]`
    List(Index),
    /// `.name`
    Map(Ident),
    /// `["name"]` or `['name']`
    Str(Str),
}

#[derive(Debug, Clone, Copy)]
pub struct Index {
    pub value: usize,
    pub span: Span,
}

#[derive(Debug, Clone, Copy)]
pub struct Ident {
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct Str {
    pub value: String,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct Literal {
    pub value: Value,
    pub span: Span,
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Self::Base(base) => base.span(),
            Self::Call(call) => call.span,
        }
    }
}

impl BaseExpr {
    pub fn span(&self) -> Span {
        match self {
            Self::Var(var) => var.span(),
            Self::Literal(lit) => lit.span,
        }
    }
}

impl Var {
    pub fn span(&self) -> Span {
        match self.rest.last() {
            Some(last) => self.name.span.combine(last.span()),
            None => self.name.span,
        }
    }
}

impl Key {
    pub fn span(&self) -> Span {
        match self {
            Self::List(index) => index.span,
            Self::Map(ident) => ident.span,
            Self::Str(s) => s.span,
        }
    }
}
