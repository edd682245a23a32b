//! Defines a compiled [`Template`] which is a sequence of [`Instr`] that can be
//! executed by the renderer.

use std::borrow::Cow;

use crate::types::ast;
use crate::types::span::Span;

/// Placeholder jump target, patched once the end of the block is known.
pub const FIXME: usize = !0;

#[derive(Debug)]
pub struct Template<'source> {
    pub source: Cow<'source, str>,
    pub instrs: Vec<Instr>,
    /// The deepest block nesting in the template.
    pub depth: usize,
}

#[derive(Debug)]
pub enum Instr {
    /// Emit raw template
    EmitRaw(Span),

    /// Evaluate the expression and emit it using the default formatter
    Emit(ast::Expr),

    /// Evaluate the iterable and start a loop binding the variable, opens a
    /// block
    LoopStart(ast::Ident, ast::Expr),

    /// Advance the current loop or, if it is exhausted, end it and jump to
    /// the instruction after the block
    LoopNext(usize),

    /// Jump back to the `LoopNext` of the current loop, closes a block
    LoopEnd(usize),
}
