//! Compile the template into a program that can be executed by the renderer.
//!
//! This process has three stages:
//! - The lexer chunks the template source into raw segments.
//! - Each segment is classified into a token, expressions are split into
//!   their base expression and filters.
//! - The compiler consumes the tokens in order and constructs the program,
//!   checking that blocks are properly nested.

mod expr;
mod lex;
mod token;

use std::borrow::Cow;

use crate::compile::token::{Raw, Token};
use crate::types::ast;
use crate::types::program::{Instr, Template, FIXME};
use crate::types::span::Span;
use crate::{Error, Result};

/// Compile a template into a program.
pub fn template(source: Cow<'_, str>) -> Result<Template<'_>> {
    let (instrs, depth) = {
        let mut compiler = Compiler::new(&source);
        for (token, span) in token::tokenize(&source)? {
            compiler.compile_token(token, span)?;
        }
        compiler.finish()?
    };
    tracing::debug!(instrs = instrs.len(), depth, "compiled template");
    Ok(Template {
        source,
        instrs,
        depth,
    })
}

/// A compiler that constructs a program from a token stream.
struct Compiler<'a> {
    source: &'a str,
    instrs: Vec<Instr>,
    /// The currently open blocks, innermost last.
    blocks: Vec<Block>,
    /// The deepest nesting seen so far.
    depth: usize,
}

/// An open block waiting for its end tag.
struct Block {
    kind: BlockKind,
    /// The span of the block's begin tag.
    span: Span,
    /// The index of the instruction to patch when the block is closed.
    jump: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    Loop,
}

impl<'a> Compiler<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            instrs: Vec::new(),
            blocks: Vec::new(),
            depth: 0,
        }
    }

    fn compile_token(&mut self, token: Token<'a>, span: Span) -> Result<()> {
        match token {
            Token::Text(raw) => {
                self.push(Instr::EmitRaw(raw.span));
            }

            Token::Comment(_) => {}

            Token::Expr { var, filters } => {
                let expr = self.compile_expr(var, filters)?;
                self.push(Instr::Emit(expr));
            }

            Token::LoopBegin { var, iterable } => {
                let iterable = ast::Expr::Base(ast::BaseExpr::Var(ast::Var {
                    name: ast::Ident {
                        span: iterable.span,
                    },
                    rest: Vec::new(),
                }));
                self.push(Instr::LoopStart(ast::Ident { span: var.span }, iterable));
                let jump = self.push(Instr::LoopNext(FIXME));
                self.open_block(BlockKind::Loop, span, jump);
            }

            Token::LoopEnd => {
                let block = self.close_block(BlockKind::Loop, span)?;
                self.push(Instr::LoopEnd(block.jump));
                self.update_jump(block.jump);
            }
        }
        Ok(())
    }

    /// Parses the base expression and folds the filters onto it, so that the
    /// first filter is applied first.
    fn compile_expr(&self, var: Raw<'a>, filters: Vec<Raw<'a>>) -> Result<ast::Expr> {
        let base = expr::parse_base(self.source, var.span)?;
        let expr = filters
            .into_iter()
            .fold(ast::Expr::Base(base), |receiver, name| {
                let span = receiver.span().combine(name.span);
                ast::Expr::Call(ast::Call {
                    name: ast::Ident { span: name.span },
                    receiver: Box::new(receiver),
                    span,
                })
            });
        Ok(expr)
    }

    fn open_block(&mut self, kind: BlockKind, span: Span, jump: usize) {
        self.blocks.push(Block { kind, span, jump });
        self.depth = self.depth.max(self.blocks.len());
    }

    fn close_block(&mut self, kind: BlockKind, span: Span) -> Result<Block> {
        match self.blocks.pop() {
            Some(block) if block.kind == kind => Ok(block),
            Some(block) => Err(Error::syntax(
                format!(
                    "unexpected `{}` block, expected `{}`",
                    kind.end_keyword(),
                    block.kind.end_keyword()
                ),
                self.source,
                span,
            )),
            None => Err(Error::syntax(
                format!(
                    "unexpected `{}` block, no matching `{}`",
                    kind.end_keyword(),
                    kind.begin_keyword()
                ),
                self.source,
                span,
            )),
        }
    }

    fn finish(self) -> Result<(Vec<Instr>, usize)> {
        if let Some(block) = self.blocks.last() {
            return Err(Error::syntax(
                format!(
                    "unclosed `{}` block, expected `{}`",
                    block.kind.begin_keyword(),
                    block.kind.end_keyword()
                ),
                self.source,
                block.span,
            ));
        }
        Ok((self.instrs, self.depth))
    }

    fn update_jump(&mut self, i: usize) {
        let n = self.instrs.len();
        let j = match &mut self.instrs[i] {
            Instr::LoopNext(j) => j,
            _ => panic!("not a jump instr"),
        };
        *j = n;
    }

    fn push(&mut self, instr: Instr) -> usize {
        let i = self.instrs.len();
        self.instrs.push(instr);
        i
    }
}

impl BlockKind {
    fn begin_keyword(self) -> &'static str {
        match self {
            Self::Loop => "for",
        }
    }

    fn end_keyword(self) -> &'static str {
        match self {
            Self::Loop => "endfor",
        }
    }
}
