use std::fmt::Write;

use crate::fmt::Formatter;
use crate::render::iter::LoopState;
use crate::render::stack::{Stack, State};
use crate::types::ast;
use crate::types::program::{Instr, Template};
use crate::value::ValueCow;
use crate::{Engine, Error, Result};

pub struct RendererImpl<'render> {
    pub(crate) engine: &'render Engine<'render>,
    pub(crate) template: &'render Template<'render>,
    pub(crate) stack: Stack<'render>,
}

impl<'render> RendererImpl<'render> {
    pub(crate) fn render(mut self, f: &mut Formatter<'_>) -> Result<()> {
        let t = self.template;
        let mut pc = 0;

        while let Some(instr) = t.instrs.get(pc) {
            match instr {
                Instr::EmitRaw(span) => {
                    let raw = &t.source[*span];
                    // We don't need to enrich this error because it can only
                    // fail because of an IO error.
                    f.write_str(raw)?;
                }

                Instr::Emit(expr) => {
                    let value = self.eval_expr(expr)?;
                    (self.engine.default_formatter)(f, &value)
                        .map_err(|err| Error::format(err, &t.source, expr.span()))?;
                }

                Instr::LoopStart(var, iterable) => {
                    let value = self.eval_expr(iterable)?;
                    let loop_state = LoopState::new(&t.source, var, value, iterable.span())?;
                    tracing::trace!(var = &t.source[var.span], "starting loop");
                    self.stack.push(State::Loop(loop_state));
                }

                Instr::LoopNext(j) => {
                    if self.stack.last_loop_state_mut().iterate().is_none() {
                        self.stack.pop_loop_state();
                        pc = *j;
                        continue;
                    }
                }

                Instr::LoopEnd(j) => {
                    pc = *j;
                    continue;
                }
            }
            pc += 1;
        }

        assert!(pc == t.instrs.len());
        Ok(())
    }

    /// Evaluates an expression, applying filters innermost first.
    fn eval_expr(&self, expr: &'render ast::Expr) -> Result<ValueCow<'render>> {
        let source = &self.template.source;
        match expr {
            ast::Expr::Base(ast::BaseExpr::Var(var)) => self.stack.resolve_var(source, var),

            ast::Expr::Base(ast::BaseExpr::Literal(lit)) => Ok(ValueCow::Borrowed(&lit.value)),

            ast::Expr::Call(ast::Call { name, receiver, .. }) => {
                let mut value = self.eval_expr(receiver)?;
                let name_raw = &source[name.span];
                match self.engine.filters.get(name_raw) {
                    Some(filter) => {
                        let result =
                            filter(value.take()).map_err(|err| err.enrich(source, name.span))?;
                        Ok(ValueCow::Owned(result))
                    }
                    None => Err(Error::render("unknown filter", source, name.span)),
                }
            }
        }
    }
}
