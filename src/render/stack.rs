use crate::render::iter::LoopState;
use crate::render::value::lookup_path;
use crate::types::ast;
use crate::value::ValueCow;
use crate::{Error, Result, Value};

pub struct Stack<'render> {
    stack: Vec<State<'render>>,
}

pub enum State<'render> {
    /// An entire scope of variables, usually a map
    Scope(&'render Value),

    /// The current state of a loop iteration
    Loop(LoopState<'render>),
}

impl<'render> Stack<'render> {
    /// Constructs a stack with room for the globals and `depth` nested loops.
    pub fn new(globals: &'render Value, depth: usize) -> Self {
        let mut stack = Vec::with_capacity(depth + 1);
        stack.push(State::Scope(globals));
        Self { stack }
    }

    /// Resolves a variable on the stack, searching from the innermost loop
    /// outwards to the globals.
    pub fn resolve_var(&self, source: &str, var: &ast::Var) -> Result<ValueCow<'render>> {
        let name = &source[var.name.span];
        for state in self.stack.iter().rev() {
            match state {
                State::Scope(scope) => {
                    if let Value::Map(map) = *scope {
                        if let Some(value) = map.get(name) {
                            return lookup_path(source, &ValueCow::Borrowed(value), &var.rest);
                        }
                    }
                }
                State::Loop(loop_state) => {
                    if let Some(value) = loop_state.resolve_var(source, var)? {
                        return Ok(value);
                    }
                }
            }
        }
        Err(Error::render("not found in this scope", source, var.name.span))
    }

    pub fn push(&mut self, state: State<'render>) {
        self.stack.push(state);
    }

    pub fn last_loop_state_mut(&mut self) -> &mut LoopState<'render> {
        match self.stack.last_mut() {
            Some(State::Loop(loop_state)) => loop_state,
            _ => panic!("expected loop state"),
        }
    }

    pub fn pop_loop_state(&mut self) -> LoopState<'render> {
        match self.stack.pop() {
            Some(State::Loop(loop_state)) => loop_state,
            _ => panic!("expected loop state"),
        }
    }
}
