use std::collections::btree_map;
use std::slice;
use std::vec;

use crate::render::value::lookup_path;
use crate::types::ast;
use crate::types::span::Span;
use crate::value::ValueCow;
use crate::{Error, Map, Result, Value};

/// The current state of a `{% for %}` block.
pub struct LoopState<'render> {
    /// The name of the loop variable.
    var: &'render str,
    iter: Iter<'render>,
    /// The current item, `None` before the first iteration.
    item: Option<ValueCow<'render>>,
    /// The zero-based index of the current item.
    index: usize,
}

enum Iter<'render> {
    ListBorrowed(slice::Iter<'render, Value>),
    ListOwned(vec::IntoIter<Value>),
    MapBorrowed(btree_map::Keys<'render, String, Value>),
    MapOwned(btree_map::IntoKeys<String, Value>),
}

impl<'render> LoopState<'render> {
    pub fn new(
        source: &'render str,
        var: &ast::Ident,
        iterable: ValueCow<'render>,
        span: Span,
    ) -> Result<Self> {
        let iter = match iterable {
            ValueCow::Borrowed(Value::List(list)) => Iter::ListBorrowed(list.iter()),
            ValueCow::Borrowed(Value::Map(map)) => Iter::MapBorrowed(map.keys()),
            ValueCow::Owned(Value::List(list)) => Iter::ListOwned(list.into_iter()),
            ValueCow::Owned(Value::Map(map)) => Iter::MapOwned(map.into_keys()),
            value => {
                return Err(Error::render(
                    format!(
                        "expected iterable, but expression evaluated to {}",
                        value.human()
                    ),
                    source,
                    span,
                ));
            }
        };
        Ok(Self {
            var: &source[var.span],
            iter,
            item: None,
            index: 0,
        })
    }

    /// Advances to the next item, returns `None` if the loop is exhausted.
    pub fn iterate(&mut self) -> Option<()> {
        let item = match &mut self.iter {
            Iter::ListBorrowed(iter) => ValueCow::Borrowed(iter.next()?),
            Iter::ListOwned(iter) => ValueCow::Owned(iter.next()?),
            Iter::MapBorrowed(keys) => ValueCow::Owned(Value::String(keys.next()?.clone())),
            Iter::MapOwned(keys) => ValueCow::Owned(Value::String(keys.next()?)),
        };
        if self.item.replace(item).is_some() {
            self.index += 1;
        }
        Some(())
    }

    /// Resolves the loop variable or the special `loop` variable.
    ///
    /// Returns `None` if the name doesn't refer to this loop.
    pub fn resolve_var(&self, source: &str, var: &ast::Var) -> Result<Option<ValueCow<'render>>> {
        let name = &source[var.name.span];
        if name == self.var {
            return match &self.item {
                Some(item) => lookup_path(source, item, &var.rest).map(Some),
                None => Ok(None),
            };
        }
        if name == "loop" {
            let state = ValueCow::Owned(self.to_value());
            return lookup_path(source, &state, &var.rest).map(Some);
        }
        Ok(None)
    }

    fn to_value(&self) -> Value {
        Value::Map(Map::from([
            ("index0".to_owned(), Value::from(self.index)),
            ("index".to_owned(), Value::from(self.index)),
            ("index1".to_owned(), Value::from(self.index + 1)),
        ]))
    }
}
