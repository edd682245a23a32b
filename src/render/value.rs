use crate::types::ast;
use crate::value::ValueCow;
use crate::{Error, Result, Value};

/// Index the value with the given path.
pub fn lookup_path<'a>(
    source: &str,
    value: &ValueCow<'a>,
    path: &[ast::Key],
) -> Result<ValueCow<'a>> {
    match value {
        // If the value is borrowed we can lookup the value and return a
        // reference with lifetime 'a
        &ValueCow::Borrowed(v) => {
            let v = path.iter().try_fold(v, |v, k| lookup(source, v, k))?;
            Ok(ValueCow::Borrowed(v))
        }
        // If the value is owned then make sure to only clone the edge value
        // that we lookup.
        ValueCow::Owned(v) => {
            let v = path.iter().try_fold(v, |v, k| lookup(source, v, k))?;
            Ok(ValueCow::Owned(v.clone()))
        }
    }
}

/// Index into the value with the given path segment.
pub fn lookup<'a>(source: &str, value: &'a Value, key: &ast::Key) -> Result<&'a Value> {
    match (value, key) {
        (Value::Map(map), ast::Key::Map(ident)) => map
            .get(&source[ident.span])
            .ok_or_else(|| Error::render("not found in map", source, ident.span)),

        (Value::Map(map), ast::Key::Str(s)) => map
            .get(&s.value)
            .ok_or_else(|| Error::render("not found in map", source, s.span)),

        (Value::List(list), ast::Key::List(index)) => list
            .get(index.value)
            .ok_or_else(|| Error::render("index out of bounds", source, index.span)),

        (Value::List(_), key) => Err(Error::render(
            "cannot index list with string",
            source,
            key.span(),
        )),

        (Value::Map(_), ast::Key::List(index)) => Err(Error::render(
            "cannot index map with integer",
            source,
            index.span,
        )),

        (value, key) => Err(Error::render(
            format!("cannot index into {}", value.human()),
            source,
            key.span(),
        )),
    }
}
