//! Builtin filters.
//!
//! These are registered on every [`Engine`][crate::Engine] created with
//! [`Engine::new`][crate::Engine::new].

use crate::Value;

/// Returns the lowercase equivalent of this string.
///
/// See [`str::to_lowercase`].
#[cfg_attr(docsrs, doc(cfg(feature = "builtins")))]
pub fn lower(s: String) -> String {
    s.to_lowercase()
}

/// Returns the uppercase equivalent of this string.
///
/// See [`str::to_uppercase`].
#[cfg_attr(docsrs, doc(cfg(feature = "builtins")))]
pub fn upper(s: String) -> String {
    s.to_uppercase()
}

/// Returns the string with leading and trailing whitespace removed.
///
/// See [`str::trim`].
#[cfg_attr(docsrs, doc(cfg(feature = "builtins")))]
pub fn strip(s: String) -> String {
    s.trim().to_owned()
}

/// Returns the first element in a list or the first character in a string.
#[cfg_attr(docsrs, doc(cfg(feature = "builtins")))]
pub fn first(value: Value) -> Result<Option<Value>, String> {
    match value {
        Value::List(list) => Ok(list.into_iter().next()),
        Value::String(s) => Ok(s.chars().next().map(Value::from)),
        value => Err(format!("unsupported value `{}`", value.human())),
    }
}

/// Returns the last element in a list or the last character in a string.
#[cfg_attr(docsrs, doc(cfg(feature = "builtins")))]
pub fn last(value: Value) -> Result<Option<Value>, String> {
    match value {
        Value::List(mut list) => Ok(list.pop()),
        Value::String(s) => Ok(s.chars().next_back().map(Value::from)),
        value => Err(format!("unsupported value `{}`", value.human())),
    }
}

/// Returns the number of elements in the list or map, or the number of
/// characters in a string.
#[cfg_attr(docsrs, doc(cfg(feature = "builtins")))]
pub fn len(value: Value) -> Result<usize, String> {
    match value {
        Value::List(l) => Ok(l.len()),
        Value::Map(m) => Ok(m.len()),
        Value::String(s) => Ok(s.chars().count()),
        value => Err(format!("unsupported value `{}`", value.human())),
    }
}
