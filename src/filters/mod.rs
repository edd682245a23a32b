//! Filters transform the value of an expression, `{{ name | upper }}`.

mod args;
#[cfg(feature = "builtins")]
pub mod builtins;

use crate::{Error, Result, Value};

pub type FilterFn = dyn Fn(Value) -> Result<Value> + Send + Sync + 'static;

pub fn new<F, R, A>(f: F) -> Box<FilterFn>
where
    F: Filter<R, A> + Send + Sync + 'static,
    R: FilterReturn,
    A: FilterArg,
{
    Box::new(move |value: Value| -> Result<Value> {
        let arg = A::from_value(value).map_err(err_expected_val)?;
        let result = Filter::filter(&f, arg);
        FilterReturn::to_value(result)
    })
}

/// Represents any filter function.
///
/// This trait is used by the [`Engine::add_filter`][crate::Engine::add_filter]
/// method to abstract over a variety of function and closure types. A filter
/// takes exactly one argument, the piped value. The renderer checks the type
/// of the value when the filter is applied.
///
/// [`Filter`] is implemented for functions that return any of the following
/// types.
///
/// - `R` where `R` implements `Into<Value>`
/// - `Option<R>` where `R` implements `Into<Value>`
/// - `Result<R, E>` where `R` implements `Into<Value>` and `E` implements
///   `Into<Error>`, for example [`String`]
///
/// [`Filter`] is implemented for functions that take any of the following
/// owned types as an argument.
/// - [`bool`]
/// - [`i64`]
/// - [`f64`]
/// - [`String`]
/// - [`Vec<Value>`]
/// - [`BTreeMap<String, Value>`][std::collections::BTreeMap]
/// - [`Value`]
///
/// ## Examples
///
/// Consider the following template.
///
/// ```text
/// {{ user.name | shout }}
/// ```
///
/// We could implement the `shout` filter like this:
///
/// ```rust
/// use stencil::Engine;
///
/// let mut engine = Engine::new();
/// engine.add_filter("shout", shout);
///
/// fn shout(s: String) -> String {
///     format!("{}!", s.to_uppercase())
/// }
/// ```
pub trait Filter<R, A> {
    #[doc(hidden)]
    fn filter(&self, arg: A) -> R;
}

pub trait FilterArg: Sized {
    #[doc(hidden)]
    fn from_value(v: Value) -> args::Result<Self>;
}

pub trait FilterReturn {
    #[doc(hidden)]
    fn to_value(self) -> Result<Value>;
}

impl<Func, R, A> Filter<R, A> for Func
where
    Func: Fn(A) -> R,
    R: FilterReturn,
    A: FilterArg,
{
    #[doc(hidden)]
    fn filter(&self, arg: A) -> R {
        self(arg)
    }
}

impl<T> FilterReturn for T
where
    T: Into<Value>,
{
    fn to_value(self) -> Result<Value> {
        Ok(self.into())
    }
}

impl<T, E> FilterReturn for std::result::Result<T, E>
where
    T: Into<Value>,
    E: Into<Error>,
{
    fn to_value(self) -> Result<Value> {
        self.map(Into::into).map_err(Into::into)
    }
}

fn err_expected_val(err: args::Error) -> Error {
    match err {
        args::Error::Type(exp, got) => Error::from(format!(
            "filter expected {} value, found {}",
            exp, got
        )),
    }
}
