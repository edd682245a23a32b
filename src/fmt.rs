//! Types for value formatters.
//!
//! Every `{{ expr }}` is written to the output by a value formatter. The
//! engine uses [`default`] unless it is replaced with
//! [`Engine::set_default_formatter`][crate::Engine::set_default_formatter].
//!
//! A formatter receives a [`Formatter`], which implements
//! [`std::fmt::Write`], and the value to format. Writing to the formatter
//! appends to the render output, either a [`String`] or an
//! [`std::io::Write`] implementor.
//!
//! ```text
//! Fn(&mut stencil::fmt::Formatter<'_>, &stencil::Value) -> stencil::fmt::Result
//! ```
//!
//! # Examples
//!
//! Wrap strings in quotes and fall back to the default formatter for
//! everything else.
//!
//! ```
//! use std::fmt::Write;
//! use stencil::{fmt, Engine, Value};
//!
//! fn quoted(f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
//!     match value {
//!         Value::String(s) => write!(f, "{s:?}")?,
//!         v => fmt::default(f, v)?,
//!     }
//!     Ok(())
//! }
//!
//! let mut engine = Engine::new();
//! engine.set_default_formatter(&quoted);
//! let result = engine
//!     .compile("{{ name }} is {{ age }}")?
//!     .render_from(&stencil::value! { name: "Alice", age: 30 })?;
//! assert_eq!(result, r#""Alice" is 30"#);
//! # Ok::<(), stencil::Error>(())
//! ```

use std::fmt;
use std::io;

use crate::Value;

/// A formatter function or closure.
pub(crate) type FormatFn = dyn Fn(&mut Formatter<'_>, &Value) -> Result + Sync + Send + 'static;

/// The result type returned from a formatter function.
pub type Result = std::result::Result<(), Error>;

/// The output buffer handed to a formatter function.
pub struct Formatter<'a> {
    out: Output<'a>,
}

enum Output<'a> {
    String(&'a mut String),
    Io {
        writer: &'a mut dyn io::Write,
        /// The first IO error, kept so that it can be reported instead of
        /// the opaque [`fmt::Error`].
        err: &'a mut Option<io::Error>,
    },
}

/// The error type returned from a formatter function.
///
/// Any message can be converted into this error, and [`std::fmt::Error`]
/// converts into an error without a message.
#[derive(Debug, Clone)]
pub struct Error {
    msg: Option<String>,
}

impl<'a> Formatter<'a> {
    pub(crate) fn with_string(buf: &'a mut String) -> Self {
        Self {
            out: Output::String(buf),
        }
    }

    pub(crate) fn with_writer(writer: &'a mut dyn io::Write, err: &'a mut Option<io::Error>) -> Self {
        Self {
            out: Output::Io { writer, err },
        }
    }
}

impl fmt::Write for Formatter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        match &mut self.out {
            Output::String(buf) => {
                buf.push_str(s);
                Ok(())
            }
            Output::Io { writer, err } => writer.write_all(s.as_bytes()).map_err(|e| {
                **err = Some(e);
                fmt::Error
            }),
        }
    }
}

impl Error {
    pub(crate) fn into_message(self) -> Option<String> {
        self.msg
    }
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.msg.as_deref().unwrap_or("format error"))
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Self::from(msg.to_owned())
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Self { msg: Some(msg) }
    }
}

impl From<fmt::Error> for Error {
    fn from(_: fmt::Error) -> Self {
        Self { msg: None }
    }
}

/// The default value formatter.
///
/// Values are formatted as follows:
/// - [`Value::None`]: nothing at all
/// - [`Value::Bool`] and [`Value::Integer`]: using [`Display`][std::fmt::Display]
/// - [`Value::Float`]: always with a fractional part, e.g. `2.0`
/// - [`Value::String`]: the string, unescaped
/// - [`Value::List`]: the items separated by `, ` in brackets, e.g. `[a, 1]`
/// - [`Value::Map`]: the entries in key order in braces, e.g. `{k: v}`
///
/// Inside a list or map [`Value::None`] is written as `none`.
pub fn default(f: &mut Formatter<'_>, value: &Value) -> Result {
    match value {
        Value::None => Ok(()),
        value => Ok(write_value(f, value)?),
    }
}

fn write_value(f: &mut Formatter<'_>, value: &Value) -> fmt::Result {
    use std::fmt::Write;

    match value {
        Value::None => f.write_str("none"),
        Value::Bool(b) => write!(f, "{b}"),
        Value::Integer(n) => write!(f, "{n}"),
        Value::Float(n) => write!(f, "{n:?}"),
        Value::String(s) => f.write_str(s),
        Value::List(list) => {
            f.write_char('[')?;
            for (i, item) in list.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write_value(f, item)?;
            }
            f.write_char(']')
        }
        Value::Map(map) => {
            f.write_char('{')?;
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{key}: ")?;
                write_value(f, item)?;
            }
            f.write_char('}')
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fmt::Write;

    use super::*;

    #[test]
    fn formatter_string() {
        let mut s = String::from("> ");
        let mut f = Formatter::with_string(&mut s);
        default(&mut f, &Value::Integer(7)).unwrap();
        default(&mut f, &Value::None).unwrap();
        f.write_char('!').unwrap();
        assert_eq!(s, "> 7!");
    }

    #[test]
    fn formatter_writer_keeps_io_error() {
        struct Closed;

        impl io::Write for Closed {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let mut writer = Closed;
        let mut err = None;
        let mut f = Formatter::with_writer(&mut writer, &mut err);
        let result = default(&mut f, &Value::from("x")).unwrap_err();
        assert!(result.into_message().is_none());
        assert_eq!(err.unwrap().kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn default_float_keeps_fraction() {
        let mut s = String::new();
        let mut f = Formatter::with_string(&mut s);
        default(&mut f, &Value::Float(2.0)).unwrap();
        f.write_char(' ').unwrap();
        default(&mut f, &Value::Float(-0.25)).unwrap();
        assert_eq!(s, "2.0 -0.25");
    }

    #[test]
    fn default_list_and_map() {
        let mut s = String::new();
        let mut f = Formatter::with_string(&mut s);
        let value = crate::value! {
            b: ["x", 1, true, None],
            a: {},
            c: { d: 2.5 },
        };
        default(&mut f, &value).unwrap();
        assert_eq!(s, "{a: {}, b: [x, 1, true, none], c: {d: 2.5}}");
    }

    #[test]
    fn default_empty_list() {
        let mut s = String::new();
        let mut f = Formatter::with_string(&mut s);
        default(&mut f, &Value::List(vec![])).unwrap();
        assert_eq!(s, "[]");
    }
}
