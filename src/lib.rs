//! A small template compiler.
//!
//! # Features
//!
//! ### Syntax
//!
//! - Expressions: `{{ user.name }}`
//! - Filters, applied left to right: `{{ user.name | strip | upper }}`
//! - Loops: `{% for user in users %} ... {% endfor %}`
//! - Loop state: `{{ loop.index0 }}`, `{{ loop.index1 }}`
//! - Comments: `{# ignored #}`
//!
//! ### Engine
//!
//! - Templates are compiled once and can be rendered many times
//! - Syntax errors are reported at compile time with the offending location
//! - Customizable default value formatter
//! - Render to a [`String`] or any [`std::io::Write`] implementor
//! - Render using any [`serde`] serializable values
//! - Convenient macro for quick rendering:
//!   `stencil::value!{ sku: "A-12", qty: 3 }`
//!
//! # Getting started
//!
//! Everything starts with an [`Engine`]. It owns the registered filters, the
//! default value formatter and any named templates, so a program normally
//! builds a single engine and shares it.
//!
//! ```
//! let engine = stencil::Engine::new();
//! ```
//!
//! [`.compile`][Engine::compile] turns template source into a [`Template`].
//! Malformed templates are rejected here, so rendering never sees a syntax
//! error.
//!
//! ```
//! # let engine = stencil::Engine::new();
//! let template = engine.compile("Order #{{ order.id }} shipped")?;
//! # Ok::<(), stencil::Error>(())
//! ```
//!
//! [`.render`][Template::render] runs the compiled program against a value.
//!
//! ```
//! # let engine = stencil::Engine::new();
//! # let template = engine.compile("Order #{{ order.id }} shipped")?;
//! let result = template.render(stencil::value! { order: { id: 1042 } })?;
//! assert_eq!(result, "Order #1042 shipped");
//! # Ok::<(), stencil::Error>(())
//! ```
//!
//! A template may instead be stored in the engine by name with
//! [`.add_template`][Engine::add_template] and looked up again with
//! [`.get_template`][Engine::get_template].
//!
//! ```
//! let mut engine = stencil::Engine::new();
//! engine.add_template("receipt", "Paid: {{ total }} in {{ currency }}")?;
//!
//! let receipt = engine.get_template("receipt").unwrap();
//! let result = receipt.render(stencil::value! { total: 12.5, currency: "EUR" })?;
//! assert_eq!(result, "Paid: 12.5 in EUR");
//! # Ok::<(), stencil::Error>(())
//! ```
//!
//! # Examples
//!
//! ### Render a serializable struct
//!
//! ```
//! #[derive(serde::Serialize)]
//! struct Order {
//!     id: u32,
//!     items: Vec<&'static str>,
//! }
//!
//! let order = Order { id: 7, items: vec!["tea", "scones"] };
//!
//! let result = stencil::Engine::new()
//!     .compile("#{{ id }}: {{ items.0 }} and {{ items[1] }}")?
//!     .render(&order)?;
//!
//! assert_eq!(result, "#7: tea and scones");
//! # Ok::<(), stencil::Error>(())
//! ```
//!
//! ### Transform data using filters
//!
//! Data can be transformed using registered filters. Each filter receives the
//! value produced by everything to its left.
//!
//! ```
//! let mut engine = stencil::Engine::new();
//! engine.add_filter("exclaim", |s: String| format!("{s}!"));
//!
//! let result = engine
//!     .compile("Hello {{ value | lower | exclaim }}")?
//!     .render(stencil::value! { value: "WORLD" })?;
//!
//! assert_eq!(result, "Hello world!");
//! # Ok::<(), stencil::Error>(())
//! ```
//!
//! See the [`Filter`] trait documentation for more information on filters.
//!
//! ### Loops
//!
//! Lists are iterated by item and maps by key, in key order. Text that is
//! only whitespace is dropped from the output.
//!
//! ```
//! let result = stencil::Engine::new()
//!     .compile("{% for name in names %}{{ loop.index1 }}. {{ name }}; {% endfor %}")?
//!     .render(stencil::value! { names: ["Alice", "Bob"] })?;
//!
//! assert_eq!(result, "1. Alice; 2. Bob; ");
//! # Ok::<(), stencil::Error>(())
//! ```
//!
//! ### Stream the output
//!
//! [`.render_to_writer`][Template::render_to_writer] writes straight into an
//! [`io::Write`] implementor instead of building a [`String`].
//!
//! ```
//! let mut buf = Vec::new();
//! stencil::Engine::new()
//!     .compile("{% for line in lines %}- {{ line }}; {% endfor %}")?
//!     .render_to_writer(&mut buf, stencil::value! { lines: ["a", "b"] })?;
//! assert_eq!(buf, b"- a; - b; ");
//! # Ok::<(), stencil::Error>(())
//! ```

mod compile;
mod error;
mod filters;
pub mod fmt;
mod macros;
mod render;
mod types;
mod value;

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt as std_fmt;
use std::io;

pub use crate::error::{Error, ErrorKind};
pub use crate::filters::Filter;
#[cfg(feature = "serde")]
pub use crate::value::to_value;
pub use crate::value::{List, Map, Value};

use crate::filters::{FilterArg, FilterFn, FilterReturn};
use crate::fmt::FormatFn;
use crate::types::program;

/// A type alias for results in this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// The compilation and rendering engine.
///
/// Compiled templates borrow the engine, so filters cannot be added or
/// replaced while any template exists.
pub struct Engine<'engine> {
    default_formatter: &'engine FormatFn,
    filters: BTreeMap<&'engine str, Box<FilterFn>>,
    templates: BTreeMap<&'engine str, program::Template<'engine>>,
}

/// A compiled template.
pub struct Template<'engine, 'source> {
    engine: &'engine Engine<'engine>,
    template: program::Template<'source>,
}

/// A reference to a compiled template in an [`Engine`].
#[derive(Clone, Copy)]
pub struct TemplateRef<'engine> {
    engine: &'engine Engine<'engine>,
    template: &'engine program::Template<'engine>,
}

impl<'engine> Default for Engine<'engine> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<'engine> Engine<'engine> {
    /// Construct a new engine.
    ///
    /// If the `builtins` feature is enabled the `upper`, `lower`, `strip`,
    /// `first`, `last` and `len` filters are registered.
    #[inline]
    pub fn new() -> Self {
        #[allow(unused_mut)]
        let mut engine = Self {
            default_formatter: &fmt::default,
            filters: BTreeMap::new(),
            templates: BTreeMap::new(),
        };
        #[cfg(feature = "builtins")]
        engine.add_builtins();
        engine
    }

    #[cfg(feature = "builtins")]
    fn add_builtins(&mut self) {
        use crate::filters::builtins;

        self.add_filter("upper", builtins::upper);
        self.add_filter("lower", builtins::lower);
        self.add_filter("strip", builtins::strip);
        self.add_filter("first", builtins::first);
        self.add_filter("last", builtins::last);
        self.add_filter("len", builtins::len);
    }

    /// Set the default formatter.
    ///
    /// The default formatter is used to write the value of every expression
    /// to the output. See the [`fmt`] module for more information.
    #[inline]
    pub fn set_default_formatter<F>(&mut self, f: &'engine F)
    where
        F: Fn(&mut fmt::Formatter<'_>, &Value) -> fmt::Result + Sync + Send + 'static,
    {
        self.default_formatter = f;
    }

    /// Add a new filter to the engine.
    ///
    /// A filter with the same name is replaced.
    #[inline]
    pub fn add_filter<F, R, A>(&mut self, name: &'engine str, f: F)
    where
        F: Filter<R, A> + Send + Sync + 'static,
        R: FilterReturn,
        A: FilterArg,
    {
        self.filters.insert(name, filters::new(f));
    }

    /// Add a template to the engine.
    ///
    /// The template will be compiled and stored under the given name.
    ///
    /// When using this function over [`.compile(..)`][Engine::compile] the
    /// template source lifetime needs to be as least as long as the engine
    /// lifetime.
    #[inline]
    pub fn add_template<S>(&mut self, name: &'engine str, source: S) -> Result<()>
    where
        S: Into<Cow<'engine, str>>,
    {
        let template = compile::template(source.into())?;
        self.templates.insert(name, template);
        Ok(())
    }

    /// Lookup a template by name.
    #[inline]
    pub fn get_template(&self, name: &str) -> Option<TemplateRef<'_>> {
        self.templates.get(name).map(|template| TemplateRef {
            engine: self,
            template,
        })
    }

    /// Remove a template by name, returns `true` if it existed.
    #[inline]
    pub fn remove_template(&mut self, name: &str) -> bool {
        self.templates.remove(name).is_some()
    }

    /// Compile a template.
    ///
    /// The template will not be stored in the engine. The advantage over
    /// [`.add_template(..)`][Engine::add_template] here is that the lifetime of
    /// the template source does not need to outlive the engine.
    #[inline]
    pub fn compile<'source, S>(&self, source: S) -> Result<Template<'_, 'source>>
    where
        S: Into<Cow<'source, str>>,
    {
        let template = compile::template(source.into())?;
        Ok(Template {
            engine: self,
            template,
        })
    }
}

impl std_fmt::Debug for Engine<'_> {
    fn fmt(&self, f: &mut std_fmt::Formatter<'_>) -> std_fmt::Result {
        f.debug_struct("Engine")
            .field("filters", &self.filters.keys())
            .field("templates", &self.templates.keys())
            .finish_non_exhaustive()
    }
}

impl<'engine, 'source> Template<'engine, 'source> {
    /// Render the template to a string using the provided value.
    #[cfg(feature = "serde")]
    #[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
    #[inline]
    pub fn render<S>(&self, ctx: S) -> Result<String>
    where
        S: serde::Serialize,
    {
        render::template(self.engine, &self.template, &to_value(ctx)?)
    }

    /// Render the template to a writer using the provided value.
    #[cfg(feature = "serde")]
    #[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
    #[inline]
    pub fn render_to_writer<W, S>(&self, writer: W, ctx: S) -> Result<()>
    where
        W: io::Write,
        S: serde::Serialize,
    {
        render::template_to(self.engine, &self.template, writer, &to_value(ctx)?)
    }

    /// Render the template to a string using the provided value.
    #[inline]
    pub fn render_from(&self, ctx: &Value) -> Result<String> {
        render::template(self.engine, &self.template, ctx)
    }

    /// Render the template to a writer using the provided value.
    #[inline]
    pub fn render_from_to_writer<W>(&self, writer: W, ctx: &Value) -> Result<()>
    where
        W: io::Write,
    {
        render::template_to(self.engine, &self.template, writer, ctx)
    }

    /// Returns the original template source.
    #[inline]
    pub fn source(&self) -> &str {
        &self.template.source
    }
}

impl std_fmt::Debug for Template<'_, '_> {
    fn fmt(&self, f: &mut std_fmt::Formatter<'_>) -> std_fmt::Result {
        f.debug_struct("Template")
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}

impl<'engine> TemplateRef<'engine> {
    /// Render the template to a string using the provided value.
    #[cfg(feature = "serde")]
    #[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
    #[inline]
    pub fn render<S>(&self, ctx: S) -> Result<String>
    where
        S: serde::Serialize,
    {
        render::template(self.engine, self.template, &to_value(ctx)?)
    }

    /// Render the template to a writer using the provided value.
    #[cfg(feature = "serde")]
    #[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
    #[inline]
    pub fn render_to_writer<W, S>(&self, writer: W, ctx: S) -> Result<()>
    where
        W: io::Write,
        S: serde::Serialize,
    {
        render::template_to(self.engine, self.template, writer, &to_value(ctx)?)
    }

    /// Render the template to a string using the provided value.
    #[inline]
    pub fn render_from(&self, ctx: &Value) -> Result<String> {
        render::template(self.engine, self.template, ctx)
    }

    /// Render the template to a writer using the provided value.
    #[inline]
    pub fn render_from_to_writer<W>(&self, writer: W, ctx: &Value) -> Result<()>
    where
        W: io::Write,
    {
        render::template_to(self.engine, self.template, writer, ctx)
    }

    /// Returns the original template source.
    #[inline]
    pub fn source(&self) -> &'engine str {
        &self.template.source
    }
}

impl std_fmt::Debug for TemplateRef<'_> {
    fn fmt(&self, f: &mut std_fmt::Formatter<'_>) -> std_fmt::Result {
        f.debug_struct("TemplateRef")
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}
