mod core;
mod iter;
mod stack;
mod value;

use std::io;

use crate::fmt::Formatter;
use crate::render::core::RendererImpl;
use crate::render::stack::Stack;
use crate::types::program::Template;
use crate::{Engine, Error, Result, Value};

/// Render the template to a string.
pub(crate) fn template<'a>(
    engine: &'a Engine<'a>,
    template: &'a Template<'a>,
    globals: &'a Value,
) -> Result<String> {
    let mut s = String::with_capacity(template.source.len());
    let mut f = Formatter::with_string(&mut s);
    RendererImpl {
        engine,
        template,
        stack: Stack::new(globals, template.depth),
    }
    .render(&mut f)?;
    tracing::debug!(len = s.len(), "rendered template");
    Ok(s)
}

/// Render the template to the given writer.
pub(crate) fn template_to<'a, W>(
    engine: &'a Engine<'a>,
    template: &'a Template<'a>,
    mut writer: W,
    globals: &'a Value,
) -> Result<()>
where
    W: io::Write,
{
    let mut io_err = None;
    let mut f = Formatter::with_writer(&mut writer, &mut io_err);
    RendererImpl {
        engine,
        template,
        stack: Stack::new(globals, template.depth),
    }
    .render(&mut f)
    .map_err(|err| io_err.take().map(Error::from).unwrap_or(err))
}
