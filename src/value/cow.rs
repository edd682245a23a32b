//! Defines a clone-on-write [`Value`].

use std::mem;
use std::ops::Deref;

use crate::Value;

/// A value that is either borrowed from the render context or produced while
/// rendering, e.g. by a filter or a literal.
#[derive(Debug)]
pub enum ValueCow<'a> {
    Borrowed(&'a Value),
    Owned(Value),
}

impl Deref for ValueCow<'_> {
    type Target = Value;

    fn deref(&self) -> &Self::Target {
        match self {
            Self::Borrowed(v) => v,
            Self::Owned(v) => v,
        }
    }
}

impl ValueCow<'_> {
    /// Takes the owned value, cloning only if it is borrowed.
    pub fn take(&mut self) -> Value {
        match self {
            Self::Borrowed(v) => (*v).clone(),
            Self::Owned(v) => mem::take(v),
        }
    }
}
