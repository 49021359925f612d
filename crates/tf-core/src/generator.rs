//! Single-pass lazy sequences

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::Value;

type BoxedIter = Box<dyn Iterator<Item = Value>>;

/// A lazy sequence that can only be consumed once
///
/// Clones share the underlying iterator, so draining one clone exhausts
/// them all. A drained generator yields nothing on later drains.
#[derive(Clone)]
pub struct Generator {
    inner: Rc<RefCell<Option<BoxedIter>>>,
}

impl Generator {
    /// Wrap an iterator of anything convertible into a [`Value`]
    pub fn new<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
        T: Into<Value> + 'static,
    {
        let iter: BoxedIter = Box::new(items.into_iter().map(Into::into));
        Self {
            inner: Rc::new(RefCell::new(Some(iter))),
        }
    }

    /// Consume every remaining item
    pub fn drain(&self) -> Vec<Value> {
        match self.inner.borrow_mut().take() {
            Some(iter) => iter.collect(),
            None => Vec::new(),
        }
    }

    /// Whether the generator has already been consumed
    pub fn is_exhausted(&self) -> bool {
        self.inner.borrow().is_none()
    }

    /// Whether two handles refer to the same generator
    pub fn ptr_eq(&self, other: &Generator) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generator")
            .field("exhausted", &self.is_exhausted())
            .finish()
    }
}
