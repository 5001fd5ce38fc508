use crate::{Element, Queue};
use std::fmt;
use std::iter::FusedIterator;

/// A draining iterator over the elements of a `Queue`, from head to tail.
///
/// This `struct` is created by [`Queue::drain`]. The elements not consumed
/// are released when the iterator is dropped.
pub struct Drain<'a> {
    queue: &'a mut Queue,
}

impl<'a> Drain<'a> {
    pub(crate) fn new(queue: &'a mut Queue) -> Self {
        Self { queue }
    }
}

impl Iterator for Drain<'_> {
    type Item = Element;

    fn next(&mut self) -> Option<Self::Item> {
        self.queue.remove_head(None)
    }
}

impl DoubleEndedIterator for Drain<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.queue.remove_tail(None)
    }
}

impl FusedIterator for Drain<'_> {}

impl Drop for Drain<'_> {
    fn drop(&mut self) {
        self.for_each(Element::release);
    }
}

impl fmt::Debug for Drain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Drain").field(&*self.queue).finish()
    }
}
