use crate::queue::{value_of, Link, Queue};
use crate::Element;
use std::fmt;
use std::iter::{FromIterator, FusedIterator};
use std::marker::PhantomData;
use std::ptr::NonNull;

/// An iterator over the values of a `Queue`.
///
/// It uses a pair of nodes `start..end` to represent a half-open subrange
/// of the queue, where `start` is inclusive and `end` is not.
///
/// Though the `Iter` does not hold a reference from the queue,
/// it actually *borrows* (immutably) from the queue, so a phantom
/// marker of `&'a Queue` is added to protect the queue from being
/// written.
///
/// # Examples
///
/// ```compile_fail
/// use cyclic_queue::Queue;
/// use std::iter::FromIterator;
///
/// let mut queue = Queue::from_iter(["a", "b", "c"]);
/// let mut iter = queue.iter();
///
/// // Won't compile, because queue is already borrowed immutably.
/// queue.insert_tail("d").unwrap();
/// println!("{:?}", iter.next());
/// ```
#[derive(Clone)]
pub struct Iter<'a> {
    start: NonNull<Link>,
    end: NonNull<Link>,
    _marker: PhantomData<&'a Queue>,
}

impl<'a> Iter<'a> {
    pub(crate) fn new(queue: &'a Queue) -> Self {
        let start = queue.head();
        let end = queue.ghost();
        let _marker = PhantomData;
        Self {
            start,
            end,
            _marker,
        }
    }
}

impl fmt::Debug for Iter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Iter").field(&self.clone().collect::<Vec<_>>()).finish()
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a str;

    /// Return `*start` and reset the iterating range to `(start.next)..end`,
    /// or return `None` if `start..end` is already empty.
    fn next(&mut self) -> Option<Self::Item> {
        if self.start == self.end {
            return None;
        }
        // SAFETY: `start..end` is always a valid range of a queue,
        // and it is not empty here, so `start` is not the ghost node.
        let current = self.start;
        self.start = unsafe { current.as_ref().next };
        Some(unsafe { value_of(current) })
    }

    fn last(mut self) -> Option<Self::Item>
    where
        Self: Sized,
    {
        self.next_back()
    }
}

impl<'a> DoubleEndedIterator for Iter<'a> {
    /// Reset the iterating range to `start..(end.prev)` and return `*end`,
    /// or return `None` if `start..end` is already empty.
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.start == self.end {
            return None;
        }
        // SAFETY: `start..end` is always a valid range of a queue,
        // and it is not empty here, so `end.prev` is not the ghost node.
        self.end = unsafe { self.end.as_ref().prev };
        Some(unsafe { value_of(self.end) })
    }
}

impl FusedIterator for Iter<'_> {}

/// An owning iterator over the elements of a `Queue`, from head to tail.
///
/// This `struct` is created by the [`into_iter`] method on [`Queue`]
/// (provided by the `IntoIterator` trait).
///
/// [`into_iter`]: Queue::into_iter
pub struct IntoIter {
    queue: Queue,
}

impl fmt::Debug for IntoIter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntoIter")
            .field("queue", &self.queue)
            .finish()
    }
}

impl Iterator for IntoIter {
    type Item = Element;

    fn next(&mut self) -> Option<Self::Item> {
        self.queue.remove_head(None)
    }

    fn last(mut self) -> Option<Self::Item>
    where
        Self: Sized,
    {
        self.next_back()
    }
}

impl DoubleEndedIterator for IntoIter {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.queue.remove_tail(None)
    }
}

impl FusedIterator for IntoIter {}

impl IntoIterator for Queue {
    type Item = Element;
    type IntoIter = IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { queue: self }
    }
}

impl<'a> IntoIterator for &'a Queue {
    type Item = &'a str;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<S: AsRef<str>> FromIterator<S> for Queue {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut queue = Queue::new();
        queue.extend(iter);
        queue
    }
}

impl<S: AsRef<str>> Extend<S> for Queue {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        iter.into_iter()
            .for_each(|value| self.push_tail(value.as_ref()));
    }
}

unsafe impl Send for Iter<'_> {}

unsafe impl Sync for Iter<'_> {}

#[cfg(test)]
mod tests {
    use crate::Queue;
    use std::iter::FromIterator;

    #[test]
    fn test_iter() {
        fn test_case(input: &[&str], mid: usize) {
            let queue = Queue::from_iter(input);

            let mut iter = queue.iter();
            for item in input.iter() {
                assert_eq!(iter.next(), Some(*item));
            }
            assert_eq!(iter.next(), None);
            assert_eq!(iter.next(), None);
            assert_eq!(iter.next_back(), None);

            let mut iter = queue.iter();
            for item in input.iter().take(mid) {
                assert_eq!(iter.next(), Some(*item));
            }
            let mut iter = iter.rev();
            for item in input.iter().skip(mid).rev() {
                assert_eq!(iter.next(), Some(*item));
            }
            assert_eq!(iter.next(), None);
            assert_eq!(iter.next_back(), None);
        }
        let input = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];
        test_case(&input, 10);
        test_case(&input, 8);
        test_case(&input, 5);
        test_case(&input, 0);
        test_case(&input[..2], 2);
        test_case(&input[..2], 1);
        test_case(&input[..1], 1);
        test_case(&input[..1], 0);
        test_case(&[], 0);
    }

    #[test]
    fn test_into_iter() {
        let queue = Queue::from_iter(["a", "b", "c", "d"]);
        let mut iter = queue.into_iter();
        assert_eq!(iter.next().unwrap(), "a");
        assert_eq!(iter.next_back().unwrap(), "d");
        let rest: Vec<String> = iter.map(|element| element.into_string()).collect();
        assert_eq!(rest, ["b", "c"]);
    }

    #[test]
    fn test_extend() {
        let mut queue = Queue::new();
        queue.extend(vec![String::from("x"), String::from("y")]);
        queue.extend(["z"]);
        assert!(queue.iter().eq(["x", "y", "z"]));
        assert_eq!(format!("{:?}", queue.iter()), r#"Iter(["x", "y", "z"])"#);
    }
}
