use crate::error::{QueueError, Result};
use crate::queue::{connect, value_of, Queue};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::mem;

pub(crate) mod drain;
#[cfg(feature = "shuffle")]
mod shuffle;
mod sort;

impl PartialEq for Queue {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other)
    }
}

impl Eq for Queue {}

impl PartialOrd for Queue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Queue {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other)
    }
}

impl Clone for Queue {
    fn clone(&self) -> Self {
        self.iter().collect()
    }
}

impl Hash for Queue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut len = 0_usize;
        for value in self {
            value.hash(state);
            len += 1;
        }
        len.hash(state);
    }
}

impl Queue {
    /// Returns `true` if the `Queue` contains an element equal to the given value.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    /// use std::iter::FromIterator;
    ///
    /// let queue = Queue::from_iter(["cat", "dog"]);
    ///
    /// assert_eq!(queue.contains("cat"), true);
    /// assert_eq!(queue.contains("cow"), false);
    /// ```
    pub fn contains(&self, value: &str) -> bool {
        self.iter().any(|e| e == value)
    }

    /// Returns `true` if the values are in ascending order.
    pub fn is_sorted(&self) -> bool {
        let mut iter = self.iter();
        let mut prev = match iter.next() {
            Some(prev) => prev,
            None => return true,
        };
        iter.all(|value| mem::replace(&mut prev, value) <= value)
    }

    /// Delete the middle element, which is the ⌊*n* / 2⌋-th element
    /// (0-based) of a queue of length *n*.
    ///
    /// Return [`QueueError::EmptyCollection`] if the queue is empty.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time, in a single pass.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    /// use std::iter::FromIterator;
    ///
    /// let mut queue = Queue::from_iter(["10", "20", "30", "40", "50", "60"]);
    /// queue.delete_mid().unwrap();
    /// assert!(queue.iter().eq(["10", "20", "30", "50", "60"]));
    /// ```
    pub fn delete_mid(&mut self) -> Result<()> {
        if self.is_empty() {
            return Err(QueueError::EmptyCollection);
        }
        let (ghost, tail) = (self.ghost(), self.tail());
        // `fast` moves two steps while `slow` moves one, until `fast` reaches
        // the tail (odd length) or the ghost node (even length).
        let (mut slow, mut fast) = (ghost, self.head());
        // SAFETY: every node reached here belongs to the queue.
        unsafe {
            while fast != tail && fast != ghost {
                fast = fast.as_ref().next.as_ref().next;
                slow = slow.as_ref().next;
            }
            let mid = slow.as_ref().next;
            tracing::debug!(value = value_of(mid), "delete middle element");
            self.delete(mid);
        }
        Ok(())
    }

    /// Delete every element whose value appears more than once in a row,
    /// leaving only the values that were not repeated.
    ///
    /// The queue must be sorted in ascending order, so that equal values are
    /// adjacent. This is only checked in debug builds; on an unsorted queue,
    /// only adjacent repetitions are deleted.
    ///
    /// Return [`QueueError::EmptyCollection`] if the queue is empty.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time and *O*(1) memory.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    /// use std::iter::FromIterator;
    ///
    /// let mut queue = Queue::from_iter(["a", "b", "b", "c", "d", "d", "d"]);
    /// queue.delete_dup().unwrap();
    /// assert!(queue.iter().eq(["a", "c"]));
    /// ```
    pub fn delete_dup(&mut self) -> Result<()> {
        if self.is_empty() {
            return Err(QueueError::EmptyCollection);
        }
        debug_assert!(self.is_sorted(), "Cannot delete duplicates of an unsorted queue");
        let ghost = self.ghost();
        let mut removed = 0_usize;
        let mut left = self.head();
        // SAFETY: `left` and `right` are always nodes of the queue, and the nodes
        // in `left..right` are deleted only after `right` is found.
        unsafe {
            while left != ghost {
                let value = value_of(left);
                let mut right = left.as_ref().next;
                while right != ghost && value_of(right) == value {
                    right = right.as_ref().next;
                }
                if right != left.as_ref().next {
                    while left != right {
                        let next = left.as_ref().next;
                        self.delete(left);
                        removed += 1;
                        left = next;
                    }
                }
                left = right;
            }
        }
        tracing::debug!(removed, "delete duplicates");
        Ok(())
    }

    /// Swap every two adjacent elements: the 1st with the 2nd, the 3rd with
    /// the 4th, and so on. A trailing unpaired element stays in place.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time and *O*(1) memory.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    /// use std::iter::FromIterator;
    ///
    /// let mut queue = Queue::from_iter(["1", "2", "3", "4", "5"]);
    /// queue.swap();
    /// assert!(queue.iter().eq(["2", "1", "4", "3", "5"]));
    /// ```
    pub fn swap(&mut self) {
        let ghost = self.ghost();
        let mut first = self.head();
        // SAFETY: `first` and `second` are adjacent non-ghost nodes of the queue.
        unsafe {
            while first != ghost && first.as_ref().next != ghost {
                let second = first.as_ref().next;
                // prev, first, second, next => prev, second, first, next
                connect(first, second.as_ref().next);
                connect(first.as_ref().prev, second);
                connect(second, first);
                first = first.as_ref().next;
            }
        }
    }

    /// Reverse the order of the elements in place.
    ///
    /// No element is allocated or released: only the links are rewired.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time and *O*(1) memory.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    /// use std::iter::FromIterator;
    ///
    /// let mut queue = Queue::from_iter(["a", "b", "c"]);
    /// queue.reverse();
    /// assert!(queue.iter().eq(["c", "b", "a"]));
    /// ```
    pub fn reverse(&mut self) {
        if self.is_empty() || self.is_singular() {
            return;
        }
        let ghost = self.ghost();
        let mut link = ghost;
        // SAFETY: every node of the cycle, the ghost included, is visited
        // exactly once.
        unsafe {
            loop {
                let node = link.as_mut();
                mem::swap(&mut node.next, &mut node.prev);
                // the former `next`
                link = node.prev;
                if link == ghost {
                    break;
                }
            }
        }
    }
}
