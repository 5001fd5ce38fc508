use crate::queue::{connect, value_of, Link, Queue};
use std::cmp::Ordering;
use std::mem;
use std::ptr::NonNull;

impl Queue {
    /// Sort the queue in ascending order.
    ///
    /// This sort is stable (i.e., does not reorder equal elements), and the
    /// values are compared byte-wise.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n* * log(*n*)) time and *O*(1)
    /// heap memory. The recursion is *O*(log(*n*)) deep.
    ///
    /// # Current Implementation
    ///
    /// The current algorithm is a top-down merge sort. The queue is cut into a
    /// chain linked by `next` only, which is split in halves and merged back,
    /// and the `prev` links are restored in a final pass.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    /// use std::iter::FromIterator;
    ///
    /// let mut queue = Queue::from_iter(["pear", "apple", "fig", "banana"]);
    ///
    /// queue.sort();
    ///
    /// assert!(queue.iter().eq(["apple", "banana", "fig", "pear"]));
    /// ```
    pub fn sort(&mut self) {
        self.sort_by(str::cmp);
    }

    /// Sort the queue with a comparator function.
    ///
    /// This sort is stable (i.e., does not reorder equal elements).
    ///
    /// The comparator function must define a total ordering for the
    /// elements in the queue. If the ordering is not total, the order
    /// of the elements is unspecified, but no element is lost.
    ///
    /// # Panics
    ///
    /// If `compare` panics, the queue is left in its order before sorting.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n* * log(*n*)) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    /// use std::iter::FromIterator;
    ///
    /// let mut queue = Queue::from_iter(["ccc", "a", "bb"]);
    ///
    /// // sort by length, longest first
    /// queue.sort_by(|a, b| b.len().cmp(&a.len()));
    /// assert!(queue.iter().eq(["ccc", "bb", "a"]));
    /// ```
    pub fn sort_by<F>(&mut self, mut compare: F)
    where
        F: FnMut(&str, &str) -> Ordering,
    {
        if self.is_empty() || self.is_singular() {
            return;
        }
        tracing::trace!("merge sort");
        let ghost = self.ghost();
        let mut less_eq = |a: NonNull<Link>, b: NonNull<Link>| {
            // SAFETY: only non-ghost nodes of the queue are compared.
            unsafe { compare(value_of(a), value_of(b)) != Ordering::Greater }
        };
        // SAFETY: the chain `head..ghost` covers every node of the queue; it is
        // linked back into a cycle before returning, or by `guard` on unwind.
        unsafe {
            self.tail().as_mut().next = ghost;
            let guard = RestoreOnUnwind { ghost };
            let front = merge_sort(self.head(), ghost, &mut less_eq);
            mem::forget(guard);
            relink(ghost, front);
        }
    }
}

/// Rebuilds the cycle from the `prev` links if the comparator panics.
///
/// The merge sort only rewrites `next` links, so until `relink` the `prev`
/// links still describe the order before sorting.
struct RestoreOnUnwind {
    ghost: NonNull<Link>,
}

impl Drop for RestoreOnUnwind {
    fn drop(&mut self) {
        let mut link = self.ghost;
        // SAFETY: the `prev` links of the queue are untouched and form the
        // original cycle through the ghost node.
        unsafe {
            loop {
                let mut prev = link.as_ref().prev;
                prev.as_mut().next = link;
                link = prev;
                if link == self.ghost {
                    break;
                }
            }
        }
    }
}

/// Sort the chain starting at `front` and terminated by `end`, linked by
/// `next` only, and return the new front.
unsafe fn merge_sort<F>(front: NonNull<Link>, end: NonNull<Link>, less_eq: &mut F) -> NonNull<Link>
where
    F: FnMut(NonNull<Link>, NonNull<Link>) -> bool,
{
    if front.as_ref().next == end {
        return front;
    }
    let (mut slow, mut fast) = (front, front);
    while fast.as_ref().next != end && fast.as_ref().next.as_ref().next != end {
        fast = fast.as_ref().next.as_ref().next;
        slow = slow.as_ref().next;
    }
    let mid = slow.as_ref().next;
    slow.as_mut().next = end;

    let left = merge_sort(front, end, less_eq);
    let right = merge_sort(mid, end, less_eq);
    merge(left, right, end, less_eq)
}

/// Merge two ascending chains terminated by `end`. Ties favour `left`.
unsafe fn merge<F>(
    mut left: NonNull<Link>,
    mut right: NonNull<Link>,
    end: NonNull<Link>,
    less_eq: &mut F,
) -> NonNull<Link>
where
    F: FnMut(NonNull<Link>, NonNull<Link>) -> bool,
{
    let mut front = end;
    let mut back: Option<NonNull<Link>> = None;
    while left != end && right != end {
        let node = if less_eq(left, right) {
            let node = left;
            left = left.as_ref().next;
            node
        } else {
            let node = right;
            right = right.as_ref().next;
            node
        };
        match back {
            Some(mut back) => back.as_mut().next = node,
            None => front = node,
        }
        back = Some(node);
    }
    let rest = if left != end { left } else { right };
    match back {
        Some(mut back) => back.as_mut().next = rest,
        None => front = rest,
    }
    front
}

/// Link the `next`-only chain starting at `front` back into a cycle through
/// `ghost`, restoring every `prev` link.
unsafe fn relink(ghost: NonNull<Link>, front: NonNull<Link>) {
    let mut prev = ghost;
    let mut link = front;
    while link != ghost {
        let next = link.as_ref().next;
        connect(prev, link);
        prev = link;
        link = next;
    }
    connect(prev, ghost);
}
