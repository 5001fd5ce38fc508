use std::alloc::{alloc, dealloc, handle_alloc_error, Layout};
use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;
use std::ptr::NonNull;

use crate::error::{QueueError, Result};
use crate::queue::algorithms::drain::Drain;
use crate::{Element, Iter};

pub mod element;
pub mod iterator;

pub(crate) mod algorithms;

/// The `Queue` is a queue of owned strings, implemented as a cyclic
/// doubly-linked list.
///
/// It allows inserting and removing elements at both ends in constant time.
/// The queue itself is nothing but a *ghost* link without payload, which
/// anchors the cycle: `ghost.next` is the head and `ghost.prev` is the tail.
///
/// The length is not cached; [`Queue::size`] walks the whole list.
///
/// # Naming Conventions
///
/// - *remove*: unlink an element and hand it over to the caller as an
///   [`Element`], without freeing it;
/// - *delete*: unlink an element and release it.
pub struct Queue {
    ghost: NonNull<Link>,
    _marker: PhantomData<Box<Node>>,
}

/// The `prev`/`next` pair embedded in every node, and the ghost node itself.
#[repr(C)]
pub(crate) struct Link {
    pub(crate) next: NonNull<Link>,
    pub(crate) prev: NonNull<Link>,
}

/// A list node. The link is the first field, so a pointer to the link of a
/// non-ghost node is also a pointer to the node.
#[repr(C)]
pub(crate) struct Node {
    // only reached through casts of `NonNull<Link>`
    #[allow(dead_code)]
    pub(crate) link: Link,
    pub(crate) value: String,
}

// private methods
impl Queue {
    pub(crate) fn ghost(&self) -> NonNull<Link> {
        self.ghost
    }
    pub(crate) fn head(&self) -> NonNull<Link> {
        // SAFETY: `ghost.next` is always valid (either `ghost` itself, or the first
        // element in the queue).
        unsafe { self.ghost.as_ref().next }
    }
    pub(crate) fn tail(&self) -> NonNull<Link> {
        // SAFETY: `ghost.prev` is always valid (either `ghost` itself, or the last
        // element in the queue).
        unsafe { self.ghost.as_ref().prev }
    }

    /// Attach a detached node `link` to the queue, between `prev` and `next`.
    ///
    /// It is unsafe because it does not check whether `prev` and `next` belong
    /// to the queue, or whether they are adjacent (only in
    /// `#[cfg(debug_assertions)]`).
    pub(crate) unsafe fn attach(
        &mut self,
        prev: NonNull<Link>,
        next: NonNull<Link>,
        link: NonNull<Link>,
    ) {
        #[cfg(debug_assertions)]
        assert_adjacent(prev, next);
        connect(prev, link);
        connect(link, next);
    }

    /// Detach a single node `link` from the queue, and return it as an
    /// [`Element`] whose links point to itself.
    ///
    /// It is unsafe because it does not check whether `link` is a non-ghost
    /// node of the queue.
    pub(crate) unsafe fn detach(&mut self, mut link: NonNull<Link>) -> Element {
        debug_assert_ne!(link, self.ghost, "Cannot detach the ghost node");
        connect(link.as_ref().prev, link.as_ref().next);
        let node = link.as_mut();
        node.next = link;
        node.prev = link;
        Element::from_detached(link)
    }

    /// Detach and release a single node `link`.
    pub(crate) unsafe fn delete(&mut self, link: NonNull<Link>) {
        self.detach(link).release();
    }

    /// Like [`Queue::insert_tail`], but allocation failure aborts like the
    /// standard collections do.
    pub(crate) fn push_tail(&mut self, value: &str) {
        let link = Node::alloc_detached(value).unwrap_or_else(|layout| handle_alloc_error(layout));
        // SAFETY: the tail node and the ghost node are adjacent nodes of the queue.
        unsafe { self.attach(self.tail(), self.ghost, link) };
    }
}

impl Queue {
    /// Create an empty `Queue`, or return [`QueueError::Allocation`] if the
    /// ghost node cannot be allocated.
    ///
    /// # Examples
    /// ```
    /// use cyclic_queue::Queue;
    ///
    /// let queue = Queue::try_new().unwrap();
    /// assert!(queue.is_empty());
    /// ```
    pub fn try_new() -> Result<Self> {
        let ghost = new_ghost()?;
        let _marker = PhantomData;
        Ok(Self { ghost, _marker })
    }

    /// Create an empty `Queue`.
    ///
    /// # Examples
    /// ```
    /// use cyclic_queue::Queue;
    /// let queue = Queue::new();
    /// assert_eq!(queue.size(), 0);
    /// ```
    #[inline]
    pub fn new() -> Self {
        Self::try_new().unwrap_or_else(|_| handle_alloc_error(Layout::new::<Link>()))
    }

    /// Returns `true` if the `Queue` is empty.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head() == self.ghost
    }

    /// Returns `true` if the `Queue` holds exactly one element.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    #[inline]
    pub fn is_singular(&self) -> bool {
        !self.is_empty() && self.head() == self.tail()
    }

    /// Returns the number of elements in the `Queue`.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time, the length is
    /// recounted on every call.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    ///
    /// let mut queue = Queue::new();
    /// queue.insert_head("b").unwrap();
    /// queue.insert_tail("c").unwrap();
    /// assert_eq!(queue.size(), 2);
    /// ```
    pub fn size(&self) -> usize {
        self.iter().count()
    }

    /// Provides the value at the head, or `None` if the queue is empty.
    #[inline]
    pub fn front(&self) -> Option<&str> {
        self.iter().next()
    }

    /// Provides the value at the tail, or `None` if the queue is empty.
    #[inline]
    pub fn back(&self) -> Option<&str> {
        self.iter().next_back()
    }

    /// Inserts a copy of `value` at the head of the queue.
    ///
    /// If the allocation fails, [`QueueError::Allocation`] is returned and the
    /// queue is left unmodified.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    ///
    /// let mut queue = Queue::new();
    /// queue.insert_head("world").unwrap();
    /// queue.insert_head("hello").unwrap();
    /// assert_eq!(queue.front(), Some("hello"));
    /// ```
    pub fn insert_head(&mut self, value: &str) -> Result<()> {
        let link = Node::try_new_detached(value)?;
        // SAFETY: the ghost node and the head node are adjacent nodes of the queue.
        unsafe { self.attach(self.ghost, self.head(), link) };
        Ok(())
    }

    /// Inserts a copy of `value` at the tail of the queue.
    ///
    /// If the allocation fails, [`QueueError::Allocation`] is returned and the
    /// queue is left unmodified.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    ///
    /// let mut queue = Queue::new();
    /// queue.insert_tail("hello").unwrap();
    /// queue.insert_tail("world").unwrap();
    /// assert_eq!(queue.back(), Some("world"));
    /// ```
    pub fn insert_tail(&mut self, value: &str) -> Result<()> {
        let link = Node::try_new_detached(value)?;
        // SAFETY: the tail node and the ghost node are adjacent nodes of the queue.
        unsafe { self.attach(self.tail(), self.ghost, link) };
        Ok(())
    }

    /// Removes the head element and returns it, or `None` if the queue is
    /// empty.
    ///
    /// The element is not freed: it is handed over to the caller. If `buf` is
    /// given, the value is also copied into it (see [`Element::copy_to`]).
    /// The buffer is untouched when nothing is removed.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    /// use std::iter::FromIterator;
    ///
    /// let mut queue = Queue::from_iter(["dolphin", "bear"]);
    /// let mut buf = [0xff_u8; 4];
    ///
    /// let element = queue.remove_head(Some(&mut buf)).unwrap();
    /// assert_eq!(element.value(), "dolphin");
    /// assert_eq!(&buf, b"dol\0");
    /// element.release();
    ///
    /// assert_eq!(queue.remove_head(None).unwrap(), "bear");
    /// assert!(queue.remove_head(Some(&mut buf)).is_none());
    /// ```
    pub fn remove_head(&mut self, buf: Option<&mut [u8]>) -> Option<Element> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: the queue is not empty, so the head node is not the ghost node.
        let element = unsafe { self.detach(self.head()) };
        if let Some(buf) = buf {
            element.copy_to(buf);
        }
        Some(element)
    }

    /// Removes the tail element and returns it, or `None` if the queue is
    /// empty.
    ///
    /// Other behaviors are the same as [`Queue::remove_head`].
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    /// use std::iter::FromIterator;
    ///
    /// let mut queue = Queue::from_iter(["dolphin", "bear"]);
    /// assert_eq!(queue.remove_tail(None).unwrap(), "bear");
    /// assert_eq!(queue.remove_tail(None).unwrap(), "dolphin");
    /// assert!(queue.remove_tail(None).is_none());
    /// ```
    pub fn remove_tail(&mut self, buf: Option<&mut [u8]>) -> Option<Element> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: the queue is not empty, so the tail node is not the ghost node.
        let element = unsafe { self.detach(self.tail()) };
        if let Some(buf) = buf {
            element.copy_to(buf);
        }
        Some(element)
    }

    /// Releases all elements of the `Queue`.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time.
    #[inline]
    pub fn clear(&mut self) {
        self.drain().for_each(Element::release);
    }

    /// Removes all elements from the queue, head first, as an iterator of
    /// owned [`Element`]s. Elements not consumed are released when the
    /// iterator is dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    /// use std::iter::FromIterator;
    ///
    /// let mut queue = Queue::from_iter(["a", "b", "c"]);
    /// let mut drain = queue.drain();
    /// assert_eq!(drain.next().unwrap(), "a");
    /// drop(drain);
    /// assert!(queue.is_empty());
    /// ```
    pub fn drain(&mut self) -> Drain<'_> {
        Drain::new(self)
    }

    /// Provides a forward iterator over the values.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    /// use std::iter::FromIterator;
    ///
    /// let queue = Queue::from_iter(["a", "b"]);
    /// let mut iter = queue.iter();
    /// assert_eq!(iter.next(), Some("a"));
    /// assert_eq!(iter.next(), Some("b"));
    /// assert_eq!(iter.next(), None);
    /// ```
    #[inline]
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self)
    }

    /// Moves all elements from `other` to the tail of the queue.
    ///
    /// This reuses all the nodes from `other` and moves them into `self`. After
    /// this operation, `other` becomes empty.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time and *O*(1) memory.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Queue;
    /// use std::iter::FromIterator;
    ///
    /// let mut queue1 = Queue::from_iter(["a"]);
    /// let mut queue2 = Queue::from_iter(["b", "c"]);
    ///
    /// queue1.append(&mut queue2);
    ///
    /// assert!(queue1.iter().eq(["a", "b", "c"]));
    /// assert!(queue2.is_empty());
    /// ```
    pub fn append(&mut self, other: &mut Self) {
        if other.is_empty() {
            return;
        }
        let (front, back) = (other.head(), other.tail());
        // SAFETY: `front..=back` is the whole range of `other`, which is detached
        // by pointing `other`'s ghost to itself, and `self.tail()` and
        // `self.ghost` are adjacent.
        unsafe {
            connect(other.ghost, other.ghost);
            connect(self.tail(), front);
            connect(back, self.ghost);
        }
    }
}

impl Debug for Queue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl Default for Queue {
    fn default() -> Self {
        Self::new()
    }
}

impl Node {
    /// Allocate a detached node holding a copy of `value`, with its links
    /// pointing to itself.
    ///
    /// Either both the node and its payload are allocated, or nothing is.
    pub(crate) fn try_new_detached(value: &str) -> Result<NonNull<Link>> {
        Self::alloc_detached(value).map_err(|_| QueueError::Allocation)
    }

    /// Like [`Node::try_new_detached`], but report the layout of the
    /// allocation that failed.
    fn alloc_detached(value: &str) -> std::result::Result<NonNull<Link>, Layout> {
        let layout = Layout::new::<Node>();
        // SAFETY: `Node` is not zero-sized.
        let node = NonNull::new(unsafe { alloc(layout) }.cast::<Node>()).ok_or_else(|| {
            tracing::debug!(len = value.len(), "node allocation failed");
            layout
        })?;
        let mut payload = String::new();
        if payload.try_reserve_exact(value.len()).is_err() {
            tracing::debug!(len = value.len(), "payload allocation failed");
            // SAFETY: `node` was allocated above with the same layout and is
            // still uninitialized.
            unsafe { dealloc(node.as_ptr().cast(), layout) };
            return Err(Layout::for_value(value.as_bytes()));
        }
        payload.push_str(value);
        let link = node.cast::<Link>();
        // SAFETY: `node` is valid for writes and properly aligned.
        unsafe {
            node.as_ptr().write(Node {
                link: Link {
                    next: link,
                    prev: link,
                },
                value: payload,
            });
        }
        Ok(link)
    }

    /// Free a detached node and its payload.
    ///
    /// It is unsafe because `link` must be a non-ghost node which is not
    /// linked to any queue.
    pub(crate) unsafe fn release(link: NonNull<Link>) {
        // Allocated with `Layout::new::<Node>()`, the same as a `Box<Node>`.
        drop(Box::from_raw(link.cast::<Node>().as_ptr()));
    }
}

/// Link `prev` and `next` to each other.
pub(crate) unsafe fn connect(mut prev: NonNull<Link>, mut next: NonNull<Link>) {
    prev.as_mut().next = next;
    next.as_mut().prev = prev;
}

/// Read the value of a non-ghost node.
pub(crate) unsafe fn value_of<'a>(link: NonNull<Link>) -> &'a str {
    &(*link.cast::<Node>().as_ptr()).value
}

fn new_ghost() -> Result<NonNull<Link>> {
    let layout = Layout::new::<Link>();
    // SAFETY: `Link` is not zero-sized.
    let ghost = NonNull::new(unsafe { alloc(layout) }.cast::<Link>()).ok_or_else(|| {
        tracing::debug!("ghost allocation failed");
        QueueError::Allocation
    })?;
    // SAFETY: `ghost` is valid for writes and properly aligned. It points to
    // itself in both directions as an empty cycle.
    unsafe {
        ghost.as_ptr().write(Link {
            next: ghost,
            prev: ghost,
        });
    }
    Ok(ghost)
}

#[cfg(any(debug_assertions, test))]
pub(crate) fn assert_adjacent(prev: NonNull<Link>, next: NonNull<Link>) {
    unsafe {
        assert_eq!(prev.as_ref().next, next);
        assert_eq!(next.as_ref().prev, prev);
    }
}

impl Drop for Queue {
    fn drop(&mut self) {
        let mut link = self.head();
        while link != self.ghost {
            // SAFETY: every non-ghost node reachable from the ghost is owned by
            // the queue. `next` is read before the node is freed.
            unsafe {
                let next = link.as_ref().next;
                Node::release(link);
                link = next;
            }
        }
        // SAFETY: the ghost was allocated with `Layout::new::<Link>()`, the same
        // as a `Box<Link>`.
        unsafe { drop(Box::from_raw(self.ghost.as_ptr())) };
    }
}

unsafe impl Send for Queue {}

unsafe impl Sync for Queue {}

#[cfg(test)]
mod tests {
    use crate::error::QueueError;
    use crate::queue::{assert_adjacent, Node, Queue};
    use std::alloc::{GlobalAlloc, Layout, System};
    use std::cell::Cell;
    use std::iter::FromIterator;
    use std::ptr;

    struct FaultInjecting;

    thread_local! {
        static FAIL_AFTER: Cell<Option<usize>> = const { Cell::new(None) };
    }

    fn should_fail() -> bool {
        FAIL_AFTER
            .try_with(|fail_after| match fail_after.get() {
                Some(0) => {
                    fail_after.set(None);
                    true
                }
                Some(n) => {
                    fail_after.set(Some(n - 1));
                    false
                }
                None => false,
            })
            .unwrap_or(false)
    }

    unsafe impl GlobalAlloc for FaultInjecting {
        unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
            if should_fail() {
                return ptr::null_mut();
            }
            System.alloc(layout)
        }

        unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
            System.dealloc(ptr, layout)
        }
    }

    #[global_allocator]
    static ALLOCATOR: FaultInjecting = FaultInjecting;

    /// Run `f` with the `n`-th allocation (0-based) on this thread failing.
    fn failing<T>(n: usize, f: impl FnOnce() -> T) -> T {
        FAIL_AFTER.with(|fail_after| fail_after.set(Some(n)));
        let result = f();
        FAIL_AFTER.with(|fail_after| fail_after.set(None));
        result
    }

    pub(crate) fn assert_well_formed(queue: &Queue) {
        let mut link = queue.ghost();
        loop {
            let next = unsafe { link.as_ref().next };
            assert_adjacent(link, next);
            link = next;
            if link == queue.ghost() {
                break;
            }
        }
    }

    #[test]
    fn queue_create() {
        let mut queue = Queue::try_new().unwrap();
        assert!(queue.is_empty());
        assert!(!queue.is_singular());
        assert_eq!(queue.size(), 0);
        queue.insert_tail("1").unwrap();
        assert!(!queue.is_empty());
        assert!(queue.is_singular());
        assert_eq!(queue.remove_tail(None).unwrap(), "1");
        assert!(queue.is_empty());
        assert_well_formed(&queue);
    }

    #[test]
    fn queue_insert_and_remove() {
        let mut queue = Queue::new();
        assert_eq!(queue.front(), None);
        assert_eq!(queue.back(), None);
        assert!(queue.remove_head(None).is_none());
        assert!(queue.remove_tail(None).is_none());

        queue.insert_tail("1").unwrap();
        assert_eq!(queue.back(), Some("1"));
        assert_eq!(queue.remove_head(None).unwrap(), "1");
        assert!(queue.remove_tail(None).is_none());
        assert!(queue.is_empty());

        queue.insert_head("1").unwrap();
        queue.insert_head("2").unwrap();
        queue.insert_tail("3").unwrap();
        assert_well_formed(&queue);
        assert_eq!(queue.size(), 3);
        assert_eq!(queue.front(), Some("2"));
        assert_eq!(queue.back(), Some("3"));
        assert_eq!(queue.remove_head(None).unwrap(), "2");
        assert_eq!(queue.remove_tail(None).unwrap(), "3");

        assert_eq!(queue.front(), Some("1"));
        assert_eq!(queue.remove_head(None).unwrap(), "1");
        assert_eq!(queue.front(), None);
        assert_eq!(queue.back(), None);
        assert!(queue.is_empty());
        assert_well_formed(&queue);
    }

    #[test]
    fn queue_insert_verbatim() {
        let mut queue = Queue::new();
        queue.insert_head("").unwrap();
        queue.insert_tail("with space\tand tab").unwrap();
        queue.insert_tail("ünïcödé").unwrap();
        assert!(queue.iter().eq(["", "with space\tand tab", "ünïcödé"]));
    }

    #[test]
    fn queue_removed_element_is_detached() {
        let mut queue = Queue::from_iter(["a", "b", "c"]);
        let element = queue.remove_head(None).unwrap();
        let link = element.link();
        unsafe {
            assert_eq!(link.as_ref().next, link);
            assert_eq!(link.as_ref().prev, link);
        }
        assert_well_formed(&queue);
        assert!(queue.iter().eq(["b", "c"]));
    }

    #[test]
    fn queue_remove_into_buffer() {
        let mut queue = Queue::from_iter(["gerbil", "ox", "yak"]);

        let mut buf = [0xff_u8; 8];
        let element = queue.remove_head(Some(&mut buf)).unwrap();
        assert_eq!(element, "gerbil");
        assert_eq!(&buf, b"gerbil\0\0");

        let mut buf = [0xff_u8; 2];
        assert_eq!(queue.remove_tail(Some(&mut buf)).unwrap(), "yak");
        assert_eq!(&buf, b"y\0");

        let mut buf = [0xff_u8; 1];
        assert_eq!(queue.remove_tail(Some(&mut buf)).unwrap(), "ox");
        assert_eq!(&buf, b"\0");

        let mut buf = [0xff_u8; 4];
        assert!(queue.remove_head(Some(&mut buf)).is_none());
        assert_eq!(buf, [0xff; 4]);

        let mut empty: [u8; 0] = [];
        queue.insert_head("zebra").unwrap();
        assert_eq!(queue.remove_head(Some(&mut empty)).unwrap(), "zebra");
    }

    #[test]
    fn queue_size() {
        let mut queue = Queue::new();
        for (i, value) in ["a", "b", "c", "d"].iter().enumerate() {
            queue.insert_tail(value).unwrap();
            assert_eq!(queue.size(), i + 1);
        }
        queue.remove_head(None).unwrap().release();
        assert_eq!(queue.size(), 3);
        queue.clear();
        assert_eq!(queue.size(), 0);
        assert_well_formed(&queue);
    }

    #[test]
    fn queue_append() {
        fn test_append(list: &[&str], other: &[&str]) {
            let mut queue = Queue::from_iter(list);
            let mut other_queue = Queue::from_iter(other);
            queue.append(&mut other_queue);
            assert!(other_queue.is_empty());
            assert_well_formed(&queue);
            assert_well_formed(&other_queue);
            assert!(queue.iter().eq(list.iter().chain(other).copied()));
        }
        test_append(&["a", "b"], &["c", "d"]);
        test_append(&["a"], &[]);
        test_append(&[], &["a"]);
        test_append(&[], &[]);
    }

    #[test]
    fn node_allocation_failure_layout() {
        let value = "payload";
        assert_eq!(
            failing(0, || Node::alloc_detached(value)).err(),
            Some(Layout::new::<Node>())
        );
        let payload = Layout::array::<u8>(value.len()).unwrap();
        assert_eq!(
            failing(1, || Node::alloc_detached(value)).err(),
            Some(payload)
        );
        assert_eq!(
            failing(1, || Node::try_new_detached(value)).err(),
            Some(QueueError::Allocation)
        );

        let link = Node::alloc_detached(value).unwrap();
        unsafe { Node::release(link) };
    }

    #[test]
    fn queue_error_kind() {
        let mut queue = Queue::new();
        assert_eq!(queue.delete_mid(), Err(QueueError::EmptyCollection));
    }
}
