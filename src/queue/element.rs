use crate::error::Result;
use crate::queue::{value_of, Link, Node};
use std::fmt;
use std::marker::PhantomData;
use std::mem::ManuallyDrop;
use std::ptr::NonNull;

/// An element detached from a [`Queue`](crate::Queue).
///
/// Elements are handed over to the caller by the *remove* operations
/// ([`Queue::remove_head`](crate::Queue::remove_head),
/// [`Queue::remove_tail`](crate::Queue::remove_tail), ...). The node and its
/// payload stay allocated until the element is [released](Element::release)
/// or dropped.
///
/// The links of a detached node point to the node itself, so a released
/// element never touches its former siblings.
///
/// # Examples
///
/// ```
/// use cyclic_queue::{Element, Queue};
///
/// let mut queue = Queue::new();
/// queue.insert_tail("lion").unwrap();
///
/// let element: Element = queue.remove_head(None).unwrap();
/// assert_eq!(element.value(), "lion");
/// assert!(queue.is_empty());
///
/// element.release();
/// ```
pub struct Element {
    link: NonNull<Link>,
    _marker: PhantomData<Box<Node>>,
}

impl Element {
    /// Allocate a detached element holding a copy of `value`.
    ///
    /// If the payload cannot be allocated, the node allocation is released as
    /// well and [`QueueError::Allocation`](crate::QueueError::Allocation) is
    /// returned.
    pub fn new(value: &str) -> Result<Self> {
        let link = Node::try_new_detached(value)?;
        // SAFETY: the node is freshly allocated and detached.
        Ok(unsafe { Self::from_detached(link) })
    }

    /// It is unsafe because `link` must be a non-ghost node owned by nobody,
    /// whose links point to itself.
    pub(crate) unsafe fn from_detached(link: NonNull<Link>) -> Self {
        let _marker = PhantomData;
        Self { link, _marker }
    }

    pub(crate) fn link(&self) -> NonNull<Link> {
        self.link
    }

    /// Returns the string payload.
    pub fn value(&self) -> &str {
        // SAFETY: `link` is a valid non-ghost node owned by this element.
        unsafe { value_of(self.link) }
    }

    /// Copy the payload into `buf` as a NUL-terminated byte string, and return
    /// the number of payload bytes copied.
    ///
    /// At most `buf.len() - 1` bytes are copied and the rest of the buffer is
    /// filled with NUL bytes. An empty buffer is left untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use cyclic_queue::Element;
    ///
    /// let element = Element::new("meerkat").unwrap();
    ///
    /// let mut buf = [0xff_u8; 5];
    /// assert_eq!(element.copy_to(&mut buf), 4);
    /// assert_eq!(&buf, b"meer\0");
    ///
    /// let mut buf = [0xff_u8; 10];
    /// assert_eq!(element.copy_to(&mut buf), 7);
    /// assert_eq!(&buf, b"meerkat\0\0\0");
    ///
    /// assert_eq!(element.copy_to(&mut []), 0);
    /// ```
    pub fn copy_to(&self, buf: &mut [u8]) -> usize {
        let capacity = match buf.len().checked_sub(1) {
            Some(capacity) => capacity,
            None => return 0,
        };
        let bytes = self.value().as_bytes();
        let len = bytes.len().min(capacity);
        let (head, rest) = buf.split_at_mut(len);
        head.copy_from_slice(&bytes[..len]);
        rest.fill(0);
        len
    }

    /// Take the payload out of the element, freeing the node.
    pub fn into_string(self) -> String {
        let this = ManuallyDrop::new(self);
        // SAFETY: the node is owned by this element, and `this` is never
        // dropped, so the node is freed exactly once.
        let node = unsafe { Box::from_raw(this.link.cast::<Node>().as_ptr()) };
        node.value
    }

    /// Release the element: free the string payload, then the node.
    ///
    /// This is the same as dropping the element.
    #[inline]
    pub fn release(self) {
        drop(self)
    }
}

impl Drop for Element {
    fn drop(&mut self) {
        // SAFETY: the node is detached and owned by this element.
        unsafe { Node::release(self.link) }
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Element").field(&self.value()).finish()
    }
}

impl AsRef<str> for Element {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.value() == other.value()
    }
}

impl Eq for Element {}

impl PartialEq<str> for Element {
    fn eq(&self, other: &str) -> bool {
        self.value() == other
    }
}

impl PartialEq<&str> for Element {
    fn eq(&self, other: &&str) -> bool {
        self.value() == *other
    }
}

unsafe impl Send for Element {}

unsafe impl Sync for Element {}
