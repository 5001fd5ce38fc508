//! Queue operations over an optional queue handle.
//!
//! A driver that creates and frees queues on demand (for example a test
//! harness executing commands one by one) may run an operation while no queue
//! exists. These functions accept `Option<&mut Queue>` and define the outcome
//! of every operation on a missing queue: fallible operations return
//! [`QueueError::InvalidArgument`], removals return `None`, and the
//! reordering operations do nothing.
//!
//! # Examples
//!
//! ```
//! use cyclic_queue::{handle, QueueError};
//!
//! let mut queue = handle::new();
//! assert!(queue.is_some());
//! handle::insert_tail(queue.as_mut(), "lemur").unwrap();
//! assert_eq!(handle::size(queue.as_ref()), 1);
//!
//! handle::free(queue.take());
//! assert_eq!(handle::size(queue.as_ref()), 0);
//! assert_eq!(
//!     handle::insert_head(queue.as_mut(), "lemur"),
//!     Err(QueueError::InvalidArgument)
//! );
//! ```

use crate::error::{QueueError, Result};
use crate::{Element, Queue};

/// Create an empty queue, or `None` if it cannot be allocated.
pub fn new() -> Option<Queue> {
    Queue::try_new().ok()
}

/// Free the queue and every element in it. Does nothing on `None`.
pub fn free(queue: Option<Queue>) {
    drop(queue)
}

/// Insert a copy of `value` at the head. See [`Queue::insert_head`].
pub fn insert_head(queue: Option<&mut Queue>, value: &str) -> Result<()> {
    queue.ok_or(QueueError::InvalidArgument)?.insert_head(value)
}

/// Insert a copy of `value` at the tail. See [`Queue::insert_tail`].
pub fn insert_tail(queue: Option<&mut Queue>, value: &str) -> Result<()> {
    queue.ok_or(QueueError::InvalidArgument)?.insert_tail(value)
}

/// Remove the head element. See [`Queue::remove_head`].
pub fn remove_head(queue: Option<&mut Queue>, buf: Option<&mut [u8]>) -> Option<Element> {
    queue?.remove_head(buf)
}

/// Remove the tail element. See [`Queue::remove_tail`].
pub fn remove_tail(queue: Option<&mut Queue>, buf: Option<&mut [u8]>) -> Option<Element> {
    queue?.remove_tail(buf)
}

/// Release an element removed from a queue. Does nothing on `None`.
pub fn release(element: Option<Element>) {
    if let Some(element) = element {
        element.release();
    }
}

/// Number of elements, or 0 for a missing queue.
pub fn size(queue: Option<&Queue>) -> usize {
    queue.map_or(0, Queue::size)
}

/// See [`Queue::delete_mid`].
pub fn delete_mid(queue: Option<&mut Queue>) -> Result<()> {
    queue.ok_or(QueueError::InvalidArgument)?.delete_mid()
}

/// See [`Queue::delete_dup`].
pub fn delete_dup(queue: Option<&mut Queue>) -> Result<()> {
    queue.ok_or(QueueError::InvalidArgument)?.delete_dup()
}

/// See [`Queue::swap`].
pub fn swap(queue: Option<&mut Queue>) {
    if let Some(queue) = queue {
        queue.swap();
    }
}

/// See [`Queue::reverse`].
pub fn reverse(queue: Option<&mut Queue>) {
    if let Some(queue) = queue {
        queue.reverse();
    }
}

/// See [`Queue::sort`].
pub fn sort(queue: Option<&mut Queue>) {
    if let Some(queue) = queue {
        queue.sort();
    }
}

/// See [`Queue::shuffle`].
#[cfg(feature = "shuffle")]
pub fn shuffle(queue: Option<&mut Queue>) {
    if let Some(queue) = queue {
        queue.shuffle();
    }
}

/// Shuffle with the random number generator `rng`. See [`Queue::shuffle_with`].
#[cfg(feature = "shuffle")]
pub fn shuffle_with<R>(queue: Option<&mut Queue>, rng: &mut R)
where
    R: rand::Rng + ?Sized,
{
    if let Some(queue) = queue {
        queue.shuffle_with(rng);
    }
}
