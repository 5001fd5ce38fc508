//! This crate provides a queue of owned strings, implemented as a cyclic
//! doubly-linked list.
//!
//! The [`Queue`] allows inserting and removing elements at both ends in
//! constant time, and rearranging its elements in place: deleting the middle
//! element, deleting repeated values of a sorted queue, swapping adjacent
//! pairs, reversing, sorting and shuffling. None of the rearranging operations
//! moves or reallocates a string; they only rewire links.
//!
//! Here is a quick example showing how the queue works.
//!
//! ```
//! use cyclic_queue::Queue;
//! use std::iter::FromIterator;
//!
//! let mut queue = Queue::from_iter(["gnu", "ant", "gnu", "bee"]);
//!
//! queue.insert_head("cat").unwrap();
//! assert_eq!(queue.size(), 5);
//!
//! queue.sort(); // becomes [ant, bee, cat, gnu, gnu]
//! queue.delete_dup().unwrap(); // becomes [ant, bee, cat]
//! queue.reverse(); // becomes [cat, bee, ant]
//!
//! let element = queue.remove_head(None).unwrap();
//! assert_eq!(element.value(), "cat");
//! element.release();
//!
//! assert!(queue.iter().eq(["bee", "ant"]));
//! ```
//!
//! # Memory Layout
//!
//! The memory layout of the queue is like the following graph:
//! ```text
//!          ┌─────────────────────────────────────────────────────────────────────┐
//!          ↓                                                     (Ghost) Link    │
//!    ╔═══════════╗           ╔═══════════╗                        ┌───────────┐  │
//!    ║   next    ║ ────────→ ║   next    ║ ────────→ ┄┄ ────────→ │   next    │ ─┘
//!    ╟───────────╢           ╟───────────╢     Node 2, 3, ...     ├───────────┤
//! ┌─ ║   prev    ║ ←──────── ║   prev    ║ ←──────── ┄┄ ←──────── │   prev    │
//! │  ╟───────────╢           ╟───────────╢                        └───────────┘
//! │  ║  String   ║           ║  String   ║                           ↑   ↑
//! │  ╚═══════════╝           ╚═══════════╝                           │   │
//! │      Node 0                  Node 1                              │   │
//! └──────────────────────────────────────────────────────────────────┘   │
//! ╔═══════════╗                                                          │
//! ║   ghost   ║ ─────────────────────────────────────────────────────────┘
//! ╚═══════════╝
//!     Queue
//! ```
//! The `Queue` contains only a pointer `ghost` to the ghost link, which has
//! *NO* payload. The length is not stored, [`Queue::size`] counts the nodes.
//!
//! Each node of the queue is allocated on heap, and contains:
//! - the `next` pointer that points to the next node (or the ghost link if it
//!   is the tail);
//! - the `prev` pointer that points to the previous node (or the ghost link if
//!   it is the head);
//! - the `String` payload.
//!
//! Initially, the `next` and `prev` pointers of the ghost link point to itself.
//!
//! # Remove and Delete
//!
//! *Remove* operations ([`remove_head`], [`remove_tail`]) unlink an element and
//! hand it over to the caller as an [`Element`], which is released when the
//! caller calls [`Element::release`] or drops it. *Delete* operations
//! ([`delete_mid`], [`delete_dup`]) unlink and release elements themselves.
//!
//! # Errors
//!
//! Fallible operations return [`QueueError`]. Allocation failures are reported
//! as [`QueueError::Allocation`] and leave the queue untouched.
//!
//! # Features
//!
//! - `shuffle` (default): [`Queue::shuffle`] and [`Queue::shuffle_with`], with
//!   random numbers from the `rand` crate.
//!
//! [`remove_head`]: crate::Queue::remove_head
//! [`remove_tail`]: crate::Queue::remove_tail
//! [`delete_mid`]: crate::Queue::delete_mid
//! [`delete_dup`]: crate::Queue::delete_dup

#[doc(inline)]
pub use error::QueueError;
#[doc(inline)]
pub use queue::algorithms::drain::Drain;
#[doc(inline)]
pub use queue::element::Element;
#[doc(inline)]
pub use queue::iterator::{IntoIter, Iter};
#[doc(inline)]
pub use queue::Queue;

pub mod error;
pub mod handle;
pub mod queue;
