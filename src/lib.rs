#![no_std]
#![cfg_attr(docs_rs, feature(doc_cfg))]
#![warn(missing_docs)]
#![doc(html_root_url = "https://docs.rs/circular/0.1.0")]

//! Fixed-capacity ring buffers over pluggable storage.
//!
//! The central type is [`Span`], a circular index over a contiguous block of
//! memory supplied by some [`ContiguousStorage`](storage::ContiguousStorage)
//! strategy: a borrowed slice ([`SliceSpan`]), an inline array
//! ([`InlineSpan`]) or, with the `alloc` feature, an owned allocation as used
//! by [`CircularVec`].
//!
//! None of these ever reallocate. Pushing onto a full buffer overwrites the
//! element at the opposite end and hands it back to the caller:
//!
//! ```
//! use core::mem::MaybeUninit;
//! let mut backing_region = [MaybeUninit::<i32>::uninit(); 3];
//! let mut span = circular::SliceSpan::<i32>::from(&mut backing_region[..]);
//! span.push_back(1);
//! span.push_back(2);
//! span.push_back(3);
//! assert!(span.is_full());
//!
//! assert_eq!(span.push_back(4), Some(1));
//! assert_eq!(span, [2, 3, 4]);
//! ```

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

#[cfg(feature = "alloc")]
#[cfg_attr(docs_rs, doc(cfg(feature = "alloc")))]
pub mod allocator;
pub mod error;
pub mod span;
pub mod storage;
#[cfg(feature = "alloc")]
#[cfg_attr(docs_rs, doc(cfg(feature = "alloc")))]
pub mod vec;

#[cfg(test)]
mod test_utils;

pub use crate::error::TryReserveError;
pub use crate::span::{InlineSpan, SliceSpan, Span};

#[cfg(feature = "alloc")]
pub use crate::allocator::{AllocError, Allocator, Global};
#[cfg(feature = "alloc")]
pub use crate::vec::CircularVec;
