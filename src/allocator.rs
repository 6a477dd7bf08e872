//! Pluggable allocation strategies for owned storage.
//!
//! An [`Allocator`] is only ever asked to provide and release the single
//! memory block backing an [`AllocStorage`](crate::storage::AllocStorage);
//! it has no influence on how elements are laid out inside that block.

use core::alloc::Layout;
use core::fmt::{self, Display, Formatter};
use core::ptr::NonNull;

/// The error type returned by [`Allocator::allocate`] when a request cannot
/// be satisfied.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct AllocError;

impl Display for AllocError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("memory allocation failed")
    }
}

#[cfg(feature = "std")]
#[cfg_attr(docs_rs, doc(cfg(feature = "std")))]
impl std::error::Error for AllocError {}

/// An implementation of `Allocator` can allocate and deallocate blocks of
/// memory described by a [`Layout`].
///
/// # Safety
/// Implementors must ensure that a block returned by `allocate` is valid for
/// reads and writes of `layout.size()` bytes, is aligned to `layout.align()`,
/// and stays valid until it is passed to `deallocate`, even if the allocator
/// value itself is moved.
pub unsafe trait Allocator {
    /// Attempts to allocate a block of memory fitting `layout`.
    ///
    /// Callers never request zero-sized blocks.
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError>;

    /// Releases the block of memory referenced by `ptr`.
    ///
    /// # Safety
    /// `ptr` must have been returned by a call to `allocate` on this allocator
    /// with the same `layout`, and must not have been deallocated since.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);
}

unsafe impl<A: Allocator + ?Sized> Allocator for &A {
    #[inline]
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        (**self).allocate(layout)
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        (**self).deallocate(ptr, layout)
    }
}

/// The global memory allocator, i.e. whatever is registered with
/// `#[global_allocator]`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Global;

unsafe impl Allocator for Global {
    #[inline]
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        debug_assert!(layout.size() != 0);
        let ptr = unsafe { alloc::alloc::alloc(layout) };
        NonNull::new(ptr).ok_or(AllocError)
    }

    #[inline]
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        alloc::alloc::dealloc(ptr.as_ptr(), layout)
    }
}
