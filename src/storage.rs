//! Traits and types providing genericity over storage strategies.

use core::mem::MaybeUninit;

#[cfg(feature = "alloc")]
use crate::allocator::{Allocator, Global};
#[cfg(feature = "alloc")]
use crate::error::TryReserveError;
#[cfg(feature = "alloc")]
use core::{alloc::Layout, ptr::NonNull};

/// An interface for a contiguous memory block for use by data structures.
///
/// # Safety
/// Implementors must ensure the length of the slices returned by
/// [`storage`](ContiguousStorage::storage) and
/// [`storage_mut`](ContiguousStorage::storage_mut) never changes, and that
/// both always refer to the same memory.
pub unsafe trait ContiguousStorage<T>: Sized {
    /// Extracts a slice over the entire memory block.
    fn storage(&self) -> &[MaybeUninit<T>];
    /// Extracts a mutable slice over the entire memory block.
    fn storage_mut(&mut self) -> &mut [MaybeUninit<T>];

    /// Returns the size of the memory block in units of T.
    #[inline]
    fn capacity(&self) -> usize {
        self.storage().len()
    }

    /// Returns a pointer to the element at position `index`.
    ///
    /// The resulting pointer does not need to be in bounds but it is potentially
    /// hazardous to dereference (which requires `unsafe`).
    ///
    /// Even when in bounds, the value it points to may not be initialized.
    #[inline]
    fn get_ptr(&self, index: usize) -> *const T {
        debug_assert!(index <= self.storage().len());
        self.storage().as_ptr().wrapping_add(index) as _
    }

    /// Returns a mutable pointer to the element at position `index`.
    ///
    /// The resulting pointer does not need to be in bounds but it is potentially
    /// hazardous to dereference (which requires `unsafe`).
    ///
    /// Even when in bounds, the value it points to may not be initialized.
    #[inline]
    fn get_mut_ptr(&mut self, index: usize) -> *mut T {
        debug_assert!(index <= self.storage_mut().len());
        self.storage_mut().as_mut_ptr().wrapping_add(index) as _
    }
}

/// Shorthand for `&'a mut [MaybeUninit<T>]` for use with generic data structures.
pub type SliceStorage<'a, T> = &'a mut [MaybeUninit<T>];
unsafe impl<T> ContiguousStorage<T> for SliceStorage<'_, T> {
    #[inline]
    fn storage(&self) -> &[MaybeUninit<T>] {
        &self[..]
    }
    #[inline]
    fn storage_mut(&mut self) -> &mut [MaybeUninit<T>] {
        self
    }
}

/// Shorthand for `[MaybeUninit<T>; C]` for use with generic data structures.
pub type InlineStorage<T, const C: usize> = [MaybeUninit<T>; C];
unsafe impl<T, const C: usize> ContiguousStorage<T> for InlineStorage<T, C> {
    #[inline]
    fn storage(&self) -> &[MaybeUninit<T>] {
        &self[..]
    }
    #[inline]
    fn storage_mut(&mut self) -> &mut [MaybeUninit<T>] {
        &mut self[..]
    }
    #[inline]
    fn capacity(&self) -> usize {
        C
    }
}

#[inline(never)]
#[cold]
#[track_caller]
#[cfg(feature = "alloc")]
pub(crate) fn capacity_overflow() -> ! {
    panic!("capacity overflow")
}

/// A fixed-size block of memory obtained from an [`Allocator`].
///
/// The block is allocated once on construction and released on drop; it
/// never grows or shrinks. Dropping an `AllocStorage` does not drop any
/// values that may have been written into it.
///
/// No memory is requested for zero-sized blocks, i.e. when the capacity is
/// zero or `T` is a zero-sized type.
#[cfg(feature = "alloc")]
#[cfg_attr(docs_rs, doc(cfg(feature = "alloc")))]
pub struct AllocStorage<T, A: Allocator = Global> {
    ptr: NonNull<MaybeUninit<T>>,
    cap: usize,
    alloc: A,
}

#[cfg(feature = "alloc")]
unsafe impl<T: Send, A: Allocator + Send> Send for AllocStorage<T, A> {}
#[cfg(feature = "alloc")]
unsafe impl<T: Sync, A: Allocator + Sync> Sync for AllocStorage<T, A> {}

#[cfg(feature = "alloc")]
impl<T> AllocStorage<T> {
    /// Allocates a block for `capacity` values of type `T` from the global heap.
    ///
    /// # Panics
    /// Panics if the required size exceeds `isize::MAX` bytes, and aborts
    /// if the allocation fails.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_in(capacity, Global)
    }
}

#[cfg(feature = "alloc")]
impl<T, A: Allocator> AllocStorage<T, A> {
    /// Returns the largest capacity a block of `T` can be allocated with.
    #[inline]
    pub fn max_capacity() -> usize {
        match core::mem::size_of::<T>() {
            0 => usize::MAX,
            n => isize::MAX as usize / n,
        }
    }

    /// Creates an empty block without allocating.
    #[inline]
    pub fn new_in(alloc: A) -> Self {
        AllocStorage {
            ptr: NonNull::dangling(),
            cap: 0,
            alloc,
        }
    }

    /// Allocates a block for `capacity` values of type `T` from `alloc`.
    ///
    /// # Panics
    /// Panics if the required size exceeds `isize::MAX` bytes, and aborts
    /// if the allocation fails.
    pub fn with_capacity_in(capacity: usize, alloc: A) -> Self {
        match Self::try_with_capacity_in(capacity, alloc) {
            Ok(storage) => storage,
            Err(TryReserveError::CapacityOverflow) => capacity_overflow(),
            Err(TryReserveError::AllocError { layout }) => alloc::alloc::handle_alloc_error(layout),
        }
    }

    /// Attempts to allocate a block for `capacity` values of type `T` from `alloc`.
    ///
    /// # Examples
    /// ```
    /// use circular::storage::{AllocStorage, ContiguousStorage};
    /// use circular::{Global, TryReserveError};
    ///
    /// let storage = AllocStorage::<u64>::try_with_capacity_in(8, Global).unwrap();
    /// assert_eq!(storage.capacity(), 8);
    ///
    /// let too_large = AllocStorage::<u64>::try_with_capacity_in(usize::MAX, Global);
    /// assert_eq!(too_large.err(), Some(TryReserveError::CapacityOverflow));
    /// ```
    pub fn try_with_capacity_in(capacity: usize, alloc: A) -> Result<Self, TryReserveError> {
        if capacity > Self::max_capacity() {
            return Err(TryReserveError::CapacityOverflow);
        }

        let layout = Layout::array::<T>(capacity).map_err(|_| TryReserveError::CapacityOverflow)?;
        if layout.size() == 0 {
            return Ok(AllocStorage {
                ptr: NonNull::dangling(),
                cap: capacity,
                alloc,
            });
        }

        let ptr = alloc
            .allocate(layout)
            .map_err(|_| TryReserveError::AllocError { layout })?;

        Ok(AllocStorage {
            ptr: ptr.cast(),
            cap: capacity,
            alloc,
        })
    }

    /// Returns a reference to the allocator backing this block.
    #[inline]
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    fn layout(&self) -> Layout {
        // validated in `try_with_capacity_in`
        unsafe {
            Layout::from_size_align_unchecked(
                core::mem::size_of::<T>() * self.cap,
                core::mem::align_of::<T>(),
            )
        }
    }
}

#[cfg(feature = "alloc")]
unsafe impl<T, A: Allocator> ContiguousStorage<T> for AllocStorage<T, A> {
    #[inline]
    fn storage(&self) -> &[MaybeUninit<T>] {
        unsafe { core::slice::from_raw_parts(self.ptr.as_ptr(), self.cap) }
    }
    #[inline]
    fn storage_mut(&mut self) -> &mut [MaybeUninit<T>] {
        unsafe { core::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.cap) }
    }
    #[inline]
    fn capacity(&self) -> usize {
        self.cap
    }
}

#[cfg(feature = "alloc")]
impl<T, A: Allocator> Drop for AllocStorage<T, A> {
    fn drop(&mut self) {
        let layout = self.layout();
        if layout.size() != 0 {
            unsafe { self.alloc.deallocate(self.ptr.cast(), layout) };
        }
    }
}

#[cfg(feature = "alloc")]
impl<T, A: Allocator> core::fmt::Debug for AllocStorage<T, A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AllocStorage")
            .field("ptr", &self.ptr)
            .field("cap", &self.cap)
            .finish()
    }
}
