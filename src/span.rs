//! A fixed-capacity ring buffer over a contiguous block of storage.
//!
//! [`Span`] keeps track of which slots of its storage block hold live
//! elements, using only a head position and a length. Logical index `i`
//! lives in physical slot `(head + i) % capacity`, so inserting and removing
//! at either end is O(1), as is indexing.
//!
//! A span never reallocates. When an element is pushed onto a full span,
//! the element at the *opposite* end is overwritten and handed back to the
//! caller, so pushing never fails:
//!
//! ```text
//! [1, 2, 3] <-(+)- 4 => [2, 3, 4] -> Some(1)
//! 5 -(+)-> [2, 3, 4] => [5, 2, 3] -> Some(4)
//! ```
//!
//! Use [`try_push_back`](Span::try_push_back) and
//! [`try_push_front`](Span::try_push_front) to reject values instead.

use core::cmp::Ordering;
use core::fmt::{self, Debug, Formatter};
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::mem::MaybeUninit;
use core::ops::{Index, IndexMut};

use crate::storage::{ContiguousStorage, InlineStorage, SliceStorage};

/// A fixed-capacity ring buffer, generic over its storage strategy.
///
/// The "default" usage of this type as a queue is to use
/// [`push_back`](Span::push_back) to add to the queue, and
/// [`move_front`](Span::move_front) to remove from it. Iteration goes from
/// front to back.
///
/// The span owns the elements it holds, but not necessarily the memory they
/// live in: a [`SliceSpan`] borrows its storage, and cannot outlive it.
///
/// # Examples
/// ```
/// let mut span = circular::InlineSpan::<i32, 3>::new();
/// span.push_back(1);
/// span.push_back(2);
/// span.push_back(3);
/// assert!(span.is_full());
///
/// span.push_back(4);
/// assert_eq!(span, [2, 3, 4]);
/// assert_eq!(span.front(), &2);
///
/// span.push_front(5);
/// assert_eq!(span, [5, 2, 3]);
/// assert_eq!(span.back(), &3);
///
/// span.pop_back();
/// assert_eq!(span, [5, 2]);
/// assert_eq!(span.len(), 2);
/// ```
pub struct Span<T, S: ContiguousStorage<T>> {
    head: usize,
    len: usize,
    buf: S,
    elem: PhantomData<T>,
}

/// A span using any mutable slice for storage.
///
/// # Examples
/// ```
/// use core::mem::MaybeUninit;
/// let mut backing_array = [MaybeUninit::<char>::uninit(); 32];
/// let (slice1, slice2) = (&mut backing_array[..]).split_at_mut(16);
/// let mut span1 = circular::SliceSpan::<_>::from(slice1);
/// let mut span2 = circular::SliceSpan::<_>::from(slice2);
/// assert_eq!(span1.capacity(), 16);
/// assert_eq!(span2.capacity(), 16);
/// ```
pub type SliceSpan<'a, T> = Span<T, SliceStorage<'a, T>>;

/// A span using an inline array for storage.
///
/// # Examples
/// ```
/// let mut span = circular::InlineSpan::<char, 4>::new();
/// span.push_front('b');
/// span.push_front('a');
/// span.push_back('c');
/// span.push_back('d');
/// assert_eq!(span, ['a', 'b', 'c', 'd']);
/// assert_eq!(span.try_push_back('e'), Err('e'));
/// ```
pub type InlineSpan<T, const C: usize> = Span<T, InlineStorage<T, C>>;

#[inline(always)]
fn wrap_add(index: usize, addend: usize, capacity: usize) -> usize {
    debug_assert!(addend <= capacity);
    if index >= capacity - addend {
        index - (capacity - addend)
    } else {
        index + addend
    }
}

#[inline(always)]
fn wrap_sub(index: usize, subtrahend: usize, capacity: usize) -> usize {
    debug_assert!(subtrahend <= capacity);
    if index >= subtrahend {
        index - subtrahend
    } else {
        index + (capacity - subtrahend)
    }
}

#[inline(never)]
#[cold]
#[track_caller]
fn empty_span_access(op: &str) -> ! {
    panic!("called `{}` on an empty span", op)
}

#[inline(never)]
#[cold]
#[track_caller]
fn index_out_of_bounds(index: usize, len: usize) -> ! {
    panic!(
        "index out of bounds: the len is {} but the index is {}",
        len, index
    )
}

impl<T, S: ContiguousStorage<T>> From<S> for Span<T, S> {
    /// Converts a contiguous block of memory into an empty span.
    fn from(buf: S) -> Self {
        Span {
            head: 0,
            len: 0,
            buf,
            elem: PhantomData,
        }
    }
}

impl<T, S: ContiguousStorage<T>> Span<T, S> {
    /// Decomposes a `Span<T, S>` into its raw parts.
    ///
    /// Returns the raw storage type, the head offset and the length of the
    /// span in elements. These are the same arguments in the same order as
    /// the arguments to [`from_raw_parts`](Span::from_raw_parts).
    ///
    /// # Examples
    /// ```
    /// let mut backing_region = [core::mem::MaybeUninit::<i32>::uninit(); 3];
    /// let mut span = circular::SliceSpan::<i32>::from(&mut backing_region[..]);
    /// span.push_front(1);
    /// span.push_back(2);
    /// let (buf, head, len) = span.into_raw_parts();
    /// assert_eq!((head, len), (2, 2));
    /// unsafe {
    ///     assert_eq!(buf[2].assume_init(), 1);
    ///     assert_eq!(buf[0].assume_init(), 2);
    ///     // buf[1] is uninitialized
    /// }
    /// ```
    pub fn into_raw_parts(self) -> (S, usize, usize) {
        let this = core::mem::ManuallyDrop::new(self);
        let buf = unsafe { core::ptr::read(&this.buf) };
        (buf, this.head, this.len)
    }

    /// Creates a `Span<T, S>` directly from its raw parts.
    ///
    /// # Safety
    /// Callers must ensure that the first `len` slots after `head` (modulo
    /// `buf.capacity()`) are initialized, that `len` is less than or equal
    /// to `buf.capacity()`, and that `head` is less than `buf.capacity()`
    /// unless the capacity is zero.
    ///
    /// # Examples
    /// ```
    /// let mut backing_region = [core::mem::MaybeUninit::<i32>::uninit(); 3];
    /// let mut span = circular::SliceSpan::<i32>::from(&mut backing_region[..]);
    /// span.push_front(1);
    /// span.push_back(2);
    ///
    /// let (buf, head, len) = span.into_raw_parts();
    /// let span = unsafe { circular::SliceSpan::from_raw_parts(buf, head, len) };
    /// assert_eq!(span, [1, 2]);
    /// ```
    pub unsafe fn from_raw_parts(buf: S, head: usize, len: usize) -> Self {
        debug_assert!(len <= buf.capacity());
        debug_assert!(head < buf.capacity() || buf.capacity() == 0);
        Span {
            head,
            len,
            buf,
            elem: PhantomData,
        }
    }

    #[cfg(feature = "alloc")]
    #[inline]
    pub(crate) fn storage(&self) -> &S {
        &self.buf
    }

    /// Returns the number of elements the span can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Returns the number of elements currently in the span.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` exactly when the span contains zero elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` exactly when the span contains the maximum number of elements.
    ///
    /// A span with zero capacity is always both empty and full.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == self.buf.capacity()
    }

    /// Returns `true` if the span contains an element equal to the given value.
    ///
    /// # Examples
    /// ```
    /// let mut span = circular::InlineSpan::<i32, 3>::new();
    /// span.push_back(0);
    /// span.push_back(1);
    /// assert_eq!(span.contains(&1), true);
    /// assert_eq!(span.contains(&10), false);
    /// ```
    pub fn contains(&self, x: &T) -> bool
    where
        T: PartialEq,
    {
        let (a, b) = self.as_slices();
        a.contains(x) || b.contains(x)
    }

    #[inline(always)]
    fn physical_index(&self, index: usize) -> Option<usize> {
        if index >= self.len {
            return None;
        }

        Some(wrap_add(self.head, index, self.capacity()))
    }

    /// Returns a reference to the element at the given index, or [`None`] if
    /// the index is out of bounds.
    ///
    /// The element at index 0 is the front of the span.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        let index = self.physical_index(index)?;
        unsafe { Some(&*self.buf.get_ptr(index)) }
    }

    /// Returns a mutable reference to the element at the given index, or
    /// [`None`] if the index is out of bounds.
    ///
    /// The element at index 0 is the front of the span.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        let index = self.physical_index(index)?;
        unsafe { Some(&mut *self.buf.get_mut_ptr(index)) }
    }

    /// Returns a reference to the front element.
    ///
    /// # Panics
    /// Panics if the span is empty.
    #[inline]
    #[track_caller]
    pub fn front(&self) -> &T {
        match self.get(0) {
            Some(front) => front,
            None => empty_span_access("front"),
        }
    }

    /// Returns a mutable reference to the front element.
    ///
    /// # Panics
    /// Panics if the span is empty.
    #[inline]
    #[track_caller]
    pub fn front_mut(&mut self) -> &mut T {
        match self.get_mut(0) {
            Some(front) => front,
            None => empty_span_access("front_mut"),
        }
    }

    /// Returns a reference to the back element.
    ///
    /// # Panics
    /// Panics if the span is empty.
    #[inline]
    #[track_caller]
    pub fn back(&self) -> &T {
        match self.len.checked_sub(1).and_then(|last| self.get(last)) {
            Some(back) => back,
            None => empty_span_access("back"),
        }
    }

    /// Returns a mutable reference to the back element.
    ///
    /// # Panics
    /// Panics if the span is empty.
    #[inline]
    #[track_caller]
    pub fn back_mut(&mut self) -> &mut T {
        let last = match self.len.checked_sub(1) {
            Some(last) => last,
            None => empty_span_access("back_mut"),
        };
        match self.get_mut(last) {
            Some(back) => back,
            None => empty_span_access("back_mut"),
        }
    }

    /// Appends an element to the back of the span.
    ///
    /// Returns `None` if the span still had room, or `Some(existing)` if it
    /// was full, where `existing` is the front element that was overwritten
    /// to make room. A span with zero capacity hands `value` straight back.
    ///
    /// # Examples
    /// ```text
    /// [_, _, _] <-(+)- 1 => [1, _, _] -> None
    /// [1, _, _] <-(+)- 2 => [1, 2, _] -> None
    /// [1, 2, _] <-(+)- 3 => [1, 2, 3] -> None
    /// [1, 2, 3] <-(+)- 4 => [2, 3, 4] -> Some(1)
    /// ```
    ///
    /// ```
    /// let mut span = circular::InlineSpan::<i32, 3>::new();
    /// span.push_back(1);
    /// span.push_back(2);
    /// assert_eq!(span.push_back(3), None);
    /// assert_eq!(span.push_back(4), Some(1));
    /// assert_eq!(span.back(), &4);
    /// ```
    pub fn push_back(&mut self, value: T) -> Option<T> {
        let cap = self.capacity();
        if cap == 0 {
            return Some(value);
        }

        if self.len == cap {
            // the back slot of a full span is the front slot
            let slot = self.buf.get_mut_ptr(self.head);
            let evicted = unsafe { slot.replace(value) };
            self.head = wrap_add(self.head, 1, cap);
            return Some(evicted);
        }

        let end = wrap_add(self.head, self.len, cap);
        unsafe { self.buf.get_mut_ptr(end).write(value) };
        self.len += 1;
        None
    }

    /// Prepends an element to the front of the span.
    ///
    /// Returns `None` if the span still had room, or `Some(existing)` if it
    /// was full, where `existing` is the back element that was overwritten
    /// to make room. A span with zero capacity hands `value` straight back.
    ///
    /// # Examples
    /// ```text
    /// 1 -(+)-> [_, _, _] => [1, _, _] -> None
    /// 2 -(+)-> [1, _, _] => [2, 1, _] -> None
    /// 3 -(+)-> [2, 1, _] => [3, 2, 1] -> None
    /// 4 -(+)-> [3, 2, 1] => [4, 3, 2] -> Some(1)
    /// ```
    ///
    /// ```
    /// let mut span = circular::InlineSpan::<i32, 3>::new();
    /// span.push_front(1);
    /// span.push_front(2);
    /// span.push_front(3);
    /// assert_eq!(span.push_front(4), Some(1));
    /// assert_eq!(span, [4, 3, 2]);
    /// ```
    pub fn push_front(&mut self, value: T) -> Option<T> {
        let cap = self.capacity();
        if cap == 0 {
            return Some(value);
        }

        let idx = wrap_sub(self.head, 1, cap);
        if self.len == cap {
            // the slot before the front of a full span is the back slot
            let evicted = unsafe { self.buf.get_mut_ptr(idx).replace(value) };
            self.head = idx;
            return Some(evicted);
        }

        unsafe { self.buf.get_mut_ptr(idx).write(value) };
        self.head = idx;
        self.len += 1;
        None
    }

    /// Appends an element to the back of the span, returning `Err(value)`
    /// if it is already full.
    ///
    /// # Examples
    /// ```
    /// let mut span = circular::InlineSpan::<i32, 3>::new();
    /// assert!(span.try_push_back(1).is_ok());
    /// assert!(span.try_push_back(2).is_ok());
    /// assert!(span.try_push_back(3).is_ok());
    /// assert_eq!(span.try_push_back(4), Err(4));
    /// assert_eq!(span, [1, 2, 3]);
    /// ```
    pub fn try_push_back(&mut self, value: T) -> Result<(), T> {
        if self.is_full() {
            return Err(value);
        }

        let evicted = self.push_back(value);
        debug_assert!(evicted.is_none());
        Ok(())
    }

    /// Prepends an element to the front of the span, returning `Err(value)`
    /// if it is already full.
    ///
    /// # Examples
    /// ```
    /// let mut span = circular::InlineSpan::<i32, 3>::new();
    /// assert!(span.try_push_front(1).is_ok());
    /// assert!(span.try_push_front(2).is_ok());
    /// assert!(span.try_push_front(3).is_ok());
    /// assert_eq!(span.try_push_front(4), Err(4));
    /// assert_eq!(span, [3, 2, 1]);
    /// ```
    pub fn try_push_front(&mut self, value: T) -> Result<(), T> {
        if self.is_full() {
            return Err(value);
        }

        let evicted = self.push_front(value);
        debug_assert!(evicted.is_none());
        Ok(())
    }

    /// Removes the front element and returns it, or [`None`] if the span is empty.
    ///
    /// # Examples
    /// ```
    /// let mut span = circular::InlineSpan::<i32, 3>::new();
    /// span.push_back(1);
    /// span.push_back(2);
    /// assert_eq!(span.try_move_front(), Some(1));
    /// assert_eq!(span.try_move_front(), Some(2));
    /// assert_eq!(span.try_move_front(), None);
    /// ```
    pub fn try_move_front(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }

        let front = self.head;
        let result = unsafe { self.buf.get_ptr(front).read() };
        self.head = wrap_add(front, 1, self.capacity());
        self.len -= 1;

        Some(result)
    }

    /// Removes the back element and returns it, or [`None`] if the span is empty.
    ///
    /// # Examples
    /// ```
    /// let mut span = circular::InlineSpan::<i32, 3>::new();
    /// span.push_back(1);
    /// span.push_back(3);
    /// assert_eq!(span.try_move_back(), Some(3));
    /// assert_eq!(span.try_move_back(), Some(1));
    /// assert_eq!(span.try_move_back(), None);
    /// ```
    pub fn try_move_back(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }

        let back = wrap_add(self.head, self.len - 1, self.capacity());
        let result = unsafe { self.buf.get_ptr(back).read() };
        self.len -= 1;

        Some(result)
    }

    /// Removes the front element and returns it.
    ///
    /// # Panics
    /// Panics if the span is empty. See [`try_move_front`](Span::try_move_front)
    /// for a checked variant that never panics.
    #[track_caller]
    pub fn move_front(&mut self) -> T {
        match self.try_move_front() {
            Some(front) => front,
            None => empty_span_access("move_front"),
        }
    }

    /// Removes the back element and returns it.
    ///
    /// # Panics
    /// Panics if the span is empty. See [`try_move_back`](Span::try_move_back)
    /// for a checked variant that never panics.
    #[track_caller]
    pub fn move_back(&mut self) -> T {
        match self.try_move_back() {
            Some(back) => back,
            None => empty_span_access("move_back"),
        }
    }

    /// Removes and drops the front element.
    ///
    /// # Panics
    /// Panics if the span is empty.
    #[track_caller]
    pub fn pop_front(&mut self) {
        if self.try_move_front().is_none() {
            empty_span_access("pop_front");
        }
    }

    /// Removes and drops the back element.
    ///
    /// # Panics
    /// Panics if the span is empty.
    #[track_caller]
    pub fn pop_back(&mut self) {
        if self.try_move_back().is_none() {
            empty_span_access("pop_back");
        }
    }

    /// Clears the span, dropping all values.
    ///
    /// The capacity is unaffected.
    pub fn clear(&mut self) {
        let (front, back) = self.as_mut_slices();
        let front: *mut [T] = front;
        let back: *mut [T] = back;

        // reset first, so a panicking destructor leaks instead of double-dropping
        self.head = 0;
        self.len = 0;

        unsafe {
            core::ptr::drop_in_place(front);
            core::ptr::drop_in_place(back);
        }
    }

    /// Clears the span and appends every element of `iter` to the back, in order.
    ///
    /// If `iter` yields more elements than the span can hold, the earlier
    /// ones are overwritten, so only the last `capacity()` elements remain.
    ///
    /// # Examples
    /// ```
    /// let mut span = circular::InlineSpan::<i32, 4>::new();
    /// span.push_back(10);
    ///
    /// span.assign(1..=3);
    /// assert_eq!(span, [1, 2, 3]);
    ///
    /// span.assign(1..=6);
    /// assert_eq!(span, [3, 4, 5, 6]);
    /// ```
    pub fn assign<It: IntoIterator<Item = T>>(&mut self, iter: It) {
        self.clear();
        self.extend(iter);
    }

    /// Returns a pair of slices which contain, in order, the contents of the span.
    ///
    /// # Examples
    /// ```
    /// let mut span = circular::InlineSpan::<i32, 4>::new();
    /// span.push_back(1);
    /// span.push_back(2);
    /// span.push_front(0);
    /// assert_eq!(span.as_slices(), (&[0][..], &[1, 2][..]));
    /// ```
    pub fn as_slices(&self) -> (&[T], &[T]) {
        if self.len == 0 {
            return (&[], &[]);
        }

        let cap = self.capacity();
        let head = self.head;
        let ptr = self.buf.get_ptr(0);

        unsafe {
            if self.len <= cap - head {
                (
                    core::slice::from_raw_parts(ptr.add(head), self.len),
                    &[],
                )
            } else {
                let wrapped = self.len - (cap - head);
                (
                    core::slice::from_raw_parts(ptr.add(head), cap - head),
                    core::slice::from_raw_parts(ptr, wrapped),
                )
            }
        }
    }

    /// Returns a pair of mutable slices which contain, in order, the contents of the span.
    ///
    /// # Examples
    /// ```
    /// let mut span = circular::InlineSpan::<i32, 4>::new();
    /// span.push_back(1);
    /// span.push_back(2);
    /// span.push_front(0);
    /// span.as_mut_slices().0[0] = 10;
    /// assert_eq!(span, [10, 1, 2]);
    /// ```
    pub fn as_mut_slices(&mut self) -> (&mut [T], &mut [T]) {
        if self.len == 0 {
            return (&mut [], &mut []);
        }

        let cap = self.capacity();
        let head = self.head;
        let len = self.len;
        let ptr = self.buf.get_mut_ptr(0);

        unsafe {
            if len <= cap - head {
                (
                    core::slice::from_raw_parts_mut(ptr.add(head), len),
                    &mut [],
                )
            } else {
                let wrapped = len - (cap - head);
                (
                    core::slice::from_raw_parts_mut(ptr.add(head), cap - head),
                    core::slice::from_raw_parts_mut(ptr, wrapped),
                )
            }
        }
    }

    /// Returns a front-to-back iterator.
    ///
    /// # Examples
    /// ```
    /// let mut span = circular::InlineSpan::<i32, 4>::new();
    /// span.push_back(5);
    /// span.push_back(3);
    /// span.push_back(4);
    /// let mut it = span.iter();
    /// assert_eq!(it.next(), Some(&5));
    /// assert_eq!(it.next(), Some(&3));
    /// assert_eq!(it.next(), Some(&4));
    /// assert!(it.next().is_none());
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            ptr: self.buf.get_ptr(0),
            cap: self.capacity(),
            head: self.head,
            len: self.len,
            _ref: PhantomData,
        }
    }

    /// Returns a front-to-back iterator that returns mutable references.
    ///
    /// # Examples
    /// ```
    /// let mut span = circular::InlineSpan::<i32, 4>::new();
    /// span.push_back(5);
    /// span.push_back(3);
    /// span.push_back(4);
    /// for num in span.iter_mut() {
    ///     *num = *num - 2;
    /// }
    /// assert_eq!(span, [3, 1, 2]);
    /// ```
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut {
            cap: self.capacity(),
            head: self.head,
            len: self.len,
            ptr: self.buf.get_mut_ptr(0),
            _ref: PhantomData,
        }
    }
}

impl<T, S: ContiguousStorage<T>> Index<usize> for Span<T, S> {
    type Output = T;

    #[inline]
    #[track_caller]
    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Some(x) => x,
            None => index_out_of_bounds(index, self.len),
        }
    }
}

impl<T, S: ContiguousStorage<T>> IndexMut<usize> for Span<T, S> {
    #[inline]
    #[track_caller]
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.len;
        match self.get_mut(index) {
            Some(x) => x,
            None => index_out_of_bounds(index, len),
        }
    }
}

impl<T, S: ContiguousStorage<T>> Drop for Span<T, S> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T: Debug, S: ContiguousStorage<T>> Debug for Span<T, S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let (front, back) = self.as_slices();
        f.debug_list().entries(front).entries(back).finish()
    }
}

impl<T: Hash, S: ContiguousStorage<T>> Hash for Span<T, S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len.hash(state);
        for x in self {
            x.hash(state);
        }
    }
}

impl<T, U, SA, SB> PartialEq<Span<U, SB>> for Span<T, SA>
where
    T: PartialEq<U>,
    SA: ContiguousStorage<T>,
    SB: ContiguousStorage<U>,
{
    /// Two spans are equal when they hold equal elements in the same logical
    /// order, regardless of capacity or physical layout.
    fn eq(&self, other: &Span<U, SB>) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<T: Eq, S: ContiguousStorage<T>> Eq for Span<T, S> {}

impl<T: PartialEq, S: ContiguousStorage<T>, R: AsRef<[T]>> PartialEq<R> for Span<T, S> {
    fn eq(&self, other: &R) -> bool {
        let other = other.as_ref();
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: PartialOrd, SA: ContiguousStorage<T>, SB: ContiguousStorage<T>> PartialOrd<Span<T, SB>>
    for Span<T, SA>
{
    fn partial_cmp(&self, other: &Span<T, SB>) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<T: Ord, S: ContiguousStorage<T>> Ord for Span<T, S> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

/// Extends the span by pushing each element to the back, overwriting the
/// front when full.
impl<T, S: ContiguousStorage<T>> Extend<T> for Span<T, S> {
    fn extend<It: IntoIterator<Item = T>>(&mut self, iter: It) {
        iter.into_iter().for_each(|x| {
            self.push_back(x);
        });
    }
}

impl<'a, T: 'a + Clone, S: ContiguousStorage<T>> Extend<&'a T> for Span<T, S> {
    fn extend<It: IntoIterator<Item = &'a T>>(&mut self, iter: It) {
        iter.into_iter().for_each(|x| {
            self.push_back(x.clone());
        });
    }
}

/// An iterator over the elements of a span.
///
/// This `struct` is created by the [`iter`](Span::iter) method on [`Span`].
/// See its documentation for more.
pub struct Iter<'a, T> {
    ptr: *const T,
    cap: usize,
    head: usize,
    len: usize,
    _ref: PhantomData<&'a T>,
}

unsafe impl<T: Sync> Send for Iter<'_, T> {}
unsafe impl<T: Sync> Sync for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            ptr: self.ptr,
            cap: self.cap,
            head: self.head,
            len: self.len,
            _ref: PhantomData,
        }
    }
}

impl<T: Debug> Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Iter")
            .field(&DebugRemaining(self.clone()))
            .finish()
    }
}

struct DebugRemaining<'a, T>(Iter<'a, T>);

impl<T: Debug> Debug for DebugRemaining<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.clone()).finish()
    }
}

impl<'a, T: 'a> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<&'a T> {
        if self.len == 0 {
            return None;
        }

        let idx = self.head;
        self.head = wrap_add(idx, 1, self.cap);
        self.len -= 1;
        unsafe { Some(&*self.ptr.add(idx)) }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, T: 'a> DoubleEndedIterator for Iter<'a, T> {
    #[inline]
    fn next_back(&mut self) -> Option<&'a T> {
        if self.len == 0 {
            return None;
        }

        self.len -= 1;
        let idx = wrap_add(self.head, self.len, self.cap);
        unsafe { Some(&*self.ptr.add(idx)) }
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

/// A mutable iterator over the elements of a span.
///
/// This `struct` is created by the [`iter_mut`](Span::iter_mut) method on
/// [`Span`]. See its documentation for more.
pub struct IterMut<'a, T> {
    ptr: *mut T,
    cap: usize,
    head: usize,
    len: usize,
    _ref: PhantomData<&'a mut T>,
}

unsafe impl<T: Send> Send for IterMut<'_, T> {}
unsafe impl<T: Sync> Sync for IterMut<'_, T> {}

impl<T: Debug> Debug for IterMut<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let remaining = Iter {
            ptr: self.ptr as *const T,
            cap: self.cap,
            head: self.head,
            len: self.len,
            _ref: PhantomData,
        };
        f.debug_tuple("IterMut")
            .field(&DebugRemaining(remaining))
            .finish()
    }
}

impl<'a, T: 'a> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    #[inline]
    fn next(&mut self) -> Option<&'a mut T> {
        if self.len == 0 {
            return None;
        }

        let idx = self.head;
        self.head = wrap_add(idx, 1, self.cap);
        self.len -= 1;
        unsafe { Some(&mut *self.ptr.add(idx)) }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, T: 'a> DoubleEndedIterator for IterMut<'a, T> {
    #[inline]
    fn next_back(&mut self) -> Option<&'a mut T> {
        if self.len == 0 {
            return None;
        }

        self.len -= 1;
        let idx = wrap_add(self.head, self.len, self.cap);
        unsafe { Some(&mut *self.ptr.add(idx)) }
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}
impl<T> FusedIterator for IterMut<'_, T> {}

/// An owning iterator over the elements of a span.
///
/// This `struct` is created by the `into_iter` method on [`Span`]
/// (provided by the `IntoIterator` trait). See its documentation for more.
pub struct IntoIter<T, S: ContiguousStorage<T>> {
    inner: Span<T, S>,
}

impl<T: Debug, S: ContiguousStorage<T>> Debug for IntoIter<T, S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.inner).finish()
    }
}

impl<T, S: ContiguousStorage<T>> Iterator for IntoIter<T, S> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.inner.try_move_front()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.inner.len();
        (len, Some(len))
    }
}

impl<T, S: ContiguousStorage<T>> DoubleEndedIterator for IntoIter<T, S> {
    #[inline]
    fn next_back(&mut self) -> Option<T> {
        self.inner.try_move_back()
    }
}

impl<T, S: ContiguousStorage<T>> ExactSizeIterator for IntoIter<T, S> {}
impl<T, S: ContiguousStorage<T>> FusedIterator for IntoIter<T, S> {}

impl<T, S: ContiguousStorage<T>> IntoIterator for Span<T, S> {
    type Item = T;
    type IntoIter = IntoIter<T, S>;

    /// Converts the `Span` into a front-to-back iterator yielding elements by value.
    fn into_iter(self) -> IntoIter<T, S> {
        IntoIter { inner: self }
    }
}

impl<'a, T, S: ContiguousStorage<T>> IntoIterator for &'a Span<T, S> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T, S: ContiguousStorage<T>> IntoIterator for &'a mut Span<T, S> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> IterMut<'a, T> {
        self.iter_mut()
    }
}

impl<T, const C: usize> Span<T, [MaybeUninit<T>; C]> {
    /// Constructs a new span backed by an inline array.
    ///
    /// # Examples
    /// ```
    /// let span = circular::InlineSpan::<u32, 7>::new();
    /// assert_eq!(span.len(), 0);
    /// assert_eq!(span.capacity(), 7);
    /// ```
    #[inline]
    pub fn new() -> Self {
        Span {
            head: 0,
            len: 0,
            buf: unsafe { MaybeUninit::uninit().assume_init() },
            elem: PhantomData,
        }
    }
}

impl<T, const C: usize> Default for Span<T, [MaybeUninit<T>; C]> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, const C: usize> Clone for Span<T, [MaybeUninit<T>; C]> {
    fn clone(&self) -> Self {
        let mut ret = Self::new();
        ret.extend(self.iter().cloned());
        ret
    }

    fn clone_from(&mut self, source: &Self) {
        self.clear();
        self.extend(source.iter().cloned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{DropCounter, Droppable};

    #[test]
    fn overwrite_at_both_ends() {
        let mut span = InlineSpan::<i32, 3>::new();
        assert!(span.push_back(1).is_none());
        assert!(span.push_back(2).is_none());
        assert!(span.push_back(3).is_none());
        assert!(span.is_full());
        assert_eq!(span, [1, 2, 3]);

        assert_eq!(span.push_back(4), Some(1));
        assert_eq!(span, [2, 3, 4]);
        assert_eq!(span.front(), &2);
        assert_eq!(span.len(), 3);

        assert_eq!(span.push_front(5), Some(4));
        assert_eq!(span, [5, 2, 3]);
        assert_eq!(span.back(), &3);
        assert_eq!(span.len(), 3);

        span.pop_back();
        assert_eq!(span, [5, 2]);
        assert_eq!(span.len(), 2);
        assert!(!span.is_full());
    }

    #[test]
    fn zero_capacity_is_empty_and_full() {
        let mut backing_region: [MaybeUninit<i32>; 0] = [];
        let mut span = SliceSpan::<i32>::from(&mut backing_region[..]);

        for _ in 0..3 {
            assert!(span.is_empty());
            assert!(span.is_full());
            assert_eq!(span.len(), 0);
            assert_eq!(span.capacity(), 0);
            assert_eq!(span.push_back(1), Some(1));
            assert_eq!(span.push_front(2), Some(2));
            assert_eq!(span.try_push_back(3), Err(3));
            assert_eq!(span.try_move_front(), None);
            assert_eq!(span.try_move_back(), None);
            assert_eq!(span.iter().count(), 0);
            assert_eq!(span.as_slices(), (&[][..], &[][..]));
        }

        span.assign(0..10);
        span.clear();
        assert!(span.is_empty());

        let span = InlineSpan::<i32, 0>::new();
        assert!(span.is_empty() && span.is_full());
    }

    #[test]
    fn filling_keeps_unevicted_front() {
        for cap in 1..=8 {
            let mut backing_region = [MaybeUninit::<usize>::uninit(); 8];
            let mut span = SliceSpan::<usize>::from(&mut backing_region[..cap]);

            for pushed in 0..3 * cap {
                span.push_back(pushed);
                let oldest = (pushed + 1).saturating_sub(cap);
                assert_eq!(span.front(), &oldest);
                assert_eq!(span.back(), &pushed);
                assert_eq!(span.is_full(), pushed + 1 >= cap);
            }

            for pushed in 0..3 * cap {
                let back = *span.back();
                let evicted = span.push_front(pushed);
                assert_eq!(evicted, Some(back));
                assert_eq!(span.front(), &pushed);
                assert_eq!(span.len(), cap);
            }
        }
    }

    #[test]
    fn move_then_push_restores_state() {
        let mut backing_region = [MaybeUninit::<i32>::uninit(); 5];
        let mut span = SliceSpan::<i32>::from(&mut backing_region[..]);
        span.extend(1..=7);
        span.pop_front();
        assert_eq!(span, [4, 5, 6, 7]);

        let (before_front, before_back) = {
            let (a, b) = span.as_slices();
            (a.as_ptr(), b.len())
        };

        let x = span.move_back();
        assert_eq!(x, 7);
        assert_eq!(span, [4, 5, 6]);
        span.push_back(x);
        assert_eq!(span, [4, 5, 6, 7]);
        assert_eq!(span.as_slices().0.as_ptr(), before_front);
        assert_eq!(span.as_slices().1.len(), before_back);

        let x = span.move_front();
        assert_eq!(x, 4);
        span.push_front(x);
        assert_eq!(span, [4, 5, 6, 7]);
        assert_eq!(span.as_slices().0.as_ptr(), before_front);
    }

    #[test]
    fn assign_keeps_last_elements() {
        let mut span = InlineSpan::<u8, 4>::new();
        span.push_back(100);
        span.push_front(200);

        span.assign(0..2);
        assert_eq!(span, [0, 1]);
        assert_eq!(span.len(), 2);

        span.assign(0..4);
        assert_eq!(span, [0, 1, 2, 3]);
        assert!(span.is_full());

        span.assign(0..11);
        assert_eq!(span, [7, 8, 9, 10]);

        span.assign(core::iter::empty());
        assert!(span.is_empty());
    }

    #[test]
    fn clear_resets_length_only() {
        let mut span = InlineSpan::<i32, 3>::new();
        span.extend([1, 2, 3, 4].iter());
        span.clear();
        assert!(span.is_empty());
        assert_eq!(span.len(), 0);
        assert_eq!(span.capacity(), 3);

        span.push_front(1);
        assert_eq!(span, [1]);
    }

    #[test]
    #[should_panic(expected = "called `front` on an empty span")]
    fn front_of_empty_span() {
        let span = InlineSpan::<i32, 3>::new();
        span.front();
    }

    #[test]
    #[should_panic(expected = "called `back` on an empty span")]
    fn back_of_empty_span() {
        let span = InlineSpan::<i32, 0>::new();
        span.back();
    }

    #[test]
    #[should_panic(expected = "called `pop_front` on an empty span")]
    fn pop_from_empty_span() {
        let mut span = InlineSpan::<i32, 2>::new();
        span.push_back(1);
        span.pop_back();
        span.pop_front();
    }

    #[test]
    #[should_panic(expected = "called `move_back` on an empty span")]
    fn move_from_empty_span() {
        let mut span = InlineSpan::<i32, 2>::new();
        span.move_back();
    }

    #[test]
    #[should_panic(expected = "the len is 2 but the index is 2")]
    fn index_past_the_end() {
        let mut span = InlineSpan::<i32, 4>::new();
        span.push_back(1);
        span.push_back(2);
        let _ = span[2];
    }

    #[test]
    fn indexing_follows_wraparound() {
        let mut span = InlineSpan::<i32, 4>::new();
        span.extend(0..6);
        assert_eq!(span.as_slices(), (&[2, 3][..], &[4, 5][..]));
        for i in 0..4 {
            assert_eq!(span[i], i as i32 + 2);
        }

        span[3] = 50;
        *span.front_mut() = 20;
        *span.back_mut() += 1;
        *span.get_mut(1).unwrap() = 30;
        assert_eq!(span, [20, 30, 4, 51]);
        assert!(span.get(4).is_none());
    }

    #[test]
    fn iterators_meet_in_the_middle() {
        let mut span = InlineSpan::<i32, 5>::new();
        span.extend(0..8);
        assert_eq!(span, [3, 4, 5, 6, 7]);

        let mut it = span.iter();
        assert_eq!(it.len(), 5);
        assert_eq!(it.next(), Some(&3));
        assert_eq!(it.next_back(), Some(&7));
        assert_eq!(it.next_back(), Some(&6));
        assert_eq!(it.next(), Some(&4));
        assert_eq!(it.len(), 1);
        assert_eq!(it.next(), Some(&5));
        assert_eq!(it.next(), None);
        assert_eq!(it.next_back(), None);

        for x in span.iter_mut().rev().take(2) {
            *x *= 10;
        }
        assert_eq!(span, [3, 4, 5, 60, 70]);

        for x in &mut span {
            *x += 1;
        }
        let collected: [i32; 5] = {
            let mut out = [0; 5];
            for (slot, x) in out.iter_mut().zip(&span) {
                *slot = *x;
            }
            out
        };
        assert_eq!(collected, [4, 5, 6, 61, 71]);
    }

    #[test]
    fn raw_parts_round_trip() {
        let mut backing_region = [MaybeUninit::<i32>::uninit(); 4];
        let mut span = SliceSpan::<i32>::from(&mut backing_region[..]);
        span.extend(0..6);

        let (buf, head, len) = span.into_raw_parts();
        assert_eq!((head, len), (2, 4));
        let span = unsafe { SliceSpan::from_raw_parts(buf, head, len) };
        assert_eq!(span, [2, 3, 4, 5]);
    }

    #[test]
    fn elements_are_dropped_exactly_once() {
        let drop_counter = DropCounter::new();
        let mut backing_region = [
            MaybeUninit::<Droppable>::uninit(),
            MaybeUninit::<Droppable>::uninit(),
            MaybeUninit::<Droppable>::uninit(),
            MaybeUninit::<Droppable>::uninit(),
        ];

        {
            let mut span = SliceSpan::<Droppable>::from(&mut backing_region[..]);
            for value in 0..6 {
                span.push_back(drop_counter.track(value));
            }
            assert_eq!(drop_counter.dropped(), 2);
            assert_eq!(span.front().value, 2);

            span.push_front(drop_counter.track(6));
            assert_eq!(drop_counter.dropped(), 3);

            span.pop_front();
            assert_eq!(drop_counter.dropped(), 4);

            let moved = span.move_back();
            assert_eq!(moved.value, 4);
            assert_eq!(drop_counter.dropped(), 4);
            drop(moved);
            assert_eq!(drop_counter.dropped(), 5);

            span.clear();
            assert_eq!(drop_counter.dropped(), 7);

            for value in 0..3 {
                span.push_front(drop_counter.track(value));
            }
        }
        assert_eq!(drop_counter.dropped(), 10);

        {
            let mut span = SliceSpan::<Droppable>::from(&mut backing_region[..]);
            for value in 0..4 {
                span.push_back(drop_counter.track(value));
            }

            let mut into_iter = span.into_iter();
            assert_eq!(into_iter.next().unwrap().value, 0);
            assert_eq!(into_iter.next_back().unwrap().value, 3);
            assert_eq!(drop_counter.dropped(), 12);
            drop(into_iter);
        }
        assert_eq!(drop_counter.dropped(), 14);
    }

    #[test]
    fn wrapping_near_usize_max() {
        let cap = usize::MAX;
        assert_eq!(wrap_add(cap - 1, 1, cap), 0);
        assert_eq!(wrap_add(cap - 1, 3, cap), 2);
        assert_eq!(wrap_add(cap - 3, 1, cap), cap - 2);
        assert_eq!(wrap_add(5, cap, cap), 5);
        assert_eq!(wrap_sub(0, 1, cap), cap - 1);
        assert_eq!(wrap_sub(1, 3, cap), cap - 2);
        assert_eq!(wrap_sub(cap - 1, cap, cap), cap - 1);

        let cap = usize::MAX / 2 + 2;
        assert_eq!(wrap_add(cap - 1, cap - 1, cap), cap - 2);
        assert_eq!(wrap_sub(cap / 2, cap - 1, cap), cap / 2 + 1);

        assert_eq!(wrap_add(2, 3, 4), 1);
        assert_eq!(wrap_sub(1, 3, 4), 2);
    }

    #[test]
    fn hash_ignores_physical_layout() {
        use rustc_hash::FxHasher;

        fn fx_hash<T: Hash>(value: &T) -> u64 {
            let mut hasher = FxHasher::default();
            value.hash(&mut hasher);
            hasher.finish()
        }

        let mut wrapped = InlineSpan::<u32, 4>::new();
        wrapped.extend(0..7);
        assert_eq!(wrapped.as_slices(), (&[3][..], &[4, 5, 6][..]));

        let mut backing_region = [MaybeUninit::<u32>::uninit(); 9];
        let mut contiguous = SliceSpan::<u32>::from(&mut backing_region[..]);
        contiguous.extend(3..7);
        assert_eq!(contiguous.as_slices(), (&[3, 4, 5, 6][..], &[][..]));

        assert_eq!(wrapped, contiguous);
        assert_eq!(fx_hash(&wrapped), fx_hash(&contiguous));

        contiguous.push_back(7);
        assert_ne!(wrapped, contiguous);
        assert!(wrapped < contiguous);
    }

    #[test]
    fn inline_spans_clone_contents() {
        let mut span = InlineSpan::<i32, 3>::new();
        span.extend(1..=5);

        let copy = span.clone();
        assert_eq!(copy, [3, 4, 5]);
        assert_eq!(copy.capacity(), 3);

        let mut other = InlineSpan::<i32, 3>::default();
        other.push_back(9);
        other.clone_from(&span);
        assert_eq!(other, span);
    }

    #[test]
    fn debug_output_is_logical() {
        use std::format;

        let mut span = InlineSpan::<i32, 3>::new();
        span.extend(1..=4);
        assert_eq!(format!("{:?}", span), "[2, 3, 4]");

        let mut it = span.iter();
        it.next();
        assert_eq!(format!("{:?}", it), "Iter([3, 4])");
    }

    #[test]
    fn randomized_against_model() {
        use rand::{rngs::SmallRng, Rng, SeedableRng};
        use std::collections::VecDeque;

        let mut rng = SmallRng::seed_from_u64(crate::test_utils::RNG_SEED);

        for cap in 0..=9 {
            let mut backing_region = [MaybeUninit::<u32>::uninit(); 9];
            let mut span = SliceSpan::<u32>::from(&mut backing_region[..cap]);
            let mut model = VecDeque::<u32>::new();

            for _ in 0..2000 {
                let value = rng.gen::<u32>();
                match rng.gen_range(0..12) {
                    0..=2 => {
                        let expected = if cap == 0 {
                            Some(value)
                        } else if model.len() == cap {
                            let evicted = model.pop_front();
                            model.push_back(value);
                            evicted
                        } else {
                            model.push_back(value);
                            None
                        };
                        assert_eq!(span.push_back(value), expected);
                    }
                    3..=4 => {
                        let expected = if cap == 0 {
                            Some(value)
                        } else if model.len() == cap {
                            let evicted = model.pop_back();
                            model.push_front(value);
                            evicted
                        } else {
                            model.push_front(value);
                            None
                        };
                        assert_eq!(span.push_front(value), expected);
                    }
                    5 => assert_eq!(span.try_move_front(), model.pop_front()),
                    6 => assert_eq!(span.try_move_back(), model.pop_back()),
                    7 => {
                        let expected = if model.len() < cap {
                            model.push_back(value);
                            Ok(())
                        } else {
                            Err(value)
                        };
                        assert_eq!(span.try_push_back(value), expected);
                    }
                    9 => {
                        let expected = if model.len() < cap {
                            model.push_front(value);
                            Ok(())
                        } else {
                            Err(value)
                        };
                        assert_eq!(span.try_push_front(value), expected);
                    }
                    10 => {
                        let count = rng.gen_range(0..=2 * cap + 1) as u32;
                        span.assign(value..value.wrapping_add(count));
                        model.clear();
                        model.extend(value..value.wrapping_add(count));
                        while model.len() > cap {
                            model.pop_front();
                        }
                    }
                    8 if !model.is_empty() => {
                        let i = rng.gen_range(0..model.len());
                        span[i] = value;
                        model[i] = value;
                    }
                    _ => {
                        if rng.gen_range(0..20) == 0 {
                            span.clear();
                            model.clear();
                        }
                    }
                }

                assert_eq!(span.len(), model.len());
                assert_eq!(span.is_empty(), model.is_empty());
                assert_eq!(span.is_full(), model.len() == cap);
                assert!(span.iter().eq(model.iter()));
                assert!(span.iter().rev().eq(model.iter().rev()));
                for i in 0..span.len() {
                    assert_eq!(span[i], model[i]);
                }
            }
        }
    }
}
