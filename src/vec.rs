//! An owning ring buffer with a fixed, heap-allocated capacity.
//!
//! [`CircularVec`] obtains a single block of memory from an [`Allocator`]
//! when it is constructed, and never reallocates afterwards. All element
//! operations are those of [`Span`], the circular index it is built on.

use core::cmp::Ordering;
use core::fmt::{self, Debug, Formatter};
use core::hash::{Hash, Hasher};
use core::ops::{Index, IndexMut};

use crate::allocator::{Allocator, Global};
use crate::error::TryReserveError;
use crate::span::{Iter, IterMut, Span};
use crate::storage::AllocStorage;

/// A ring buffer using a heap-allocated slice for storage.
///
/// Note this still has a fixed capacity, and will never reallocate. Pushing
/// onto a full `CircularVec` overwrites the element at the opposite end.
///
/// # Examples
/// ```
/// let mut buffer = circular::CircularVec::<char>::with_capacity(4);
/// buffer.push_front('b');
/// buffer.push_front('a');
/// buffer.push_back('c');
/// buffer.push_back('d');
/// assert_eq!(buffer, ['a', 'b', 'c', 'd']);
///
/// assert_eq!(buffer.push_back('e'), Some('a'));
/// assert_eq!(buffer, ['b', 'c', 'd', 'e']);
/// ```
pub struct CircularVec<T, A: Allocator = Global> {
    span: Span<T, AllocStorage<T, A>>,
}

/// An owning iterator over the elements of a [`CircularVec`].
pub type IntoIter<T, A = Global> = crate::span::IntoIter<T, AllocStorage<T, A>>;

impl<T> CircularVec<T> {
    /// Creates an empty `CircularVec` with zero capacity, without allocating.
    ///
    /// # Examples
    /// ```
    /// let mut buffer = circular::CircularVec::<i32>::new();
    /// assert_eq!(buffer.capacity(), 0);
    /// assert_eq!(buffer.push_back(1), Some(1));
    /// assert!(buffer.is_empty() && buffer.is_full());
    /// ```
    #[inline]
    pub fn new() -> Self {
        Self::new_in(Global)
    }

    /// Creates an empty `CircularVec` with the specified capacity.
    ///
    /// # Panics
    /// Panics if the required size exceeds `isize::MAX` bytes, and aborts
    /// if the allocation fails. See [`try_with_capacity`](CircularVec::try_with_capacity)
    /// for a checked variant.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_in(capacity, Global)
    }

    /// Creates an empty `CircularVec` with the specified capacity, returning
    /// an error if the memory could not be allocated.
    ///
    /// # Examples
    /// ```
    /// use circular::{CircularVec, TryReserveError};
    ///
    /// let buffer = CircularVec::<u32>::try_with_capacity(16).unwrap();
    /// assert_eq!(buffer.capacity(), 16);
    ///
    /// let too_large = CircularVec::<u32>::try_with_capacity(usize::MAX);
    /// assert_eq!(too_large.err(), Some(TryReserveError::CapacityOverflow));
    /// ```
    #[inline]
    pub fn try_with_capacity(capacity: usize) -> Result<Self, TryReserveError> {
        Self::try_with_capacity_in(capacity, Global)
    }
}

impl<T, A: Allocator> CircularVec<T, A> {
    /// Creates an empty `CircularVec` with zero capacity using the given
    /// allocator, without allocating.
    #[inline]
    pub fn new_in(alloc: A) -> Self {
        CircularVec {
            span: Span::from(AllocStorage::new_in(alloc)),
        }
    }

    /// Creates an empty `CircularVec` with the specified capacity, allocated
    /// from `alloc`.
    ///
    /// # Panics
    /// Panics if the required size exceeds `isize::MAX` bytes, and aborts
    /// if the allocation fails.
    #[inline]
    pub fn with_capacity_in(capacity: usize, alloc: A) -> Self {
        CircularVec {
            span: Span::from(AllocStorage::with_capacity_in(capacity, alloc)),
        }
    }

    /// Creates an empty `CircularVec` with the specified capacity, allocated
    /// from `alloc`, returning an error if the memory could not be allocated.
    #[inline]
    pub fn try_with_capacity_in(capacity: usize, alloc: A) -> Result<Self, TryReserveError> {
        let storage = AllocStorage::try_with_capacity_in(capacity, alloc)?;
        Ok(CircularVec {
            span: Span::from(storage),
        })
    }

    /// Creates a full `CircularVec` containing the items of `iter` in order,
    /// with exactly as much capacity as there are items.
    ///
    /// # Examples
    /// ```
    /// use circular::{CircularVec, Global};
    ///
    /// let buffer = CircularVec::from_iter_in("abc".chars(), Global);
    /// assert_eq!(buffer.capacity(), 3);
    /// assert!(buffer.is_full());
    /// assert_eq!(buffer, ['a', 'b', 'c']);
    /// ```
    pub fn from_iter_in<It: IntoIterator<Item = T>>(iter: It, alloc: A) -> Self {
        let items: alloc::vec::Vec<T> = iter.into_iter().collect();
        let mut result = Self::with_capacity_in(items.len(), alloc);
        result.span.extend(items);
        debug_assert!(result.is_full());
        result
    }

    /// Returns a reference to the underlying allocator.
    #[inline]
    pub fn allocator(&self) -> &A {
        self.span.storage().allocator()
    }

    /// Returns the largest capacity a `CircularVec<T, A>` could be created with.
    ///
    /// This is a theoretical limit; actually allocating this much memory
    /// will most likely fail.
    #[inline]
    pub fn max_size(&self) -> usize {
        AllocStorage::<T, A>::max_capacity()
    }

    /// Returns a copy of `self` whose storage is allocated from `alloc`.
    ///
    /// The copy has the same capacity and contents as `self`.
    pub fn clone_in<B: Allocator>(&self, alloc: B) -> CircularVec<T, B>
    where
        T: Clone,
    {
        let mut result = CircularVec::with_capacity_in(self.capacity(), alloc);
        result.span.extend(self.iter().cloned());
        result
    }

    /// Moves all elements into a new `CircularVec` of the same capacity,
    /// allocated from `alloc`, releasing the current storage.
    ///
    /// # Examples
    /// ```
    /// use circular::{CircularVec, Global};
    ///
    /// let mut buffer = CircularVec::<i32>::with_capacity(3);
    /// buffer.extend(1..=4);
    ///
    /// let relocated = buffer.relocate_in(Global);
    /// assert_eq!(relocated.capacity(), 3);
    /// assert_eq!(relocated, [2, 3, 4]);
    /// ```
    pub fn relocate_in<B: Allocator>(self, alloc: B) -> CircularVec<T, B> {
        let mut result = CircularVec::with_capacity_in(self.capacity(), alloc);
        result.span.extend(self);
        result
    }

    /// Returns the number of elements the buffer can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.span.capacity()
    }

    /// Returns the number of elements currently in the buffer.
    #[inline]
    pub fn len(&self) -> usize {
        self.span.len()
    }

    /// Returns `true` exactly when the buffer contains zero elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.span.is_empty()
    }

    /// Returns `true` exactly when the buffer contains the maximum number of elements.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.span.is_full()
    }

    /// Returns `true` if the buffer contains an element equal to the given value.
    #[inline]
    pub fn contains(&self, x: &T) -> bool
    where
        T: PartialEq,
    {
        self.span.contains(x)
    }

    /// Returns a reference to the element at the given index, or [`None`] if
    /// the index is out of bounds.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.span.get(index)
    }

    /// Returns a mutable reference to the element at the given index, or
    /// [`None`] if the index is out of bounds.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.span.get_mut(index)
    }

    /// Returns a reference to the front element.
    ///
    /// # Panics
    /// Panics if the buffer is empty.
    #[inline]
    #[track_caller]
    pub fn front(&self) -> &T {
        self.span.front()
    }

    /// Returns a mutable reference to the front element.
    ///
    /// # Panics
    /// Panics if the buffer is empty.
    #[inline]
    #[track_caller]
    pub fn front_mut(&mut self) -> &mut T {
        self.span.front_mut()
    }

    /// Returns a reference to the back element.
    ///
    /// # Panics
    /// Panics if the buffer is empty.
    #[inline]
    #[track_caller]
    pub fn back(&self) -> &T {
        self.span.back()
    }

    /// Returns a mutable reference to the back element.
    ///
    /// # Panics
    /// Panics if the buffer is empty.
    #[inline]
    #[track_caller]
    pub fn back_mut(&mut self) -> &mut T {
        self.span.back_mut()
    }

    /// Appends an element to the back, overwriting and returning the front
    /// element if the buffer is full. See [`Span::push_back`].
    #[inline]
    pub fn push_back(&mut self, value: T) -> Option<T> {
        self.span.push_back(value)
    }

    /// Prepends an element to the front, overwriting and returning the back
    /// element if the buffer is full. See [`Span::push_front`].
    #[inline]
    pub fn push_front(&mut self, value: T) -> Option<T> {
        self.span.push_front(value)
    }

    /// Appends an element to the back, returning `Err(value)` if the buffer is full.
    #[inline]
    pub fn try_push_back(&mut self, value: T) -> Result<(), T> {
        self.span.try_push_back(value)
    }

    /// Prepends an element to the front, returning `Err(value)` if the buffer is full.
    #[inline]
    pub fn try_push_front(&mut self, value: T) -> Result<(), T> {
        self.span.try_push_front(value)
    }

    /// Removes the front element and returns it, or [`None`] if the buffer is empty.
    #[inline]
    pub fn try_move_front(&mut self) -> Option<T> {
        self.span.try_move_front()
    }

    /// Removes the back element and returns it, or [`None`] if the buffer is empty.
    #[inline]
    pub fn try_move_back(&mut self) -> Option<T> {
        self.span.try_move_back()
    }

    /// Removes the front element and returns it.
    ///
    /// # Panics
    /// Panics if the buffer is empty.
    #[inline]
    #[track_caller]
    pub fn move_front(&mut self) -> T {
        self.span.move_front()
    }

    /// Removes the back element and returns it.
    ///
    /// # Panics
    /// Panics if the buffer is empty.
    #[inline]
    #[track_caller]
    pub fn move_back(&mut self) -> T {
        self.span.move_back()
    }

    /// Removes and drops the front element.
    ///
    /// # Panics
    /// Panics if the buffer is empty.
    #[inline]
    #[track_caller]
    pub fn pop_front(&mut self) {
        self.span.pop_front()
    }

    /// Removes and drops the back element.
    ///
    /// # Panics
    /// Panics if the buffer is empty.
    #[inline]
    #[track_caller]
    pub fn pop_back(&mut self) {
        self.span.pop_back()
    }

    /// Clears the buffer, dropping all values. The capacity is unaffected.
    #[inline]
    pub fn clear(&mut self) {
        self.span.clear()
    }

    /// Clears the buffer and appends every element of `iter` to the back,
    /// keeping only the last `capacity()` of them. See [`Span::assign`].
    #[inline]
    pub fn assign<It: IntoIterator<Item = T>>(&mut self, iter: It) {
        self.span.assign(iter)
    }

    /// Returns a pair of slices which contain, in order, the contents of the buffer.
    #[inline]
    pub fn as_slices(&self) -> (&[T], &[T]) {
        self.span.as_slices()
    }

    /// Returns a pair of mutable slices which contain, in order, the contents of the buffer.
    #[inline]
    pub fn as_mut_slices(&mut self) -> (&mut [T], &mut [T]) {
        self.span.as_mut_slices()
    }

    /// Returns a front-to-back iterator.
    #[inline]
    pub fn iter(&self) -> Iter<'_, T> {
        self.span.iter()
    }

    /// Returns a front-to-back iterator that returns mutable references.
    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        self.span.iter_mut()
    }
}

impl<T> Default for CircularVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, A: Allocator + Clone> Clone for CircularVec<T, A> {
    fn clone(&self) -> Self {
        self.clone_in(self.allocator().clone())
    }

    fn clone_from(&mut self, source: &Self) {
        if self.capacity() == source.capacity() {
            self.span.assign(source.iter().cloned());
        } else {
            *self = source.clone();
        }
    }
}

impl<T> From<alloc::vec::Vec<T>> for CircularVec<T> {
    /// Converts a `Vec` into a full `CircularVec` with capacity `vec.len()`.
    fn from(vec: alloc::vec::Vec<T>) -> Self {
        Self::from_iter_in(vec, Global)
    }
}

impl<T, const N: usize> From<[T; N]> for CircularVec<T> {
    /// Converts an array into a full `CircularVec` with capacity `N`.
    ///
    /// # Examples
    /// ```
    /// let buffer = circular::CircularVec::from([1, 2, 3]);
    /// assert_eq!(buffer.capacity(), 3);
    /// assert_eq!(buffer.front(), &1);
    /// ```
    fn from(array: [T; N]) -> Self {
        let mut result = Self::with_capacity(N);
        result.span.extend(array);
        result
    }
}

impl<T> core::iter::FromIterator<T> for CircularVec<T> {
    /// Collects all items into a full `CircularVec` with exactly as much
    /// capacity as there are items.
    fn from_iter<It: IntoIterator<Item = T>>(iter: It) -> Self {
        Self::from_iter_in(iter, Global)
    }
}

impl<T, A: Allocator> Index<usize> for CircularVec<T, A> {
    type Output = T;

    #[inline]
    #[track_caller]
    fn index(&self, index: usize) -> &T {
        &self.span[index]
    }
}

impl<T, A: Allocator> IndexMut<usize> for CircularVec<T, A> {
    #[inline]
    #[track_caller]
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.span[index]
    }
}

impl<T: Debug, A: Allocator> Debug for CircularVec<T, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.span, f)
    }
}

impl<T: Hash, A: Allocator> Hash for CircularVec<T, A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.span.hash(state)
    }
}

impl<T, U, A, B> PartialEq<CircularVec<U, B>> for CircularVec<T, A>
where
    T: PartialEq<U>,
    A: Allocator,
    B: Allocator,
{
    fn eq(&self, other: &CircularVec<U, B>) -> bool {
        self.span == other.span
    }
}

impl<T: Eq, A: Allocator> Eq for CircularVec<T, A> {}

impl<T: PartialEq, A: Allocator, R: AsRef<[T]>> PartialEq<R> for CircularVec<T, A> {
    fn eq(&self, other: &R) -> bool {
        self.span == *other
    }
}

impl<T: PartialOrd, A: Allocator, B: Allocator> PartialOrd<CircularVec<T, B>> for CircularVec<T, A> {
    fn partial_cmp(&self, other: &CircularVec<T, B>) -> Option<Ordering> {
        self.span.partial_cmp(&other.span)
    }
}

impl<T: Ord, A: Allocator> Ord for CircularVec<T, A> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.span.cmp(&other.span)
    }
}

impl<T, A: Allocator> Extend<T> for CircularVec<T, A> {
    fn extend<It: IntoIterator<Item = T>>(&mut self, iter: It) {
        self.span.extend(iter)
    }
}

impl<'a, T: 'a + Clone, A: Allocator> Extend<&'a T> for CircularVec<T, A> {
    fn extend<It: IntoIterator<Item = &'a T>>(&mut self, iter: It) {
        self.span.extend(iter.into_iter().cloned())
    }
}

impl<T, A: Allocator> IntoIterator for CircularVec<T, A> {
    type Item = T;
    type IntoIter = IntoIter<T, A>;

    /// Converts the `CircularVec` into a front-to-back iterator yielding elements by value.
    fn into_iter(self) -> IntoIter<T, A> {
        self.span.into_iter()
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a CircularVec<T, A> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a mut CircularVec<T, A> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> IterMut<'a, T> {
        self.iter_mut()
    }
}
