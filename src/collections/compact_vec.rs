//! A vector storing up to `N` elements inline, and spilling to the heap beyond.

mod growth;
mod iter;
mod swap;

#[cfg(feature = "serde")]
mod serialize;

pub use iter::IntoIter;

use core::{
    borrow::{Borrow, BorrowMut},
    cmp, fmt,
    hash::{Hash, Hasher},
    marker::PhantomData,
    mem::{self, ManuallyDrop},
    ops::{Deref, DerefMut, Index, IndexMut},
    slice::{self, SliceIndex},
};

use crate::utils::{
    CompactVecError, HeapBlock, Mode, PackedState, State,
    alloc::{Allocator, Global},
    handle_error, lifecycle,
    storage::Storage,
};

/// Returns the number of `T` which fit in the footprint of a heap block.
///
/// Using it as inline capacity means the collection is no larger than a pointer and a capacity would be, while still
/// sparing an allocation for small sequences. Zero-sized types never take any room, and are given the footprint in
/// bytes instead.
///
/// #   Examples
///
/// ```
/// #   use compact_vec::{CompactVec, default_inline_capacity};
/// type Bytes = CompactVec<u8, { default_inline_capacity::<u8>() }>;
///
/// assert_eq!(2 * size_of::<usize>(), Bytes::new().inline_capacity());
/// assert_eq!(0, default_inline_capacity::<[u8; 64]>());
/// ```
pub const fn default_inline_capacity<T>() -> usize {
    let footprint = mem::size_of::<HeapBlock<T>>();

    match mem::size_of::<T>() {
        0 => footprint,
        size => footprint / size,
    }
}

/// A vector storing up to `N` elements inline, and spilling to the heap beyond.
///
/// The collection starts inline, and migrates to a heap block allocated by `A` the first time it needs to hold more
/// than `N` elements. It never migrates back on its own: only `shrink_to_fit` does.
///
/// The API mirrors `Vec` for the most part. Operations which may need to allocate come in two flavors: `try_*` methods
/// which return an error, and convenience methods which panic instead. Either way, on error the elements are left as
/// they were prior to the call.
///
/// #   Examples
///
/// ```
/// #   use compact_vec::{CompactVec, Mode};
/// let mut vec: CompactVec<u8, 4> = CompactVec::new();
///
/// vec.extend([1, 2, 3, 4]);
///
/// assert_eq!(Mode::Inline, vec.mode());
/// assert_eq!(4, vec.capacity());
///
/// vec.push(5);
///
/// assert_eq!(Mode::Heap, vec.mode());
/// assert_eq!(vec, [1, 2, 3, 4, 5]);
/// ```
pub struct CompactVec<T, const N: usize, A = Global>
where
    A: Allocator,
{
    //  Safety Invariants:
    //  -   Tagged: the live arm of `storage` is the one indicated by `state.mode()`.
    //  -   Bounded: `state.len()` is less than or equal to the capacity of the live arm.
    //  -   Initialized: the first `state.len()` slots of the live arm are initialized, the others are not.
    //  -   Owned: if on the heap, the block was allocated by `allocator`, and is referenced by `self` alone.
    state: PackedState,
    storage: Storage<T, N>,
    allocator: A,
    _marker: PhantomData<T>,
}

/// Creates a `CompactVec` containing the arguments.
///
/// The syntax is similar to that of `vec!`; the inline capacity is taken from the type annotation.
///
/// #   Examples
///
/// ```
/// #   use compact_vec::{CompactVec, compact_vec};
/// let empty: CompactVec<String, 2> = compact_vec![];
/// let fill: CompactVec<u8, 10> = compact_vec![100; 10];
/// let list: CompactVec<i32, 2> = compact_vec![1, 2, 3];
///
/// assert!(empty.is_empty());
/// assert!(fill.is_inline());
/// assert!(!list.is_inline());
/// ```
#[macro_export]
macro_rules! compact_vec {
    [] => { $crate::CompactVec::new() };
    [$elem:expr; $n:expr] => { $crate::CompactVec::from_elem($elem, $n) };
    [$($item:expr),+ $(,)?] => { $crate::CompactVec::from([ $($item),+ ]) };
}

//
//  Creation
//

impl<T, const N: usize> CompactVec<T, N, Global> {
    /// Creates a new, empty, inline, vector.
    #[inline]
    pub const fn new() -> Self {
        Self::new_in(Global)
    }

    /// Creates a new, empty, vector with room for at least `capacity` elements.
    ///
    /// #   Panics
    ///
    /// If the capacity cannot be satisfied.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::try_with_capacity_in(capacity, Global).unwrap_or_else(|e| handle_error(e))
    }

    /// Creates a vector of `n` clones of `value`.
    ///
    /// #   Panics
    ///
    /// If the capacity cannot be satisfied.
    pub fn from_elem(value: T, n: usize) -> Self
    where
        T: Clone,
    {
        Self::try_from_elem_in(value, n, Global).unwrap_or_else(|e| handle_error(e))
    }

    /// Creates a vector of clones of the elements of `slice`.
    ///
    /// #   Panics
    ///
    /// If the capacity cannot be satisfied.
    pub fn from_slice(slice: &[T]) -> Self
    where
        T: Clone,
    {
        Self::try_from_slice_in(slice, Global).unwrap_or_else(|e| handle_error(e))
    }
}

impl<T, const N: usize, A> CompactVec<T, N, A>
where
    A: Allocator,
{
    /// The maximum number of elements a vector can hold, whatever its element type.
    pub const MAX_SIZE: usize = State::MAX_LEN;

    /// Creates a new, empty, inline, vector using `allocator` should it ever spill to the heap.
    #[inline]
    pub const fn new_in(allocator: A) -> Self {
        const { assert!(N <= State::MAX_LEN, "inline capacity exceeds the maximum length") };

        //  Safety Invariants:
        //  -   Tagged: an empty state is inline, and so is the storage.
        //  -   Bounded, Initialized, Owned: trivially, since empty and inline.
        Self {
            state: PackedState::EMPTY,
            storage: Storage::inline(),
            allocator,
            _marker: PhantomData,
        }
    }

    /// Creates a new, empty, vector with room for at least `capacity` elements.
    ///
    /// Stays inline if `capacity` is less than or equal to `N`, otherwise allocates a block of exactly `capacity`.
    pub fn try_with_capacity_in(capacity: usize, allocator: A) -> Result<Self, CompactVecError> {
        let mut this = Self::new_in(allocator);

        this.try_reserve(capacity)?;

        Ok(this)
    }

    /// Creates a vector of `n` clones of `value`.
    pub fn try_from_elem_in(value: T, n: usize, allocator: A) -> Result<Self, CompactVecError>
    where
        T: Clone,
    {
        let mut this = Self::try_with_capacity_in(n, allocator)?;

        this.try_resize(n, value)?;

        Ok(this)
    }

    /// Creates a vector of clones of the elements of `slice`.
    pub fn try_from_slice_in(slice: &[T], allocator: A) -> Result<Self, CompactVecError>
    where
        T: Clone,
    {
        let mut this = Self::try_with_capacity_in(slice.len(), allocator)?;

        this.try_extend_from_slice(slice)?;

        Ok(this)
    }

    /// Creates a vector of the elements of `iter`, in order.
    pub fn try_from_iter_in<I>(iter: I, allocator: A) -> Result<Self, CompactVecError>
    where
        I: IntoIterator<Item = T>,
    {
        let mut this = Self::new_in(allocator);

        this.try_extend(iter)?;

        Ok(this)
    }
}

#[cfg(test)]
mod creation_tests {
    use std::string::{String, ToString};

    use crate::utils::testing::CountingAllocator;

    use super::*;

    #[test]
    fn new() {
        let vec = CompactVec::<String, 3>::new();

        assert!(vec.is_empty());
        assert_eq!(0, vec.len());
        assert_eq!(3, vec.capacity());
        assert_eq!(Mode::Inline, vec.mode());
        assert_eq!(State::MAX_LEN, vec.max_size());
    }

    #[test]
    fn new_const() {
        const EMPTY: CompactVec<u32, 8> = CompactVec::new();

        assert!(EMPTY.is_empty());
        assert!(EMPTY.is_inline());
    }

    #[test]
    fn with_capacity() {
        let inline = CompactVec::<u32, 4>::with_capacity(4);

        assert_eq!(Mode::Inline, inline.mode());
        assert_eq!(4, inline.capacity());

        let heap = CompactVec::<u32, 4>::with_capacity(5);

        assert_eq!(Mode::Heap, heap.mode());
        assert_eq!(5, heap.capacity());
        assert!(heap.is_empty());
    }

    #[test]
    fn with_capacity_failure() {
        let allocator = CountingAllocator::with_limit(0);

        let result = CompactVec::<u32, 4, _>::try_with_capacity_in(9, &allocator);

        assert_eq!(Some(CompactVecError::CapacityExceeded { requested: 9 }), result.err());

        let result = CompactVec::<u32, 4>::try_with_capacity_in(State::MAX_LEN + 1, Global);

        assert_eq!(
            Some(CompactVecError::CapacityExceeded {
                requested: State::MAX_LEN + 1
            }),
            result.err()
        );
    }

    #[test]
    fn from_elem_inline() {
        let vec = CompactVec::<u8, 10>::from_elem(100, 10);

        assert_eq!(10, vec.len());
        assert_eq!(Mode::Inline, vec.mode());

        for i in 0..vec.len() {
            assert_eq!(Ok(&100), vec.at(i));
        }
    }

    #[test]
    fn from_elem_heap() {
        let vec = CompactVec::<u8, 10>::from_elem(100, 100);

        assert_eq!(100, vec.len());
        assert_eq!(100, vec.capacity());
        assert_eq!(Mode::Heap, vec.mode());
        assert!(vec.iter().all(|e| *e == 100));
    }

    #[test]
    fn from_elem_strings() {
        let value = "hello_world_hello_world_hello_world_hello_world".to_string();

        for n in [0, 1, 10, 100] {
            let vec = CompactVec::<String, 10>::from_elem(value.clone(), n);

            assert_eq!(n, vec.len());
            assert_eq!(n <= 10, vec.is_inline());
            assert!(vec.iter().all(|e| *e == value));
        }
    }

    #[test]
    fn from_slice() {
        let vec = CompactVec::<i32, 2>::from_slice(&[1, 2, 3]);

        assert_eq!(vec, [1, 2, 3]);
        assert_eq!(3, vec.capacity());
    }

    #[test]
    fn from_iter() {
        let allocator = CountingAllocator::default();

        let vec = CompactVec::<u64, 4, _>::try_from_iter_in(0..10, &allocator).expect("allocation");

        assert_eq!(vec, [0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
        assert_eq!(1, allocator.live());

        drop(vec);

        assert_eq!(0, allocator.live());
    }

    #[test]
    fn macro_forms() {
        let empty: CompactVec<String, 2> = crate::compact_vec![];
        let fill: CompactVec<u8, 4> = crate::compact_vec![7; 3];
        let list: CompactVec<i32, 4> = crate::compact_vec![1, 2, 3,];

        assert!(empty.is_empty());
        assert_eq!(fill, [7, 7, 7]);
        assert_eq!(list, [1, 2, 3]);
    }

    #[test]
    fn default_capacity() {
        assert_eq!(2 * mem::size_of::<usize>(), default_inline_capacity::<u8>());
        assert_eq!(2 * mem::size_of::<usize>() / 4, default_inline_capacity::<u32>());
        assert_eq!(0, default_inline_capacity::<[u8; 1024]>());
        assert_eq!(2 * mem::size_of::<usize>(), default_inline_capacity::<()>());

        let vec = CompactVec::<u8, { default_inline_capacity::<u8>() }>::new();

        assert!(mem::size_of_val(&vec) <= 3 * mem::size_of::<usize>());
    }
} // mod creation_tests

//
//  Queries
//

impl<T, const N: usize, A> CompactVec<T, N, A>
where
    A: Allocator,
{
    /// Returns the number of elements.
    #[inline]
    pub const fn len(&self) -> usize {
        self.state.len()
    }

    /// Returns whether there are no elements.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// Returns the number of elements the vector can hold without allocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        //  Safety:
        //  -   The mode is that of the live arm, as per Tagged Invariant.
        unsafe { self.storage.capacity(self.mode()) }
    }

    /// Returns the maximum number of elements the vector could ever hold.
    ///
    /// This is a limit of the length encoding; the allocator may well fail much before it is reached.
    #[inline]
    pub const fn max_size(&self) -> usize {
        Self::MAX_SIZE
    }

    /// Returns the inline capacity, `N`.
    #[inline]
    pub const fn inline_capacity(&self) -> usize {
        N
    }

    /// Returns where the elements are currently stored.
    #[inline]
    pub const fn mode(&self) -> Mode {
        self.state.mode()
    }

    /// Returns whether the elements are currently stored inline.
    #[inline]
    pub const fn is_inline(&self) -> bool {
        matches!(self.mode(), Mode::Inline)
    }

    /// Returns the length and mode, together.
    #[inline]
    pub const fn state(&self) -> State {
        self.state.unpack()
    }

    /// Returns a reference to the allocator.
    #[inline]
    pub const fn allocator(&self) -> &A {
        &self.allocator
    }
}

//
//  Element access
//

impl<T, const N: usize, A> CompactVec<T, N, A>
where
    A: Allocator,
{
    /// Returns a pointer to the first element.
    ///
    /// The pointer is invalidated by any operation which may reallocate, or moving the vector.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        //  Safety:
        //  -   The mode is that of the live arm, as per Tagged Invariant.
        unsafe { self.storage.as_ptr(self.mode()) }
    }

    /// Returns a pointer to the first element.
    ///
    /// The pointer is invalidated by any operation which may reallocate, or moving the vector.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        let mode = self.mode();

        //  Safety:
        //  -   The mode is that of the live arm, as per Tagged Invariant.
        unsafe { self.storage.as_mut_ptr(mode) }
    }

    /// Returns the elements, as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        //  Safety:
        //  -   The pointer is non-null and aligned, even when the inline buffer is empty.
        //  -   The first `len` elements are initialized, as per Initialized Invariant.
        unsafe { slice::from_raw_parts(self.as_ptr(), self.len()) }
    }

    /// Returns the elements, as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        let len = self.len();

        //  Safety:
        //  -   The pointer is non-null and aligned, even when the inline buffer is empty.
        //  -   The first `len` elements are initialized, as per Initialized Invariant.
        unsafe { slice::from_raw_parts_mut(self.as_mut_ptr(), len) }
    }

    /// Returns a reference to the element at `index`.
    ///
    /// Returns an error if `index` is greater than or equal to the length.
    ///
    /// #   Examples
    ///
    /// ```
    /// #   use compact_vec::{CompactVec, CompactVecError};
    /// let vec: CompactVec<u8, 4> = CompactVec::from_slice(&[1, 2, 3]);
    ///
    /// assert_eq!(Ok(&3), vec.at(2));
    /// assert_eq!(Err(CompactVecError::IndexOutOfRange { index: 3, len: 3 }), vec.at(3));
    /// ```
    #[inline]
    pub fn at(&self, index: usize) -> Result<&T, CompactVecError> {
        let len = self.len();

        self.as_slice()
            .get(index)
            .ok_or(CompactVecError::IndexOutOfRange { index, len })
    }

    /// Returns a mutable reference to the element at `index`.
    ///
    /// Returns an error if `index` is greater than or equal to the length.
    #[inline]
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, CompactVecError> {
        let len = self.len();

        self.as_mut_slice()
            .get_mut(index)
            .ok_or(CompactVecError::IndexOutOfRange { index, len })
    }

    /// Returns the first element, if any.
    #[inline]
    pub fn front(&self) -> Option<&T> {
        self.as_slice().first()
    }

    /// Returns the first element, if any.
    #[inline]
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.as_mut_slice().first_mut()
    }

    /// Returns the last element, if any.
    #[inline]
    pub fn back(&self) -> Option<&T> {
        self.as_slice().last()
    }

    /// Returns the last element, if any.
    #[inline]
    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.as_mut_slice().last_mut()
    }

    /// Forces the length of the vector to `len`.
    ///
    /// #   Safety
    ///
    /// -   Bounded: `len` must be less than or equal to `self.capacity()`.
    /// -   Initialized: the first `len` elements must be initialized.
    ///
    /// Elements beyond `len`, if any, are forgotten rather than dropped.
    #[inline]
    pub unsafe fn set_len(&mut self, len: usize) {
        debug_assert!(len <= self.capacity(), "{len} > {}", self.capacity());

        //  Safety:
        //  -   `len` <= capacity <= `State::MAX_LEN`, as per Bounded pre-condition.
        self.state = unsafe { self.state.with_len(len) };
    }
}

// mod access_tests

//
//  Mutation
//

impl<T, const N: usize, A> CompactVec<T, N, A>
where
    A: Allocator,
{
    /// Appends `value` at the back.
    ///
    /// Returns an error, dropping `value`, if the capacity cannot be increased.
    pub fn try_push(&mut self, value: T) -> Result<(), CompactVecError> {
        let len = self.len();

        //  No overflow: `len` <= `State::MAX_LEN` < `usize::MAX`.
        self.grow_for(len + 1)?;

        let mode = self.mode();

        //  Safety:
        //  -   The mode is that of the live arm, as per Tagged Invariant.
        //  -   `len` is strictly less than the capacity, as just ensured.
        unsafe { self.storage.construct_at(mode, len, value) };

        //  Safety:
        //  -   Bounded & Initialized: slot `len` was just initialized.
        unsafe { self.set_len(len + 1) };

        Ok(())
    }

    /// Appends `value` at the back.
    ///
    /// #   Panics
    ///
    /// If the capacity cannot be increased.
    pub fn push(&mut self, value: T) {
        if let Err(error) = self.try_push(value) {
            handle_error(error);
        }
    }

    /// Removes the last element, and returns it, if any.
    pub fn pop(&mut self) -> Option<T> {
        let len = self.len().checked_sub(1)?;

        //  Safety:
        //  -   Bounded & Initialized: shrinking.
        unsafe { self.set_len(len) };

        //  Safety:
        //  -   The mode is that of the live arm, as per Tagged Invariant.
        //  -   Slot `len` is initialized, and now beyond the length.
        Some(unsafe { self.storage.read_at(self.mode(), len) })
    }

    /// Inserts the element produced by `f` at `index`, shifting all elements after it.
    ///
    /// `f` is only invoked once the capacity is secured, and its result is constructed directly in place. Returns a
    /// reference to the inserted element.
    ///
    /// Returns an error if `index` is greater than the length, or if the capacity cannot be increased; `f` is not
    /// invoked then.
    pub fn try_emplace<F>(&mut self, index: usize, f: F) -> Result<&mut T, CompactVecError>
    where
        F: FnOnce() -> T,
    {
        let len = self.check_position(index)?;

        self.grow_for(len + 1)?;

        let value = f();

        let mode = self.mode();
        let base = self.as_mut_ptr();

        //  Safety:
        //  -   [index, len) is initialized, and [index + 1, len + 1) is within capacity, as just ensured.
        unsafe { lifecycle::shift_range(base.add(index), base.add(index + 1), len - index) };

        //  Safety:
        //  -   The mode is that of the live arm, as per Tagged Invariant.
        //  -   `index` is in bounds, and its element was just shifted away.
        unsafe { self.storage.construct_at(mode, index, value) };

        //  Safety:
        //  -   Bounded & Initialized: [0, len + 1) is initialized.
        unsafe { self.set_len(len + 1) };

        //  `base` is invalidated by the borrows above.
        //
        //  Safety:
        //  -   `index` is in bounds, and initialized.
        Ok(unsafe { &mut *self.as_mut_ptr().add(index) })
    }

    /// Inserts `value` at `index`, shifting all elements after it.
    ///
    /// Returns an error if `index` is greater than the length, or if the capacity cannot be increased.
    pub fn try_insert(&mut self, index: usize, value: T) -> Result<(), CompactVecError> {
        self.try_emplace(index, || value).map(|_| ())
    }

    /// Inserts `value` at `index`, shifting all elements after it.
    ///
    /// #   Panics
    ///
    /// If `index` is greater than the length, or if the capacity cannot be increased.
    pub fn insert(&mut self, index: usize, value: T) {
        if let Err(error) = self.try_insert(index, value) {
            handle_error(error);
        }
    }

    /// Inserts `n` clones of `value` at `index`, shifting all elements after it.
    ///
    /// Returns an error if `index` is greater than the length, or if the capacity cannot be increased.
    pub fn try_insert_n(&mut self, index: usize, n: usize, value: &T) -> Result<(), CompactVecError>
    where
        T: Clone,
    {
        let len = self.check_position(index)?;

        if n == 0 {
            return Ok(());
        }

        let new_len = Self::required_len(len, n)?;

        self.grow_for(new_len)?;

        let base = self.as_mut_ptr();

        //  Safety:
        //  -   [len, new_len) is within capacity, as just ensured.
        unsafe { lifecycle::fill_range(base.add(len), n, value) };

        //  Safety:
        //  -   Bounded & Initialized: [len, new_len) was just initialized.
        unsafe { self.set_len(new_len) };

        self.as_mut_slice()[index..].rotate_right(n);

        Ok(())
    }

    /// Inserts clones of the elements of `values` at `index`, shifting all elements after it.
    ///
    /// Inserting an empty slice is a no-op. Returns an error if `index` is greater than the length, or if the capacity
    /// cannot be increased.
    pub fn try_insert_slice(&mut self, index: usize, values: &[T]) -> Result<(), CompactVecError>
    where
        T: Clone,
    {
        let len = self.check_position(index)?;

        if values.is_empty() {
            return Ok(());
        }

        let new_len = Self::required_len(len, values.len())?;

        self.grow_for(new_len)?;

        let base = self.as_mut_ptr();

        //  Clone at the back first, so that a panicking clone leaves the vector untouched.
        //
        //  Safety:
        //  -   [len, new_len) is within capacity, as just ensured, and cannot overlap with `values`, borrowed.
        unsafe { lifecycle::clone_range(values, base.add(len)) };

        //  Safety:
        //  -   Bounded & Initialized: [len, new_len) was just initialized.
        unsafe { self.set_len(new_len) };

        self.as_mut_slice()[index..].rotate_right(values.len());

        Ok(())
    }

    /// Inserts copies of the elements of `values` at `index`, shifting all elements after it.
    ///
    /// Similar to `try_insert_slice`, but copies all elements in bulk.
    pub fn try_insert_copy_slice(&mut self, index: usize, values: &[T]) -> Result<(), CompactVecError>
    where
        T: Copy,
    {
        let len = self.check_position(index)?;

        if values.is_empty() {
            return Ok(());
        }

        let new_len = Self::required_len(len, values.len())?;

        self.grow_for(new_len)?;

        let base = self.as_mut_ptr();

        //  Safety:
        //  -   [index, len) is initialized, and [index + n, new_len) is within capacity, as just ensured.
        //  -   [index, index + n) is within capacity, and cannot overlap with `values`, borrowed.
        unsafe {
            lifecycle::shift_range(base.add(index), base.add(index + values.len()), len - index);
            lifecycle::copy_range(values, base.add(index));
        }

        //  Safety:
        //  -   Bounded & Initialized: [0, new_len) is initialized.
        unsafe { self.set_len(new_len) };

        Ok(())
    }

    /// Inserts the elements of `iter` at `index`, shifting all elements after it.
    ///
    /// Returns the number of elements inserted.
    ///
    /// Returns an error if `index` is greater than the length, or if the capacity cannot be increased; any element
    /// already taken from `iter` is dropped then. The elements are left as they were, and so is an inline vector;
    /// a vector already on the heap may however keep the larger block obtained while iterating.
    pub fn try_insert_iter<I>(&mut self, index: usize, iter: I) -> Result<usize, CompactVecError>
    where
        I: IntoIterator<Item = T>,
    {
        let entry = self.state();
        let len = self.check_position(index)?;

        let iter = iter.into_iter();

        let (lower, _) = iter.size_hint();

        self.grow_for(len.saturating_add(lower))?;

        {
            let guard = RollbackOnDrop { vec: self, entry };

            for value in iter {
                guard.vec.try_push(value)?;
            }

            mem::forget(guard);
        }

        let inserted = self.len() - len;

        self.as_mut_slice()[index..].rotate_right(inserted);

        Ok(inserted)
    }

    /// Removes the element at `index`, shifting all elements after it, and returns it.
    ///
    /// Returns an error if `index` is greater than or equal to the length.
    pub fn erase(&mut self, index: usize) -> Result<T, CompactVecError> {
        let len = self.len();

        if index >= len {
            return Err(CompactVecError::IndexOutOfRange { index, len });
        }

        //  Safety:
        //  -   The mode is that of the live arm, as per Tagged Invariant.
        //  -   `index` is in bounds, and initialized.
        let value = unsafe { self.storage.read_at(self.mode(), index) };

        let base = self.as_mut_ptr();

        //  Safety:
        //  -   [index + 1, len) is initialized, [index, len - 1) is within capacity.
        unsafe { lifecycle::shift_range(base.add(index + 1), base.add(index), len - index - 1) };

        //  Safety:
        //  -   Bounded & Initialized: [0, len - 1) is initialized.
        unsafe { self.set_len(len - 1) };

        Ok(value)
    }

    /// Removes the elements in `[first, last)`, shifting all elements after them.
    ///
    /// Returns an error if `first` is greater than `last`, or if `last` is greater than the length.
    ///
    /// #   Examples
    ///
    /// ```
    /// #   use compact_vec::{CompactVec, CompactVecError};
    /// let mut vec: CompactVec<u32, 4> = (0..10).collect();
    ///
    /// vec.erase_range(2, 5).expect("valid range");
    ///
    /// assert_eq!(vec, [0, 1, 5, 6, 7, 8, 9]);
    /// assert_eq!(Err(CompactVecError::InvalidRange { start: 3, end: 1 }), vec.erase_range(3, 1));
    /// ```
    pub fn erase_range(&mut self, first: usize, last: usize) -> Result<(), CompactVecError> {
        if first > last {
            return Err(CompactVecError::InvalidRange { start: first, end: last });
        }

        let len = self.len();

        if last > len {
            return Err(CompactVecError::IndexOutOfRange { index: last, len });
        }

        let erased = last - first;

        if erased == 0 {
            return Ok(());
        }

        //  Should a drop panic, forget the tail rather than risk dropping anything twice.
        //
        //  Safety:
        //  -   Bounded & Initialized: shrinking.
        unsafe { self.set_len(first) };

        let base = self.as_mut_ptr();

        //  Safety:
        //  -   [first, last) is initialized, and exclusively accessible.
        //  -   [last, len) is initialized, and [first, len - erased) is within capacity.
        unsafe {
            lifecycle::destroy_range(base.add(first), erased);
            lifecycle::shift_range(base.add(last), base.add(first), len - last);
        }

        //  Safety:
        //  -   Bounded & Initialized: [0, len - erased) is initialized.
        unsafe { self.set_len(len - erased) };

        Ok(())
    }

    /// Shortens the vector to `len` elements, dropping the others.
    ///
    /// Has no effect if `len` is greater than or equal to the current length. Never releases memory.
    pub fn truncate(&mut self, len: usize) {
        let old_len = self.len();

        if len >= old_len {
            return;
        }

        //  Safety:
        //  -   Bounded & Initialized: shrinking.
        unsafe { self.set_len(len) };

        let base = self.as_mut_ptr();

        //  Safety:
        //  -   [len, old_len) is initialized, and no longer accessible.
        unsafe { lifecycle::destroy_range(base.add(len), old_len - len) };
    }

    /// Drops all elements. Never releases memory.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Resizes the vector to `new_len`, appending clones of `value` or dropping trailing elements as necessary.
    ///
    /// Returns an error if the capacity cannot be increased.
    pub fn try_resize(&mut self, new_len: usize, value: T) -> Result<(), CompactVecError>
    where
        T: Clone,
    {
        let len = self.len();

        if new_len <= len {
            self.truncate(new_len);
            return Ok(());
        }

        self.grow_for(new_len)?;

        let base = self.as_mut_ptr();

        //  Safety:
        //  -   [len, new_len - 1) is within capacity, as just ensured.
        unsafe { lifecycle::fill_range(base.add(len), new_len - 1 - len, &value) };

        let mode = self.mode();

        //  Safety:
        //  -   The mode is that of the live arm, as per Tagged Invariant.
        //  -   `new_len - 1` is within capacity, as just ensured.
        unsafe { self.storage.construct_at(mode, new_len - 1, value) };

        //  Safety:
        //  -   Bounded & Initialized: [len, new_len) was just initialized.
        unsafe { self.set_len(new_len) };

        Ok(())
    }

    /// Resizes the vector to `new_len`, appending clones of `value` or dropping trailing elements as necessary.
    ///
    /// #   Panics
    ///
    /// If the capacity cannot be increased.
    pub fn resize(&mut self, new_len: usize, value: T)
    where
        T: Clone,
    {
        if let Err(error) = self.try_resize(new_len, value) {
            handle_error(error);
        }
    }

    /// Resizes the vector to `new_len`, appending elements produced by `f` or dropping trailing elements as necessary.
    ///
    /// Returns an error if the capacity cannot be increased.
    pub fn try_resize_with<F>(&mut self, new_len: usize, f: F) -> Result<(), CompactVecError>
    where
        F: FnMut() -> T,
    {
        let len = self.len();

        if new_len <= len {
            self.truncate(new_len);
            return Ok(());
        }

        self.grow_for(new_len)?;

        let base = self.as_mut_ptr();

        //  Safety:
        //  -   [len, new_len) is within capacity, as just ensured.
        unsafe { lifecycle::construct_range_with(base.add(len), new_len - len, f) };

        //  Safety:
        //  -   Bounded & Initialized: [len, new_len) was just initialized.
        unsafe { self.set_len(new_len) };

        Ok(())
    }

    /// Appends clones of the elements of `values`.
    ///
    /// Returns an error if the capacity cannot be increased.
    pub fn try_extend_from_slice(&mut self, values: &[T]) -> Result<(), CompactVecError>
    where
        T: Clone,
    {
        self.try_insert_slice(self.len(), values)
    }

    /// Appends clones of the elements of `values`.
    ///
    /// #   Panics
    ///
    /// If the capacity cannot be increased.
    pub fn extend_from_slice(&mut self, values: &[T])
    where
        T: Clone,
    {
        if let Err(error) = self.try_extend_from_slice(values) {
            handle_error(error);
        }
    }

    /// Appends the elements of `iter`.
    ///
    /// Returns an error if the capacity cannot be increased, in which case the elements are left unchanged. See
    /// `try_insert_iter` for the capacity.
    pub fn try_extend<I>(&mut self, iter: I) -> Result<(), CompactVecError>
    where
        I: IntoIterator<Item = T>,
    {
        self.try_insert_iter(self.len(), iter).map(|_| ())
    }

    /// Replaces the content of the vector with `n` clones of `value`.
    ///
    /// Returns an error if the capacity cannot be increased, in which case the vector is left unchanged.
    pub fn try_assign_n(&mut self, n: usize, value: T) -> Result<(), CompactVecError>
    where
        T: Clone,
    {
        self.grow_for(n)?;

        self.clear();

        self.try_resize(n, value)
    }

    /// Replaces the content of the vector with clones of the elements of `values`.
    ///
    /// Returns an error if the capacity cannot be increased, in which case the vector is left unchanged.
    pub fn try_assign_slice(&mut self, values: &[T]) -> Result<(), CompactVecError>
    where
        T: Clone,
    {
        self.grow_for(values.len())?;

        self.clear();

        self.try_extend_from_slice(values)
    }

    /// Replaces the content of the vector with the elements of `iter`.
    ///
    /// Returns an error if the capacity cannot be increased, in which case the vector is left unchanged.
    pub fn try_assign_iter<I>(&mut self, iter: I) -> Result<(), CompactVecError>
    where
        I: IntoIterator<Item = T>,
        A: Clone,
    {
        *self = Self::try_from_iter_in(iter, self.allocator.clone())?;

        Ok(())
    }
}

//
//  Implementation details.
//

impl<T, const N: usize, A> CompactVec<T, N, A>
where
    A: Allocator,
{
    //  Checks that `index` is a valid insertion position, returns the current length.
    #[inline]
    fn check_position(&self, index: usize) -> Result<usize, CompactVecError> {
        let len = self.len();

        if index > len {
            return Err(CompactVecError::IndexOutOfRange { index, len });
        }

        Ok(len)
    }

    //  Returns the length after appending `additional` elements.
    #[inline]
    fn required_len(len: usize, additional: usize) -> Result<usize, CompactVecError> {
        len.checked_add(additional).ok_or(CompactVecError::CapacityExceeded {
            requested: usize::MAX,
        })
    }
}

//  Truncates the vector back to its `entry` length, and moves it back inline if it was, unless forgotten.
struct RollbackOnDrop<'a, T, const N: usize, A>
where
    A: Allocator,
{
    vec: &'a mut CompactVec<T, N, A>,
    entry: State,
}

impl<T, const N: usize, A> Drop for RollbackOnDrop<'_, T, N, A>
where
    A: Allocator,
{
    fn drop(&mut self) {
        self.vec.truncate(self.entry.len());

        if self.entry.is_inline() && !self.vec.is_inline() {
            //  Safety:
            //  -   On the heap, with a length which fitted inline on entry.
            unsafe { self.vec.move_inline() };
        }
    }
}

#[cfg(test)]
mod mutation_tests {
    use std::{
        panic::{AssertUnwindSafe, catch_unwind},
        string::{String, ToString},
        vec::Vec,
    };

    use crate::utils::testing::{CountingAllocator, DropCounter};

    use super::*;

    #[test]
    fn push_migrates() {
        let mut vec = CompactVec::<u8, 4>::new();

        for byte in 1..=4 {
            vec.push(byte);
        }

        assert_eq!(Mode::Inline, vec.mode());
        assert_eq!(4, vec.capacity());

        vec.push(5);

        assert_eq!(Mode::Heap, vec.mode());
        assert_eq!(5, vec.len());
        assert!(vec.capacity() >= 5);
        assert_eq!(vec, [1, 2, 3, 4, 5]);
    }

    #[test]
    fn push_pop_sequence() {
        let mut vec = CompactVec::<u32, 3>::new();
        let mut reference = Vec::new();

        for i in 0..50u32 {
            if i % 3 == 2 {
                assert_eq!(reference.pop(), vec.pop());
            } else {
                vec.push(i);
                reference.push(i);
            }

            assert_eq!(reference.len(), vec.len());
        }

        for (i, expected) in reference.iter().enumerate() {
            assert_eq!(Ok(expected), vec.at(i));
        }

        while vec.pop().is_some() {}

        assert!(vec.is_empty());
        assert_eq!(None, vec.pop());
    }

    #[test]
    fn push_geometric_growth() {
        let mut vec = CompactVec::<u32, 3>::new();
        let mut capacities = Vec::new();

        for i in 0..20 {
            vec.push(i);

            if capacities.last() != Some(&vec.capacity()) {
                capacities.push(vec.capacity());
            }
        }

        assert_eq!([3, 6, 12, 24], &capacities[..]);
    }

    #[test]
    fn push_failure() {
        let allocator = CountingAllocator::with_limit(0);

        let mut vec = CompactVec::<u32, 2, _>::new_in(&allocator);

        vec.push(1);
        vec.push(2);

        assert_eq!(Err(CompactVecError::CapacityExceeded { requested: 4 }), vec.try_push(3));
        assert_eq!(vec, [1, 2]);
        assert_eq!(Mode::Inline, vec.mode());
    }

    #[test]
    #[should_panic(expected = "capacity of 4 elements cannot be satisfied")]
    fn push_failure_panics() {
        let allocator = CountingAllocator::with_limit(0);

        let mut vec = CompactVec::<u32, 2, _>::new_in(&allocator);

        vec.extend([1, 2, 3]);
    }

    #[test]
    fn insert_erase_restores() {
        let original = [1u32, 2, 3, 4, 5, 6];

        for index in [0, 3, 6] {
            for inline in [false, true] {
                let mut vec = CompactVec::<u32, 8>::from_slice(&original);

                if !inline {
                    vec.reserve(9);
                }

                vec.insert(index, 42);

                assert_eq!(7, vec.len());
                assert_eq!(Ok(&42), vec.at(index));

                assert_eq!(Ok(42), vec.erase(index));
                assert_eq!(vec, original);
            }
        }
    }

    #[test]
    fn insert_position_out_of_range() {
        let mut vec = CompactVec::<u32, 4>::from_slice(&[1, 2]);

        assert_eq!(
            Err(CompactVecError::IndexOutOfRange { index: 3, len: 2 }),
            vec.try_insert(3, 0)
        );
        assert_eq!(
            Err(CompactVecError::IndexOutOfRange { index: 3, len: 2 }),
            vec.try_insert_slice(3, &[])
        );
        assert_eq!(vec, [1, 2]);
    }

    #[test]
    fn emplace() {
        let mut vec = CompactVec::<String, 2>::new();

        vec.push(String::from("a"));
        vec.push(String::from("c"));

        let inserted = vec.try_emplace(1, || String::from("b")).expect("success");

        inserted.push('!');

        assert_eq!(vec, ["a", "b!", "c"]);
    }

    #[test]
    fn emplace_inline_reference() {
        let mut vec = CompactVec::<u32, 4>::new();

        vec.push(1);
        vec.push(3);

        *vec.try_emplace(1, || 2).expect("success") += 40;

        assert_eq!(Mode::Inline, vec.mode());
        assert_eq!(vec, [1, 42, 3]);

        *vec.try_emplace(3, || 4).expect("success") += 1;

        assert_eq!(vec, [1, 42, 3, 5]);
    }

    #[test]
    fn emplace_failure_skips_construction() {
        let allocator = CountingAllocator::with_limit(0);

        let mut vec = CompactVec::<u32, 1, _>::new_in(&allocator);

        vec.push(1);

        let mut invoked = false;

        let result = vec.try_emplace(0, || {
            invoked = true;
            0
        });

        assert!(result.is_err());
        assert!(!invoked);
        assert_eq!(vec, [1]);
    }

    #[test]
    fn insert_n() {
        let mut vec = CompactVec::<u32, 4>::from_slice(&[1, 2, 3]);

        vec.try_insert_n(1, 3, &0).expect("success");

        assert_eq!(vec, [1, 0, 0, 0, 2, 3]);

        vec.try_insert_n(6, 0, &9).expect("success");

        assert_eq!(6, vec.len());
    }

    #[test]
    fn insert_slices() {
        let mut vec = CompactVec::<String, 4>::new();

        vec.try_insert_slice(0, &[String::from("x"), String::from("y")]).expect("success");
        vec.try_insert_slice(1, &[String::from("1"), String::from("2"), String::from("3")]).expect("success");
        vec.try_insert_slice(5, &[]).expect("success");

        assert_eq!(vec, ["x", "1", "2", "3", "y"]);

        let mut copies = CompactVec::<u8, 4>::from_slice(&[1, 2]);

        copies.try_insert_copy_slice(1, &[7, 8, 9]).expect("success");
        copies.try_insert_copy_slice(0, &[]).expect("success");

        assert_eq!(copies, [1, 7, 8, 9, 2]);
    }

    #[test]
    fn insert_slice_panicking_clone() {
        let counter = DropCounter::with_clone_budget(1);

        let mut vec = CompactVec::<_, 4>::new();

        vec.push(counter.track(0));

        let values = [counter.track(1), counter.track(2)];

        let result = catch_unwind(AssertUnwindSafe(|| vec.try_insert_slice(0, &values)));

        assert!(result.is_err());
        assert_eq!(1, vec.len());
        assert_eq!(0, *vec[0].value());
        assert_eq!(1, counter.dropped());
    }

    #[test]
    fn insert_iter() {
        let mut vec = CompactVec::<u32, 2>::from_slice(&[1, 5]);

        assert_eq!(Ok(3), vec.try_insert_iter(1, 2..5));
        assert_eq!(vec, [1, 2, 3, 4, 5]);

        assert_eq!(Ok(0), vec.try_insert_iter(5, core::iter::empty()));
    }

    #[test]
    fn insert_iter_rollback() {
        let allocator = CountingAllocator::with_limit(0);

        let mut vec = CompactVec::<u32, 2, _>::new_in(&allocator);

        vec.push(1);

        //  `filter` hides its length, so that growth happens while iterating.
        let result = vec.try_insert_iter(0, (0..100).filter(|_| true));

        assert_eq!(Some(CompactVecError::CapacityExceeded { requested: 4 }), result.err());
        assert_eq!(vec, [1]);
    }

    #[test]
    fn insert_iter_rollback_moves_back_inline() {
        let allocator = CountingAllocator::with_limit(1);

        let mut vec = CompactVec::<u32, 2, _>::new_in(&allocator);

        vec.push(1);

        //  Grows to 4 while iterating, then fails to grow to 8.
        let result = vec.try_extend((0..100).filter(|_| true));

        assert_eq!(Some(CompactVecError::CapacityExceeded { requested: 8 }), result.err());
        assert_eq!(vec, [1]);
        assert_eq!(Mode::Inline, vec.mode());
        assert_eq!(2, vec.capacity());
        assert_eq!(1, allocator.allocations());
        assert_eq!(0, allocator.live());
    }

    #[test]
    fn insert_iter_rollback_on_heap() {
        let counter = DropCounter::new();
        let allocator = CountingAllocator::with_limit(2);

        let mut vec = CompactVec::<_, 2, _>::new_in(&allocator);

        vec.reserve(3);
        vec.push(counter.track(1));

        //  Grows from 3 to 6 while iterating, then fails to grow to 12.
        let result = vec.try_insert_iter(0, (0..100).map(|i| counter.track(i)).filter(|_| true));

        assert_eq!(Some(CompactVecError::CapacityExceeded { requested: 12 }), result.err());
        assert_eq!(1, vec.len());
        assert_eq!(1, *vec[0].value());
        assert_eq!(Mode::Heap, vec.mode());
        assert_eq!(6, vec.capacity());
        assert_eq!(1, allocator.live());

        //  The 6 elements taken from the iterator, including the one refused, are all dropped.
        assert_eq!(6, counter.dropped());
    }

    #[test]
    fn erase_out_of_range() {
        let mut vec = CompactVec::<u32, 2>::from_slice(&[1, 2]);

        assert_eq!(Err(CompactVecError::IndexOutOfRange { index: 2, len: 2 }), vec.erase(2));
        assert_eq!(
            Err(CompactVecError::IndexOutOfRange { index: 3, len: 2 }),
            vec.erase_range(1, 3)
        );
        assert_eq!(
            Err(CompactVecError::InvalidRange { start: 2, end: 1 }),
            vec.erase_range(2, 1)
        );
        assert_eq!(vec, [1, 2]);
    }

    #[test]
    fn erase_range() {
        let mut vec: CompactVec<u32, 4> = (0..10).collect();

        vec.erase_range(2, 5).expect("valid range");

        assert_eq!(vec, [0, 1, 5, 6, 7, 8, 9]);
        assert_eq!(7, vec.len());

        vec.erase_range(3, 3).expect("empty range");
        vec.erase_range(5, 7).expect("tail");

        assert_eq!(vec, [0, 1, 5, 6, 7]);

        vec.erase_range(0, 5).expect("everything");

        assert!(vec.is_empty());
    }

    #[test]
    fn erase_range_drops() {
        let counter = DropCounter::new();

        let mut vec = CompactVec::<_, 2>::new();

        for i in 0..6 {
            vec.push(counter.track(i));
        }

        vec.erase_range(1, 4).expect("valid range");

        assert_eq!(3, counter.dropped());
        assert_eq!([0, 4, 5], vec.iter().map(|e| *e.value()).collect::<Vec<_>>()[..]);

        drop(vec);

        assert_eq!(6, counter.dropped());
    }

    #[test]
    fn truncate_clear_keep_storage() {
        let counter = DropCounter::new();

        let mut vec = CompactVec::<_, 2>::new();

        for i in 0..5 {
            vec.push(counter.track(i));
        }

        let capacity = vec.capacity();

        vec.truncate(7);
        vec.truncate(3);

        assert_eq!(2, counter.dropped());
        assert_eq!(capacity, vec.capacity());

        vec.clear();

        assert_eq!(5, counter.dropped());
        assert_eq!(Mode::Heap, vec.mode());
        assert_eq!(capacity, vec.capacity());
    }

    #[test]
    fn resize() {
        let mut vec = CompactVec::<String, 2>::new();

        vec.resize(3, String::from("a"));

        assert_eq!(vec, ["a", "a", "a"]);
        assert_eq!(4, vec.capacity());

        vec.resize(1, String::from("b"));

        assert_eq!(vec, ["a"]);

        let mut next = 0;

        vec.try_resize_with(3, || {
            next += 1;
            next.to_string()
        })
        .expect("success");

        assert_eq!(vec, ["a", "1", "2"]);
    }

    #[test]
    fn assign() {
        let mut vec = CompactVec::<u32, 2>::from_slice(&[1, 2]);

        vec.try_assign_n(4, 7).expect("success");

        assert_eq!(vec, [7, 7, 7, 7]);

        vec.try_assign_slice(&[1, 2, 3]).expect("success");

        assert_eq!(vec, [1, 2, 3]);

        vec.try_assign_iter(10..12).expect("success");

        assert_eq!(vec, [10, 11]);
        assert_eq!(Mode::Inline, vec.mode());
    }

    #[test]
    fn assign_failure() {
        let allocator = CountingAllocator::with_limit(0);

        let mut vec = CompactVec::<u32, 2, _>::new_in(&allocator);

        vec.push(1);

        assert!(vec.try_assign_n(3, 7).is_err());
        assert!(vec.try_assign_slice(&[1, 2, 3]).is_err());
        assert!(vec.try_assign_iter(0..3).is_err());
        assert_eq!(vec, [1]);
    }

    #[test]
    fn extend() {
        let mut vec = CompactVec::<u32, 2>::new();

        vec.extend_from_slice(&[1, 2]);
        vec.extend(&[3, 4]);
        vec.extend(5..7);

        assert_eq!(vec, [1, 2, 3, 4, 5, 6]);
    }
} // mod mutation_tests

//
//  Common traits
//

impl<T, const N: usize, A> Clone for CompactVec<T, N, A>
where
    T: Clone,
    A: Allocator + Clone,
{
    fn clone(&self) -> Self {
        Self::try_from_slice_in(self, self.allocator.clone()).unwrap_or_else(|e| handle_error(e))
    }
}

impl<T, const N: usize, A> Drop for CompactVec<T, N, A>
where
    A: Allocator,
{
    fn drop(&mut self) {
        let state = self.state();

        let base = self.as_mut_ptr();

        //  Safety:
        //  -   [0, len) is initialized, as per Initialized Invariant, and no longer accessible.
        unsafe { lifecycle::destroy_range(base, state.len()) };

        if let Mode::Heap = state.mode() {
            //  Safety:
            //  -   The heap arm is live, as per Tagged Invariant.
            let block = unsafe { self.storage.take_heap_block() };

            //  Safety:
            //  -   `block` was allocated by `self.allocator`, as per Owned Invariant.
            unsafe { block.deallocate(&self.allocator) };
        }
    }
}

impl<T, const N: usize, A> fmt::Debug for CompactVec<T, N, A>
where
    T: fmt::Debug,
    A: Allocator,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        fmt::Debug::fmt(self.as_slice(), f)
    }
}

impl<T, const N: usize, A> Default for CompactVec<T, N, A>
where
    A: Allocator + Default,
{
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<T, const N: usize, A> Deref for CompactVec<T, N, A>
where
    A: Allocator,
{
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, const N: usize, A> DerefMut for CompactVec<T, N, A>
where
    A: Allocator,
{
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, const N: usize, A> AsRef<[T]> for CompactVec<T, N, A>
where
    A: Allocator,
{
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, const N: usize, A> AsMut<[T]> for CompactVec<T, N, A>
where
    A: Allocator,
{
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, const N: usize, A> Borrow<[T]> for CompactVec<T, N, A>
where
    A: Allocator,
{
    fn borrow(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, const N: usize, A> BorrowMut<[T]> for CompactVec<T, N, A>
where
    A: Allocator,
{
    fn borrow_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, I, const N: usize, A> Index<I> for CompactVec<T, N, A>
where
    I: SliceIndex<[T]>,
    A: Allocator,
{
    type Output = I::Output;

    #[inline]
    fn index(&self, index: I) -> &Self::Output {
        Index::index(self.as_slice(), index)
    }
}

impl<T, I, const N: usize, A> IndexMut<I> for CompactVec<T, N, A>
where
    I: SliceIndex<[T]>,
    A: Allocator,
{
    #[inline]
    fn index_mut(&mut self, index: I) -> &mut Self::Output {
        IndexMut::index_mut(self.as_mut_slice(), index)
    }
}

impl<T, const N: usize, A> Eq for CompactVec<T, N, A>
where
    T: Eq,
    A: Allocator,
{
}

impl<T, const N: usize, A> Hash for CompactVec<T, N, A>
where
    T: Hash,
    A: Allocator,
{
    fn hash<H>(&self, state: &mut H)
    where
        H: Hasher,
    {
        self.as_slice().hash(state);
    }
}

impl<T, const N: usize, A> Ord for CompactVec<T, N, A>
where
    T: Ord,
    A: Allocator,
{
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

impl<T, const N: usize, A> PartialOrd for CompactVec<T, N, A>
where
    T: PartialOrd,
    A: Allocator,
{
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        self.as_slice().partial_cmp(other.as_slice())
    }
}

impl<T, U, const N: usize, const M: usize, A, B> PartialEq<CompactVec<U, M, B>> for CompactVec<T, N, A>
where
    T: PartialEq<U>,
    A: Allocator,
    B: Allocator,
{
    fn eq(&self, other: &CompactVec<U, M, B>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T, U, const N: usize, A> PartialEq<[U]> for CompactVec<T, N, A>
where
    T: PartialEq<U>,
    A: Allocator,
{
    fn eq(&self, other: &[U]) -> bool {
        self.as_slice() == other
    }
}

impl<T, U, const N: usize, A> PartialEq<&[U]> for CompactVec<T, N, A>
where
    T: PartialEq<U>,
    A: Allocator,
{
    fn eq(&self, other: &&[U]) -> bool {
        self.as_slice() == *other
    }
}

impl<T, U, const N: usize, const P: usize, A> PartialEq<[U; P]> for CompactVec<T, N, A>
where
    T: PartialEq<U>,
    A: Allocator,
{
    fn eq(&self, other: &[U; P]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T, U, const N: usize, const P: usize, A> PartialEq<&[U; P]> for CompactVec<T, N, A>
where
    T: PartialEq<U>,
    A: Allocator,
{
    fn eq(&self, other: &&[U; P]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

//  Safety:
//  -   Just like a `Vec<T, A>`.
unsafe impl<T, const N: usize, A> Send for CompactVec<T, N, A>
where
    T: Send,
    A: Allocator + Send,
{
}

unsafe impl<T, const N: usize, A> Sync for CompactVec<T, N, A>
where
    T: Sync,
    A: Allocator + Sync,
{
}

//
//  Conversions
//

impl<T, const N: usize, const P: usize, A> From<[T; P]> for CompactVec<T, N, A>
where
    A: Allocator + Default,
{
    fn from(array: [T; P]) -> Self {
        let mut this = Self::try_with_capacity_in(P, A::default()).unwrap_or_else(|e| handle_error(e));

        let array = ManuallyDrop::new(array);

        //  Safety:
        //  -   `array` holds `P` initialized elements, which are forgotten.
        //  -   The vector is empty, with a capacity of at least `P`.
        unsafe { lifecycle::relocate_range(array.as_ptr(), this.as_mut_ptr(), P) };

        //  Safety:
        //  -   Bounded & Initialized: [0, P) was just initialized.
        unsafe { this.set_len(P) };

        this
    }
}

impl<T, const N: usize, A> From<&[T]> for CompactVec<T, N, A>
where
    T: Clone,
    A: Allocator + Default,
{
    fn from(slice: &[T]) -> Self {
        Self::try_from_slice_in(slice, A::default()).unwrap_or_else(|e| handle_error(e))
    }
}

impl<T, const N: usize, A> FromIterator<T> for CompactVec<T, N, A>
where
    A: Allocator + Default,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        Self::try_from_iter_in(iter, A::default()).unwrap_or_else(|e| handle_error(e))
    }
}

impl<T, const N: usize, A> Extend<T> for CompactVec<T, N, A>
where
    A: Allocator,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        if let Err(error) = self.try_extend(iter) {
            handle_error(error);
        }
    }
}

impl<'a, T, const N: usize, A> Extend<&'a T> for CompactVec<T, N, A>
where
    T: Copy + 'a,
    A: Allocator,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = &'a T>,
    {
        self.extend(iter.into_iter().copied());
    }
}

impl<'a, T, const N: usize, A> IntoIterator for &'a CompactVec<T, N, A>
where
    A: Allocator,
{
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<'a, T, const N: usize, A> IntoIterator for &'a mut CompactVec<T, N, A>
where
    A: Allocator,
{
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_mut_slice().iter_mut()
    }
}

// mod traits_tests
