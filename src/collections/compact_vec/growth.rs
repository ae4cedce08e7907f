//  Capacity management: growth, reservation, and shrinking.
//
//  #   Growth policy
//
//  When more room is needed, the capacity is doubled, starting from the current capacity (or 1), until it is
//  sufficient. Explicit reservations, on the other hand, allocate exactly what is asked for.
//
//  The collection only ever moves back inline in `shrink_to_fit`.

use crate::utils::{
    CompactVecError, HeapBlock, Mode, State,
    alloc::Allocator,
    handle_error, lifecycle,
    storage::Storage,
};

use super::CompactVec;

impl<T, const N: usize, A> CompactVec<T, N, A>
where
    A: Allocator,
{
    /// Ensures that the vector can hold at least `capacity` elements in total without reallocating.
    ///
    /// Does nothing if the current capacity is sufficient, otherwise migrates to a heap block of exactly `capacity`.
    ///
    /// Returns an error if the capacity cannot be satisfied, in which case the vector is left unchanged.
    ///
    /// #   Examples
    ///
    /// ```
    /// #   use compact_vec::{CompactVec, Mode};
    /// let mut vec: CompactVec<u32, 4> = CompactVec::new();
    ///
    /// vec.try_reserve(3).expect("inline");
    ///
    /// assert_eq!((Mode::Inline, 4), (vec.mode(), vec.capacity()));
    ///
    /// vec.try_reserve(10).expect("heap");
    ///
    /// assert_eq!((Mode::Heap, 10), (vec.mode(), vec.capacity()));
    /// ```
    pub fn try_reserve(&mut self, capacity: usize) -> Result<(), CompactVecError> {
        if capacity <= self.capacity() {
            return Ok(());
        }

        self.grow_to(capacity)
    }

    /// Ensures that the vector can hold at least `capacity` elements in total without reallocating.
    ///
    /// #   Panics
    ///
    /// If the capacity cannot be satisfied.
    pub fn reserve(&mut self, capacity: usize) {
        if let Err(error) = self.try_reserve(capacity) {
            handle_error(error);
        }
    }

    /// Reduces the capacity as much as possible.
    ///
    /// If on the heap, the elements move back inline if they fit, otherwise to a heap block of exactly `len` elements.
    /// Does nothing if inline, or if the heap block is already exactly `len` elements.
    ///
    /// Returns an error if a smaller block cannot be allocated, in which case the vector is left unchanged.
    pub fn try_shrink_to_fit(&mut self) -> Result<(), CompactVecError> {
        let state = self.state();

        if state.is_inline() {
            return Ok(());
        }

        let len = state.len();

        if len <= N {
            //  Safety:
            //  -   On the heap, with `len` <= `N`.
            unsafe { self.move_inline() };

            return Ok(());
        }

        //  Safety:
        //  -   The heap arm is live, as per Tagged Invariant.
        if len == unsafe { self.storage.heap_block().capacity() } {
            return Ok(());
        }

        let block = HeapBlock::allocate(&self.allocator, len)?;

        //  Safety:
        //  -   `block` was allocated by `self.allocator`, with room for `len` elements.
        unsafe { self.install(block) };

        Ok(())
    }

    /// Reduces the capacity as much as possible.
    ///
    /// #   Panics
    ///
    /// If a smaller block cannot be allocated.
    pub fn shrink_to_fit(&mut self) {
        if let Err(error) = self.try_shrink_to_fit() {
            handle_error(error);
        }
    }
}

//
//  Implementation details.
//

impl<T, const N: usize, A> CompactVec<T, N, A>
where
    A: Allocator,
{
    //  Ensures the vector can hold `required` elements, growing geometrically if necessary.
    #[inline]
    pub(super) fn grow_for(&mut self, required: usize) -> Result<(), CompactVecError> {
        let capacity = self.capacity();

        if required <= capacity {
            return Ok(());
        }

        self.grow_to(grown_capacity(capacity, required)?)
    }

    //  Migrates to a heap block of exactly `capacity` elements.
    #[inline(never)]
    fn grow_to(&mut self, capacity: usize) -> Result<(), CompactVecError> {
        debug_assert!(capacity > self.capacity(), "{capacity} <= {}", self.capacity());

        if capacity > State::MAX_LEN {
            return Err(CompactVecError::CapacityExceeded { requested: capacity });
        }

        let block = HeapBlock::allocate(&self.allocator, capacity)?;

        //  Safety:
        //  -   `block` was allocated by `self.allocator`, with room for more than `len` elements.
        unsafe { self.install(block) };

        Ok(())
    }

    //  Relocates all elements back into the inline buffer, and releases the heap block.
    //
    //  #   Safety
    //
    //  -   Heap: the heap arm must be live.
    //  -   Fits: `self.len()` must be less than or equal to `N`.
    pub(super) unsafe fn move_inline(&mut self) {
        let len = self.len();

        debug_assert!(!self.is_inline() && len <= N);

        //  Safety:
        //  -   The heap arm is live, as per Heap pre-condition.
        let block = unsafe { self.storage.take_heap_block() };

        //  Safety:
        //  -   The inline arm is now live.
        let inline = unsafe { self.storage.inline_ptr() };

        //  Safety:
        //  -   [0, len) of `block` is initialized, as per Initialized Invariant.
        //  -   `len` <= `N`, as per Fits pre-condition, and the inline buffer cannot overlap the heap block.
        unsafe { lifecycle::relocate_range(block.as_ptr(), inline, len) };

        //  Safety:
        //  -   `block` was allocated by `self.allocator`, as per Owned Invariant.
        unsafe { block.deallocate(&self.allocator) };

        //  Safety:
        //  -   `len` <= `N` <= `State::MAX_LEN`.
        self.state = unsafe { State::new_unchecked(len, Mode::Inline) }.pack();
    }

    //  Relocates all elements into `block`, releases the previous heap block if any, and switches to the heap.
    //
    //  #   Safety
    //
    //  -   Owned: `block` must have been allocated by `self.allocator`.
    //  -   Roomy: `block` must have room for at least `self.len()` elements.
    unsafe fn install(&mut self, block: HeapBlock<T>) {
        let state = self.state();

        debug_assert!(state.len() <= block.capacity());

        //  Safety:
        //  -   [0, len) is initialized, as per Initialized Invariant.
        //  -   `block` has room for `len` elements, as per Roomy pre-condition, and is freshly allocated.
        unsafe { lifecycle::relocate_range(self.as_ptr(), block.as_ptr(), state.len()) };

        if let Mode::Heap = state.mode() {
            //  Safety:
            //  -   The heap arm is live, as per Tagged Invariant.
            let previous = unsafe { self.storage.take_heap_block() };

            //  Safety:
            //  -   `previous` was allocated by `self.allocator`, as per Owned Invariant.
            unsafe { previous.deallocate(&self.allocator) };
        }

        self.storage = Storage::heap(block);

        //  Safety:
        //  -   `len` <= capacity <= `State::MAX_LEN`.
        self.state = unsafe { State::new_unchecked(state.len(), Mode::Heap) }.pack();
    }
}

//  Returns the capacity to grow to, from `capacity`, so as to hold at least `required` elements.
fn grown_capacity(capacity: usize, required: usize) -> Result<usize, CompactVecError> {
    debug_assert!(required > capacity);

    if required > State::MAX_LEN {
        return Err(CompactVecError::CapacityExceeded { requested: required });
    }

    let mut result = capacity.max(1);

    while result < required {
        result = result.saturating_mul(2);
    }

    Ok(result.min(State::MAX_LEN))
}

// mod tests
