//  See `HeapBlock`.

use core::{alloc::Layout, mem, ptr::NonNull};

use crate::utils::{CompactVecError, alloc::Allocator};

/// A block of `capacity` slots of `T`, allocated on the heap.
///
/// The block is a raw handle: it neither tracks which slots are initialized, nor releases its memory when dropped. It
/// is up to its owner to do both, with the very allocator which allocated it.
#[derive(Debug, Eq, PartialEq)]
pub struct HeapBlock<T> {
    //  Safety Invariants:
    //  -   Self-Allocated: `ptr` was allocated by `Self::allocate`, for `capacity` elements, unless `T` is zero-sized.
    //  -   Non-Empty: `capacity` is strictly positive.
    ptr: NonNull<T>,
    capacity: usize,
}

impl<T> HeapBlock<T> {
    /// Allocates a block of exactly `capacity` slots with `allocator`.
    ///
    /// Zero-sized types require no memory, and `allocator` is not called upon for them.
    ///
    /// Returns an error if `capacity` is 0, if the layout of `capacity` elements overflows, or if the allocator fails.
    pub fn allocate<A>(allocator: &A, capacity: usize) -> Result<Self, CompactVecError>
    where
        A: ?Sized + Allocator,
    {
        let error = CompactVecError::CapacityExceeded { requested: capacity };

        if capacity == 0 {
            return Err(error);
        }

        if mem::size_of::<T>() == 0 {
            let ptr = NonNull::dangling();

            return Ok(Self { ptr, capacity });
        }

        let layout = Self::layout(capacity).ok_or(error)?;

        let ptr = allocator
            .allocate(layout)
            .map_err(|e| CompactVecError::from_alloc(e, capacity))?;

        Ok(Self {
            ptr: ptr.cast(),
            capacity,
        })
    }

    /// Releases the block.
    ///
    /// Any element still stored in the block is leaked.
    ///
    /// #   Safety
    ///
    /// -   Selfness: `allocator` must be the allocator, or a clone of the allocator, which allocated `self`.
    pub unsafe fn deallocate<A>(self, allocator: &A)
    where
        A: ?Sized + Allocator,
    {
        if mem::size_of::<T>() == 0 {
            return;
        }

        //  Safety:
        //  -   The layout was computed successfully on allocation, as per Self-Allocated Invariant.
        let layout = unsafe { Self::layout(self.capacity).unwrap_unchecked() };

        //  Safety:
        //  -   Liveness: `self.ptr` is allocated, as `self` is consumed.
        //  -   Selfness: as per Selfness pre-condition.
        //  -   Layout: `layout` is the layout computed on allocation, as per Self-Allocated Invariant.
        unsafe { allocator.deallocate(self.ptr.cast(), layout) };
    }

    /// Returns a pointer to the first slot.
    #[inline]
    pub const fn as_ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Returns the number of slots.
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Constructs an element in the slot at `index`.
    ///
    /// If the slot was already initialized, its previous element is leaked.
    ///
    /// #   Safety
    ///
    /// -   In-bounds: `index` must be strictly less than `self.capacity()`.
    #[inline]
    pub unsafe fn construct_at(&mut self, index: usize, value: T) {
        debug_assert!(index < self.capacity, "{index} >= {}", self.capacity);

        //  Safety:
        //  -   `index` is in bounds, as per In-bounds pre-condition, and the block is valid for `capacity` writes, as
        //      per Self-Allocated Invariant.
        unsafe { self.ptr.add(index).write(value) }
    }

    /// Reads the element in the slot at `index`.
    ///
    /// #   Safety
    ///
    /// -   In-bounds: `index` must be strictly less than `self.capacity()`.
    /// -   Initialized: the slot at `index` must be initialized.
    ///
    /// The slot is logically uninitialized afterwards, unless the element is `Copy`.
    #[inline]
    pub unsafe fn read_at(&self, index: usize) -> T {
        debug_assert!(index < self.capacity, "{index} >= {}", self.capacity);

        //  Safety:
        //  -   `index` is in bounds, as per In-bounds pre-condition.
        //  -   The slot is initialized, as per Initialized pre-condition.
        unsafe { self.ptr.add(index).read() }
    }

    //  Returns the layout of a block of `capacity` elements, if it does not overflow.
    fn layout(capacity: usize) -> Option<Layout> {
        debug_assert!(capacity > 0);

        Layout::array::<T>(capacity).ok()
    }
}

// mod tests
