//! Shim for unstable allocator API.
//!
//! -   By default, provides a minimal subset of the allocator API, sufficient for `CompactVec`.
//! -   If `allocator_api` is used, then forwards the allocator API.

#[cfg(feature = "allocator_api")]
pub use alloc::alloc::{AllocError, Allocator, Global};

#[cfg(not(feature = "allocator_api"))]
pub use shim::{AllocError, Allocator, Global};

#[cfg(not(feature = "allocator_api"))]
pub(super) mod shim {
    use core::{
        alloc::Layout,
        error, fmt,
        ptr::{self, NonNull},
    };

    use alloc::alloc;

    /// The memory could not be allocated.
    ///
    /// Either the allocator ran out of resources, or it does not support the requested layout.
    #[derive(Copy, Clone, PartialEq, Eq, Debug)]
    pub struct AllocError;

    impl fmt::Display for AllocError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
            f.write_str("memory allocation failed")
        }
    }

    impl error::Error for AllocError {}

    /// A source of memory blocks, described by their `Layout`.
    ///
    /// This is the subset of `core::alloc::Allocator` which `CompactVec` relies upon; enable the `allocator_api`
    /// feature to use the real thing instead.
    ///
    /// #   Safety
    ///
    /// -   Liveness: a block returned by `allocate` stays valid until passed to `deallocate`, or until the allocator and
    ///     all its clones are dropped.
    /// -   Independence: moving the allocator does not invalidate the blocks it handed out.
    /// -   Shallowness: a copied or cloned allocator behaves like the original, and may release its blocks.
    pub unsafe trait Allocator {
        /// Attempts to allocate a block of memory fitting `layout`.
        ///
        /// The block is uninitialized, and may be larger than requested.
        fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError>;

        /// Releases the block of memory `ptr`.
        ///
        /// #   Safety
        ///
        /// -   Liveness: `ptr` must still be allocated.
        /// -   Selfness: `ptr` must have been allocated by `self`, or one of its clones.
        /// -   Layout: `layout` must match the layout passed to `self.allocate(...)` when allocating `ptr`.
        unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);

        /// Creates a "by reference" adapter for this instance of Allocator.
        fn by_ref(&self) -> &Self
        where
            Self: Sized,
        {
            self
        }
    }

    //  Safety:
    //  -   Liveness, Independence, Shallowness: forwarded to `A`, a reference being trivially independent.
    unsafe impl<A> Allocator for &A
    where
        A: ?Sized + Allocator,
    {
        #[inline]
        fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
            (**self).allocate(layout)
        }

        #[inline]
        unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
            //  Safety:
            //  -   Forward pre-conditions.
            unsafe { (**self).deallocate(ptr, layout) }
        }
    }

    /// The global memory allocator.
    #[derive(Copy, Clone, Default, Debug)]
    pub struct Global;

    //  Safety:
    //  -   Liveness, Independence, Shallowness: guaranteed by the global allocator.
    unsafe impl Allocator for Global {
        #[inline]
        fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
            //  Zero-sized types never need memory, and the global allocator must not be asked for 0 bytes.
            if layout.size() == 0 {
                let dangling = NonNull::new(ptr::without_provenance_mut(layout.align())).ok_or(AllocError)?;

                return Ok(NonNull::slice_from_raw_parts(dangling, 0));
            }

            //  Safety:
            //  -   `layout` has a non-zero size.
            let raw_ptr = unsafe { alloc::alloc(layout) };

            let ptr = NonNull::new(raw_ptr).ok_or(AllocError)?;

            Ok(NonNull::slice_from_raw_parts(ptr, layout.size()))
        }

        #[inline]
        unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
            if layout.size() == 0 {
                return;
            }

            //  Safety:
            //  -   `ptr.as_ptr()` is currently allocated, as per Liveness pre-condition.
            //  -   `ptr.as_ptr()` was allocated by `self`, as per Selfness pre-condition.
            //  -   `layout` matches the layout of `ptr.as_ptr()` as per Layout pre-condition.
            unsafe { alloc::dealloc(ptr.as_ptr(), layout) }
        }
    }
} // mod shim

// mod tests
