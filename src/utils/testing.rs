//  Test helpers: an element type tracking its drops, and an allocator tracking its blocks.

use core::{alloc::Layout, cell::Cell, ptr::NonNull};

use std::rc::Rc;

use crate::utils::alloc::{AllocError, Allocator, Global};

//
//  Tracked elements.
//

#[derive(Debug)]
struct Counters {
    dropped: Cell<usize>,
    clones_left: Cell<usize>,
}

/// Shared counters of a family of `Tracked` elements.
#[derive(Clone, Debug)]
pub(crate) struct DropCounter(Rc<Counters>);

impl DropCounter {
    /// Creates a counter whose elements may be cloned without limit.
    pub(crate) fn new() -> Self {
        Self::with_clone_budget(usize::MAX)
    }

    /// Creates a counter whose elements panic on clone once `budget` clones have been made.
    pub(crate) fn with_clone_budget(budget: usize) -> Self {
        Self(Rc::new(Counters {
            dropped: Cell::new(0),
            clones_left: Cell::new(budget),
        }))
    }

    /// Creates a new tracked element.
    pub(crate) fn track<T>(&self, value: T) -> Tracked<T> {
        Tracked {
            value,
            counters: self.0.clone(),
        }
    }

    /// Returns the number of tracked elements dropped so far.
    pub(crate) fn dropped(&self) -> usize {
        self.0.dropped.get()
    }
}

/// An element which counts its drops.
#[derive(Debug)]
pub(crate) struct Tracked<T> {
    value: T,
    counters: Rc<Counters>,
}

impl<T> Tracked<T> {
    pub(crate) fn value(&self) -> &T {
        &self.value
    }
}

impl<T> Clone for Tracked<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        let left = self.counters.clones_left.get();

        assert!(left > 0, "clone budget exhausted");

        self.counters.clones_left.set(left - 1);

        Self {
            value: self.value.clone(),
            counters: self.counters.clone(),
        }
    }
}

impl<T> Drop for Tracked<T> {
    fn drop(&mut self) {
        self.counters.dropped.set(self.counters.dropped.get() + 1);
    }
}

//
//  Counting allocator.
//

/// An allocator counting its live blocks, and optionally failing after a number of allocations.
#[derive(Debug)]
pub(crate) struct CountingAllocator {
    allocations: Cell<usize>,
    deallocations: Cell<usize>,
    limit: usize,
}

impl CountingAllocator {
    /// Creates an allocator which fails once `limit` allocations have been made.
    pub(crate) fn with_limit(limit: usize) -> Self {
        Self {
            allocations: Cell::new(0),
            deallocations: Cell::new(0),
            limit,
        }
    }

    /// Returns the number of successful allocations so far.
    pub(crate) fn allocations(&self) -> usize {
        self.allocations.get()
    }

    /// Returns the number of blocks currently allocated.
    pub(crate) fn live(&self) -> usize {
        self.allocations.get() - self.deallocations.get()
    }
}

impl Default for CountingAllocator {
    fn default() -> Self {
        Self::with_limit(usize::MAX)
    }
}

//  Safety:
//  -   Liveness, Independence, Shallowness: forwarded to `Global`.
unsafe impl Allocator for CountingAllocator {
    fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        if self.allocations.get() >= self.limit {
            return Err(AllocError);
        }

        let block = Global.allocate(layout)?;

        self.allocations.set(self.allocations.get() + 1);

        Ok(block)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        self.deallocations.set(self.deallocations.get() + 1);

        //  Safety:
        //  -   Forward pre-conditions, as blocks are allocated by `Global`.
        unsafe { Global.deallocate(ptr, layout) }
    }
}
