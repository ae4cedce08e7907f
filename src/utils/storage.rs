//  See `Storage`.
//
//  #   Why an untagged union?
//
//  The discriminant is already stored, packed with the length, in the `PackedState` of the owning collection. An
//  `enum` would duplicate it, and grow the footprint of the collection by a word.
//
//  In exchange, every accessor takes the `Mode` of the owner, and matches on it prior to touching either arm.

use core::mem::ManuallyDrop;

use crate::utils::{HeapBlock, InlineBuffer, Mode};

//  The storage of a `CompactVec`: either inline, or on the heap.
//
//  The storage does not know which arm is live, nor which slots are initialized; its owner does.
pub(crate) union Storage<T, const N: usize> {
    inline: ManuallyDrop<InlineBuffer<T, N>>,
    heap: ManuallyDrop<HeapBlock<T>>,
}

//
//  Creation
//

impl<T, const N: usize> Storage<T, N> {
    //  Creates an inline storage, with all slots uninitialized.
    #[inline]
    pub(crate) const fn inline() -> Self {
        Self {
            inline: ManuallyDrop::new(InlineBuffer::new()),
        }
    }

    //  Creates a heap storage, taking ownership of `block`.
    #[inline]
    pub(crate) const fn heap(block: HeapBlock<T>) -> Self {
        Self {
            heap: ManuallyDrop::new(block),
        }
    }
}

//
//  Slot access
//
//  #   Safety
//
//  All methods below share a pre-condition:
//
//  -   Mode: `mode` must be the mode of the live arm.
//

impl<T, const N: usize> Storage<T, N> {
    //  Returns a pointer to the first slot.
    #[inline]
    pub(crate) unsafe fn as_ptr(&self, mode: Mode) -> *const T {
        match mode {
            //  Safety:
            //  -   The inline arm is live, as per Mode pre-condition.
            Mode::Inline => unsafe { self.inline.as_ptr() },
            //  Safety:
            //  -   The heap arm is live, as per Mode pre-condition.
            Mode::Heap => unsafe { self.heap.as_ptr().cast_const() },
        }
    }

    //  Returns a pointer to the first slot.
    #[inline]
    pub(crate) unsafe fn as_mut_ptr(&mut self, mode: Mode) -> *mut T {
        match mode {
            //  Safety:
            //  -   The inline arm is live, as per Mode pre-condition.
            Mode::Inline => unsafe { self.inline.as_mut_ptr() },
            //  Safety:
            //  -   The heap arm is live, as per Mode pre-condition.
            Mode::Heap => unsafe { self.heap.as_ptr() },
        }
    }

    //  Returns the number of slots.
    #[inline]
    pub(crate) unsafe fn capacity(&self, mode: Mode) -> usize {
        match mode {
            Mode::Inline => N,
            //  Safety:
            //  -   The heap arm is live, as per Mode pre-condition.
            Mode::Heap => unsafe { self.heap.capacity() },
        }
    }

    //  Constructs an element in the slot at `index`.
    //
    //  #   Safety
    //
    //  -   In-bounds: `index` must be strictly less than `self.capacity(mode)`.
    #[inline]
    pub(crate) unsafe fn construct_at(&mut self, mode: Mode, index: usize, value: T) {
        match mode {
            //  Safety:
            //  -   The inline arm is live, as per Mode pre-condition.
            Mode::Inline => unsafe { self.inline.construct_at(index, value) },
            //  Safety:
            //  -   The heap arm is live, as per Mode pre-condition.
            //  -   `index` is in bounds, as per In-bounds pre-condition.
            Mode::Heap => unsafe { self.heap.construct_at(index, value) },
        }
    }

    //  Reads the element in the slot at `index`, which is logically uninitialized afterwards.
    //
    //  #   Safety
    //
    //  -   In-bounds: `index` must be strictly less than `self.capacity(mode)`.
    //  -   Initialized: the slot at `index` must be initialized.
    #[inline]
    pub(crate) unsafe fn read_at(&self, mode: Mode, index: usize) -> T {
        match mode {
            //  Safety:
            //  -   The inline arm is live, as per Mode pre-condition.
            //  -   `index` is in bounds and initialized, as per In-bounds and Initialized pre-conditions.
            Mode::Inline => unsafe { self.inline.read_at(index) },
            //  Safety:
            //  -   The heap arm is live, as per Mode pre-condition.
            //  -   `index` is in bounds and initialized, as per In-bounds and Initialized pre-conditions.
            Mode::Heap => unsafe { self.heap.read_at(index) },
        }
    }
}

//
//  Arm access
//

impl<T, const N: usize> Storage<T, N> {
    //  Returns a pointer to the first inline slot.
    //
    //  #   Safety
    //
    //  -   Inline: the inline arm must be live.
    #[inline]
    pub(crate) unsafe fn inline_ptr(&mut self) -> *mut T {
        //  Safety:
        //  -   The inline arm is live, as per Inline pre-condition.
        unsafe { self.inline.as_mut_ptr() }
    }

    //  Returns a reference to the heap block.
    //
    //  #   Safety
    //
    //  -   Heap: the heap arm must be live.
    #[inline]
    pub(crate) unsafe fn heap_block(&self) -> &HeapBlock<T> {
        //  Safety:
        //  -   The heap arm is live, as per Heap pre-condition.
        unsafe { &self.heap }
    }

    //  Takes the heap block out, leaving the storage inline.
    //
    //  The inline slots are all uninitialized afterwards.
    //
    //  #   Safety
    //
    //  -   Heap: the heap arm must be live.
    #[inline]
    pub(crate) unsafe fn take_heap_block(&mut self) -> HeapBlock<T> {
        //  Safety:
        //  -   The heap arm is live, as per Heap pre-condition, and is overwritten right after.
        let block = unsafe { ManuallyDrop::take(&mut self.heap) };

        *self = Self::inline();

        block
    }
}

// mod tests
