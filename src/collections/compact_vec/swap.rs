//  Exchange of the contents of two vectors.
//
//  Since any value may be relocated bitwise, `mem::swap` would do. Dispatching on the modes however only moves live
//  elements, rather than whole inline buffers, and keeps heap blocks where they are.

use core::{mem, ptr};

use crate::utils::{Mode, alloc::Allocator, lifecycle, storage::Storage};

use super::CompactVec;

impl<T, const N: usize, A> CompactVec<T, N, A>
where
    A: Allocator,
{
    /// Exchanges the elements, storage, and allocators of `self` and `other`.
    ///
    /// Never allocates, and never clones or drops any element.
    ///
    /// #   Examples
    ///
    /// ```
    /// #   use compact_vec::{CompactVec, Mode};
    /// let mut a: CompactVec<u32, 2> = CompactVec::from_slice(&[1]);
    /// let mut b: CompactVec<u32, 2> = CompactVec::from_slice(&[2, 3, 4]);
    ///
    /// a.swap_with(&mut b);
    ///
    /// assert_eq!((Mode::Heap, Mode::Inline), (a.mode(), b.mode()));
    /// assert_eq!(a, [2, 3, 4]);
    /// assert_eq!(b, [1]);
    /// ```
    pub fn swap_with(&mut self, other: &mut Self) {
        let (self_mode, other_mode) = (self.mode(), other.mode());

        match (self_mode, other_mode) {
            (Mode::Heap, Mode::Heap) => {
                mem::swap(&mut self.storage, &mut other.storage);
                mem::swap(&mut self.state, &mut other.state);
            }
            //  Safety:
            //  -   Both are inline.
            (Mode::Inline, Mode::Inline) => unsafe { Self::swap_inline(self, other) },
            //  Safety:
            //  -   The first is on the heap, the second inline.
            (Mode::Heap, Mode::Inline) => unsafe { Self::swap_mixed(self, other) },
            //  Safety:
            //  -   The first is on the heap, the second inline.
            (Mode::Inline, Mode::Heap) => unsafe { Self::swap_mixed(other, self) },
        }

        mem::swap(&mut self.allocator, &mut other.allocator);

        debug_assert_eq!(other_mode, self.mode());
        debug_assert_eq!(self_mode, other.mode());
    }
}

//
//  Implementation details.
//

impl<T, const N: usize, A> CompactVec<T, N, A>
where
    A: Allocator,
{
    //  Swaps the elements of two inline vectors.
    //
    //  #   Safety
    //
    //  -   Inline: both `a` and `b` must be inline.
    unsafe fn swap_inline(a: &mut Self, b: &mut Self) {
        debug_assert!(a.is_inline() && b.is_inline());

        let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };

        let (short_len, long_len) = (short.len(), long.len());

        let short_ptr = short.as_mut_ptr();
        let long_ptr = long.as_mut_ptr();

        //  Safety:
        //  -   [0, short_len) is initialized in both, and distinct buffers never overlap.
        //  -   [short_len, long_len) is initialized in `long`, and within the inline capacity of `short`.
        unsafe {
            ptr::swap_nonoverlapping(short_ptr, long_ptr, short_len);
            lifecycle::relocate_range(long_ptr.add(short_len), short_ptr.add(short_len), long_len - short_len);
        }

        mem::swap(&mut short.state, &mut long.state);
    }

    //  Swaps the elements of a heap vector and an inline vector.
    //
    //  #   Safety
    //
    //  -   Heap: `heap` must be on the heap.
    //  -   Inline: `inline` must be inline.
    unsafe fn swap_mixed(heap: &mut Self, inline: &mut Self) {
        debug_assert!(!heap.is_inline() && inline.is_inline());

        //  Safety:
        //  -   The heap arm is live, as per Heap pre-condition.
        let block = unsafe { heap.storage.take_heap_block() };

        //  Safety:
        //  -   The inline arm of `heap` is now live.
        let destination = unsafe { heap.storage.inline_ptr() };

        //  Safety:
        //  -   [0, len) of `inline` is initialized, and fits in the inline buffer of `heap`.
        unsafe { lifecycle::relocate_range(inline.as_ptr(), destination, inline.len()) };

        inline.storage = Storage::heap(block);

        mem::swap(&mut heap.state, &mut inline.state);
    }
}

// mod tests
