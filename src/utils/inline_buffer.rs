//  See `InlineBuffer`.

use core::mem::MaybeUninit;

/// A buffer of `N` slots of `T`, stored inline.
///
/// The buffer does not track which slots are initialized: it never drops any element, it is up to its owner to do so.
#[repr(transparent)]
pub struct InlineBuffer<T, const N: usize>([MaybeUninit<T>; N]);

impl<T, const N: usize> InlineBuffer<T, N> {
    /// The number of slots in the buffer.
    pub const CAPACITY: usize = N;

    /// Creates a buffer, with all slots uninitialized.
    #[inline]
    pub const fn new() -> Self {
        Self([const { MaybeUninit::uninit() }; N])
    }

    /// Returns a pointer to the first slot.
    #[inline]
    pub const fn as_ptr(&self) -> *const T {
        self.0.as_ptr().cast()
    }

    /// Returns a pointer to the first slot.
    #[inline]
    pub const fn as_mut_ptr(&mut self) -> *mut T {
        self.0.as_mut_ptr().cast()
    }

    /// Constructs an element in the slot at `index`.
    ///
    /// If the slot was already initialized, its previous element is leaked.
    ///
    /// #   Panics
    ///
    /// If `index` is out of bounds.
    #[inline]
    pub fn construct_at(&mut self, index: usize, value: T) {
        self.0[index].write(value);
    }

    /// Reads the element in the slot at `index`.
    ///
    /// #   Safety
    ///
    /// -   In-bounds: `index` must be strictly less than `N`.
    /// -   Initialized: the slot at `index` must be initialized.
    ///
    /// The slot is logically uninitialized afterwards, unless the element is `Copy`.
    #[inline]
    pub unsafe fn read_at(&self, index: usize) -> T {
        debug_assert!(index < N, "{index} >= {N}");

        //  Safety:
        //  -   `index` is in bounds, as per In-bounds pre-condition.
        let slot = unsafe { self.0.get_unchecked(index) };

        //  Safety:
        //  -   `slot` is initialized, as per Initialized pre-condition.
        unsafe { slot.assume_init_read() }
    }
}

impl<T, const N: usize> Default for InlineBuffer<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

// mod tests
