//  See `State` and `PackedState`.
//
//  #   Why two types?
//
//  The length and the mode are two independent pieces of information, and most of the code is clearer manipulating
//  them as such. Only the container itself, which is sensitive to its footprint, stores the packed form.
//
//
//  #   Why the top bit?
//
//  No collection can ever hold more than `isize::MAX` bytes, hence for any element type larger than a byte the top bit
//  of a `usize` length is never used. Zero-sized types are the exception, and simply get a smaller maximum length.
//
//  The top bit set indicates the heap, so that the all-zeros word is an empty, inline, state. This makes creating an
//  empty collection trivially `const`.

use crate::utils::CompactVecError;

/// The storage mode of a `CompactVec`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Mode {
    /// The elements are stored inline, within the collection.
    Inline,
    /// The elements are stored in a heap allocated block.
    Heap,
}

/// The logical state of a `CompactVec`: its length, and its storage mode.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct State {
    len: usize,
    mode: Mode,
}

impl State {
    /// The maximum length which can be represented.
    pub const MAX_LEN: usize = usize::MAX >> 1;

    /// An empty, inline, state.
    pub const EMPTY: Self = Self {
        len: 0,
        mode: Mode::Inline,
    };

    /// Creates a new state.
    ///
    /// Returns an error if `len` exceeds `Self::MAX_LEN`.
    #[inline]
    pub const fn new(len: usize, mode: Mode) -> Result<Self, CompactVecError> {
        if len > Self::MAX_LEN {
            return Err(CompactVecError::CapacityExceeded { requested: len });
        }

        Ok(Self { len, mode })
    }

    /// Creates a new state, without checking the length.
    ///
    /// #   Safety
    ///
    /// -   Bounded: `len` must be less than or equal to `Self::MAX_LEN`.
    #[inline]
    pub const unsafe fn new_unchecked(len: usize, mode: Mode) -> Self {
        debug_assert!(len <= Self::MAX_LEN);

        Self { len, mode }
    }

    /// Returns the length.
    #[inline]
    pub const fn len(self) -> usize {
        self.len
    }

    /// Returns whether the length is 0.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.len == 0
    }

    /// Returns the mode.
    #[inline]
    pub const fn mode(self) -> Mode {
        self.mode
    }

    /// Returns whether the mode is `Mode::Inline`.
    #[inline]
    pub const fn is_inline(self) -> bool {
        matches!(self.mode, Mode::Inline)
    }

    /// Returns the packed representation of this state.
    #[inline]
    pub const fn pack(self) -> PackedState {
        PackedState::pack(self)
    }
}

impl Default for State {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// The packed representation of a `State`, in a single word.
///
/// The bottom bits hold the length, the top bit is set for `Mode::Heap`.
///
/// #   Examples
///
/// ```
/// #   use compact_vec::utils::{Mode, PackedState, State};
/// let state = State::new(5, Mode::Heap).expect("small length");
///
/// let packed = state.pack();
///
/// assert_eq!(5 | (1 << (usize::BITS - 1)), packed.into_raw());
/// assert_eq!(state, packed.unpack());
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[repr(transparent)]
pub struct PackedState(usize);

impl PackedState {
    //  Bit set when on the heap.
    const HEAP_BIT: usize = !State::MAX_LEN;

    /// An empty, inline, state.
    pub const EMPTY: Self = Self(0);

    /// Packs a state into a single word.
    #[inline]
    pub const fn pack(state: State) -> Self {
        match state.mode {
            Mode::Inline => Self(state.len),
            Mode::Heap => Self(state.len | Self::HEAP_BIT),
        }
    }

    /// Unpacks the state.
    #[inline]
    pub const fn unpack(self) -> State {
        State {
            len: self.len(),
            mode: self.mode(),
        }
    }

    /// Returns the length, without unpacking the mode.
    #[inline]
    pub const fn len(self) -> usize {
        self.0 & State::MAX_LEN
    }

    /// Returns whether the length is 0.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// Returns the mode, without unpacking the length.
    #[inline]
    pub const fn mode(self) -> Mode {
        if self.0 & Self::HEAP_BIT == 0 {
            Mode::Inline
        } else {
            Mode::Heap
        }
    }

    /// Returns a copy of this state, with a different length but the same mode.
    ///
    /// #   Safety
    ///
    /// -   Bounded: `len` must be less than or equal to `State::MAX_LEN`.
    #[inline]
    pub const unsafe fn with_len(self, len: usize) -> Self {
        debug_assert!(len <= State::MAX_LEN);

        Self((self.0 & Self::HEAP_BIT) | len)
    }

    /// Returns the raw word.
    #[inline]
    pub const fn into_raw(self) -> usize {
        self.0
    }
}

impl From<State> for PackedState {
    fn from(state: State) -> Self {
        state.pack()
    }
}

impl From<PackedState> for State {
    fn from(packed: PackedState) -> Self {
        packed.unpack()
    }
}

// mod tests
