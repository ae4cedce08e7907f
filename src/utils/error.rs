//  Errors.

use core::{error, fmt};

use crate::utils::alloc::AllocError;

/// An error in manipulating a `CompactVec`.
///
/// Whenever an operation returns an error, the elements of the collection are left as they were prior to the call.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum CompactVecError {
    /// The index is not within the bounds of the collection.
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// The length of the collection, at the time of the call.
        len: usize,
    },
    /// The requested capacity could not be obtained.
    ///
    /// Either because it exceeds the maximum length, because the memory layout overflows, or because the allocator
    /// failed to provide the memory.
    CapacityExceeded {
        /// The number of elements requested.
        requested: usize,
    },
    /// The start of the range is strictly after its end.
    InvalidRange {
        /// The start of the range.
        start: usize,
        /// The end of the range.
        end: usize,
    },
}

impl CompactVecError {
    //  Attaches the requested capacity to an allocation failure.
    pub(crate) fn from_alloc(_: AllocError, requested: usize) -> Self {
        Self::CapacityExceeded { requested }
    }
}

impl fmt::Display for CompactVecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            Self::IndexOutOfRange { index, len } => write!(f, "index {index} out of range for length {len}"),
            Self::CapacityExceeded { requested } => write!(f, "capacity of {requested} elements cannot be satisfied"),
            Self::InvalidRange { start, end } => write!(f, "range starts at {start} but ends at {end}"),
        }
    }
}

impl error::Error for CompactVecError {}

//  Panics with the given error.
//
//  Out-of-line, so that the panicking convenience methods stay small.
#[cold]
#[inline(never)]
#[track_caller]
pub(crate) fn handle_error(error: CompactVecError) -> ! {
    panic!("{error}")
}

// mod tests
