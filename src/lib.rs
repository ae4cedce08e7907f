//! A vector storing its first elements inline, and spilling to the heap beyond.
//!
//! #   Organization
//!
//! This crate is composed of two top modules:
//!
//! -   The `collections` module contains `CompactVec`, and its owning iterator.
//! -   The `utils` module contains a selection of low-level types upon which `CompactVec` is built.
//!
//! The most commonly used items are re-exported at the root.
//!
//!
//! #   Storage
//!
//! A `CompactVec<T, N>` holds up to `N` elements in a buffer embedded within the collection itself, and only allocates
//! once it needs to hold more. It then behaves as a regular vector, growing geometrically, until explicitly shrunk.
//!
//! The discriminant between the inline and heap storage is packed in the top bit of the length. A collection with an
//! inline capacity of `default_inline_capacity::<T>()` is thus no larger than three words, and creating an empty one
//! is a `const` operation.
//!
//! #### Why not an enum?
//!
//! An enum would store its discriminant separately, growing the footprint by a word, for a bit which is otherwise
//! never used: no collection can hold more than `isize::MAX` bytes anyway.
//!
//!
//! #   Errors
//!
//! Every operation which may fail comes in two flavors:
//!
//! -   A `try_*` flavor, returning `Result<_, CompactVecError>`.
//! -   A convenience flavor, panicking on error, mirroring `Vec`.
//!
//! In either case, a failed operation leaves the elements of the collection as they were. Only `try_insert_iter`, and
//! the `try_extend` family built upon it, may keep a larger heap block obtained midway on a vector already on the heap.
//!
//!
//! #   Features
//!
//! -   `allocator_api`: forwards to the unstable allocator API of the standard library, rather than a local shim.
//! -   `serde`: implements `Serialize` and `Deserialize`, as a plain sequence.
//!
//!
//! #   Examples
//!
//! ```
//! use compact_vec::{CompactVec, Mode, compact_vec};
//!
//! let mut vec: CompactVec<u8, 4> = compact_vec![1, 2, 3];
//!
//! vec.push(4);
//!
//! assert_eq!(Mode::Inline, vec.mode());
//!
//! vec.insert(0, 0);
//!
//! assert_eq!(Mode::Heap, vec.mode());
//! assert_eq!(vec, [0, 1, 2, 3, 4]);
//!
//! vec.truncate(2);
//! vec.shrink_to_fit();
//!
//! assert_eq!(Mode::Inline, vec.mode());
//! ```

#![cfg_attr(not(test), no_std)]
//  Features (language)
//  Features (library)
#![cfg_attr(feature = "allocator_api", feature(allocator_api))]
//  Lints
#![deny(missing_docs)]
//  This author prefers to keep its test modules close to what they are testing.
#![allow(clippy::items_after_test_module)]

extern crate alloc;

pub mod collections;
pub mod utils;

pub use collections::{CompactVec, IntoIter, default_inline_capacity};
pub use utils::{CompactVecError, Mode};
