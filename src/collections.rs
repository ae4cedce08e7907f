//! Implementations of small-buffer collections.

//  Design considerations
//
//  #   Why no default for `N`?
//
//  A const generic parameter may only default to a constant, not to an expression depending on another parameter. The
//  default inline capacity is therefore provided as `default_inline_capacity::<T>()`, for use at the declaration site.

pub mod compact_vec;

pub use compact_vec::{CompactVec, IntoIter, default_inline_capacity};
