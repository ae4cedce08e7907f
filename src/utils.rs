//! Low-level building blocks of `CompactVec`.
//!
//! These are exposed for the curious, and for implementers of similar collections. Most users need not bother.

mod error;
mod heap_block;
mod inline_buffer;
mod state;

pub mod alloc;
pub mod lifecycle;

pub(crate) mod storage;

#[cfg(test)]
pub(crate) mod testing;

pub use error::CompactVecError;
pub use heap_block::HeapBlock;
pub use inline_buffer::InlineBuffer;
pub use state::{Mode, PackedState, State};

pub(crate) use error::handle_error;
