//! Small pooled collections

pub mod array_builder;
pub mod packed_bools;
pub mod pooled_list;
pub mod pooled_set;

// Re-export main types
pub use array_builder::ArrayBuilder;
pub use packed_bools::{PackedBools, MAX_BIT_INDEX};
pub use pooled_list::PooledList;
pub use pooled_set::PooledSet;
