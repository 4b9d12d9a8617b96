//! Ownership wrappers over pooled memory
//!
//! [`MemoryOwner`] ties a pool lease to a logical length. [`SpanOwner`] is
//! its scoped counterpart that either leases from a pool or adopts a
//! caller-supplied slice, with one disposal contract for both.

pub mod memory_owner;
pub mod span_owner;

pub use memory_owner::MemoryOwner;
pub use span_owner::SpanOwner;
