//! Fixed-capacity ring buffers
//!
//! Both rings overwrite their oldest element once full and expose their
//! contents in logical order, either by iteration or as a [`TwoSpan`] that
//! avoids copying when the contents wrap.

mod cursor;

pub mod circular;
pub mod circular_slim;
pub mod two_span;

// Re-export main types
pub use circular::CircularBuffer;
pub use circular_slim::CircularBufferSlim;
pub use two_span::{TwoSpan, TwoSpanMut};
