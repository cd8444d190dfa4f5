//! Synchronization primitives.

pub mod queue;

pub use self::queue::Queue;
