//! Command dispatch between tasks.

pub mod queue;

pub use queue::CommandQueue;
