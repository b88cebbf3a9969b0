//! Specialized data structures
//!
//! - **[`sliding_window`]**: bounded FIFO of recent samples with a rolling
//!   mean, used for response-time statistics

pub mod sliding_window;

pub use sliding_window::SlidingWindow;
