//! Platform abstraction layer
//!
//! Host-side plumbing that turns raw device signals into simulation input:
//! - Input debouncing (taps, clicks, key presses → one jump per frame)
//! - Frame timing (monotonic timestamps → elapsed seconds)

pub mod input;
pub mod time;

pub use input::JumpDebouncer;
pub use time::FrameClock;
