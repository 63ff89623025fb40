//! Frame loop: time, color, and render scheduling.

mod driver;

pub use driver::{AnimationDriver, DriverState, FrameTarget};
