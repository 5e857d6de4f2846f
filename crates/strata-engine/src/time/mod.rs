//! Time subsystem.
//!
//! Frame timing without hidden clock reads:
//! - one `FrameClock` per renderer
//! - call `tick(now)` once per frame to obtain `FrameTime`

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
