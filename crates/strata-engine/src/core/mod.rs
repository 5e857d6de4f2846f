//! Host-facing contracts.
//!
//! The host owns the frame loop and calls `Renderer::tick(now)` once per
//! frame; there are no hidden timers. `App` and `run_frames` provide the same
//! loop for headless drivers (tools, tests, the studio binary).

mod app;
mod ctx;
mod renderer;

pub use app::{App, AppControl};
pub use ctx::{run_frames, FrameCtx};
pub use renderer::{FrameResult, Renderer};
