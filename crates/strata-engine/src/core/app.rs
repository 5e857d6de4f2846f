use crate::surface::Surface;

use super::ctx::FrameCtx;
use super::renderer::Renderer;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by headless drivers.
pub trait App<S: Surface> {
    /// Called once before the first frame, with the scene still unpainted.
    fn on_start(&mut self, renderer: &mut Renderer<S>) {
        let _ = renderer;
    }

    /// Called after every painted frame.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, S>) -> AppControl;
}
