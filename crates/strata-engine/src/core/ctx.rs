use std::time::Instant;

use crate::scene::Storage;
use crate::surface::Surface;
use crate::time::FrameTime;

use super::app::{App, AppControl};
use super::renderer::{FrameResult, Renderer};

/// Per-frame context passed to `App::on_frame`.
pub struct FrameCtx<'a, S> {
    pub renderer: &'a mut Renderer<S>,
    /// Outcome of the tick that produced this frame.
    pub frame: FrameResult,
}

impl<'a, S: Surface> FrameCtx<'a, S> {
    #[inline]
    pub fn time(&self) -> FrameTime {
        self.frame.time
    }

    #[inline]
    pub fn storage(&mut self) -> &mut Storage {
        self.renderer.storage_mut()
    }
}

/// Drives `app` with one tick per timestamp until it exits or `frames` runs
/// out. Returns the number of frames ticked.
pub fn run_frames<S, A, I>(app: &mut A, renderer: &mut Renderer<S>, frames: I) -> u64
where
    S: Surface,
    A: App<S> + ?Sized,
    I: IntoIterator<Item = Instant>,
{
    let mut frames = frames.into_iter().peekable();
    if frames.peek().is_none() {
        return 0;
    }
    app.on_start(renderer);

    let mut count = 0;
    for now in frames {
        let frame = renderer.tick(now);
        count += 1;
        let mut ctx = FrameCtx { renderer: &mut *renderer, frame };
        if app.on_frame(&mut ctx) == AppControl::Exit {
            log::debug!("app exited after {count} frame(s)");
            break;
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::render::RendererConfig;
    use crate::scene::Node;
    use crate::scene::shapes::Rect;
    use crate::surface::RecordingSurface;

    struct Grow {
        id: Option<crate::scene::NodeId>,
        frames: Vec<FrameResult>,
        stop_after: usize,
    }

    impl App<RecordingSurface> for Grow {
        fn on_start(&mut self, renderer: &mut Renderer<RecordingSurface>) {
            let storage = renderer.storage_mut();
            let id = storage.insert(Node::shape(Rect::new(0.0, 0.0, 4.0, 4.0)));
            storage.add_root(id).unwrap();
            self.id = Some(id);
        }

        fn on_frame(&mut self, ctx: &mut FrameCtx<'_, RecordingSurface>) -> AppControl {
            self.frames.push(ctx.frame);
            let x = self.frames.len() as f64;
            if let Some(id) = self.id {
                if let Some(node) = ctx.storage().node_mut(id) {
                    node.set_position(x, 0.0);
                }
            }
            if self.frames.len() >= self.stop_after { AppControl::Exit } else { AppControl::Continue }
        }
    }

    fn timeline(n: u32) -> Vec<Instant> {
        let t0 = Instant::now();
        (0..n).map(|i| t0 + Duration::from_millis(16 * i as u64)).collect()
    }

    #[test]
    fn runs_until_exit() {
        let mut renderer = Renderer::<RecordingSurface>::new(&RendererConfig::default());
        let mut app = Grow { id: None, frames: Vec::new(), stop_after: 3 };
        let n = run_frames(&mut app, &mut renderer, timeline(10));
        assert_eq!(n, 3);
        assert!(app.frames.iter().all(|f| f.refreshed));
        assert_eq!(app.frames[2].time.frame_index, 2);
        assert_eq!(app.frames[1].time.dt, Duration::from_millis(16));
    }

    #[test]
    fn empty_timeline_runs_nothing() {
        let mut renderer = Renderer::<RecordingSurface>::new(&RendererConfig::default());
        let mut app = Grow { id: None, frames: Vec::new(), stop_after: 3 };
        assert_eq!(run_frames(&mut app, &mut renderer, Vec::new()), 0);
        assert!(app.id.is_none());
    }
}
