use crate::geom::arc;
use crate::surface::Surface;

use super::proxy::{ellipse_point, PathProxy};
use super::PathBuilder;

/// A `PathProxy` bound to a live surface for one build pass.
///
/// Every call is recorded into the proxy and forwarded to the surface:
/// - `line_to` below the proxy's unit threshold is recorded but not drawn;
///   the farthest skipped point is drawn before the next non-line command
///   or at [`finish`](Self::finish)
/// - with a dash pattern set on the proxy and a surface lacking native
///   dashing, lines, curves, rects and closes are split into dashes
pub struct BoundPath<'a, S: Surface + ?Sized> {
    proxy: &'a mut PathProxy,
    surface: &'a mut S,
    software_dash: bool,
    pending: Option<(f64, f64, f64)>,
}

impl<'a, S: Surface + ?Sized> BoundPath<'a, S> {
    pub(crate) fn new(proxy: &'a mut PathProxy, surface: &'a mut S) -> Self {
        let software_dash = proxy.has_dash() && !surface.supports_line_dash();
        Self {
            proxy,
            surface,
            software_dash,
            pending: None,
        }
    }

    /// True when dashes are produced by path decomposition.
    #[inline]
    pub fn is_software_dashed(&self) -> bool {
        self.software_dash
    }

    /// Flushes the pending sub-pixel point and ends the build pass.
    pub fn finish(mut self) {
        self.flush_pending();
    }

    fn flush_pending(&mut self) {
        if let Some((x, y, _)) = self.pending.take() {
            self.surface.line_to(x, y);
        }
    }

    fn dashed_line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64) {
        if let Some(d) = self.proxy.dasher_mut() {
            d.line(&mut *self.surface, x0, y0, x1, y1);
        }
    }

    fn reset_dash(&mut self) {
        if let Some(d) = self.proxy.dasher_mut() {
            d.reset();
        }
    }
}

impl<S: Surface + ?Sized> PathBuilder for BoundPath<'_, S> {
    fn begin_path(&mut self) {
        self.pending = None;
        self.proxy.begin_path();
        self.surface.begin_path();
        self.reset_dash();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.flush_pending();
        self.proxy.move_to(x, y);
        self.surface.move_to(x, y);
        self.reset_dash();
    }

    fn line_to(&mut self, x: f64, y: f64) {
        let c = self.proxy.cursor();
        let exceed = self.proxy.exceeds_unit(x, y);
        self.proxy.line_to(x, y);

        if exceed {
            self.pending = None;
            if self.software_dash {
                self.dashed_line(c.xi, c.yi, x, y);
            } else {
                self.surface.line_to(x, y);
            }
        } else {
            let dx = x - c.xi;
            let dy = y - c.yi;
            let d2 = dx * dx + dy * dy;
            if self.pending.is_none_or(|(_, _, best)| d2 > best) {
                self.pending = Some((x, y, d2));
            }
        }
    }

    fn bezier_curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) {
        self.flush_pending();
        let c = self.proxy.cursor();
        self.proxy.bezier_curve_to(x1, y1, x2, y2, x, y);
        if self.software_dash {
            if let Some(d) = self.proxy.dasher_mut() {
                d.cubic(&mut *self.surface, c.xi, c.yi, x1, y1, x2, y2, x, y);
            }
        } else {
            self.surface.bezier_curve_to(x1, y1, x2, y2, x, y);
        }
    }

    fn quadratic_curve_to(&mut self, x1: f64, y1: f64, x: f64, y: f64) {
        self.flush_pending();
        let c = self.proxy.cursor();
        self.proxy.quadratic_curve_to(x1, y1, x, y);
        if self.software_dash {
            // Elevate to a cubic so a single dashing routine serves both.
            let (cx1, cy1) = (c.xi + 2.0 / 3.0 * (x1 - c.xi), c.yi + 2.0 / 3.0 * (y1 - c.yi));
            let (cx2, cy2) = (x + 2.0 / 3.0 * (x1 - x), y + 2.0 / 3.0 * (y1 - y));
            if let Some(d) = self.proxy.dasher_mut() {
                d.cubic(&mut *self.surface, c.xi, c.yi, cx1, cy1, cx2, cy2, x, y);
            }
        } else {
            self.surface.quadratic_curve_to(x1, y1, x, y);
        }
    }

    fn arc(&mut self, cx: f64, cy: f64, r: f64, start: f64, end: f64, anticlockwise: bool) {
        self.flush_pending();
        self.proxy.arc(cx, cy, r, start, end, anticlockwise);
        self.surface.arc(cx, cy, r, start, end, anticlockwise);
    }

    fn ellipse(
        &mut self,
        cx: f64,
        cy: f64,
        rx: f64,
        ry: f64,
        rotation: f64,
        start: f64,
        end: f64,
        anticlockwise: bool,
    ) {
        if rx == ry && rotation == 0.0 {
            self.arc(cx, cy, rx, start, end, anticlockwise);
            return;
        }
        self.flush_pending();
        let had_point = self.proxy.cursor().has_point;
        self.proxy.ellipse(cx, cy, rx, ry, rotation, start, end, anticlockwise);

        let (sx, sy) = ellipse_point(cx, cy, rx, ry, rotation, start);
        if had_point {
            self.surface.line_to(sx, sy);
        } else {
            self.surface.move_to(sx, sy);
        }
        let sweep = arc::arc_sweep(start, end, anticlockwise);
        for p in arc::arc_to_cubics(cx, cy, rx, ry, start, sweep, rotation) {
            self.surface.bezier_curve_to(p[0], p[1], p[2], p[3], p[4], p[5]);
        }
    }

    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.flush_pending();
        self.proxy.rect(x, y, width, height);
        if self.software_dash {
            self.surface.move_to(x, y);
            self.reset_dash();
            let (x1, y1) = (x + width, y + height);
            self.dashed_line(x, y, x1, y);
            self.dashed_line(x1, y, x1, y1);
            self.dashed_line(x1, y1, x, y1);
            self.dashed_line(x, y1, x, y);
        } else {
            self.surface.rect(x, y, width, height);
        }
    }

    fn close_path(&mut self) {
        self.flush_pending();
        let c = self.proxy.cursor();
        self.proxy.close_path();
        if self.software_dash {
            self.dashed_line(c.xi, c.yi, c.x0, c.y0);
        } else {
            self.surface.close_path();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{RecordingSurface, SurfaceOp};

    // ── forwarding ────────────────────────────────────────────────────────

    #[test]
    fn records_and_forwards() {
        let mut proxy = PathProxy::new();
        let mut surface = RecordingSurface::new(10, 10);
        {
            let mut b = proxy.bind(&mut surface);
            b.begin_path();
            b.move_to(0.0, 0.0);
            b.line_to(5.0, 5.0);
            b.close_path();
            b.finish();
        }
        assert_eq!(proxy.len(), 3 + 3 + 1);
        assert_eq!(
            surface.take_ops(),
            vec![
                SurfaceOp::BeginPath,
                SurfaceOp::MoveTo(0.0, 0.0),
                SurfaceOp::LineTo(5.0, 5.0),
                SurfaceOp::ClosePath,
            ]
        );
    }

    #[test]
    fn sub_pixel_lines_are_recorded_but_not_forwarded() {
        let mut proxy = PathProxy::new();
        proxy.set_scale(1.0, 1.0, 1.0);
        let mut surface = RecordingSurface::new(10, 10);
        {
            let mut b = proxy.bind(&mut surface);
            b.move_to(0.0, 0.0);
            b.line_to(10.0, 0.0);
            b.line_to(10.5, 0.0);
            b.line_to(10.7, 0.0);
            b.line_to(10.6, 0.0);
            b.finish();
        }
        // All four lines recorded.
        assert_eq!(proxy.len(), 3 + 4 * 3);
        assert_eq!(
            surface.take_ops(),
            vec![
                SurfaceOp::MoveTo(0.0, 0.0),
                SurfaceOp::LineTo(10.0, 0.0),
                // farthest skipped point, flushed on finish
                SurfaceOp::LineTo(10.7, 0.0),
            ]
        );
    }

    #[test]
    fn scale_down_raises_threshold() {
        let mut proxy = PathProxy::new();
        // Element drawn at 1/10 scale: 5 user units are half a pixel.
        proxy.set_scale(0.1, 0.1, 1.0);
        let mut surface = RecordingSurface::new(10, 10);
        {
            let mut b = proxy.bind(&mut surface);
            b.move_to(0.0, 0.0);
            b.line_to(20.0, 0.0);
            b.line_to(25.0, 0.0);
            b.line_to(40.0, 0.0);
            b.finish();
        }
        assert_eq!(
            surface.take_ops(),
            vec![
                SurfaceOp::MoveTo(0.0, 0.0),
                SurfaceOp::LineTo(20.0, 0.0),
                SurfaceOp::LineTo(40.0, 0.0),
            ]
        );
    }

    // ── dashing ───────────────────────────────────────────────────────────

    #[test]
    fn native_dash_surface_gets_plain_segments() {
        let mut proxy = PathProxy::new();
        proxy.set_line_dash(Some(&[2.0, 2.0]), 0.0);
        let mut surface = RecordingSurface::new(10, 10);
        let b = proxy.bind(&mut surface);
        assert!(!b.is_software_dashed());
    }

    #[test]
    fn software_dash_splits_lines_and_close() {
        let mut proxy = PathProxy::new();
        proxy.set_line_dash(Some(&[4.0, 4.0]), 0.0);
        let mut surface = RecordingSurface::without_native_dash(10, 10);
        {
            let mut b = proxy.bind(&mut surface);
            assert!(b.is_software_dashed());
            b.move_to(0.0, 0.0);
            b.line_to(8.0, 0.0);
            b.line_to(8.0, 8.0);
            b.close_path();
            b.finish();
        }
        let ops = surface.take_ops();
        assert_eq!(&ops[..3], &[
            SurfaceOp::MoveTo(0.0, 0.0),
            SurfaceOp::LineTo(4.0, 0.0),
            SurfaceOp::MoveTo(8.0, 0.0),
        ]);
        assert!(!ops.contains(&SurfaceOp::ClosePath));
        // Recorded geometry is unaffected by dashing.
        assert_eq!(proxy.segments().count(), 4);
    }

    #[test]
    fn quadratic_is_dashed_as_cubic() {
        let mut proxy = PathProxy::new();
        proxy.set_line_dash(Some(&[1000.0, 1.0]), 0.0);
        let mut surface = RecordingSurface::without_native_dash(10, 10);
        {
            let mut b = proxy.bind(&mut surface);
            b.move_to(0.0, 0.0);
            b.quadratic_curve_to(10.0, 10.0, 20.0, 0.0);
            b.finish();
        }
        let ops = surface.take_ops();
        assert!(matches!(ops[1], SurfaceOp::BezierCurveTo(..)));
    }
}
