use crate::coords::{BoundingRect, Vec2};
use crate::geom::{arc, bbox};
use crate::surface::Surface;

use super::cmd::{Segment, Segments};
use super::dash::Dasher;
use super::{contain, BoundPath, PathBuilder};

/// Pen position while walking or building a path.
#[derive(Debug, Copy, Clone, Default)]
pub(crate) struct Cursor {
    /// Start of the current subpath.
    pub x0: f64,
    pub y0: f64,
    /// Last point forwarded to the surface.
    pub xi: f64,
    pub yi: f64,
    /// No line has been drawn since the last move.
    pub fresh: bool,
    pub has_point: bool,
}

impl Cursor {
    #[inline]
    fn move_to(&mut self, x: f64, y: f64) {
        self.x0 = x;
        self.y0 = y;
        self.xi = x;
        self.yi = y;
        self.fresh = true;
        self.has_point = true;
    }

    #[inline]
    fn advance(&mut self, x: f64, y: f64) {
        self.xi = x;
        self.yi = y;
        self.fresh = false;
        self.has_point = true;
    }
}

/// Recorder of path commands into a reusable numeric buffer.
///
/// - `begin_path` resets the logical length but keeps the allocation
/// - `to_static` shrinks the buffer once the geometry is stable
/// - geometry queries (`bounding_rect`, `contain`) read the buffer only
#[derive(Debug, Clone, Default)]
pub struct PathProxy {
    data: Vec<f64>,
    cursor: Cursor,
    /// Per-axis distance (user space) below which a line is not forwarded.
    ux: f64,
    uy: f64,
    dash: Option<Dasher>,
}

impl PathProxy {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Derives the sub-pixel thresholds from the element's scale and the
    /// device pixel ratio: one device pixel in user space per axis.
    pub fn set_scale(&mut self, sx: f64, sy: f64, dpr: f64) {
        let unit = |s: f64| {
            let u = (1.0 / dpr / s).abs();
            if u.is_finite() { u } else { 0.0 }
        };
        self.ux = unit(sx);
        self.uy = unit(sy);
    }

    #[inline]
    pub fn unit_threshold(&self) -> (f64, f64) {
        (self.ux, self.uy)
    }

    /// Dash pattern used when a bound surface cannot dash natively.
    pub fn set_line_dash(&mut self, dash: Option<&[f64]>, offset: f64) {
        self.dash = dash.and_then(|d| Dasher::new(d, offset));
    }

    #[inline]
    pub(crate) fn dasher_mut(&mut self) -> Option<&mut Dasher> {
        self.dash.as_mut()
    }

    #[inline]
    pub(crate) fn has_dash(&self) -> bool {
        self.dash.is_some()
    }

    #[inline]
    pub(crate) fn cursor(&self) -> Cursor {
        self.cursor
    }

    #[inline]
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn segments(&self) -> Segments<'_> {
        Segments::new(&self.data)
    }

    /// Replaces the buffer with raw records.
    pub fn set_data(&mut self, data: &[f64]) {
        self.data.clear();
        self.data.extend_from_slice(data);
        self.cursor = Cursor::default();
    }

    /// Appends all records of `other`.
    pub fn append_path(&mut self, other: &PathProxy) {
        self.data.extend_from_slice(&other.data);
        self.cursor = other.cursor;
    }

    /// Releases spare capacity once the path is no longer rebuilt every frame.
    pub fn to_static(&mut self) {
        self.data.shrink_to_fit();
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// True if a line to `(x, y)` moves at least one device pixel on some
    /// axis, or is the first line of its subpath.
    #[inline]
    pub(crate) fn exceeds_unit(&self, x: f64, y: f64) -> bool {
        (x - self.cursor.xi).abs() > self.ux || (y - self.cursor.yi).abs() > self.uy || self.cursor.fresh
    }

    #[inline]
    fn push(&mut self, seg: Segment) {
        seg.encode(&mut self.data);
    }

    /// Starts building onto `surface`: every builder call is recorded here and
    /// forwarded to the surface.
    pub fn bind<'a, S: Surface + ?Sized>(&'a mut self, surface: &'a mut S) -> BoundPath<'a, S> {
        BoundPath::new(self, surface)
    }

    /// Tight bounds of the recorded geometry (curve extrema included).
    ///
    /// An empty path yields the zero rect at the origin.
    pub fn bounding_rect(&self) -> BoundingRect {
        let mut lo = Vec2::new(f64::INFINITY, f64::INFINITY);
        let mut hi = Vec2::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        let mut c = Cursor::default();
        let mut any = false;

        let mut add = |(a, b): (Vec2, Vec2)| {
            lo = lo.min(a);
            hi = hi.max(b);
            any = true;
        };

        for seg in self.segments() {
            match seg {
                Segment::MoveTo { x, y } => {
                    c.move_to(x, y);
                    add((Vec2::new(x, y), Vec2::new(x, y)));
                }
                Segment::LineTo { x, y } => {
                    add(bbox::from_line(c.xi, c.yi, x, y));
                    c.advance(x, y);
                }
                Segment::CubicTo { x1, y1, x2, y2, x, y } => {
                    add(bbox::from_cubic(c.xi, c.yi, x1, y1, x2, y2, x, y));
                    c.advance(x, y);
                }
                Segment::QuadTo { x1, y1, x, y } => {
                    add(bbox::from_quadratic(c.xi, c.yi, x1, y1, x, y));
                    c.advance(x, y);
                }
                Segment::Arc { cx, cy, rx, ry, start, sweep, rotation, anticlockwise } => {
                    let end = start + sweep;
                    if rotation == 0.0 {
                        add(bbox::from_arc(cx, cy, rx, ry, start, end, anticlockwise));
                    } else {
                        // Rotated ellipse: bound the cubic approximation.
                        let s = arc::arc_sweep(start, end, anticlockwise);
                        let (mut px, mut py) = ellipse_point(cx, cy, rx, ry, rotation, start);
                        add((Vec2::new(px, py), Vec2::new(px, py)));
                        for p in arc::arc_to_cubics(cx, cy, rx, ry, start, s, rotation) {
                            add(bbox::from_cubic(px, py, p[0], p[1], p[2], p[3], p[4], p[5]));
                            px = p[4];
                            py = p[5];
                        }
                    }
                    let (sx, sy) = ellipse_point(cx, cy, rx, ry, rotation, start);
                    if c.has_point {
                        add(bbox::from_line(c.xi, c.yi, sx, sy));
                    } else {
                        c.move_to(sx, sy);
                    }
                    let (ex, ey) = ellipse_point(cx, cy, rx, ry, rotation, end);
                    c.advance(ex, ey);
                }
                Segment::Rect { x, y, width, height } => {
                    add(bbox::from_line(x, y, x + width, y + height));
                    c.move_to(x, y);
                }
                Segment::Close => {
                    c.advance(c.x0, c.y0);
                }
            }
        }

        if !any {
            return BoundingRect::new(0.0, 0.0, 0.0, 0.0);
        }
        BoundingRect::from_min_max(lo, hi)
    }

    /// Replays the recorded path onto `surface`.
    ///
    /// Sub-pixel line segments are coalesced the same way as during a bound
    /// build; the farthest skipped point is flushed before the next non-line
    /// command so the outline still ends where it should.
    pub fn rebuild_path<S: Surface + ?Sized>(&self, surface: &mut S) {
        let mut c = Cursor::default();
        let mut pending: Option<(f64, f64, f64)> = None;

        for seg in self.segments() {
            if !matches!(seg, Segment::LineTo { .. }) {
                if let Some((px, py, _)) = pending.take() {
                    surface.line_to(px, py);
                }
            }
            match seg {
                Segment::MoveTo { x, y } => {
                    surface.move_to(x, y);
                    c.move_to(x, y);
                }
                Segment::LineTo { x, y } => {
                    let dx = (x - c.xi).abs();
                    let dy = (y - c.yi).abs();
                    if c.fresh || dx > self.ux || dy > self.uy {
                        surface.line_to(x, y);
                        c.advance(x, y);
                        pending = None;
                    } else {
                        let d2 = dx * dx + dy * dy;
                        if pending.is_none_or(|(_, _, best)| d2 > best) {
                            pending = Some((x, y, d2));
                        }
                    }
                }
                Segment::CubicTo { x1, y1, x2, y2, x, y } => {
                    surface.bezier_curve_to(x1, y1, x2, y2, x, y);
                    c.advance(x, y);
                }
                Segment::QuadTo { x1, y1, x, y } => {
                    surface.quadratic_curve_to(x1, y1, x, y);
                    c.advance(x, y);
                }
                Segment::Arc { cx, cy, rx, ry, start, sweep, rotation, anticlockwise } => {
                    replay_arc(surface, &mut c, cx, cy, rx, ry, rotation, start, start + sweep, anticlockwise);
                }
                Segment::Rect { x, y, width, height } => {
                    surface.rect(x, y, width, height);
                    c.move_to(x, y);
                }
                Segment::Close => {
                    surface.close_path();
                    c.advance(c.x0, c.y0);
                }
            }
        }
        if let Some((px, py, _)) = pending {
            surface.line_to(px, py);
        }
    }

    /// Fill containment (non-zero winding). Open subpaths close implicitly.
    #[inline]
    pub fn contain(&self, x: f64, y: f64) -> bool {
        contain::contain(&self.data, x, y)
    }

    /// Stroke containment for a stroke of `line_width`.
    #[inline]
    pub fn contain_stroke(&self, line_width: f64, x: f64, y: f64) -> bool {
        contain::contain_stroke(&self.data, line_width, x, y)
    }
}

#[inline]
pub(crate) fn ellipse_point(cx: f64, cy: f64, rx: f64, ry: f64, rotation: f64, angle: f64) -> (f64, f64) {
    let px = angle.cos() * rx;
    let py = angle.sin() * ry;
    if rotation == 0.0 {
        return (cx + px, cy + py);
    }
    let (s, c) = rotation.sin_cos();
    (cx + px * c - py * s, cy + px * s + py * c)
}

/// Draws an arc record on `surface`, natively when circular.
#[allow(clippy::too_many_arguments)]
pub(crate) fn replay_arc<S: Surface + ?Sized>(
    surface: &mut S,
    c: &mut Cursor,
    cx: f64,
    cy: f64,
    rx: f64,
    ry: f64,
    rotation: f64,
    start: f64,
    end: f64,
    anticlockwise: bool,
) {
    let (sx, sy) = ellipse_point(cx, cy, rx, ry, rotation, start);
    if rx == ry && rotation == 0.0 {
        surface.arc(cx, cy, rx, start, end, anticlockwise);
    } else {
        if c.has_point {
            surface.line_to(sx, sy);
        } else {
            surface.move_to(sx, sy);
        }
        let sweep = arc::arc_sweep(start, end, anticlockwise);
        for p in arc::arc_to_cubics(cx, cy, rx, ry, start, sweep, rotation) {
            surface.bezier_curve_to(p[0], p[1], p[2], p[3], p[4], p[5]);
        }
    }
    if !c.has_point {
        c.move_to(sx, sy);
    }
    let (ex, ey) = ellipse_point(cx, cy, rx, ry, rotation, end);
    c.advance(ex, ey);
}

impl PathBuilder for PathProxy {
    fn begin_path(&mut self) {
        self.data.clear();
        self.cursor = Cursor::default();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.push(Segment::MoveTo { x, y });
        self.cursor.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        let exceed = self.exceeds_unit(x, y);
        self.push(Segment::LineTo { x, y });
        if exceed {
            self.cursor.advance(x, y);
        }
    }

    fn bezier_curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) {
        self.push(Segment::CubicTo { x1, y1, x2, y2, x, y });
        self.cursor.advance(x, y);
    }

    fn quadratic_curve_to(&mut self, x1: f64, y1: f64, x: f64, y: f64) {
        self.push(Segment::QuadTo { x1, y1, x, y });
        self.cursor.advance(x, y);
    }

    fn arc(&mut self, cx: f64, cy: f64, r: f64, start: f64, end: f64, anticlockwise: bool) {
        self.ellipse(cx, cy, r, r, 0.0, start, end, anticlockwise);
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
        self.push(Segment::Arc {
            cx,
            cy,
            rx,
            ry,
            start,
            sweep: end - start,
            rotation,
            anticlockwise,
        });
        if !self.cursor.has_point {
            let (sx, sy) = ellipse_point(cx, cy, rx, ry, rotation, start);
            self.cursor.move_to(sx, sy);
        }
        let (ex, ey) = ellipse_point(cx, cy, rx, ry, rotation, end);
        self.cursor.advance(ex, ey);
    }

    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.push(Segment::Rect { x, y, width, height });
        self.cursor.move_to(x, y);
    }

    fn close_path(&mut self) {
        self.push(Segment::Close);
        let (x0, y0) = (self.cursor.x0, self.cursor.y0);
        self.cursor.advance(x0, y0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::PathCmd;
    use crate::surface::{RecordingSurface, SurfaceOp};
    use std::f64::consts::PI;

    fn triangle() -> PathProxy {
        let mut p = PathProxy::new();
        p.move_to(0.0, 0.0);
        p.line_to(10.0, 0.0);
        p.line_to(10.0, 10.0);
        p.close_path();
        p
    }

    // ── recording ─────────────────────────────────────────────────────────

    #[test]
    fn records_tagged_commands() {
        let p = triangle();
        assert_eq!(
            p.data(),
            &[
                PathCmd::MoveTo.tag(), 0.0, 0.0,
                PathCmd::LineTo.tag(), 10.0, 0.0,
                PathCmd::LineTo.tag(), 10.0, 10.0,
                PathCmd::Close.tag(),
            ]
        );
    }

    #[test]
    fn begin_path_keeps_capacity() {
        let mut p = triangle();
        let cap = p.capacity();
        p.begin_path();
        assert!(p.is_empty());
        assert_eq!(p.capacity(), cap);
    }

    #[test]
    fn to_static_shrinks() {
        let mut p = PathProxy::new();
        p.move_to(0.0, 0.0);
        for i in 0..100 {
            p.line_to(i as f64, 1.0);
        }
        p.begin_path();
        p.rect(0.0, 0.0, 1.0, 1.0);
        let before = p.capacity();
        p.to_static();
        assert!(p.capacity() < before);
        assert_eq!(p.len(), 5);
    }

    #[test]
    fn append_and_set_data() {
        let mut a = triangle();
        let b = triangle();
        a.append_path(&b);
        assert_eq!(a.len(), b.len() * 2);

        let mut c = PathProxy::new();
        c.set_data(b.data());
        assert_eq!(c.data(), b.data());
    }

    // ── bounds ────────────────────────────────────────────────────────────

    #[test]
    fn empty_path_bounds_are_zero() {
        assert_eq!(PathProxy::new().bounding_rect(), BoundingRect::new(0.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn bounds_of_lines_and_curves() {
        assert_eq!(triangle().bounding_rect(), BoundingRect::new(0.0, 0.0, 10.0, 10.0));

        let mut p = PathProxy::new();
        p.move_to(0.0, 0.0);
        p.bezier_curve_to(0.0, 100.0, 100.0, 100.0, 100.0, 0.0);
        let r = p.bounding_rect();
        assert!((r.height - 75.0).abs() < 1e-9);
        assert_eq!(r.width, 100.0);
    }

    #[test]
    fn bounds_of_circle_and_rect() {
        let mut p = PathProxy::new();
        p.arc(50.0, 50.0, 10.0, 0.0, PI * 2.0, false);
        assert_eq!(p.bounding_rect(), BoundingRect::new(40.0, 40.0, 20.0, 20.0));

        let mut p = PathProxy::new();
        p.rect(5.0, 5.0, -5.0, 10.0);
        assert_eq!(p.bounding_rect(), BoundingRect::new(0.0, 5.0, 5.0, 10.0));
    }

    // ── replay ────────────────────────────────────────────────────────────

    #[test]
    fn rebuild_replays_in_order() {
        let mut s = RecordingSurface::new(10, 10);
        triangle().rebuild_path(&mut s);
        assert_eq!(
            s.take_ops(),
            vec![
                SurfaceOp::MoveTo(0.0, 0.0),
                SurfaceOp::LineTo(10.0, 0.0),
                SurfaceOp::LineTo(10.0, 10.0),
                SurfaceOp::ClosePath,
            ]
        );
    }

    #[test]
    fn rebuild_coalesces_sub_pixel_lines() {
        let mut p = PathProxy::new();
        p.set_scale(1.0, 1.0, 1.0);
        p.move_to(0.0, 0.0);
        p.line_to(10.0, 0.0);
        p.line_to(10.2, 0.1);
        p.line_to(10.4, 0.2);
        p.line_to(20.0, 0.0);
        p.line_to(20.3, 0.0);

        let mut s = RecordingSurface::new(10, 10);
        p.rebuild_path(&mut s);
        assert_eq!(
            s.take_ops(),
            vec![
                SurfaceOp::MoveTo(0.0, 0.0),
                SurfaceOp::LineTo(10.0, 0.0),
                SurfaceOp::LineTo(20.0, 0.0),
                // trailing skipped point is flushed
                SurfaceOp::LineTo(20.3, 0.0),
            ]
        );
    }

    #[test]
    fn elliptical_arc_replays_as_cubics() {
        let mut p = PathProxy::new();
        p.ellipse(0.0, 0.0, 20.0, 10.0, 0.0, 0.0, PI * 2.0, false);
        let mut s = RecordingSurface::new(10, 10);
        p.rebuild_path(&mut s);
        let ops = s.take_ops();
        assert_eq!(ops[0], SurfaceOp::MoveTo(20.0, 0.0));
        assert_eq!(ops.iter().filter(|op| matches!(op, SurfaceOp::BezierCurveTo(..))).count(), 4);
    }

    // ── thresholds ────────────────────────────────────────────────────────

    #[test]
    fn scale_thresholds() {
        let mut p = PathProxy::new();
        p.set_scale(2.0, 0.5, 2.0);
        assert_eq!(p.unit_threshold(), (0.25, 1.0));
        p.set_scale(0.0, 1.0, 1.0);
        assert_eq!(p.unit_threshold(), (0.0, 1.0));
    }
}
