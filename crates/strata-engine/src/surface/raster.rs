use std::path::Path as FsPath;

use tiny_skia::{
    BlendMode, FillRule, FilterQuality, GradientStop, Mask, Pixmap, PixmapPaint, Point, Shader,
    Stroke, StrokeDash, Transform,
};

use crate::coords::{Matrix, Vec2};
use crate::geom::arc;
use crate::paint::{
    Color, ColorStop, LineCap, LineJoin, Paint, PatternRepeat, SpreadMode,
};

use super::{Surface, SurfaceError};

/// Path command in device space.
#[derive(Debug, Copy, Clone)]
enum DeviceSeg {
    Move(f64, f64),
    Line(f64, f64),
    Quad(f64, f64, f64, f64),
    Cubic(f64, f64, f64, f64, f64, f64),
    Close,
}

/// Drawing state saved and restored as a unit.
#[derive(Debug, Clone)]
struct State {
    transform: Matrix,
    alpha: f64,
    fill: Paint,
    stroke: Paint,
    line_width: f64,
    line_cap: LineCap,
    line_join: LineJoin,
    miter_limit: f64,
    dash: Vec<f64>,
    dash_offset: f64,
    clip: Option<Mask>,
}

impl Default for State {
    fn default() -> Self {
        Self {
            transform: Matrix::IDENTITY,
            alpha: 1.0,
            fill: Paint::solid(Color::BLACK),
            stroke: Paint::solid(Color::BLACK),
            line_width: 1.0,
            line_cap: LineCap::default(),
            line_join: LineJoin::default(),
            miter_limit: 10.0,
            dash: Vec::new(),
            dash_offset: 0.0,
            clip: None,
        }
    }
}

/// Software surface backed by a tiny-skia pixmap.
///
/// Path coordinates are mapped to device space when they are added, as in a
/// canvas context; strokes map back to user space so the line width follows
/// the transform in effect at `stroke` time.
pub struct RasterSurface {
    pixmap: Pixmap,
    dpr: f64,
    state: State,
    stack: Vec<State>,
    path: Vec<DeviceSeg>,
    current: Option<Vec2>,
    subpath_start: Vec2,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32, dpr: f64) -> Result<Self, SurfaceError> {
        if !(dpr.is_finite() && dpr > 0.0) {
            return Err(SurfaceError::InvalidPixelRatio(dpr));
        }
        let pixmap = Pixmap::new(width, height).ok_or(SurfaceError::InvalidDimensions { width, height })?;
        Ok(Self {
            pixmap,
            dpr,
            state: State::default(),
            stack: Vec::new(),
            path: Vec::new(),
            current: None,
            subpath_start: Vec2::zero(),
        })
    }

    #[inline]
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Premultiplied RGBA of the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.pixmap.width() || y >= self.pixmap.height() {
            return None;
        }
        let texels: &[[u8; 4]] = bytemuck::cast_slice(self.pixmap.data());
        texels.get((y * self.pixmap.width() + x) as usize).copied()
    }

    pub fn encode_png(&self) -> Result<Vec<u8>, SurfaceError> {
        self.pixmap.encode_png().map_err(|e| SurfaceError::Encode(e.to_string()))
    }

    pub fn save_png(&self, path: impl AsRef<FsPath>) -> Result<(), SurfaceError> {
        self.pixmap.save_png(path).map_err(|e| SurfaceError::Encode(e.to_string()))
    }

    #[inline]
    fn device(&self, x: f64, y: f64) -> Vec2 {
        self.state.transform.apply(Vec2::new(x, y))
    }

    fn push_move(&mut self, p: Vec2) {
        self.path.push(DeviceSeg::Move(p.x, p.y));
        self.current = Some(p);
        self.subpath_start = p;
    }

    fn ensure_point(&mut self, p: Vec2) {
        if self.current.is_none() {
            self.push_move(p);
        }
    }

    /// Device-space path, or `None` when nothing was drawn.
    fn build_path(&self) -> Option<tiny_skia::Path> {
        let mut pb = tiny_skia::PathBuilder::new();
        for seg in &self.path {
            match *seg {
                DeviceSeg::Move(x, y) => pb.move_to(x as f32, y as f32),
                DeviceSeg::Line(x, y) => pb.line_to(x as f32, y as f32),
                DeviceSeg::Quad(x1, y1, x, y) => pb.quad_to(x1 as f32, y1 as f32, x as f32, y as f32),
                DeviceSeg::Cubic(x1, y1, x2, y2, x, y) => {
                    pb.cubic_to(x1 as f32, y1 as f32, x2 as f32, y2 as f32, x as f32, y as f32)
                }
                DeviceSeg::Close => pb.close(),
            }
        }
        pb.finish()
    }

    fn stroke_props(&self) -> Stroke {
        let dash = if self.state.dash.is_empty() {
            None
        } else {
            let mut pattern: Vec<f32> = self.state.dash.iter().map(|d| *d as f32).collect();
            if pattern.len() % 2 == 1 {
                pattern.extend_from_within(..);
            }
            StrokeDash::new(pattern, self.state.dash_offset as f32)
        };
        Stroke {
            width: self.state.line_width as f32,
            miter_limit: self.state.miter_limit as f32,
            line_cap: match self.state.line_cap {
                LineCap::Butt => tiny_skia::LineCap::Butt,
                LineCap::Round => tiny_skia::LineCap::Round,
                LineCap::Square => tiny_skia::LineCap::Square,
            },
            line_join: match self.state.line_join {
                LineJoin::Miter => tiny_skia::LineJoin::Miter,
                LineJoin::Round => tiny_skia::LineJoin::Round,
                LineJoin::Bevel => tiny_skia::LineJoin::Bevel,
            },
            dash,
        }
    }
}

impl std::fmt::Debug for RasterSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterSurface")
            .field("width", &self.pixmap.width())
            .field("height", &self.pixmap.height())
            .field("dpr", &self.dpr)
            .finish()
    }
}

#[inline]
fn to_skia(m: &Matrix) -> Transform {
    let [a, b, c, d, e, f] = m.0;
    Transform::from_row(a as f32, b as f32, c as f32, d as f32, e as f32, f as f32)
}

#[inline]
fn skia_color(c: Color, alpha: f64) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba(c.r, c.g, c.b, (c.a as f64 * alpha).clamp(0.0, 1.0) as f32)
        .unwrap_or(tiny_skia::Color::TRANSPARENT)
}

fn skia_stops(stops: &[ColorStop], alpha: f64) -> Vec<GradientStop> {
    stops
        .iter()
        .map(|s| GradientStop::new(s.offset.clamp(0.0, 1.0), skia_color(s.color, alpha)))
        .collect()
}

fn skia_spread(mode: SpreadMode) -> tiny_skia::SpreadMode {
    match mode {
        SpreadMode::Pad => tiny_skia::SpreadMode::Pad,
        SpreadMode::Repeat => tiny_skia::SpreadMode::Repeat,
        SpreadMode::Reflect => tiny_skia::SpreadMode::Reflect,
    }
}

/// Runs `draw` with a tiny-skia paint equivalent to `paint` at global
/// `alpha`, its shader mapped by `ts`. Paints that cannot be expressed
/// (degenerate gradients, undecodable patterns) draw nothing.
fn with_paint(paint: &Paint, alpha: f64, ts: Transform, draw: impl FnOnce(&tiny_skia::Paint<'_>)) {
    let pattern_pixmap;
    let shader = match paint {
        Paint::Solid(c) => Some(Shader::SolidColor(skia_color(*c, alpha))),
        Paint::LinearGradient(g) => tiny_skia::LinearGradient::new(
            Point::from_xy(g.start.x as f32, g.start.y as f32),
            Point::from_xy(g.end.x as f32, g.end.y as f32),
            skia_stops(&g.stops, alpha),
            skia_spread(g.spread),
            ts,
        ),
        Paint::RadialGradient(g) => {
            let center = Point::from_xy(g.center.x as f32, g.center.y as f32);
            tiny_skia::RadialGradient::new(
                center,
                center,
                g.radius as f32,
                skia_stops(&g.stops, alpha),
                skia_spread(g.spread),
                ts,
            )
        }
        Paint::Pattern(p) => {
            let size = tiny_skia::IntSize::from_wh(p.image.width(), p.image.height());
            pattern_pixmap = size.and_then(|s| Pixmap::from_vec(p.image.as_bytes().to_vec(), s));
            pattern_pixmap.as_ref().map(|pm| {
                let spread = match p.repeat {
                    PatternRepeat::Repeat => tiny_skia::SpreadMode::Repeat,
                    PatternRepeat::NoRepeat => tiny_skia::SpreadMode::Pad,
                };
                tiny_skia::Pattern::new(pm.as_ref(), spread, FilterQuality::Bilinear, alpha as f32, ts)
            })
        }
    };
    let Some(shader) = shader else {
        return;
    };
    let skia = tiny_skia::Paint { shader, anti_alias: true, ..Default::default() };
    draw(&skia);
}

impl Surface for RasterSurface {
    fn width(&self) -> u32 {
        self.pixmap.width()
    }

    fn height(&self) -> u32 {
        self.pixmap.height()
    }

    fn dpr(&self) -> f64 {
        self.dpr
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), SurfaceError> {
        self.pixmap = Pixmap::new(width, height).ok_or(SurfaceError::InvalidDimensions { width, height })?;
        self.state = State::default();
        self.stack.clear();
        self.path.clear();
        self.current = None;
        Ok(())
    }

    // ── state ─────────────────────────────────────────────────────────────

    fn save(&mut self) {
        self.stack.push(self.state.clone());
    }

    fn restore(&mut self) {
        if let Some(s) = self.stack.pop() {
            self.state = s;
        }
    }

    fn set_transform(&mut self, m: &Matrix) {
        self.state.transform = *m;
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        if alpha.is_finite() {
            self.state.alpha = alpha.clamp(0.0, 1.0);
        }
    }

    fn set_fill_style(&mut self, paint: &Paint) {
        self.state.fill = paint.clone();
    }

    fn set_stroke_style(&mut self, paint: &Paint) {
        self.state.stroke = paint.clone();
    }

    fn set_line_width(&mut self, width: f64) {
        if width.is_finite() && width > 0.0 {
            self.state.line_width = width;
        }
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.state.line_cap = cap;
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.state.line_join = join;
    }

    fn set_miter_limit(&mut self, limit: f64) {
        if limit.is_finite() && limit > 0.0 {
            self.state.miter_limit = limit;
        }
    }

    fn set_line_dash(&mut self, dash: &[f64], offset: f64) {
        if dash.iter().all(|d| d.is_finite() && *d >= 0.0) {
            self.state.dash = dash.to_vec();
            self.state.dash_offset = offset;
        }
    }

    // ── path ──────────────────────────────────────────────────────────────

    fn begin_path(&mut self) {
        self.path.clear();
        self.current = None;
    }

    fn move_to(&mut self, x: f64, y: f64) {
        let p = self.device(x, y);
        self.push_move(p);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        let p = self.device(x, y);
        if self.current.is_none() {
            self.push_move(p);
            return;
        }
        self.path.push(DeviceSeg::Line(p.x, p.y));
        self.current = Some(p);
    }

    fn bezier_curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) {
        let c1 = self.device(x1, y1);
        let c2 = self.device(x2, y2);
        let p = self.device(x, y);
        self.ensure_point(c1);
        self.path.push(DeviceSeg::Cubic(c1.x, c1.y, c2.x, c2.y, p.x, p.y));
        self.current = Some(p);
    }

    fn quadratic_curve_to(&mut self, x1: f64, y1: f64, x: f64, y: f64) {
        let c = self.device(x1, y1);
        let p = self.device(x, y);
        self.ensure_point(c);
        self.path.push(DeviceSeg::Quad(c.x, c.y, p.x, p.y));
        self.current = Some(p);
    }

    fn arc(&mut self, cx: f64, cy: f64, r: f64, start: f64, end: f64, anticlockwise: bool) {
        if !(r.is_finite() && r >= 0.0) {
            return;
        }
        let (s, c) = start.sin_cos();
        let p0 = self.device(cx + r * c, cy + r * s);
        if self.current.is_some() {
            self.path.push(DeviceSeg::Line(p0.x, p0.y));
            self.current = Some(p0);
        } else {
            self.push_move(p0);
        }
        let sweep = arc::arc_sweep(start, end, anticlockwise);
        for piece in arc::arc_to_cubics(cx, cy, r, r, start, sweep, 0.0) {
            let c1 = self.device(piece[0], piece[1]);
            let c2 = self.device(piece[2], piece[3]);
            let p = self.device(piece[4], piece[5]);
            self.path.push(DeviceSeg::Cubic(c1.x, c1.y, c2.x, c2.y, p.x, p.y));
            self.current = Some(p);
        }
    }

    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let corners = [
            self.device(x, y),
            self.device(x + width, y),
            self.device(x + width, y + height),
            self.device(x, y + height),
        ];
        self.push_move(corners[0]);
        for p in &corners[1..] {
            self.path.push(DeviceSeg::Line(p.x, p.y));
        }
        self.path.push(DeviceSeg::Close);
        self.push_move(corners[0]);
    }

    fn close_path(&mut self) {
        if self.current.is_some() {
            self.path.push(DeviceSeg::Close);
            self.current = Some(self.subpath_start);
        }
    }

    // ── drawing ───────────────────────────────────────────────────────────

    fn fill(&mut self) {
        let Some(path) = self.build_path() else {
            return;
        };
        let ts = to_skia(&self.state.transform);
        let clip = self.state.clip.as_ref();
        let pixmap = &mut self.pixmap;
        with_paint(&self.state.fill, self.state.alpha, ts, |paint| {
            pixmap.fill_path(&path, paint, FillRule::Winding, Transform::identity(), clip);
        });
    }

    fn stroke(&mut self) {
        let Some(path) = self.build_path() else {
            return;
        };
        let Some(user) = self.state.transform.invert().and_then(|inv| path.transform(to_skia(&inv))) else {
            return;
        };
        let stroke = self.stroke_props();
        let ts = to_skia(&self.state.transform);
        let clip = self.state.clip.as_ref();
        let pixmap = &mut self.pixmap;
        with_paint(&self.state.stroke, self.state.alpha, Transform::identity(), |paint| {
            pixmap.stroke_path(&user, paint, &stroke, ts, clip);
        });
    }

    fn clip(&mut self) {
        let Some(path) = self.build_path() else {
            // Clipping to an empty path hides everything.
            self.state.clip = Mask::new(self.pixmap.width(), self.pixmap.height());
            return;
        };
        match &mut self.state.clip {
            Some(mask) => mask.intersect_path(&path, FillRule::Winding, true, Transform::identity()),
            None => {
                let Some(mut mask) = Mask::new(self.pixmap.width(), self.pixmap.height()) else {
                    return;
                };
                mask.fill_path(&path, FillRule::Winding, true, Transform::identity());
                self.state.clip = Some(mask);
            }
        }
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let Some(rect) = tiny_skia::Rect::from_xywh(x as f32, y as f32, width as f32, height as f32) else {
            return;
        };
        let paint = tiny_skia::Paint {
            blend_mode: BlendMode::Clear,
            anti_alias: false,
            ..Default::default()
        };
        let ts = to_skia(&self.state.transform);
        self.pixmap.fill_rect(rect, &paint, ts, self.state.clip.as_ref());
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let Some(rect) = tiny_skia::Rect::from_xywh(x as f32, y as f32, width as f32, height as f32) else {
            return;
        };
        let ts = to_skia(&self.state.transform);
        let clip = self.state.clip.as_ref();
        let pixmap = &mut self.pixmap;
        with_paint(&self.state.fill, self.state.alpha, Transform::identity(), |paint| {
            pixmap.fill_rect(rect, paint, ts, clip);
        });
    }

    fn draw_image(&mut self, src: &Self, dx: f64, dy: f64, dw: f64, dh: f64) {
        let (sw, sh) = (src.pixmap.width() as f64, src.pixmap.height() as f64);
        if dw <= 0.0 || dh <= 0.0 {
            return;
        }
        let m = self.state.transform.mul(&Matrix::new(dw / sw, 0.0, 0.0, dh / sh, dx, dy));
        let paint = PixmapPaint {
            opacity: self.state.alpha as f32,
            blend_mode: BlendMode::SourceOver,
            quality: if dw == sw && dh == sh { FilterQuality::Nearest } else { FilterQuality::Bilinear },
        };
        self.pixmap.draw_pixmap(0, 0, src.pixmap.as_ref(), &paint, to_skia(&m), self.state.clip.as_ref());
    }

    fn with_size(width: u32, height: u32, dpr: f64) -> Result<Self, SurfaceError> {
        Self::new(width, height, dpr)
    }
}
