use crate::coords::Matrix;
use crate::paint::{LineCap, LineJoin, Paint};

use super::{Surface, SurfaceError};

/// One recorded `Surface` call.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    Save,
    Restore,
    SetTransform(Matrix),
    GlobalAlpha(f64),
    FillStyle(Paint),
    StrokeStyle(Paint),
    LineWidth(f64),
    LineCap(LineCap),
    LineJoin(LineJoin),
    MiterLimit(f64),
    LineDash(Vec<f64>, f64),

    BeginPath,
    MoveTo(f64, f64),
    LineTo(f64, f64),
    BezierCurveTo(f64, f64, f64, f64, f64, f64),
    QuadraticCurveTo(f64, f64, f64, f64),
    Arc(f64, f64, f64, f64, f64, bool),
    Rect(f64, f64, f64, f64),
    ClosePath,

    Fill,
    Stroke,
    Clip,
    ClearRect(f64, f64, f64, f64),
    FillRect(f64, f64, f64, f64),
    /// Destination rect and the source surface's id.
    DrawImage { src: u64, dx: f64, dy: f64, dw: f64, dh: f64 },
}

/// Surface that records every call instead of drawing.
///
/// Used to inspect painter behavior: call order, style de-duplication,
/// clip scoping and path replay.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    id: u64,
    width: u32,
    height: u32,
    dpr: f64,
    native_dash: bool,
    ops: Vec<SurfaceOp>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        static NEXT_ID: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);
        Self {
            id: NEXT_ID.fetch_add(1, std::sync::atomic::Ordering::Relaxed),
            width,
            height,
            dpr: 1.0,
            native_dash: true,
            ops: Vec::new(),
        }
    }

    /// A recorder that reports no native dash support, so dashed strokes
    /// are decomposed into path segments.
    pub fn without_native_dash(width: u32, height: u32) -> Self {
        Self { native_dash: false, ..Self::new(width, height) }
    }

    pub fn with_dpr(mut self, dpr: f64) -> Self {
        self.dpr = dpr;
        self
    }

    /// Identity used in `SurfaceOp::DrawImage` records.
    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    pub fn take_ops(&mut self) -> Vec<SurfaceOp> {
        std::mem::take(&mut self.ops)
    }

    #[inline]
    fn push(&mut self, op: SurfaceOp) {
        self.ops.push(op);
    }
}

impl Surface for RecordingSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn dpr(&self) -> f64 {
        self.dpr
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), SurfaceError> {
        if width == 0 || height == 0 {
            return Err(SurfaceError::InvalidDimensions { width, height });
        }
        self.width = width;
        self.height = height;
        Ok(())
    }

    fn supports_line_dash(&self) -> bool {
        self.native_dash
    }

    fn save(&mut self) {
        self.push(SurfaceOp::Save);
    }

    fn restore(&mut self) {
        self.push(SurfaceOp::Restore);
    }

    fn set_transform(&mut self, m: &Matrix) {
        self.push(SurfaceOp::SetTransform(*m));
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.push(SurfaceOp::GlobalAlpha(alpha));
    }

    fn set_fill_style(&mut self, paint: &Paint) {
        self.push(SurfaceOp::FillStyle(paint.clone()));
    }

    fn set_stroke_style(&mut self, paint: &Paint) {
        self.push(SurfaceOp::StrokeStyle(paint.clone()));
    }

    fn set_line_width(&mut self, width: f64) {
        self.push(SurfaceOp::LineWidth(width));
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.push(SurfaceOp::LineCap(cap));
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.push(SurfaceOp::LineJoin(join));
    }

    fn set_miter_limit(&mut self, limit: f64) {
        self.push(SurfaceOp::MiterLimit(limit));
    }

    fn set_line_dash(&mut self, dash: &[f64], offset: f64) {
        self.push(SurfaceOp::LineDash(dash.to_vec(), offset));
    }

    fn begin_path(&mut self) {
        self.push(SurfaceOp::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.push(SurfaceOp::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.push(SurfaceOp::LineTo(x, y));
    }

    fn bezier_curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) {
        self.push(SurfaceOp::BezierCurveTo(x1, y1, x2, y2, x, y));
    }

    fn quadratic_curve_to(&mut self, x1: f64, y1: f64, x: f64, y: f64) {
        self.push(SurfaceOp::QuadraticCurveTo(x1, y1, x, y));
    }

    fn arc(&mut self, cx: f64, cy: f64, r: f64, start: f64, end: f64, anticlockwise: bool) {
        self.push(SurfaceOp::Arc(cx, cy, r, start, end, anticlockwise));
    }

    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.push(SurfaceOp::Rect(x, y, width, height));
    }

    fn close_path(&mut self) {
        self.push(SurfaceOp::ClosePath);
    }

    fn fill(&mut self) {
        self.push(SurfaceOp::Fill);
    }

    fn stroke(&mut self) {
        self.push(SurfaceOp::Stroke);
    }

    fn clip(&mut self) {
        self.push(SurfaceOp::Clip);
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.push(SurfaceOp::ClearRect(x, y, width, height));
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.push(SurfaceOp::FillRect(x, y, width, height));
    }

    fn draw_image(&mut self, src: &Self, dx: f64, dy: f64, dw: f64, dh: f64) {
        self.push(SurfaceOp::DrawImage { src: src.id, dx, dy, dw, dh });
    }

    fn with_size(width: u32, height: u32, dpr: f64) -> Result<Self, SurfaceError> {
        if width == 0 || height == 0 {
            return Err(SurfaceError::InvalidDimensions { width, height });
        }
        if !(dpr.is_finite() && dpr > 0.0) {
            return Err(SurfaceError::InvalidPixelRatio(dpr));
        }
        Ok(Self::new(width, height).with_dpr(dpr))
    }
}
