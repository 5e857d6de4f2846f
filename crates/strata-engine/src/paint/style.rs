use crate::coords::BoundingRect;
use crate::surface::Surface;

use super::Paint;

/// Stroke end cap.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

/// Stroke corner join.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

/// Drawing style of a shape node.
///
/// `fill`/`stroke` of `None` mean "do not paint". A stroke only counts when the
/// line width is positive.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub fill: Option<Paint>,
    pub stroke: Option<Paint>,
    /// Multiplies every painted pixel, `[0, 1]`.
    pub opacity: f64,
    pub line_width: f64,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
    pub miter_limit: f64,
    pub line_dash: Option<Vec<f64>>,
    pub line_dash_offset: f64,
    /// Keep the stroke width constant in screen space regardless of scale.
    pub stroke_no_scale: bool,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fill: None,
            stroke: None,
            opacity: 1.0,
            line_width: 1.0,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            miter_limit: 10.0,
            line_dash: None,
            line_dash_offset: 0.0,
            stroke_no_scale: false,
        }
    }
}

impl Style {
    /// Solid fill, no stroke.
    pub fn filled(paint: impl Into<Paint>) -> Self {
        Self { fill: Some(paint.into()), ..Self::default() }
    }

    /// Stroke only.
    pub fn stroked(paint: impl Into<Paint>, line_width: f64) -> Self {
        Self { stroke: Some(paint.into()), line_width, ..Self::default() }
    }

    #[inline]
    pub fn has_fill(&self) -> bool {
        self.fill.as_ref().is_some_and(|p| !p.is_none())
    }

    #[inline]
    pub fn has_stroke(&self) -> bool {
        self.line_width > 0.0 && self.stroke.as_ref().is_some_and(|p| !p.is_none())
    }

    /// Active dash pattern, if it can actually produce dashes.
    pub fn active_dash(&self) -> Option<&[f64]> {
        self.line_dash
            .as_deref()
            .filter(|d| !d.is_empty() && d.iter().all(|v| v.is_finite() && *v >= 0.0) && d.iter().sum::<f64>() > 0.0)
    }

    /// Pushes this style onto `surface`.
    ///
    /// Properties equal to `prev` (the style of the element drawn just before on
    /// the same surface) are skipped. Object-relative gradients are resolved
    /// against `rect` and always re-applied.
    pub fn bind<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        prev: Option<&Style>,
        rect: BoundingRect,
        line_scale: f64,
    ) {
        if let Some(fill) = &self.fill {
            if fill.is_object_relative() {
                surface.set_fill_style(&fill.resolve(rect));
            } else if prev.is_none_or(|p| p.fill.as_ref() != Some(fill)) {
                surface.set_fill_style(fill);
            }
        }
        if let Some(stroke) = &self.stroke {
            if stroke.is_object_relative() {
                surface.set_stroke_style(&stroke.resolve(rect));
            } else if prev.is_none_or(|p| p.stroke.as_ref() != Some(stroke)) {
                surface.set_stroke_style(stroke);
            }
        }

        if prev.is_none_or(|p| p.opacity != self.opacity) {
            surface.set_global_alpha(self.opacity.clamp(0.0, 1.0));
        }
        let width = if self.stroke_no_scale && line_scale > 1e-10 {
            self.line_width / line_scale
        } else {
            self.line_width
        };
        if self.stroke_no_scale
            || prev.is_none_or(|p| p.stroke_no_scale || p.line_width != width)
        {
            surface.set_line_width(width);
        }
        if prev.is_none_or(|p| p.line_cap != self.line_cap) {
            surface.set_line_cap(self.line_cap);
        }
        if prev.is_none_or(|p| p.line_join != self.line_join) {
            surface.set_line_join(self.line_join);
        }
        if prev.is_none_or(|p| p.miter_limit != self.miter_limit) {
            surface.set_miter_limit(self.miter_limit);
        }
    }
}
