use crate::coords::{BoundingRect, Vec2};

use super::Color;

/// Gradient spread behavior outside [0, 1] range.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum SpreadMode {
    /// Clamp to edge stops.
    #[default]
    Pad,
    /// Repeat the gradient pattern.
    Repeat,
    /// Mirror-repeat the gradient pattern.
    Reflect,
}

/// Coordinate basis of a gradient's geometry.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum GradientUnits {
    /// Geometry is a fraction of the painted element's bounding rect
    /// (`(0, 0)` top-left, `(1, 1)` bottom-right).
    #[default]
    ObjectBoundingBox,
    /// Geometry is in the element's local coordinate space.
    UserSpace,
}

/// A single gradient stop. `offset` is expected in [0, 1].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ColorStop {
    pub offset: f32,
    pub color: Color,
}

impl ColorStop {
    #[inline]
    pub const fn new(offset: f32, color: Color) -> Self {
        Self { offset, color }
    }
}

/// Linear gradient from `start` to `end`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub start: Vec2,
    pub end: Vec2,
    pub stops: Vec<ColorStop>,
    pub spread: SpreadMode,
    pub units: GradientUnits,
}

impl LinearGradient {
    pub fn new(start: Vec2, end: Vec2, stops: Vec<ColorStop>) -> Self {
        Self { start, end, stops, spread: SpreadMode::Pad, units: GradientUnits::ObjectBoundingBox }
    }

    /// Same gradient with geometry given in user space.
    pub fn in_user_space(mut self) -> Self {
        self.units = GradientUnits::UserSpace;
        self
    }

    /// Returns the gradient with its geometry mapped into user space.
    pub fn resolve(&self, rect: BoundingRect) -> LinearGradient {
        match self.units {
            GradientUnits::UserSpace => self.clone(),
            GradientUnits::ObjectBoundingBox => LinearGradient {
                start: map_unit(self.start, rect),
                end: map_unit(self.end, rect),
                units: GradientUnits::UserSpace,
                ..self.clone()
            },
        }
    }

    /// True when the gradient definition is structurally usable.
    pub fn is_valid(&self) -> bool {
        self.start.is_finite()
            && self.end.is_finite()
            && self.stops.iter().all(|s| s.offset.is_finite() && s.color.is_finite())
            && !self.stops.is_empty()
            && self.start != self.end
    }
}

/// Radial gradient centered at `center` reaching `radius`.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    pub center: Vec2,
    pub radius: f64,
    pub stops: Vec<ColorStop>,
    pub spread: SpreadMode,
    pub units: GradientUnits,
}

impl RadialGradient {
    pub fn new(center: Vec2, radius: f64, stops: Vec<ColorStop>) -> Self {
        Self { center, radius, stops, spread: SpreadMode::Pad, units: GradientUnits::ObjectBoundingBox }
    }

    pub fn in_user_space(mut self) -> Self {
        self.units = GradientUnits::UserSpace;
        self
    }

    /// Returns the gradient with its geometry mapped into user space.
    ///
    /// Relative radii scale with the smaller side of the rect so the gradient
    /// stays circular.
    pub fn resolve(&self, rect: BoundingRect) -> RadialGradient {
        match self.units {
            GradientUnits::UserSpace => self.clone(),
            GradientUnits::ObjectBoundingBox => RadialGradient {
                center: map_unit(self.center, rect),
                radius: self.radius * rect.width.min(rect.height),
                units: GradientUnits::UserSpace,
                ..self.clone()
            },
        }
    }

    pub fn is_valid(&self) -> bool {
        self.center.is_finite()
            && self.radius.is_finite()
            && self.radius > 0.0
            && !self.stops.is_empty()
            && self.stops.iter().all(|s| s.offset.is_finite() && s.color.is_finite())
    }
}

#[inline]
fn map_unit(p: Vec2, rect: BoundingRect) -> Vec2 {
    Vec2::new(rect.x + p.x * rect.width, rect.y + p.y * rect.height)
}
