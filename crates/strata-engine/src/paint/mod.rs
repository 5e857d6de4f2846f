//! Paint model shared between scene nodes and surfaces.
//!
//! Scope:
//! - color representation (straight-alpha sRGB)
//! - paint sources (solid, linear/radial gradients, image patterns)
//! - per-node drawing style and how it is bound onto a surface
//!
//! Geometry types remain in `coords`.

pub mod color;
pub mod gradient;
pub mod image;
pub mod style;

pub use color::Color;
pub use gradient::{ColorStop, GradientUnits, LinearGradient, RadialGradient, SpreadMode};
pub use image::{ImageData, Pattern, PatternRepeat};
pub use style::{LineCap, LineJoin, Style};

use crate::coords::BoundingRect;

/// Paint source for filling or stroking geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Color),
    LinearGradient(LinearGradient),
    RadialGradient(RadialGradient),
    Pattern(Pattern),
}

impl Paint {
    #[inline]
    pub fn solid(color: Color) -> Self {
        Paint::Solid(color)
    }

    /// True for paints that never cover anything.
    #[inline]
    pub fn is_none(&self) -> bool {
        match self {
            Paint::Solid(c) => c.is_transparent(),
            Paint::LinearGradient(g) => g.stops.iter().all(|s| s.color.is_transparent()),
            Paint::RadialGradient(g) => g.stops.iter().all(|s| s.color.is_transparent()),
            Paint::Pattern(_) => false,
        }
    }

    /// True when the paint needs the element's bounding rect to be resolved.
    #[inline]
    pub fn is_object_relative(&self) -> bool {
        match self {
            Paint::LinearGradient(g) => g.units == GradientUnits::ObjectBoundingBox,
            Paint::RadialGradient(g) => g.units == GradientUnits::ObjectBoundingBox,
            _ => false,
        }
    }

    /// Maps object-relative gradient geometry into user space.
    pub fn resolve(&self, rect: BoundingRect) -> Paint {
        match self {
            Paint::LinearGradient(g) => Paint::LinearGradient(g.resolve(rect)),
            Paint::RadialGradient(g) => Paint::RadialGradient(g.resolve(rect)),
            other => other.clone(),
        }
    }
}

impl From<Color> for Paint {
    fn from(c: Color) -> Self {
        Paint::Solid(c)
    }
}

impl From<LinearGradient> for Paint {
    fn from(g: LinearGradient) -> Self {
        Paint::LinearGradient(g)
    }
}

impl From<RadialGradient> for Paint {
    fn from(g: RadialGradient) -> Self {
        Paint::RadialGradient(g)
    }
}

impl From<Pattern> for Paint {
    fn from(p: Pattern) -> Self {
        Paint::Pattern(p)
    }
}
