//! Geometry kernel.
//!
//! Pure numeric routines over lines, quadratic/cubic Béziers and circular
//! arcs:
//! - evaluation, derivatives, extrema and root finding (`curve`)
//! - bounding boxes of individual segments (`bbox`)
//! - stroke containment per segment kind (`line`, `arc`, `curve`)
//! - signed winding contributions for fill containment (`winding`)
//!
//! Degenerate input is recovered locally: no roots, zero winding, or a
//! degree-reduced formula. Nothing here returns NaN for finite input.

pub mod arc;
pub mod bbox;
pub mod curve;
pub mod line;
pub mod winding;

use std::f64::consts::PI;

/// Algebraic epsilon for near-zero coefficients.
pub const EPSILON: f64 = 1e-8;

/// Geometric epsilon for lengths and angles.
pub const EPSILON_NUMERIC: f64 = 1e-4;

pub const TAU: f64 = PI * 2.0;

#[inline]
pub(crate) fn is_around_zero(v: f64) -> bool {
    v > -EPSILON && v < EPSILON
}

#[inline]
pub(crate) fn is_not_around_zero(v: f64) -> bool {
    v > EPSILON || v < -EPSILON
}

/// Wraps an angle into `[0, 2π)`.
#[inline]
pub fn normalize_radian(angle: f64) -> f64 {
    let a = angle % TAU;
    if a < 0.0 { a + TAU } else { a }
}
