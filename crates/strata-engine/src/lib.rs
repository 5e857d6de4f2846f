//! Strata engine crate.
//!
//! Retained-mode 2D vector rendering: a scene graph flattened into a sorted
//! display list, painted incrementally onto per-zlevel raster layers.
//!
//! Layout:
//! - `coords`, `geom`, `path`: geometry kernel (matrices, curve math, path
//!   recording, dashing, hit testing)
//! - `paint`, `surface`: styles and the canvas-style drawing backends
//! - `scene`: node arena, transforms, clip chains, display list
//! - `render`: layers, incremental painter, progressive slicing, hover
//! - `core`, `time`, `logging`: host-driven frame loop and diagnostics

pub mod coords;
pub mod geom;
pub mod path;
pub mod sort;

pub mod paint;
pub mod surface;

pub mod scene;
pub mod render;

pub mod core;
pub mod logging;
pub mod time;
