//! Layered painting.
//!
//! The `Painter` turns the display list kept by `Storage` into pixels:
//! - one `Layer` per zlevel, repainted only when its elements change
//! - a ring of progressive layers filled one generation per continuation
//! - a hover overlay drawn above everything from style-patched mirrors
//!
//! All drawing goes through the `Surface` trait; layers are composited in
//! zlevel order by `Painter::composite`.

mod config;
mod error;
mod hover;
mod layer;
mod painter;

pub use config::{LayerConfig, RendererConfig, DEFAULT_LAST_FRAME_ALPHA, DEFAULT_PROGRESSIVE_LAYER_CAP};
pub use error::PainterError;
pub use hover::{HoverMirror, HOVER_LAYER_ZLEVEL};
pub use layer::Layer;
pub use painter::{Continuation, Painter};
