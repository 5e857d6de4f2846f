use std::collections::HashMap;

use crate::paint::Paint;

/// Blend factor applied to the previous frame when motion blur is on.
pub const DEFAULT_LAST_FRAME_ALPHA: f64 = 0.7;

/// Default size of the progressive layer ring.
pub const DEFAULT_PROGRESSIVE_LAYER_CAP: usize = 5;

/// Per-zlevel layer settings.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerConfig {
    /// Paint filled over the layer after every clear.
    pub clear_color: Option<Paint>,
    /// Keep a faded copy of the previous frame beneath the new one.
    pub motion_blur: bool,
    /// Opacity of the previous frame when `motion_blur` is on.
    pub last_frame_alpha: f64,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            clear_color: None,
            motion_blur: false,
            last_frame_alpha: DEFAULT_LAST_FRAME_ALPHA,
        }
    }
}

/// Renderer construction settings.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Viewport width in logical pixels.
    pub width: f64,
    /// Viewport height in logical pixels.
    pub height: f64,
    /// Device pixel ratio applied to every layer surface.
    pub dpr: f64,
    /// Number of off-band layers used for time-sliced painting. `0` paints
    /// progressive elements inline.
    pub progressive_layer_cap: usize,
    /// Painted beneath all layers when compositing or exporting.
    pub background: Option<Paint>,
    /// Layer settings keyed by zlevel.
    pub layers: HashMap<i32, LayerConfig>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            dpr: 1.0,
            progressive_layer_cap: DEFAULT_PROGRESSIVE_LAYER_CAP,
            background: None,
            layers: HashMap::new(),
        }
    }
}
