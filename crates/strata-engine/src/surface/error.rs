use std::fmt;

/// Surface allocation or export failure.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceError {
    /// Zero or oversized dimensions.
    InvalidDimensions { width: u32, height: u32 },
    /// Device pixel ratio that is not a positive finite number.
    InvalidPixelRatio(f64),
    /// Image encoding failed.
    Encode(String),
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceError::InvalidDimensions { width, height } => {
                write!(f, "invalid surface dimensions {width}x{height}")
            }
            SurfaceError::InvalidPixelRatio(dpr) => write!(f, "invalid device pixel ratio {dpr}"),
            SurfaceError::Encode(msg) => write!(f, "image encoding failed: {msg}"),
        }
    }
}

impl std::error::Error for SurfaceError {}
