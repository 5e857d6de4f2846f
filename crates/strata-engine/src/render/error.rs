use std::fmt;

use crate::surface::SurfaceError;

/// Rejected layer operation. No painter state is changed when one is
/// returned.
#[derive(Debug, Clone, PartialEq)]
pub enum PainterError {
    /// Caller-supplied layer with a zero-sized surface or an unusable
    /// device pixel ratio.
    InvalidLayer { zlevel: i32 },
    /// A layer already occupies the zlevel.
    DuplicateZlevel { zlevel: i32 },
    /// The surface backend could not allocate or resize a layer surface.
    MissingSurface { zlevel: i32, source: SurfaceError },
}

impl fmt::Display for PainterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PainterError::InvalidLayer { zlevel } => {
                write!(f, "layer for zlevel {zlevel} has no usable surface")
            }
            PainterError::DuplicateZlevel { zlevel } => {
                write!(f, "zlevel {zlevel} is already occupied by another layer")
            }
            PainterError::MissingSurface { zlevel, source } => {
                write!(f, "no surface for zlevel {zlevel}: {source}")
            }
        }
    }
}

impl std::error::Error for PainterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PainterError::MissingSurface { source, .. } => Some(source),
            _ => None,
        }
    }
}
