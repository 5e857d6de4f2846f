//! Tagged command records of the flat path buffer.

/// Command tag stored as the first `f64` of each record.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[repr(u8)]
pub enum PathCmd {
    MoveTo = 1,
    LineTo = 2,
    CubicTo = 3,
    QuadTo = 4,
    Arc = 5,
    Close = 6,
    Rect = 7,
}

impl PathCmd {
    #[inline]
    pub const fn tag(self) -> f64 {
        self as u8 as f64
    }

    pub fn from_tag(tag: f64) -> Option<Self> {
        Some(match tag as i64 {
            1 => PathCmd::MoveTo,
            2 => PathCmd::LineTo,
            3 => PathCmd::CubicTo,
            4 => PathCmd::QuadTo,
            5 => PathCmd::Arc,
            6 => PathCmd::Close,
            7 => PathCmd::Rect,
            _ => return None,
        })
    }

    /// Number of `f64` operands following the tag.
    #[inline]
    pub const fn operands(self) -> usize {
        match self {
            PathCmd::MoveTo | PathCmd::LineTo => 2,
            PathCmd::CubicTo => 6,
            PathCmd::QuadTo => 4,
            PathCmd::Arc => 8,
            PathCmd::Close => 0,
            PathCmd::Rect => 4,
        }
    }
}

/// Decoded path record.
///
/// Arcs keep the recorded form: `sweep` is `end - start` as passed by the
/// caller and `anticlockwise` selects the direction, following the canvas
/// arc convention.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Segment {
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    CubicTo { x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64 },
    QuadTo { x1: f64, y1: f64, x: f64, y: f64 },
    Arc {
        cx: f64,
        cy: f64,
        rx: f64,
        ry: f64,
        start: f64,
        sweep: f64,
        rotation: f64,
        anticlockwise: bool,
    },
    Close,
    Rect { x: f64, y: f64, width: f64, height: f64 },
}

impl Segment {
    #[inline]
    pub fn cmd(&self) -> PathCmd {
        match self {
            Segment::MoveTo { .. } => PathCmd::MoveTo,
            Segment::LineTo { .. } => PathCmd::LineTo,
            Segment::CubicTo { .. } => PathCmd::CubicTo,
            Segment::QuadTo { .. } => PathCmd::QuadTo,
            Segment::Arc { .. } => PathCmd::Arc,
            Segment::Close => PathCmd::Close,
            Segment::Rect { .. } => PathCmd::Rect,
        }
    }

    /// Appends the tagged record to `buf`.
    pub fn encode(&self, buf: &mut Vec<f64>) {
        buf.push(self.cmd().tag());
        match *self {
            Segment::MoveTo { x, y } | Segment::LineTo { x, y } => buf.extend_from_slice(&[x, y]),
            Segment::CubicTo { x1, y1, x2, y2, x, y } => buf.extend_from_slice(&[x1, y1, x2, y2, x, y]),
            Segment::QuadTo { x1, y1, x, y } => buf.extend_from_slice(&[x1, y1, x, y]),
            Segment::Arc { cx, cy, rx, ry, start, sweep, rotation, anticlockwise } => {
                let fs = if anticlockwise { 0.0 } else { 1.0 };
                buf.extend_from_slice(&[cx, cy, rx, ry, start, sweep, rotation, fs]);
            }
            Segment::Close => {}
            Segment::Rect { x, y, width, height } => buf.extend_from_slice(&[x, y, width, height]),
        }
    }
}

/// Iterates the records of a path buffer.
///
/// Stops at the first unknown tag or truncated record.
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    data: &'a [f64],
    pos: usize,
}

impl<'a> Segments<'a> {
    #[inline]
    pub fn new(data: &'a [f64]) -> Self {
        Self { data, pos: 0 }
    }
}

impl Iterator for Segments<'_> {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        let cmd = PathCmd::from_tag(*self.data.get(self.pos)?)?;
        let start = self.pos + 1;
        let d = self.data.get(start..start + cmd.operands())?;
        self.pos = start + cmd.operands();

        Some(match cmd {
            PathCmd::MoveTo => Segment::MoveTo { x: d[0], y: d[1] },
            PathCmd::LineTo => Segment::LineTo { x: d[0], y: d[1] },
            PathCmd::CubicTo => Segment::CubicTo { x1: d[0], y1: d[1], x2: d[2], y2: d[3], x: d[4], y: d[5] },
            PathCmd::QuadTo => Segment::QuadTo { x1: d[0], y1: d[1], x: d[2], y: d[3] },
            PathCmd::Arc => Segment::Arc {
                cx: d[0],
                cy: d[1],
                rx: d[2],
                ry: d[3],
                start: d[4],
                sweep: d[5],
                rotation: d[6],
                anticlockwise: d[7] == 0.0,
            },
            PathCmd::Close => Segment::Close,
            PathCmd::Rect => Segment::Rect { x: d[0], y: d[1], width: d[2], height: d[3] },
        })
    }
}
