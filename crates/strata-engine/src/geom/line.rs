//! Straight segments.

/// Distance from `(x, y)` to the segment `(x0, y0)–(x1, y1)`.
pub fn segment_distance(x0: f64, y0: f64, x1: f64, y1: f64, x: f64, y: f64) -> f64 {
    let dx = x1 - x0;
    let dy = y1 - y0;
    let len2 = dx * dx + dy * dy;
    let t = if len2 > 0.0 {
        (((x - x0) * dx + (y - y0) * dy) / len2).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let px = x0 + dx * t - x;
    let py = y0 + dy * t - y;
    (px * px + py * py).sqrt()
}

/// True if `(x, y)` lies within `line_width / 2` of the segment.
pub fn contain_stroke(x0: f64, y0: f64, x1: f64, y1: f64, line_width: f64, x: f64, y: f64) -> bool {
    if line_width <= 0.0 {
        return false;
    }
    let half = line_width / 2.0;
    if (y > y0 + half && y > y1 + half)
        || (y < y0 - half && y < y1 - half)
        || (x > x0 + half && x > x1 + half)
        || (x < x0 - half && x < x1 - half)
    {
        return false;
    }
    segment_distance(x0, y0, x1, y1, x, y) <= half
}
