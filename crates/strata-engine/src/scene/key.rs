use core::cmp::Ordering;

/// Paint-order key of a display-list element.
///
/// Ordering rules:
/// 1) `zlevel`: ascending (selects the layer)
/// 2) `z`: ascending within the layer
/// 3) `z2`: ascending within equal `z`
///
/// Equal keys keep insertion (traversal) order; the display list is sorted
/// with a stable sort, so there is no extra tie-break field.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct PaintKey {
    pub zlevel: i32,
    pub z: i32,
    pub z2: i32,
}

impl PaintKey {
    #[inline]
    pub const fn new(zlevel: i32, z: i32, z2: i32) -> Self {
        Self { zlevel, z, z2 }
    }
}

impl Ord for PaintKey {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.zlevel
            .cmp(&other.zlevel)
            .then(self.z.cmp(&other.z))
            .then(self.z2.cmp(&other.z2))
    }
}

impl PartialOrd for PaintKey {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexicographic_order() {
        let mut keys = vec![
            PaintKey::new(1, 0, 0),
            PaintKey::new(0, 1, 0),
            PaintKey::new(0, 0, 1),
            PaintKey::new(0, 0, 0),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                PaintKey::new(0, 0, 0),
                PaintKey::new(0, 0, 1),
                PaintKey::new(0, 1, 0),
                PaintKey::new(1, 0, 0),
            ]
        );
    }
}
