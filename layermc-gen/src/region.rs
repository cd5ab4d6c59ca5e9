/// Rectangle of columns, `width` along x and `depth` along z.
///
/// Column indices are row-major with z as the row: `index = dz * width + dx`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub min_x: i32,
    pub min_z: i32,
    pub width: u32,
    pub depth: u32,
}

impl Region {
    pub fn new(min_x: i32, min_z: i32, width: u32, depth: u32) -> Self {
        Self { min_x, min_z, width, depth }
    }

    /// Region spanning two corner columns, both inclusive, in any order.
    ///
    /// A span wider than `u32::MAX` columns is clamped to `u32::MAX`.
    pub fn from_corners(a: (i32, i32), b: (i32, i32)) -> Self {
        let (min_x, max_x) = (a.0.min(b.0), a.0.max(b.0));
        let (min_z, max_z) = (a.1.min(b.1), a.1.max(b.1));
        Self {
            min_x,
            min_z,
            width: span(min_x, max_x),
            depth: span(min_z, max_z),
        }
    }

    pub fn area(&self) -> usize {
        self.width as usize * self.depth as usize
    }

    pub fn is_empty(&self) -> bool {
        self.area() == 0
    }

    pub fn contains(&self, x: i32, z: i32) -> bool {
        self.index_of(x, z).is_some()
    }

    pub fn index_of(&self, x: i32, z: i32) -> Option<usize> {
        let dx = x as i64 - self.min_x as i64;
        let dz = z as i64 - self.min_z as i64;
        if dx < 0 || dz < 0 || dx >= self.width as i64 || dz >= self.depth as i64 {
            return None;
        }
        Some(dz as usize * self.width as usize + dx as usize)
    }

    pub fn column_at(&self, index: usize) -> (i32, i32) {
        let width = self.width as usize;
        let dx = (index % width) as i64;
        let dz = (index / width) as i64;
        ((self.min_x as i64 + dx) as i32, (self.min_z as i64 + dz) as i32)
    }

    /// Columns in index order.
    pub fn columns(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        (0..self.area()).map(move |i| self.column_at(i))
    }
}

fn span(min: i32, max: i32) -> u32 {
    let len = max as i64 - min as i64 + 1;
    u32::try_from(len).unwrap_or_else(|_| {
        log::warn!("Region span {}..={} is too wide, clamping to {} columns", min, max, u32::MAX);
        u32::MAX
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_corners_any_order() {
        let a = Region::from_corners((10, -2), (7, 3));
        let b = Region::from_corners((7, 3), (10, -2));
        assert_eq!(a, b);
        assert_eq!(a, Region::new(7, -2, 4, 6));
        assert_eq!(a.area(), 24);
    }

    #[test]
    fn test_single_column() {
        let r = Region::from_corners((5, 5), (5, 5));
        assert_eq!(r.area(), 1);
        assert_eq!(r.columns().collect::<Vec<_>>(), vec![(5, 5)]);
    }

    #[test]
    fn test_index_round_trip() {
        let r = Region::new(-3, 4, 5, 2);
        for (i, (x, z)) in r.columns().enumerate() {
            assert_eq!(r.index_of(x, z), Some(i));
        }
        assert_eq!(r.index_of(-4, 4), None);
        assert_eq!(r.index_of(2, 4), None);
        assert_eq!(r.index_of(0, 6), None);
        assert!(r.contains(1, 5));
    }

    #[test]
    fn test_empty_region() {
        let r = Region::new(0, 0, 0, 10);
        assert!(r.is_empty());
        assert_eq!(r.columns().count(), 0);
    }

    #[test]
    fn test_full_i32_span_is_clamped_not_empty() {
        let r = Region::from_corners((i32::MIN, 0), (i32::MAX, 0));
        assert_eq!(r.width, u32::MAX);
        assert_eq!(r.depth, 1);
        assert!(!r.is_empty());
        assert_eq!(r.column_at(0), (i32::MIN, 0));
        assert_eq!(r.column_at(u32::MAX as usize - 1), (i32::MAX - 1, 0));
    }
}
