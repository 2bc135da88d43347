/// Integer pixel position inside a raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelCoord {
    pub x: u32,
    pub y: u32,
}

impl PixelCoord {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance in pixel units.
    pub fn distance(&self, other: &PixelCoord) -> f64 {
        let dx = self.x as f64 - other.x as f64;
        let dy = self.y as f64 - other.y as f64;
        dx.hypot(dy)
    }

    /// Integer midpoint, halves rounded up.
    pub fn midpoint(&self, other: &PixelCoord) -> PixelCoord {
        let x = (self.x as u64 + other.x as u64).div_ceil(2);
        let y = (self.y as u64 + other.y as u64).div_ceil(2);
        PixelCoord::new(x as u32, y as u32)
    }
}

impl From<(u32, u32)> for PixelCoord {
    fn from((x, y): (u32, u32)) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_euclidean() {
        let a = PixelCoord::new(0, 0);
        let b = PixelCoord::new(3, 4);
        assert_eq!(a.distance(&b), 5.0);
        assert_eq!(b.distance(&a), 5.0);
    }

    #[test]
    fn midpoint_rounds_half_up() {
        let a = PixelCoord::new(0, 0);
        let b = PixelCoord::new(3, 5);
        assert_eq!(a.midpoint(&b), PixelCoord::new(2, 3));
        assert_eq!(b.midpoint(&a), PixelCoord::new(2, 3));
    }

    #[test]
    fn midpoint_of_even_span_is_exact() {
        let a = PixelCoord::new(2, 10);
        let b = PixelCoord::new(6, 4);
        assert_eq!(a.midpoint(&b), PixelCoord::new(4, 7));
    }
}
