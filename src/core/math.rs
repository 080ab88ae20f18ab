// Math utilities and helper functions

use glam::Vec2;

/// Axis-aligned rectangle described by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    /// Box of `size` centred on `center`
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        Self::new(center - size * 0.5, size)
    }

    /// Strict overlap test: boxes that only share an edge do not overlap
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.min.x + other.size.x
            && self.min.x + self.size.x > other.min.x
            && self.min.y < other.min.y + other.size.y
            && self.min.y + self.size.y > other.min.y
    }
}

/// Clamp `value` into `[margin, extent - margin]`.
///
/// Unlike `f32::clamp` this never panics: when the extent is smaller than
/// twice the margin the lower bound wins.
pub fn clamp_with_margin(value: f32, margin: f32, extent: f32) -> f32 {
    value.min(extent - margin).max(margin)
}

/// Clamp both axes of `v` into `[-limit, limit]`
pub fn clamp_axes(v: Vec2, limit: f32) -> Vec2 {
    Vec2::new(v.x.max(-limit).min(limit), v.y.max(-limit).min(limit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_is_strict() {
        let a = Aabb::new(Vec2::ZERO, Vec2::new(10.0, 10.0));
        let touching = Aabb::new(Vec2::new(10.0, 0.0), Vec2::new(5.0, 5.0));
        let inside = Aabb::new(Vec2::new(9.0, 9.0), Vec2::new(5.0, 5.0));

        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&inside));
        assert!(inside.overlaps(&a));
    }

    #[test]
    fn test_centered_box() {
        let b = Aabb::centered(Vec2::new(400.0, 300.0), Vec2::new(24.0, 24.0));
        assert_eq!(b.min, Vec2::new(388.0, 288.0));
        assert_eq!(b.size, Vec2::new(24.0, 24.0));
    }

    #[test]
    fn test_clamp_with_margin() {
        assert_eq!(clamp_with_margin(5.0, 12.0, 800.0), 12.0);
        assert_eq!(clamp_with_margin(900.0, 12.0, 800.0), 788.0);
        assert_eq!(clamp_with_margin(400.0, 12.0, 800.0), 400.0);
        // Degenerate world: lower bound wins instead of panicking
        assert_eq!(clamp_with_margin(5.0, 12.0, 10.0), 12.0);
    }

    #[test]
    fn test_clamp_axes() {
        let v = clamp_axes(Vec2::new(7.5, -9.0), 6.0);
        assert_eq!(v, Vec2::new(6.0, -6.0));
        assert_eq!(clamp_axes(Vec2::new(1.0, -2.0), 3.0), Vec2::new(1.0, -2.0));
    }
}
