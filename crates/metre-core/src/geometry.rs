//! Physical (millimetre) and raster (pixel) rectangles.
//!
//! Physical coordinates are relative to the top-left corner of the page,
//! x to the right and y downwards, matching raster conventions.

use serde::{Deserialize, Serialize};

/// A point on the page in millimetres.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhysicalPoint {
    pub x: f64,
    pub y: f64,
}

impl PhysicalPoint {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Translate by `(dx, dy)` millimetres.
    #[inline]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// An axis-aligned rectangle on the page in millimetres.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhysicalRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PhysicalRect {
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn origin(&self) -> PhysicalPoint {
        PhysicalPoint::new(self.x, self.y)
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> PhysicalPoint {
        PhysicalPoint::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Corners in TL, TR, BR, BL order.
    pub fn corners(&self) -> [PhysicalPoint; 4] {
        [
            PhysicalPoint::new(self.x, self.y),
            PhysicalPoint::new(self.right(), self.y),
            PhysicalPoint::new(self.right(), self.bottom()),
            PhysicalPoint::new(self.x, self.bottom()),
        ]
    }

    /// Shrink by `d` millimetres on every side (grow when `d` is negative).
    pub fn inset(&self, d: f64) -> Self {
        Self::new(
            self.x + d,
            self.y + d,
            self.width - 2.0 * d,
            self.height - 2.0 * d,
        )
    }

    /// Centre a `width × height` rectangle inside this one.
    pub fn centered(&self, width: f64, height: f64) -> Self {
        Self::new(
            self.x + (self.width - width) / 2.0,
            self.y + (self.height - height) / 2.0,
            width,
            height,
        )
    }

    pub fn is_valid(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
            && self.width >= 0.0
            && self.height >= 0.0
    }

    /// Closed containment of a point.
    pub fn contains_point(&self, p: PhysicalPoint) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// `other` lies inside this rectangle (shared edges allowed).
    pub fn contains_rect(&self, other: &Self) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// `other` lies inside this rectangle without touching any edge.
    pub fn strictly_contains_rect(&self, other: &Self) -> bool {
        other.x > self.x
            && other.y > self.y
            && other.right() < self.right()
            && other.bottom() < self.bottom()
    }

    /// Smallest rectangle covering both.
    pub fn union(&self, other: &Self) -> Self {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Self::new(
            x,
            y,
            self.right().max(other.right()) - x,
            self.bottom().max(other.bottom()) - y,
        )
    }

    /// The interiors overlap; rectangles that only share an edge do not.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// An axis-aligned rectangle on the raster, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    #[inline]
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> i64 {
        i64::from(self.x) + i64::from(self.width)
    }

    #[inline]
    pub fn bottom(&self) -> i64 {
        i64::from(self.y) + i64::from(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Smallest rectangle covering both.
    pub fn union(&self, other: &Self) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Self::new(
            x,
            y,
            u32::try_from(right - i64::from(x)).unwrap_or(u32::MAX),
            u32::try_from(bottom - i64::from(y)).unwrap_or(u32::MAX),
        )
    }

    pub fn contains(&self, other: &Self) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn inset_and_centering_keep_the_center() {
        let zone = PhysicalRect::new(15.0, 30.0, 180.0, 180.0);
        let inner = zone.inset(8.0);
        assert_relative_eq!(inner.x, 23.0);
        assert_relative_eq!(inner.width, 164.0);
        assert_eq!(inner.center(), zone.center());

        let tag = zone.centered(160.0, 160.0);
        assert_relative_eq!(tag.x, 25.0);
        assert_relative_eq!(tag.y, 40.0);
    }

    #[test]
    fn strict_containment_rejects_shared_edges() {
        let outer = PhysicalRect::new(0.0, 0.0, 10.0, 10.0);
        let touching = PhysicalRect::new(0.0, 2.0, 5.0, 5.0);
        assert!(outer.contains_rect(&touching));
        assert!(!outer.strictly_contains_rect(&touching));
        assert!(outer.strictly_contains_rect(&outer.inset(0.5)));
    }

    #[test]
    fn overlap_ignores_shared_edges() {
        let zone = PhysicalRect::new(15.0, 30.0, 180.0, 180.0);
        let band = PhysicalRect::new(0.0, 210.0, 210.0, 57.0);
        assert!(!zone.overlaps(&band));
        assert!(PhysicalRect::new(15.0, 85.0, 180.0, 180.0).overlaps(&band));

        let u = zone.union(&PhysicalRect::new(100.0, 212.0, 20.0, 3.0));
        assert_eq!(u, PhysicalRect::new(15.0, 30.0, 180.0, 185.0));
        assert!(u.overlaps(&band));
    }

    #[test]
    fn pixel_union_covers_both() {
        let a = PixelRect::new(10, 10, 5, 5);
        let b = PixelRect::new(0, 12, 3, 10);
        let u = a.union(&b);
        assert_eq!(u, PixelRect::new(0, 10, 15, 12));
        assert!(u.contains(&a) && u.contains(&b));
        assert_eq!(PixelRect::new(0, 0, 0, 0).union(&a), a);
    }
}
