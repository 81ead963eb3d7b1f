//! 2-D geometry primitives used by the layout engine and renderer.

/// A point in diagram space.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Adds another point to this point, returning a new point
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Translates the point by the given offsets
    pub fn translate(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Represents the dimensions of an element with width and height
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f32 {
        self.height
    }

    /// Returns a new Size with the maximum width and height between this size and another
    pub fn max(self, other: Size) -> Self {
        Self {
            width: self.width.max(other.width),
            height: self.height.max(other.height),
        }
    }
}

/// An axis-aligned bounding rectangle.
///
/// Bounds are defined by minimum and maximum coordinates rather than an
/// origin and size, which makes unions cheap during extent calculation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates bounds from an origin point and a size.
    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self {
            min_x: origin.x(),
            min_y: origin.y(),
            max_x: origin.x() + size.width(),
            max_y: origin.y() + size.height(),
        }
    }

    pub fn min_x(self) -> f32 {
        self.min_x
    }

    pub fn min_y(self) -> f32 {
        self.min_y
    }

    pub fn max_x(self) -> f32 {
        self.max_x
    }

    pub fn max_y(self) -> f32 {
        self.max_y
    }

    /// Returns the width of the bounds
    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    /// Returns the height of the bounds
    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// Returns the smallest bounds enclosing both this and `other`.
    pub fn merge(self, other: Bounds) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Checks whether `other` lies entirely within this bounds.
    pub fn contains(self, other: Bounds) -> bool {
        other.min_x >= self.min_x
            && other.min_y >= self.min_y
            && other.max_x <= self.max_x
            && other.max_y <= self.max_y
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_bounds_from_origin_size() {
        let bounds = Bounds::from_origin_size(Point::new(10.0, 20.0), Size::new(30.0, 40.0));
        assert_approx_eq!(f32, bounds.min_x(), 10.0);
        assert_approx_eq!(f32, bounds.min_y(), 20.0);
        assert_approx_eq!(f32, bounds.max_x(), 40.0);
        assert_approx_eq!(f32, bounds.max_y(), 60.0);
        assert_approx_eq!(f32, bounds.width(), 30.0);
        assert_approx_eq!(f32, bounds.height(), 40.0);
    }

    #[test]
    fn test_bounds_merge() {
        let a = Bounds::from_origin_size(Point::new(0.0, 0.0), Size::new(10.0, 10.0));
        let b = Bounds::from_origin_size(Point::new(5.0, 5.0), Size::new(20.0, 20.0));
        let merged = a.merge(b);
        assert_approx_eq!(f32, merged.min_x(), 0.0);
        assert_approx_eq!(f32, merged.max_x(), 25.0);
        assert_approx_eq!(f32, merged.max_y(), 25.0);
    }

    #[test]
    fn test_bounds_contains() {
        let outer = Bounds::from_origin_size(Point::new(0.0, 0.0), Size::new(100.0, 100.0));
        let inner = Bounds::from_origin_size(Point::new(10.0, 10.0), Size::new(50.0, 50.0));
        assert!(outer.contains(inner));
        assert!(!inner.contains(outer));
        assert!(outer.contains(outer));
    }

    #[test]
    fn test_size_max() {
        let a = Size::new(10.0, 40.0);
        let b = Size::new(30.0, 20.0);
        let max = a.max(b);
        assert_approx_eq!(f32, max.width(), 30.0);
        assert_approx_eq!(f32, max.height(), 40.0);
    }
}
