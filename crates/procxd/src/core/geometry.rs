//! Plain geometry used by layout and binding
//!
//! Coordinates follow the canvas convention: x grows to the right and y grows
//! downwards.

/// A point on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Width and height of a box
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned bounding box, stored as its top-left corner plus size
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn min_x(&self) -> f64 {
        self.x
    }

    pub fn min_y(&self) -> f64 {
        self.y
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Grow the box by `padding` on every side
    pub fn inflate(&self, padding: f64) -> Self {
        Self::new(
            self.x - padding,
            self.y - padding,
            self.width + 2.0 * padding,
            self.height + 2.0 * padding,
        )
    }

    /// Smallest box containing both boxes
    pub fn union(&self, other: &Bounds) -> Self {
        let min_x = self.min_x().min(other.min_x());
        let min_y = self.min_y().min(other.min_y());
        let max_x = self.max_x().max(other.max_x());
        let max_y = self.max_y().max(other.max_y());
        Self::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    /// True when the boxes share any area or touch
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.min_x() <= other.max_x()
            && other.min_x() <= self.max_x()
            && self.min_y() <= other.max_y()
            && other.min_y() <= self.max_y()
    }

    /// Bounding box of a set of boxes, `None` when the set is empty
    pub fn enclosing<'a>(boxes: impl IntoIterator<Item = &'a Bounds>) -> Option<Bounds> {
        boxes
            .into_iter()
            .fold(None, |acc: Option<Bounds>, b| match acc {
                Some(current) => Some(current.union(b)),
                None => Some(*b),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_and_edges() {
        let b = Bounds::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(b.center(), Point::new(60.0, 45.0));
        assert_eq!(b.max_x(), 110.0);
        assert_eq!(b.max_y(), 70.0);
    }

    #[test]
    fn test_inflate() {
        let b = Bounds::new(0.0, 0.0, 10.0, 10.0).inflate(5.0);
        assert_eq!(b, Bounds::new(-5.0, -5.0, 20.0, 20.0));
    }

    #[test]
    fn test_union_and_enclosing() {
        let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
        let b = Bounds::new(20.0, -5.0, 10.0, 10.0);
        assert_eq!(a.union(&b), Bounds::new(0.0, -5.0, 30.0, 15.0));
        assert_eq!(Bounds::enclosing([&a, &b]), Some(a.union(&b)));
        assert_eq!(Bounds::enclosing(std::iter::empty()), None);
    }

    #[test]
    fn test_intersects() {
        let a = Bounds::new(0.0, 0.0, 100.0, 50.0);
        let b = Bounds::new(200.0, 0.0, 100.0, 50.0);
        let c = Bounds::new(50.0, 25.0, 100.0, 50.0);
        assert!(!a.intersects(&b));
        assert!(a.intersects(&c));
    }
}
