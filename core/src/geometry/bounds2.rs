//! 2-D Axis Aligned Bounding Boxes.

use super::*;
use itertools::{iproduct, Product};
use num_traits::Num;
use std::fmt;
use std::ops::Range;

/// 2D Axis Aligned Bounding Box.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Bounds2<T> {
    /// Minimum bounds.
    pub p_min: Point2<T>,

    /// Maximum bounds.
    pub p_max: Point2<T>,
}

/// 2D bounding box containing `Float` points.
pub type Bounds2f = Bounds2<Float>;

/// 2D bounding box containing `Int` points.
pub type Bounds2i = Bounds2<Int>;

impl<T: Num + PartialOrd + Copy> Bounds2<T> {
    /// Creates a new 2D bounding box from 2 points. The minimum and maximum
    /// bounds are used for each coordinate axis.
    ///
    /// * `p1` - First point.
    /// * `p2` - Second point.
    pub fn new(p1: Point2<T>, p2: Point2<T>) -> Self {
        Self {
            p_min: p1.min(&p2),
            p_max: p1.max(&p2),
        }
    }

    /// Returns the vector along the box diagonal from the minimum point to
    /// the maximum point.
    pub fn diagonal(&self) -> Vector2<T> {
        self.p_max - self.p_min
    }

    /// Returns the area of the box. Empty boxes have zero area.
    pub fn area(&self) -> T {
        if self.is_empty() {
            T::zero()
        } else {
            let d = self.diagonal();
            d.x * d.y
        }
    }

    /// Returns `true` if the box encloses no points.
    pub fn is_empty(&self) -> bool {
        self.p_min.x >= self.p_max.x || self.p_min.y >= self.p_max.y
    }

    /// Returns the intersection with another box. The result may be empty.
    ///
    /// * `other` - The other bounding box.
    pub fn intersect(&self, other: &Self) -> Self {
        Self {
            p_min: self.p_min.max(&other.p_min),
            p_max: self.p_max.min(&other.p_max),
        }
    }

    /// Returns `true` if a point is inside the box, excluding the upper
    /// boundary.
    ///
    /// * `p` - The point.
    pub fn contains_exclusive(&self, p: &Point2<T>) -> bool {
        p.x >= self.p_min.x && p.x < self.p_max.x && p.y >= self.p_min.y && p.y < self.p_max.y
    }
}

impl Bounds2i {
    /// Returns the number of integer points in the box as a `usize`.
    pub fn count(&self) -> usize {
        self.area().max(0) as usize
    }
}

impl From<Bounds2i> for Bounds2f {
    fn from(b: Bounds2i) -> Self {
        Self {
            p_min: Point2f::from(b.p_min),
            p_max: Point2f::from(b.p_max),
        }
    }
}

impl From<Bounds2f> for Bounds2i {
    fn from(b: Bounds2f) -> Self {
        Self {
            p_min: Point2i::from(b.p_min),
            p_max: Point2i::from(b.p_max),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Bounds2<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}, {}}}", self.p_min, self.p_max)
    }
}

/// An iterator that can step through integer coordinates in a bounding box
/// in a left-to-right (x-axis) and top-to-bottom (y-axis) scan order.
pub struct Bounds2iIterator {
    /// The iterator that will supply points.
    p: Product<Range<Int>, Range<Int>>,
}

impl IntoIterator for Bounds2i {
    type Item = Point2i;
    type IntoIter = Bounds2iIterator;

    /// Create an iterator for `Bounds2i`. Empty boxes yield no points.
    fn into_iter(self) -> Self::IntoIter {
        let (max_x, max_y) = if self.is_empty() {
            (self.p_min.x, self.p_min.y)
        } else {
            (self.p_max.x, self.p_max.y)
        };
        Bounds2iIterator {
            p: iproduct!(self.p_min.y..max_y, self.p_min.x..max_x),
        }
    }
}

impl Iterator for Bounds2iIterator {
    type Item = Point2i;

    /// Get the next point.
    fn next(&mut self) -> Option<Self::Item> {
        self.p.next().map(|(y, x)| Point2i::new(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iterates_in_scanline_order() {
        let b = Bounds2i::new(Point2i::new(1, 2), Point2i::new(3, 4));
        let points: Vec<Point2i> = b.into_iter().collect();
        assert_eq!(
            points,
            vec![
                Point2i::new(1, 2),
                Point2i::new(2, 2),
                Point2i::new(1, 3),
                Point2i::new(2, 3),
            ]
        );
    }

    #[test]
    fn empty_bounds_yield_no_points() {
        let b = Bounds2i::new(Point2i::new(2, 2), Point2i::new(2, 5));
        assert!(b.is_empty());
        assert_eq!(b.into_iter().count(), 0);
        assert_eq!(b.count(), 0);
    }

    #[test]
    fn intersect_of_disjoint_boxes_is_empty() {
        let a = Bounds2i::new(Point2i::new(0, 0), Point2i::new(4, 4));
        let b = Bounds2i::new(Point2i::new(5, 5), Point2i::new(8, 8));
        assert!(a.intersect(&b).is_empty());
        assert_eq!(a.intersect(&b).area(), 0);
    }
}
