// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Axis-aligned bounding boxes and clearance tests

use crate::error::{Error, Result};
use nalgebra::{Point3, Vector3};

/// Axis-aligned bounding box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl BoundingBox {
    /// Create a box from two corners, in any order
    pub fn new(a: Point3<f64>, b: Point3<f64>) -> Self {
        Self {
            min: Point3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: Point3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// Extent along X
    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Extent along Y
    #[inline]
    pub fn depth(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Extent along Z
    #[inline]
    pub fn height(&self) -> f64 {
        self.max.z - self.min.z
    }

    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Smaller of the two horizontal extents
    ///
    /// For corridors, doors and stairs this is the passable width.
    pub fn min_horizontal_extent(&self) -> f64 {
        self.width().min(self.depth())
    }

    /// Grow the box by `margin` on every side
    pub fn expanded(&self, margin: f64) -> Self {
        let m = Vector3::repeat(margin);
        Self::new(self.min - m, self.max + m)
    }

    /// Smallest box containing both
    pub fn union(&self, other: &BoundingBox) -> Self {
        Self {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    pub fn contains_point(&self, p: &Point3<f64>) -> bool {
        (self.min.x..=self.max.x).contains(&p.x)
            && (self.min.y..=self.max.y).contains(&p.y)
            && (self.min.z..=self.max.z).contains(&p.z)
    }
}

/// Bounding box of a point set
///
/// # Errors
/// `Empty` when there are no points.
pub fn bounding_box(points: &[Point3<f64>]) -> Result<BoundingBox> {
    let (first, rest) = points.split_first().ok_or(Error::Empty)?;
    let (min, max) = rest
        .iter()
        .fold((*first, *first), |(min, max), p| (min.inf(p), max.sup(p)));
    Ok(BoundingBox { min, max })
}

/// True iff the boxes intersect with positive volume
///
/// Boxes that only touch on a face, edge or corner do not overlap.
pub fn clearance_overlap(a: &BoundingBox, b: &BoundingBox) -> bool {
    a.min.x < b.max.x
        && b.min.x < a.max.x
        && a.min.y < b.max.y
        && b.min.y < a.max.y
        && a.min.z < b.max.z
        && b.min.z < a.max.z
}

/// Shortest gap between two boxes, 0 when they touch or overlap
pub fn clearance_distance(a: &BoundingBox, b: &BoundingBox) -> f64 {
    let dx = (a.min.x - b.max.x).max(b.min.x - a.max.x).max(0.0);
    let dy = (a.min.y - b.max.y).max(b.min.y - a.max.y).max(0.0);
    let dz = (a.min.z - b.max.z).max(b.min.z - a.max.z).max(0.0);
    (dx * dx + dy * dy + dz * dz).sqrt()
}
