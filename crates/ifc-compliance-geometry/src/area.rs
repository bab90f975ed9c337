// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polygon area

use crate::error::{Error, Result};
use nalgebra::{Point2, Point3, Vector3};

/// Unnormalized polygon normal by Newell's method
///
/// Its length is twice the polygon area for a planar polygon; a zero vector
/// means the vertices are collinear.
pub fn polygon_normal(points: &[Point3<f64>]) -> Vector3<f64> {
    let n = points.len();
    let mut normal = Vector3::<f64>::zeros();

    for i in 0..n {
        let current = &points[i];
        let next = &points[(i + 1) % n];

        normal.x += (current.y - next.y) * (current.z + next.z);
        normal.y += (current.z - next.z) * (current.x + next.x);
        normal.z += (current.x - next.x) * (current.y + next.y);
    }

    normal
}

/// Signed area of a 2D polygon (shoelace formula)
///
/// Positive for counter-clockwise winding.
pub fn polygon_area_2d(points: &[Point2<f64>]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut twice_area = 0.0;
    for i in 0..n {
        let a = &points[i];
        let b = &points[(i + 1) % n];
        twice_area += a.x * b.y - b.x * a.y;
    }
    twice_area / 2.0
}

/// Area of a planar polygon in 3D
///
/// The polygon is projected onto its own plane (orthonormal basis built from
/// the Newell normal) and measured with the shoelace formula, so tilted
/// polygons report their true area. Returns the absolute value.
///
/// # Errors
/// `TooFewVertices` for fewer than 3 vertices, `Degenerate` for
/// non-finite coordinates or collinear vertices.
pub fn polygon_area(points: &[Point3<f64>]) -> Result<f64> {
    if points.len() < 3 {
        return Err(Error::TooFewVertices {
            required: 3,
            actual: points.len(),
        });
    }
    if points.iter().any(|p| !p.coords.iter().all(|c| c.is_finite())) {
        return Err(Error::degenerate("non-finite vertex coordinate"));
    }

    let normal = polygon_normal(points);
    let len = normal.norm();
    if len < 1e-12 {
        return Err(Error::degenerate("collinear vertices enclose no area"));
    }
    let normal = normal / len;

    let origin = points[0];
    let reference = if normal.x.abs() <= normal.y.abs() && normal.x.abs() <= normal.z.abs() {
        Vector3::new(1.0, 0.0, 0.0)
    } else if normal.y.abs() <= normal.z.abs() {
        Vector3::new(0.0, 1.0, 0.0)
    } else {
        Vector3::new(0.0, 0.0, 1.0)
    };
    let u_axis = normal.cross(&reference).normalize();
    let v_axis = normal.cross(&u_axis).normalize();

    let projected: Vec<Point2<f64>> = points
        .iter()
        .map(|p| {
            let v = p - origin;
            Point2::new(v.dot(&u_axis), v.dot(&v_axis))
        })
        .collect();

    Ok(polygon_area_2d(&projected).abs())
}
