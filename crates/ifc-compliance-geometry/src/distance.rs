// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Distance helpers

use nalgebra::Point3;

/// Euclidean distance in model units
#[inline]
pub fn distance(a: &Point3<f64>, b: &Point3<f64>) -> f64 {
    nalgebra::distance(a, b)
}

/// Horizontal (XY-plane) distance, ignoring elevation
#[inline]
pub fn distance_2d(a: &Point3<f64>, b: &Point3<f64>) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

/// Mean of a point set, or `None` for an empty set
pub fn centroid(points: &[Point3<f64>]) -> Option<Point3<f64>> {
    if points.is_empty() {
        return None;
    }
    let sum = points
        .iter()
        .fold(nalgebra::Vector3::zeros(), |acc, p| acc + p.coords);
    Some(Point3::from(sum / points.len() as f64))
}

/// Horizontal length of a polyline
pub fn polyline_length(points: &[Point3<f64>]) -> f64 {
    points.windows(2).map(|w| distance_2d(&w[0], &w[1])).sum()
}

/// Horizontal travel distance from `start` to `end` through `waypoints`
///
/// Straight segments between consecutive points; this is the walking
/// distance approximation used when no connectivity graph is available.
pub fn travel_distance(
    start: &Point3<f64>,
    end: &Point3<f64>,
    waypoints: &[Point3<f64>],
) -> f64 {
    let mut total = 0.0;
    let mut previous = start;
    for point in waypoints.iter().chain(std::iter::once(end)) {
        total += distance_2d(previous, point);
        previous = point;
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_distance() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(3.0, 4.0, 12.0);
        assert_relative_eq!(distance(&a, &b), 13.0);
        assert_relative_eq!(distance_2d(&a, &b), 5.0);
        assert_relative_eq!(distance(&a, &a), 0.0);
    }

    #[test]
    fn test_centroid() {
        let points = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(2.0, 4.0, 2.0),
            Point3::new(0.0, 4.0, 2.0),
        ];
        let c = centroid(&points).unwrap();
        assert_relative_eq!(c, Point3::new(1.0, 2.0, 1.0));
        assert!(centroid(&[]).is_none());
    }

    #[test]
    fn test_travel_distance_through_waypoints() {
        let start = Point3::new(0.0, 0.0, 0.0);
        let end = Point3::new(10.0, 10.0, 3.0);
        let corner = [Point3::new(10.0, 0.0, 0.0)];
        assert_relative_eq!(travel_distance(&start, &end, &corner), 20.0);
        assert_relative_eq!(
            travel_distance(&start, &end, &[]),
            200.0_f64.sqrt(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_polyline_length() {
        let points = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 5.0, 0.0),
            Point3::new(5.0, 5.0, 0.0),
        ];
        assert_relative_eq!(polyline_length(&points), 10.0);
        assert_relative_eq!(polyline_length(&points[..1]), 0.0);
    }
}
