// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # IFC Compliance Geometry
//!
//! Pure geometric functions shared by compliance rules. Nothing here knows
//! about models or rules; inputs are plain points, boxes and graphs.
//!
//! - **Distance**: point to point, horizontal distance, travel along waypoints
//! - **Area**: planar polygon area via projection onto the polygon's plane
//! - **Bounding boxes**: extents, clearance overlap and gap between boxes
//! - **Paths**: shortest travel distance over a connectivity graph
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ifc_compliance_geometry::{polygon_area, Point3};
//!
//! let square = [
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! assert_eq!(polygon_area(&square)?, 1.0);
//! ```

pub mod area;
pub mod bbox;
pub mod distance;
pub mod error;
pub mod path;

pub use area::{polygon_area, polygon_area_2d, polygon_normal};
pub use bbox::{bounding_box, clearance_distance, clearance_overlap, BoundingBox};
pub use distance::{centroid, distance, distance_2d, polyline_length, travel_distance};
pub use error::{Error, Result};
pub use path::{ConnectivityGraph, TravelPath};

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector3};
