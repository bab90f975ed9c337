// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Delivered rule set
//!
//! | Rule | Config file | Category |
//! |---|---|---|
//! | FS-001 | `travel_distance.yaml` | fire_safety |
//! | FS-002 | `egress.yaml` | fire_safety |
//! | ACC-001 | `corridors.yaml` | accessibility |
//! | ACC-002 | `doors.yaml` | accessibility |
//! | BC-001 | `setbacks.yaml` | building_control |

mod corridor_width;
mod door_clearance;
mod egress;
mod setback;
mod travel_distance;

pub use corridor_width::CorridorWidthRule;
pub use door_clearance::DoorClearanceRule;
pub use egress::EgressWidthRule;
pub use setback::SetbackRule;
pub use travel_distance::{PathMode, TravelDistanceRule};

use crate::rule::{number_value, Rule};
use serde_json::Value;
use std::sync::Arc;

/// Every rule shipped with the engine, in registration order
pub fn default_rules() -> Vec<Arc<dyn Rule>> {
    vec![
        Arc::new(TravelDistanceRule),
        Arc::new(EgressWidthRule),
        Arc::new(CorridorWidthRule),
        Arc::new(DoorClearanceRule),
        Arc::new(SetbackRule),
    ]
}

/// Millimeter measurement as reported, rounded to whole millimeters
fn whole_mm(mm: f64) -> Value {
    number_value(mm.round())
}
