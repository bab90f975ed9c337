// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Egress connectivity between spaces

use super::{DoorRecord, SpaceRecord};
use ifc_compliance_geometry::{clearance_overlap, distance, ConnectivityGraph};
use ifc_compliance_model::{EntityId, IfcModel, IfcType};
use rustc_hash::{FxHashMap, FxHashSet};

/// Build a walkable graph of spaces and doors
///
/// Doors link the spaces they bound, taken from declared space boundaries
/// or, when a door declares none, from spaces whose bounding box (grown by
/// `tolerance` meters) overlaps the door's. Openings and virtual
/// boundaries shared by two spaces link them directly. Edge weights are
/// centroid-to-centroid distances in meters.
pub fn build_egress_graph(
    model: &dyn IfcModel,
    spaces: &[SpaceRecord],
    doors: &[DoorRecord],
    tolerance: f64,
) -> ConnectivityGraph<EntityId> {
    let mut graph = ConnectivityGraph::new();

    let space_centroids: FxHashMap<EntityId, _> = spaces
        .iter()
        .filter_map(|s| Some((s.element.element_id, s.element.geometry.centroid?)))
        .collect();
    for space in spaces {
        if space_centroids.contains_key(&space.element.element_id) {
            graph.add_node(space.element.element_id);
        }
    }

    for door in doors {
        let door_id = door.element.element_id;
        let Some(door_centroid) = door.element.geometry.centroid else {
            continue;
        };

        let mut linked: Vec<EntityId> = model
            .spatial()
            .spaces_bounded_by(door_id)
            .into_iter()
            .filter(|id| space_centroids.contains_key(id))
            .collect();

        if linked.is_empty() {
            if let Some(door_bounds) = door.element.geometry.bounds {
                linked = spaces
                    .iter()
                    .filter(|s| {
                        s.element.geometry.bounds.is_some_and(|b| {
                            clearance_overlap(&b.expanded(tolerance), &door_bounds)
                        })
                    })
                    .map(|s| s.element.element_id)
                    .filter(|id| space_centroids.contains_key(id))
                    .collect();
            }
        }

        for space_id in linked {
            let weight = distance(&space_centroids[&space_id], &door_centroid);
            if let Err(e) = graph.add_edge(space_id, door_id, weight) {
                log::debug!("skipping link {space_id} -> {door_id}: {e}");
            }
        }
    }

    // spaces sharing an opening or virtual boundary
    let mut shared: FxHashMap<EntityId, Vec<EntityId>> = FxHashMap::default();
    let mut seen = FxHashSet::default();
    for space in spaces {
        let space_id = space.element.element_id;
        if !space_centroids.contains_key(&space_id) {
            continue;
        }
        for element_id in model.spatial().space_boundaries(space_id) {
            let is_opening = model.resolver().get(element_id).is_some_and(|e| {
                e.ifc_type == IfcType::IfcOpeningElement
                    || e.ifc_type.name().eq_ignore_ascii_case("IfcVirtualElement")
            });
            if is_opening && seen.insert((element_id, space_id)) {
                shared.entry(element_id).or_default().push(space_id);
            }
        }
    }
    let mut openings: Vec<_> = shared.into_iter().collect();
    openings.sort_by_key(|(id, _)| *id);
    for (_, linked) in openings {
        for (i, a) in linked.iter().enumerate() {
            for b in &linked[i + 1..] {
                let weight = distance(&space_centroids[a], &space_centroids[b]);
                if let Err(e) = graph.add_edge(*a, *b, weight) {
                    log::debug!("skipping link {a} -> {b}: {e}");
                }
            }
        }
    }

    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{DoorExtractor, Extractor, SpaceExtractor};
    use approx::assert_relative_eq;
    use ifc_compliance_model::{Entity, EntityGeometry, SnapshotModel};

    /// Office -- D1 -- Corridor -- D2 (external), Store linked by an opening
    fn model() -> SnapshotModel {
        SnapshotModel::builder()
            .entity(Entity::new(EntityId(1), IfcType::IfcSpace).with_name("Office"))
            .geometry(EntityGeometry::from_box([0.0, 0.0, 0.0], [4.0, 4.0, 3.0]))
            .entity(Entity::new(EntityId(2), IfcType::IfcSpace).with_name("Corridor"))
            .geometry(EntityGeometry::from_box([0.0, 4.0, 0.0], [20.0, 6.0, 3.0]))
            .entity(Entity::new(EntityId(3), IfcType::IfcSpace).with_name("Store"))
            .geometry(EntityGeometry::from_box([16.0, 6.0, 0.0], [20.0, 10.0, 3.0]))
            .entity(Entity::new(EntityId(10), IfcType::IfcDoor).with_name("D1"))
            .geometry(EntityGeometry::from_box([1.5, 3.9, 0.0], [2.5, 4.1, 2.1]))
            .bounds(&[EntityId(1), EntityId(2)])
            .entity(Entity::new(EntityId(11), IfcType::IfcDoor).with_name("D2"))
            // no declared boundaries, found by overlap
            .geometry(EntityGeometry::from_box([19.9, 4.5, 0.0], [20.1, 5.5, 2.1]))
            .entity(Entity::new(EntityId(20), IfcType::IfcOpeningElement))
            .bounds(&[EntityId(2), EntityId(3)])
            .build()
            .unwrap()
    }

    #[test]
    fn test_graph_links_spaces_through_doors() {
        let model = model();
        let spaces = SpaceExtractor.extract(&model).records;
        let doors = DoorExtractor.extract(&model).records;
        let graph = build_egress_graph(&model, &spaces, &doors, 0.05);

        assert_eq!(graph.node_count(), 5);
        assert_eq!(graph.edge_count(), 4);

        // office centroid (2,2,1.5) -> D1 (2,4,1.05) -> corridor (10,5,1.5) -> D2 (20,5,1.05)
        let path = graph.shortest_path(&EntityId(1), &EntityId(11)).unwrap();
        assert_eq!(
            path.nodes,
            vec![EntityId(1), EntityId(10), EntityId(2), EntityId(11)]
        );
        let expected = (4.0_f64 + 0.2025).sqrt()
            + (64.0_f64 + 1.0 + 0.2025).sqrt()
            + (100.0_f64 + 0.2025).sqrt();
        assert_relative_eq!(path.distance, expected, epsilon = 1e-9);
    }

    #[test]
    fn test_opening_links_spaces() {
        let model = model();
        let spaces = SpaceExtractor.extract(&model).records;
        let graph = build_egress_graph(&model, &spaces, &[], 0.05);
        assert!(graph.shortest_path_distance(&EntityId(3), &EntityId(2)).is_some());
        assert!(graph.shortest_path_distance(&EntityId(1), &EntityId(2)).is_none());
    }
}
