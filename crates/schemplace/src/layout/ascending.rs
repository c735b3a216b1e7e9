//! Ascending index assignment.
//!
//! Central ports are ranked per side by their vertical offset. Each satellite
//! box then inherits the lowest rank among the central ports it connects to;
//! boxes without a ranked connection are appended after every ranked box.

use std::cmp::Ordering;

use log::{debug, trace};

use schemplace_core::scene::Side;

use super::{connection_map::ConnectionMap, placement::Placement};

/// Ranks the central ports on each side by ascending `ry`.
///
/// Ports with equal `ry` keep their declaration order.
fn rank_central_ports(placement: &mut Placement) {
    for side in Side::ALL {
        let mut side_ports: Vec<usize> = placement
            .central
            .ports
            .iter()
            .enumerate()
            .filter(|(_, p)| p.side == Some(side))
            .map(|(i, _)| i)
            .collect();

        let ports = &placement.central.ports;
        side_ports.sort_by(|&a, &b| {
            ports[a]
                .offset
                .y()
                .partial_cmp(&ports[b].offset.y())
                .unwrap_or(Ordering::Equal)
        });

        for (rank, port_idx) in side_ports.into_iter().enumerate() {
            placement.central.ports[port_idx].ascending_port_index = Some(rank);
        }
    }
}

/// Assigns `ascending_port_index` and `ascending_box_index` to every satellite box.
///
/// Returns the placement and the highest index handed out (0 when none).
pub(crate) fn assign(mut placement: Placement, connections: &ConnectionMap) -> (Placement, usize) {
    rank_central_ports(&mut placement);

    let ranks: Vec<(usize, Option<usize>)> = placement
        .satellite_indices()
        .map(|i| {
            let b = &placement.boxes[i].inner;
            let rank = placement
                .central
                .ports
                .iter()
                .filter(|port| connections.box_touches(b, port.port_id))
                .filter_map(|port| port.ascending_port_index)
                .min();
            (i, rank)
        })
        .collect();

    for &(i, rank) in &ranks {
        let b = &mut placement.boxes[i];
        b.ascending_port_index = rank;
        b.ascending_box_index = rank;
        if b.ascending_port_index.is_some() {
            trace!(
                box_id:% = b.id(),
                ascending_port_index:? = b.ascending_port_index;
                "Box ranked by central port"
            );
        }
    }

    let mut highest = ranks.iter().filter_map(|(_, r)| *r).max().unwrap_or(0);
    let ranked = ranks.iter().filter(|(_, r)| r.is_some()).count();

    for (i, _) in ranks.into_iter().filter(|(_, r)| r.is_none()) {
        highest += 1;
        let b = &mut placement.boxes[i];
        b.ascending_box_index = Some(highest);
        trace!(
            box_id:% = b.id(),
            ascending_box_index = highest;
            "Unranked box appended"
        );
    }

    debug!(ranked, highest_index = highest; "Ascending indices assigned");

    (placement, highest)
}

#[cfg(test)]
mod tests {
    use schemplace_core::scene::{Connection, Port, Scene, SchematicBox};

    use super::*;
    use crate::layout::{central, normalize::normalize, side};

    fn assigned(scene: &Scene) -> (Placement, usize) {
        let map = ConnectionMap::build(scene).unwrap();
        let placement = central::select(
            normalize(&scene.boxes),
            scene.connections.clone(),
            scene.nets.clone(),
        )
        .unwrap();
        let placement = side::classify(placement, &map);
        assign(placement, &map)
    }

    fn central() -> SchematicBox {
        SchematicBox::new(
            "U1",
            vec![
                Port::new("U1.1", -1.0, 2.0),
                Port::new("U1.2", -1.0, 0.0),
                Port::new("U1.3", 1.0, 1.0),
                Port::new("U1.4", 1.0, -1.0),
                Port::new("U1.5", 0.0, 3.0),
            ],
        )
    }

    fn two_port(id: &str) -> SchematicBox {
        SchematicBox::new(
            id,
            vec![
                Port::new(format!("{id}.1").as_str(), 0.0, -0.5),
                Port::new(format!("{id}.2").as_str(), 0.0, 0.5),
            ],
        )
    }

    #[test]
    fn test_central_port_ranks() {
        let scene = Scene::new(vec![central()], Vec::new(), Vec::new());
        let (placement, _) = assigned(&scene);
        let ranks: Vec<Option<usize>> = placement
            .central
            .ports
            .iter()
            .map(|p| p.ascending_port_index)
            .collect();
        // Left: U1.2 (ry 0) then U1.1 (ry 2); right: U1.4 (ry -1) then U1.3 (ry 1).
        assert_eq!(ranks, vec![Some(1), Some(0), Some(1), Some(0), None]);
    }

    #[test]
    fn test_box_takes_minimum_rank() {
        let scene = Scene::new(
            vec![central(), two_port("R1")],
            vec![
                Connection::new("R1.1", "U1.1"),
                Connection::new("R1.2", "U1.2"),
            ],
            Vec::new(),
        );
        let (placement, highest) = assigned(&scene);
        let r1 = &placement.boxes[1];
        assert_eq!(r1.side, Some(Side::Left));
        assert_eq!(r1.ascending_port_index, Some(0));
        assert_eq!(r1.ascending_box_index, Some(0));
        assert_eq!(highest, 0);
    }

    #[test]
    fn test_unconnected_boxes_appended_in_order() {
        let scene = Scene::new(
            vec![central(), two_port("C1"), two_port("R1"), two_port("C2")],
            vec![Connection::new("R1.1", "U1.1")],
            Vec::new(),
        );
        let (placement, highest) = assigned(&scene);

        assert_eq!(placement.boxes[2].ascending_box_index, Some(1));
        assert_eq!(placement.boxes[1].ascending_box_index, Some(2));
        assert_eq!(placement.boxes[3].ascending_box_index, Some(3));
        assert_eq!(placement.boxes[1].ascending_port_index, None);
        assert_eq!(placement.boxes[1].side, Some(Side::Left));
        assert_eq!(highest, 3);
    }

    #[test]
    fn test_no_ranked_boxes_start_after_zero() {
        let scene = Scene::new(
            vec![central(), two_port("C1"), two_port("C2")],
            Vec::new(),
            Vec::new(),
        );
        let (placement, highest) = assigned(&scene);
        assert_eq!(placement.boxes[1].ascending_box_index, Some(1));
        assert_eq!(placement.boxes[2].ascending_box_index, Some(2));
        assert_eq!(highest, 2);
    }

    #[test]
    fn test_unsided_port_gives_no_rank() {
        let scene = Scene::new(
            vec![central(), two_port("R1")],
            vec![Connection::new("R1.1", "U1.5")],
            Vec::new(),
        );
        let (placement, highest) = assigned(&scene);
        assert_eq!(placement.boxes[1].ascending_port_index, None);
        assert_eq!(placement.boxes[1].ascending_box_index, Some(1));
        assert_eq!(highest, 1);
    }

    #[test]
    fn test_central_box_not_indexed() {
        let scene = Scene::new(
            vec![central(), two_port("R1")],
            vec![Connection::new("R1.1", "U1.3")],
            Vec::new(),
        );
        let (placement, _) = assigned(&scene);
        assert_eq!(placement.central_box().ascending_box_index, None);
        assert_eq!(placement.central_box().side, None);
    }
}
