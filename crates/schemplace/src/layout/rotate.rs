//! Auto-rotation of two-port boxes.
//!
//! Resistors, capacitors and similar two-terminal parts read best when the line
//! through their ports follows the wires leaving them. For every satellite box
//! with exactly two ports, each of the eight [`Orientation`]s is scored by the
//! squared distance from each rotated port to the mean position of the ports it
//! connects to; the cheapest orientation is applied to the port offsets.
//!
//! Targets come from a snapshot taken before any box is rotated, so the result
//! does not depend on box order.

use std::collections::HashMap;

use log::{debug, trace};

use schemplace_core::{
    geometry::{Orientation, Point},
    identifier::Id,
    scene::{Connection, SchematicBox},
};

use super::placement::Placement;

/// Absolute position of every port in the placement.
fn port_positions(placement: &Placement) -> HashMap<Id, Point> {
    placement
        .boxes
        .iter()
        .flat_map(|b| {
            let b = &b.inner;
            b.ports.iter().map(move |p| (p.port_id, b.port_position(p)))
        })
        .collect()
}

/// Mean position of the ports `port` is connected to, if any has a position.
fn target_of(port: Id, connections: &[Connection], positions: &HashMap<Id, Point>) -> Option<Point> {
    Point::mean(
        connections
            .iter()
            .filter_map(|c| c.other_end(port))
            .filter(|&other| other != port)
            .filter_map(|other| positions.get(&other).copied()),
    )
}

/// Picks the orientation minimizing the squared port-to-target distance.
///
/// Returns `None` when no port of the box has a target.
fn best_orientation(
    b: &SchematicBox,
    connections: &[Connection],
    positions: &HashMap<Id, Point>,
) -> Option<Orientation> {
    let targets: Vec<(Point, Point)> = b
        .ports
        .iter()
        .filter_map(|p| target_of(p.port_id, connections, positions).map(|t| (p.offset(), t)))
        .collect();
    if targets.is_empty() {
        return None;
    }

    let origin = b.position();
    let cost = |orientation: Orientation| -> f32 {
        targets
            .iter()
            .map(|&(offset, target)| {
                let d = origin.add_point(orientation.apply(offset)).distance(target);
                d * d
            })
            .sum()
    };

    // Strict comparison keeps the earliest candidate on ties, identity first.
    Orientation::ALL
        .into_iter()
        .map(|o| (o, cost(o)))
        .fold(None, |best: Option<(Orientation, f32)>, (o, c)| match best {
            Some((_, best_cost)) if best_cost <= c => best,
            _ => Some((o, c)),
        })
        .map(|(o, _)| o)
}

/// Rotates every non-central two-port box towards its connections.
pub(crate) fn auto_rotate(mut placement: Placement) -> Placement {
    let positions = port_positions(&placement);
    let central = placement.central.index;
    let mut rotated = 0usize;

    for (i, placed) in placement.boxes.iter_mut().enumerate() {
        if i == central || placed.inner.ports.len() != 2 {
            continue;
        }

        let Some(best) = best_orientation(&placed.inner, &placement.connections, &positions) else {
            continue;
        };
        if best.is_identity() {
            continue;
        }

        for port in &mut placed.inner.ports {
            let turned = best.apply(port.offset());
            port.rx = turned.x();
            port.ry = turned.y();
        }
        let previous = placed.inner.orientation.unwrap_or(Orientation::IDENTITY);
        placed.inner.orientation = Some(previous.then(best));
        rotated += 1;

        trace!(
            box_id:% = placed.id(),
            rotation = best.degrees(),
            mirrored = best.is_mirrored();
            "Two-port box rotated"
        );
    }

    debug!(rotated; "Two-port boxes auto-rotated");

    placement
}
