//! Side classification for satellite boxes.

use log::{debug, trace};

use schemplace_core::scene::Side;

use super::{
    connection_map::ConnectionMap,
    placement::{CentralPort, Placement},
};

/// Majority vote over the sides of the central ports a box connects to.
///
/// Unsided ports do not vote; a tie, or no vote at all, goes left.
fn vote<'a>(ports: impl IntoIterator<Item = &'a CentralPort>) -> Side {
    let (left, right) = ports
        .into_iter()
        .fold((0usize, 0usize), |(left, right), port| match port.side {
            Some(Side::Left) => (left + 1, right),
            Some(Side::Right) => (left, right + 1),
            None => (left, right),
        });

    if left >= right { Side::Left } else { Side::Right }
}

/// Assigns a side to every non-central box.
///
/// A box belongs on the side where most of the central ports it connects to
/// sit. Boxes with no direct connection to the central box go left.
pub(crate) fn classify(mut placement: Placement, connections: &ConnectionMap) -> Placement {
    let sides: Vec<(usize, Side)> = placement
        .satellite_indices()
        .map(|i| {
            let b = &placement.boxes[i].inner;
            let connected: Vec<&CentralPort> = placement
                .central
                .ports
                .iter()
                .filter(|port| connections.box_touches(b, port.port_id))
                .collect();
            let side = vote(connected.iter().copied());
            trace!(
                box_id:% = b.box_id,
                central_ports = connected.len(),
                side = side.as_str();
                "Box side classified"
            );
            (i, side)
        })
        .collect();

    for &(i, side) in &sides {
        placement.boxes[i].side = Some(side);
    }

    debug!(
        left = sides.iter().filter(|(_, s)| *s == Side::Left).count(),
        right = sides.iter().filter(|(_, s)| *s == Side::Right).count();
        "Sides classified"
    );

    placement
}
