//! Net alias box insertion.
//!
//! A net reaching several boxes in the same slot is drawn as a bus. This stage
//! replaces it with a hub: one alias box per (net, side, index) slot, and every
//! port-to-net connection of that slot is rewritten to end at the alias port.
//! The port end of each rewritten connection is preserved verbatim.
//!
//! Alias boxes already present in the input are followers: they take no part
//! in side or index assignment and are put back into the slot of the boxes
//! wired to them.

use std::collections::{BTreeMap, HashMap};

use indexmap::{IndexMap, IndexSet};
use log::{debug, trace};

use schemplace_core::{
    geometry::{Point, Size},
    identifier::Id,
    scene::{Port, SchematicBox, Side},
};

use super::{
    connection_map::{ConnectionMap, Terminal},
    placement::{PlacedBox, Placement},
};

/// Local name of the single port on every alias box.
const ALIAS_PORT: &str = "net";

/// A port-to-net connection found in a slot.
#[derive(Debug, Clone, Copy)]
struct Attachment {
    connection: usize,
    port: Id,
    box_index: usize,
}

/// Identifier of the alias box standing in for `net` at (`side`, `index`).
fn alias_box_id(net: Id, side: Side, index: usize) -> Id {
    Id::new(&format!("{net}__alias_{}_{index}", side.as_str()))
}

/// Groups the connections from satellite ports to `net` by the slot of the port's box.
fn attachments_by_slot(
    placement: &Placement,
    connections: &ConnectionMap,
    box_index: &HashMap<Id, usize>,
    net: Id,
) -> BTreeMap<(Side, usize), Vec<Attachment>> {
    let mut slots: BTreeMap<(Side, usize), Vec<Attachment>> = BTreeMap::new();

    for (ci, conn) in placement.connections.iter().enumerate() {
        let Some(port) = conn.other_end(net) else {
            continue;
        };
        let Some(Terminal::Port(port_ref)) = connections.terminal(port) else {
            continue;
        };
        let Some(&bi) = box_index.get(&port_ref.box_id()) else {
            continue;
        };
        if placement.is_central(bi) {
            continue;
        }
        if let Some(slot) = placement.boxes[bi].slot() {
            slots.entry(slot).or_default().push(Attachment {
                connection: ci,
                port,
                box_index: bi,
            });
        }
    }

    slots
}

/// Absolute position of `port` on the box at `box_index`.
fn port_position(placement: &Placement, box_index: usize, port: Id) -> Option<Point> {
    let b = &placement.boxes[box_index].inner;
    b.ports
        .iter()
        .find(|p| p.port_id == port)
        .map(|p| b.port_position(p))
}

/// Hub position: x at the mean of the attached ports, y at the mean of the attached boxes.
fn hub_position(placement: &Placement, attached: &[(usize, Id)]) -> Point {
    let boxes: IndexSet<usize> = attached.iter().map(|&(bi, _)| bi).collect();
    let x = Point::mean(
        attached
            .iter()
            .filter_map(|&(bi, port)| port_position(placement, bi, port)),
    )
    .map_or(0.0, Point::x);
    let y = Point::mean(boxes.iter().map(|&bi| placement.boxes[bi].inner.position()))
        .map_or(0.0, Point::y);
    Point::new(x, y)
}

/// Ports of ordinary satellites wired to the alias box at `alias`, as (box, port).
fn members_of(
    placement: &Placement,
    connections: &ConnectionMap,
    box_index: &HashMap<Id, usize>,
    alias: usize,
) -> Vec<(usize, Id)> {
    placement.boxes[alias]
        .inner
        .ports
        .iter()
        .flat_map(|port| connections.neighbors(port.port_id))
        .filter_map(|endpoint| match connections.terminal(endpoint) {
            Some(Terminal::Port(port_ref)) => box_index
                .get(&port_ref.box_id())
                .map(|&bi| (bi, endpoint)),
            _ => None,
        })
        .filter(|&(bi, _)| {
            !placement.is_central(bi) && placement.boxes[bi].inner.net_alias.is_none()
        })
        .collect()
}

fn index_boxes(placement: &Placement) -> HashMap<Id, usize> {
    placement
        .boxes
        .iter()
        .enumerate()
        .map(|(i, b)| (b.id(), i))
        .collect()
}

/// Marks alias boxes from the input that are wired to at least one ordinary satellite.
pub(crate) fn mark_followers(mut placement: Placement, connections: &ConnectionMap) -> Placement {
    let box_index = index_boxes(&placement);
    let followers: Vec<usize> = (0..placement.boxes.len())
        .filter(|&i| !placement.is_central(i) && placement.boxes[i].inner.net_alias.is_some())
        .filter(|&i| !members_of(&placement, connections, &box_index, i).is_empty())
        .collect();

    for &i in &followers {
        placement.boxes[i].follower = true;
    }

    debug!(followers = followers.len(); "Existing alias boxes marked");

    placement
}

/// Puts every follower into the slot shared by most of its members, at the hub position.
///
/// Ties go to the slot of the member wired first.
pub(crate) fn place_followers(mut placement: Placement, connections: &ConnectionMap) -> Placement {
    let box_index = index_boxes(&placement);

    for i in 0..placement.boxes.len() {
        if !placement.boxes[i].follower {
            continue;
        }

        let members = members_of(&placement, connections, &box_index, i);
        let mut votes: IndexMap<(Side, usize), IndexSet<usize>> = IndexMap::new();
        for &(bi, _) in &members {
            if let Some(slot) = placement.boxes[bi].slot() {
                votes.entry(slot).or_default().insert(bi);
            }
        }
        let Some(slot) = votes
            .iter()
            .fold(None, |best: Option<(&(Side, usize), usize)>, (slot, boxes)| {
                match best {
                    Some((_, count)) if count >= boxes.len() => best,
                    _ => Some((slot, boxes.len())),
                }
            })
            .map(|(slot, _)| *slot)
        else {
            continue;
        };

        let attached: Vec<(usize, Id)> = members
            .into_iter()
            .filter(|&(bi, _)| placement.boxes[bi].slot() == Some(slot))
            .collect();
        let position = hub_position(&placement, &attached);

        let follower = &mut placement.boxes[i];
        follower.side = Some(slot.0);
        follower.ascending_box_index = Some(slot.1);
        follower.inner.set_position(position);

        trace!(
            box_id:% = follower.id(),
            side = slot.0.as_str(),
            index = slot.1,
            members = attached.len();
            "Alias box follows its members"
        );
    }

    placement
}

/// Inserts alias boxes for nets shared by two or more boxes in one slot.
pub(crate) fn insert_aliases(mut placement: Placement, connections: &ConnectionMap) -> Placement {
    let mut box_index = index_boxes(&placement);
    let nets: Vec<Id> = placement.nets.iter().map(|n| n.net_id).collect();
    let mut inserted = 0usize;
    let mut rewritten = 0usize;

    for net in nets {
        let slots = attachments_by_slot(&placement, connections, &box_index, net);

        for ((side, index), attachments) in slots {
            let boxes: IndexSet<usize> = attachments.iter().map(|a| a.box_index).collect();
            if boxes.len() < 2 {
                continue;
            }

            let alias_id = alias_box_id(net, side, index);
            let alias_port = match box_index.get(&alias_id) {
                Some(&existing) => {
                    let existing = &placement.boxes[existing].inner;
                    match existing.ports.first() {
                        Some(port) if existing.net_alias == Some(net) => port.port_id,
                        _ => {
                            debug!(
                                box_id:% = alias_id;
                                "Alias id taken by an unrelated box, net left as is"
                            );
                            continue;
                        }
                    }
                }
                None => {
                    let attached: Vec<(usize, Id)> =
                        attachments.iter().map(|a| (a.box_index, a.port)).collect();
                    let position = hub_position(&placement, &attached);

                    let port_id = alias_id.create_port(ALIAS_PORT);
                    let mut alias = SchematicBox::new(alias_id, vec![Port::new(port_id, 0.0, 0.0)]);
                    alias.net_alias = Some(net);
                    alias.set_position(position);

                    let mut placed = PlacedBox::new(alias, Size::default());
                    placed.side = Some(side);
                    placed.ascending_box_index = Some(index);

                    box_index.insert(alias_id, placement.boxes.len());
                    placement.boxes.push(placed);
                    inserted += 1;

                    trace!(
                        net:% = net,
                        box_id:% = alias_id,
                        side = side.as_str(),
                        index,
                        members = boxes.len();
                        "Alias box inserted"
                    );
                    port_id
                }
            };

            for attachment in &attachments {
                let conn = &mut placement.connections[attachment.connection];
                *conn = conn.replace_endpoint(net, alias_port);
                rewritten += 1;
            }
        }
    }

    debug!(inserted, rewritten; "Net alias boxes inserted");

    placement
}
