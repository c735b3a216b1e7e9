//! Net-aware sliding of boxes that share an ascending index.
//!
//! After coordinate synthesis every box at one (side, index) slot sits on the
//! same point. This stage stacks them vertically, at least one row apart and
//! clear of each other's port extent, with boxes that share a net kept next
//! to each other. Later rows on the same side move down by the height the
//! stack added. Only y changes.

use indexmap::IndexSet;
use log::{debug, trace};

use schemplace_core::{identifier::Id, scene::Side};

use super::{
    connection_map::ConnectionMap,
    placement::{PlacedBox, Placement},
};
use crate::config::LayoutConfig;

/// Orders `members` so that boxes sharing a net are contiguous.
///
/// Clusters are the connected components of the "shares a net" relation. They
/// are ordered by their earliest member and keep member order inside.
fn cluster_by_net(members: &[usize], nets: &[IndexSet<Id>]) -> Vec<usize> {
    // Union-find over positions in `members`.
    let mut parent: Vec<usize> = (0..members.len()).collect();

    fn find(parent: &mut [usize], mut i: usize) -> usize {
        while parent[i] != i {
            parent[i] = parent[parent[i]];
            i = parent[i];
        }
        i
    }

    for a in 0..members.len() {
        for b in (a + 1)..members.len() {
            if !nets[a].is_disjoint(&nets[b]) {
                let (ra, rb) = (find(&mut parent, a), find(&mut parent, b));
                if ra != rb {
                    parent[ra.max(rb)] = ra.min(rb);
                }
            }
        }
    }

    let roots: Vec<usize> = (0..members.len()).map(|i| find(&mut parent, i)).collect();
    let clusters: IndexSet<usize> = roots.iter().copied().collect();

    clusters
        .into_iter()
        .flat_map(|root| {
            roots
                .iter()
                .enumerate()
                .filter(move |&(_, &r)| r == root)
                .map(|(pos, _)| members[pos])
        })
        .collect()
}

/// Top edge and height of the port extent of `b`, relative to its origin.
fn vertical_extent(b: &PlacedBox) -> (f32, f32) {
    let top = b.inner.ports.iter().map(|p| p.ry).fold(0.0f32, f32::min);
    (top, b.size.height())
}

/// Spreads boxes sharing a slot so that none overlap.
///
/// Members advance by at least one row, and further when the previous box
/// reaches below the next one's top edge. Later slots on the side move down
/// by the extra height the stack took.
pub(crate) fn slide(
    mut placement: Placement,
    connections: &ConnectionMap,
    config: &LayoutConfig,
) -> Placement {
    let row_height = config.row_height();
    let gap = config.slot_gap();
    let mut moved = 0usize;

    for side in Side::ALL {
        let Some(highest) = placement.highest_index_on(side) else {
            continue;
        };

        let mut shift = 0.0f32;
        for index in 0..=highest {
            let members = placement.boxes_at(side, index);
            let Some(&first) = members.first() else {
                continue;
            };

            let nets: Vec<IndexSet<Id>> = members
                .iter()
                .map(|&i| connections.nets_of_box(&placement.boxes[i].inner))
                .collect();
            let order = cluster_by_net(&members, &nets);

            let base_y = placement.boxes[first].inner.y + shift;
            // (y, bottom edge) of the previously stacked member
            let mut prev: Option<(f32, f32)> = None;
            for (slot, &i) in order.iter().enumerate() {
                let (top, height) = vertical_extent(&placement.boxes[i]);
                let y = match prev {
                    None => base_y,
                    Some((prev_y, prev_bottom)) => {
                        (prev_y + row_height).max(prev_bottom + gap - top)
                    }
                };

                let b = &mut placement.boxes[i].inner;
                b.y = y;
                prev = Some((y, y + top + height));
                trace!(box_id:% = b.box_id, slot, y; "Box slid");
            }

            moved += members.len() - 1;
            if let Some((last_y, _)) = prev {
                shift += last_y - base_y;
            }
        }
    }

    debug!(moved; "Boxes sharing an index slid apart");

    placement
}
