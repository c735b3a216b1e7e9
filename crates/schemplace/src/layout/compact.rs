//! Index gap compaction.

use std::collections::BTreeMap;

use log::debug;

use schemplace_core::scene::Side;

use super::placement::Placement;

/// Maps each distinct index in `used` to its rank among them.
fn dense_ranks(used: impl IntoIterator<Item = usize>) -> BTreeMap<usize, usize> {
    let mut ranks: BTreeMap<usize, usize> = used.into_iter().map(|i| (i, 0)).collect();
    for (rank, slot) in ranks.values_mut().enumerate() {
        *slot = rank;
    }
    ranks
}

/// Renumbers the ascending box indices of each side to a dense `0..=k` range.
///
/// Indices with no box on a side are dropped and the indices above them shift
/// down; boxes sharing an index stay together and the order of indices is kept.
pub(crate) fn remove_index_gaps(mut placement: Placement, highest: usize) -> Placement {
    for side in Side::ALL {
        let ranks = dense_ranks(
            placement
                .boxes
                .iter()
                .filter(|b| b.is_on(side))
                .filter_map(|b| b.ascending_box_index),
        );

        for b in placement.boxes.iter_mut().filter(|b| b.is_on(side)) {
            if let Some(index) = b.ascending_box_index.as_mut() {
                *index = ranks[&*index];
            }
        }

        debug!(
            side = side.as_str(),
            highest_before = highest,
            highest_after:? = ranks.len().checked_sub(1);
            "Index gaps removed"
        );
    }

    placement
}
