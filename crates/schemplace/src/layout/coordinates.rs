//! Coordinate synthesis.
//!
//! Each side is walked outwards from the central box one ascending index at a
//! time. Every index forms a column whose advance is the width of its widest
//! box (at least `min_column_width`), followed by a margin of
//! `column_margin_factor` times that advance. Rows are `row_height` apart.

use log::debug;

use schemplace_core::{geometry::Point, scene::Side};

use super::placement::Placement;
use crate::config::LayoutConfig;

/// Assigns x (by column) and y (by index) to every box with a side and index.
///
/// The central box keeps its normalized position.
pub(crate) fn synthesize(mut placement: Placement, config: &LayoutConfig) -> Placement {
    let center_width = placement.central_box().size.width();

    for side in Side::ALL {
        let Some(highest) = placement.highest_index_on(side) else {
            continue;
        };

        let sign = side.sign();
        let mut travel_x = center_width * config.center_offset_factor() * sign;

        for index in 0..=highest {
            let members = placement.boxes_at(side, index);
            let widest = members
                .iter()
                .map(|&i| placement.boxes[i].size.width())
                .fold(f32::NEG_INFINITY, f32::max);

            let step = widest.max(config.min_column_width()) * sign;
            travel_x += step;

            let y = index as f32 * config.row_height();
            for &i in &members {
                placement.boxes[i].inner.set_position(Point::new(travel_x, y));
            }

            travel_x += step * config.column_margin_factor();
        }

        debug!(
            side = side.as_str(),
            columns = highest + 1,
            extent = travel_x;
            "Side coordinates synthesized"
        );
    }

    placement
}
