//! Vertical centering of each side on the central box.

use log::debug;

use schemplace_core::{
    geometry::{Bounds, Point},
    scene::Side,
};

use super::{normalize::port_extent, placement::Placement};

/// Vertical center of the central box, measured over its ports and origin.
fn central_center_y(placement: &Placement) -> f32 {
    let center = &placement.central_box().inner;
    let min_ry = center.ports.iter().map(|p| p.ry).fold(0.0f32, f32::min);
    center.y + min_ry + port_extent(&center.ports).height() / 2.0
}

/// Shifts every side vertically so its span is centered on the central box.
///
/// Relative order and x coordinates are preserved.
pub(crate) fn center(mut placement: Placement) -> Placement {
    let target = central_center_y(&placement);

    for side in Side::ALL {
        let Some(span) = Bounds::enclosing(
            placement
                .boxes
                .iter()
                .filter(|b| b.is_on(side))
                .map(|b| b.inner.position()),
        ) else {
            continue;
        };

        let offset = Point::new(0.0, target - span.center().y());
        for b in placement.boxes.iter_mut().filter(|b| b.is_on(side)) {
            let moved = b.inner.position().add_point(offset);
            b.inner.set_position(moved);
        }

        debug!(
            side = side.as_str(),
            span = span.height(),
            offset = offset.y();
            "Side centered"
        );
    }

    placement
}
