//! Box geometry normalization.
//!
//! Copies the caller's boxes into [`PlacedBox`] records, moves every box to the
//! origin and derives its footprint from the extent of its ports.

use schemplace_core::{
    geometry::Size,
    scene::{Port, SchematicBox},
};

use super::placement::PlacedBox;

/// Extent of a set of port coordinates, always including the box origin.
fn extent(values: impl Iterator<Item = f32>) -> f32 {
    let (min, max) = values.fold((0.0f32, 0.0f32), |(min, max), v| (min.min(v), max.max(v)));
    max - min
}

/// Size of the area spanned by `ports` and the box origin.
pub(crate) fn port_extent(ports: &[Port]) -> Size {
    Size::new(
        extent(ports.iter().map(|p| p.rx)),
        extent(ports.iter().map(|p| p.ry)),
    )
}

/// Deep-copies `boxes`, resetting positions and previous placement annotations.
pub(crate) fn normalize(boxes: &[SchematicBox]) -> Vec<PlacedBox> {
    boxes
        .iter()
        .map(|b| {
            let mut inner = b.clone();
            inner.x = 0.0;
            inner.y = 0.0;
            inner.placement = None;
            let size = port_extent(&inner.ports);
            PlacedBox::new(inner, size)
        })
        .collect()
}
