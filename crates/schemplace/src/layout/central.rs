//! Central box selection.

use log::debug;

use schemplace_core::scene::{Connection, Net, Side};

use super::placement::{CentralBox, CentralPort, PlacedBox, Placement};
use crate::error::LayoutError;

/// Index of the box with the most ports. On ties the earliest box wins.
fn most_ports(boxes: &[PlacedBox]) -> Option<usize> {
    boxes
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, usize)>, (i, b)| {
            let count = b.inner.ports.len();
            match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((i, count)),
            }
        })
        .map(|(i, _)| i)
}

/// Picks the central box and classifies its ports by the sign of `rx`.
///
/// Ports with `rx == 0` are left without a side.
///
/// # Errors
///
/// - [`LayoutError::EmptyScene`] when there are no boxes.
/// - [`LayoutError::DegenerateCentralBox`] when even the largest box has no ports.
pub(crate) fn select(
    boxes: Vec<PlacedBox>,
    connections: Vec<Connection>,
    nets: Vec<Net>,
) -> Result<Placement, LayoutError> {
    let index = most_ports(&boxes).ok_or(LayoutError::EmptyScene)?;
    let center = &boxes[index];

    if center.inner.ports.is_empty() {
        return Err(LayoutError::DegenerateCentralBox {
            box_id: center.id(),
        });
    }

    let ports: Vec<CentralPort> = center
        .inner
        .ports
        .iter()
        .map(|port| CentralPort {
            port_id: port.port_id,
            offset: port.offset(),
            side: Side::from_offset(port.rx),
            ascending_port_index: None,
        })
        .collect();

    debug!(
        central_box:% = center.id(),
        ports = ports.len(),
        left_ports = ports.iter().filter(|p| p.side == Some(Side::Left)).count(),
        right_ports = ports.iter().filter(|p| p.side == Some(Side::Right)).count();
        "Central box selected"
    );

    Ok(Placement {
        boxes,
        connections,
        nets,
        central: CentralBox { index, ports },
    })
}
