//! The placement pipeline.
//!
//! Each stage takes the [`Placement`] by value and hands it on:
//!
//! 1. `normalize` strips prior placement and measures every box.
//! 2. `central` picks the box with the most ports and sides its ports.
//! 3. `side` sends each satellite to the side it connects to most.
//! 4. `ascending` ranks satellites by the central port they attach to.
//! 5. `compact` closes gaps in the ranks.
//! 6. `coordinates` turns (side, rank) into columns and rows.
//! 7. `net_slide`, `net_alias`, `center_sides` and `rotate` refine the result
//!    and can be switched off in [`LayoutConfig`].
//!
//! Alias boxes left by an earlier layout skip steps 3 to 6 and rejoin the
//! slot of the boxes wired to them once sliding is done.

mod ascending;
mod center_sides;
mod central;
mod compact;
mod connection_map;
mod coordinates;
mod net_alias;
mod net_slide;
mod normalize;
mod placement;
mod rotate;
mod side;

use log::{debug, info};

use schemplace_core::scene::Scene;

use crate::{config::LayoutConfig, error::LayoutError};
use connection_map::ConnectionMap;

/// Lays out `scene`, returning a new scene with positions and placement annotations.
///
/// The input is never modified.
pub(crate) fn run(scene: &Scene, config: &LayoutConfig) -> Result<Scene, LayoutError> {
    info!(
        boxes = scene.boxes.len(),
        connections = scene.connections.len(),
        nets = scene.nets.len();
        "Laying out scene"
    );

    let connections = ConnectionMap::build(scene)?;

    let placement = central::select(
        normalize::normalize(&scene.boxes),
        scene.connections.clone(),
        scene.nets.clone(),
    )?;
    let placement = net_alias::mark_followers(placement, &connections);

    let placement = side::classify(placement, &connections);
    let (placement, highest) = ascending::assign(placement, &connections);
    let placement = compact::remove_index_gaps(placement, highest);
    let mut placement = coordinates::synthesize(placement, config);

    if config.slide_net_boxes() {
        placement = net_slide::slide(placement, &connections, config);
    }
    placement = net_alias::place_followers(placement, &connections);
    if config.insert_net_aliases() {
        placement = net_alias::insert_aliases(placement, &connections);
    }
    if config.center_sides() {
        placement = center_sides::center(placement);
    }
    if config.auto_rotate() {
        placement = rotate::auto_rotate(placement);
    }

    let scene = placement.into_scene();
    debug!(boxes = scene.boxes.len(), connections = scene.connections.len(); "Layout finished");

    Ok(scene)
}
