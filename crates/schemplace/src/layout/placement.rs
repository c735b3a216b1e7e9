//! Placement-in-progress records.
//!
//! The pipeline never annotates the caller's [`SchematicBox`]es. Each stage
//! consumes a [`Placement`] and returns it with more of the derived attributes
//! filled in; [`Placement::into_scene`] turns the finished record back into a
//! plain [`Scene`].

use schemplace_core::{
    geometry::{Point, Size},
    identifier::Id,
    scene::{BoxPlacement, Connection, Net, Scene, SchematicBox, Side},
};

/// A box together with the attributes the pipeline derives for it.
#[derive(Debug, Clone)]
pub(crate) struct PlacedBox {
    pub(crate) inner: SchematicBox,
    pub(crate) size: Size,
    pub(crate) side: Option<Side>,
    /// Lowest rank among the central ports this box connects to.
    pub(crate) ascending_port_index: Option<usize>,
    /// Row of the box on its side.
    pub(crate) ascending_box_index: Option<usize>,
    /// Alias box from an earlier layout, placed with the boxes it serves.
    pub(crate) follower: bool,
}

impl PlacedBox {
    pub(crate) fn new(inner: SchematicBox, size: Size) -> Self {
        Self {
            inner,
            size,
            side: None,
            ascending_port_index: None,
            ascending_box_index: None,
            follower: false,
        }
    }

    pub(crate) fn id(&self) -> Id {
        self.inner.box_id
    }

    /// Returns the box's side and index when both have been assigned.
    pub(crate) fn slot(&self) -> Option<(Side, usize)> {
        self.side.zip(self.ascending_box_index)
    }

    pub(crate) fn is_on(&self, side: Side) -> bool {
        self.side == Some(side)
    }
}

/// A port of the central box with its layout-local classification.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CentralPort {
    pub(crate) port_id: Id,
    pub(crate) offset: Point,
    /// `None` for ports sitting exactly on the central box's vertical axis.
    pub(crate) side: Option<Side>,
    pub(crate) ascending_port_index: Option<usize>,
}

/// The anchor of the layout.
#[derive(Debug, Clone)]
pub(crate) struct CentralBox {
    /// Position of the central box within [`Placement::boxes`].
    pub(crate) index: usize,
    pub(crate) ports: Vec<CentralPort>,
}

/// The working copy of a scene threaded through every stage.
#[derive(Debug, Clone)]
pub(crate) struct Placement {
    pub(crate) boxes: Vec<PlacedBox>,
    pub(crate) connections: Vec<Connection>,
    pub(crate) nets: Vec<Net>,
    pub(crate) central: CentralBox,
}

impl Placement {
    pub(crate) fn central_box(&self) -> &PlacedBox {
        &self.boxes[self.central.index]
    }

    pub(crate) fn is_central(&self, index: usize) -> bool {
        index == self.central.index
    }

    /// Indices of every box placed on its own, in box order.
    ///
    /// The central box and followers are excluded.
    pub(crate) fn satellite_indices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.boxes.len()).filter(move |&i| !self.is_central(i) && !self.boxes[i].follower)
    }

    /// Highest ascending box index used on `side`, if the side has any box.
    pub(crate) fn highest_index_on(&self, side: Side) -> Option<usize> {
        self.boxes
            .iter()
            .filter(|b| b.is_on(side))
            .filter_map(|b| b.ascending_box_index)
            .max()
    }

    /// Indices of the boxes placed at (`side`, `index`), in box order.
    pub(crate) fn boxes_at(&self, side: Side, index: usize) -> Vec<usize> {
        self.boxes
            .iter()
            .enumerate()
            .filter(|(_, b)| b.slot() == Some((side, index)))
            .map(|(i, _)| i)
            .collect()
    }

    pub(crate) fn into_scene(self) -> Scene {
        let central_index = self.central.index;
        let boxes = self
            .boxes
            .into_iter()
            .enumerate()
            .map(|(i, placed)| {
                let slot = placed.slot();
                let mut inner = placed.inner;
                inner.placement = if i == central_index {
                    None
                } else {
                    slot.map(|(side, ascending_box_index)| BoxPlacement {
                        side,
                        ascending_box_index,
                    })
                };
                inner
            })
            .collect();

        Scene::new(boxes, self.connections, self.nets)
    }
}
