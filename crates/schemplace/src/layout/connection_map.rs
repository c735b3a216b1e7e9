//! Endpoint resolution and connection lookup.
//!
//! [`ConnectionMap`] resolves every connection endpoint of a scene to a
//! [`Terminal`] by exact identifier lookup and indexes the connections touching
//! each endpoint. Building it is also where malformed scenes are rejected.

use indexmap::{IndexMap, IndexSet, map::Entry};
use log::trace;

use schemplace_core::{
    identifier::{Id, PortRef},
    scene::{Connection, Scene, SchematicBox},
};

use crate::error::LayoutError;

/// What a connection endpoint refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Terminal {
    Port(PortRef),
    Net(Id),
}

/// Lookup from endpoint identifier to the connections touching it.
#[derive(Debug, Clone)]
pub(crate) struct ConnectionMap {
    terminals: IndexMap<Id, Terminal>,
    touching: IndexMap<Id, Vec<usize>>,
    connections: Vec<Connection>,
}

impl ConnectionMap {
    /// Builds the map for `scene`.
    ///
    /// # Errors
    ///
    /// - [`LayoutError::DuplicateBoxId`] / [`LayoutError::DuplicatePortId`] when
    ///   identifiers are not unique.
    /// - [`LayoutError::MalformedConnection`] when an endpoint is neither a port
    ///   nor a declared net.
    pub(crate) fn build(scene: &Scene) -> Result<Self, LayoutError> {
        let mut terminals = IndexMap::new();
        let mut box_ids = IndexSet::new();

        for b in &scene.boxes {
            if !box_ids.insert(b.box_id) {
                return Err(LayoutError::DuplicateBoxId { box_id: b.box_id });
            }
            for port in b.port_refs() {
                match terminals.entry(port.port_id()) {
                    Entry::Occupied(_) => {
                        return Err(LayoutError::DuplicatePortId {
                            port_id: port.port_id(),
                        });
                    }
                    Entry::Vacant(slot) => {
                        slot.insert(Terminal::Port(port));
                    }
                }
            }
        }

        // A net sharing its id with a port is shadowed by the port.
        for net in &scene.nets {
            terminals
                .entry(net.net_id)
                .or_insert(Terminal::Net(net.net_id));
        }

        let mut touching: IndexMap<Id, Vec<usize>> = IndexMap::new();
        for (index, conn) in scene.connections.iter().enumerate() {
            for endpoint in [conn.from, conn.to] {
                if !terminals.contains_key(&endpoint) {
                    return Err(LayoutError::MalformedConnection { index, endpoint });
                }
                let entry = touching.entry(endpoint).or_default();
                if entry.last() != Some(&index) {
                    entry.push(index);
                }
            }
        }

        trace!(
            terminals = terminals.len(),
            connections = scene.connections.len();
            "Connection map built"
        );

        Ok(Self {
            terminals,
            touching,
            connections: scene.connections.clone(),
        })
    }

    /// Resolves an endpoint identifier.
    pub(crate) fn terminal(&self, endpoint: Id) -> Option<Terminal> {
        self.terminals.get(&endpoint).copied()
    }

    /// Connections touching `endpoint`, in scene order.
    pub(crate) fn connections_of(&self, endpoint: Id) -> impl Iterator<Item = &Connection> + '_ {
        self.touching
            .get(&endpoint)
            .into_iter()
            .flatten()
            .map(|&i| &self.connections[i])
    }

    /// Endpoints directly connected to `endpoint`, in scene order.
    pub(crate) fn neighbors(&self, endpoint: Id) -> impl Iterator<Item = Id> + '_ {
        self.connections_of(endpoint)
            .filter_map(move |conn| conn.other_end(endpoint))
    }

    /// Whether any port of `b` is directly connected to `endpoint`.
    pub(crate) fn box_touches(&self, b: &SchematicBox, endpoint: Id) -> bool {
        b.ports
            .iter()
            .any(|port| self.neighbors(port.port_id).any(|n| n == endpoint))
    }

    /// Nets directly connected to any port of `b`, in order of first appearance.
    pub(crate) fn nets_of_box(&self, b: &SchematicBox) -> IndexSet<Id> {
        b.ports
            .iter()
            .flat_map(|port| self.neighbors(port.port_id))
            .filter(|&n| matches!(self.terminal(n), Some(Terminal::Net(_))))
            .collect()
    }
}
