//! Scene model for schematic placement.
//!
//! A [`Scene`] is the unit of work handed to the placement pipeline: an ordered
//! list of [`SchematicBox`]es with their [`Port`]s, the [`Connection`]s between
//! ports (or between a port and a net), and the declared [`Net`]s.
//!
//! All types serialize with `serde` using the field names of the JSON scene
//! format:
//!
//! ```json
//! {
//!   "boxes": [
//!     { "box_id": "U1", "ports": [{ "port_id": "U1.1", "rx": -0.5, "ry": 0.0 }] }
//!   ],
//!   "connections": [{ "from": "U1.1", "to": "gnd" }],
//!   "nets": [{ "net_id": "gnd" }]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::{
    geometry::{Orientation, Point},
    identifier::{Id, PortRef},
};

/// Placement side relative to the central box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Both sides, left first.
    pub const ALL: [Side; 2] = [Side::Left, Side::Right];

    /// Returns the horizontal direction of this side: `-1.0` for left, `1.0` for right.
    pub fn sign(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }

    /// Classifies a horizontal offset by its sign; zero has no side.
    ///
    /// # Examples
    ///
    /// ```
    /// # use schemplace_core::scene::Side;
    /// assert_eq!(Side::from_offset(-0.5), Some(Side::Left));
    /// assert_eq!(Side::from_offset(2.0), Some(Side::Right));
    /// assert_eq!(Side::from_offset(0.0), None);
    /// ```
    pub fn from_offset(rx: f32) -> Option<Self> {
        if rx > 0.0 {
            Some(Side::Right)
        } else if rx < 0.0 {
            Some(Side::Left)
        } else {
            None
        }
    }

    /// Returns the lowercase name of the side.
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

/// A connection point on a box, positioned relative to the box origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Port {
    pub port_id: Id,
    /// Horizontal offset from the box origin.
    #[serde(default)]
    pub rx: f32,
    /// Vertical offset from the box origin.
    #[serde(default)]
    pub ry: f32,
}

impl Port {
    pub fn new(port_id: impl Into<Id>, rx: f32, ry: f32) -> Self {
        Self {
            port_id: port_id.into(),
            rx,
            ry,
        }
    }

    /// Returns the offset of the port from its box origin.
    pub fn offset(&self) -> Point {
        Point::new(self.rx, self.ry)
    }
}

/// Where the pipeline put a non-central box.
///
/// Only present on boxes of a laid-out scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxPlacement {
    pub side: Side,
    pub ascending_box_index: usize,
}

/// A placed schematic component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchematicBox {
    pub box_id: Id,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub ports: Vec<Port>,
    /// Set on boxes synthesized to stand in for a net.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub net_alias: Option<Id>,
    /// Orientation applied to the port offsets by the pipeline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<Orientation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placement: Option<BoxPlacement>,
}

impl SchematicBox {
    /// Creates a box at the origin with the given ports.
    pub fn new(box_id: impl Into<Id>, ports: Vec<Port>) -> Self {
        Self {
            box_id: box_id.into(),
            x: 0.0,
            y: 0.0,
            ports,
            net_alias: None,
            orientation: None,
            placement: None,
        }
    }

    /// Returns the position of the box origin.
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Moves the box origin to `position`.
    pub fn set_position(&mut self, position: Point) {
        self.x = position.x();
        self.y = position.y();
    }

    /// Returns the absolute position of one of this box's ports.
    pub fn port_position(&self, port: &Port) -> Point {
        self.position().add_point(port.offset())
    }

    /// Iterates the box's ports as owner-resolved references.
    pub fn port_refs(&self) -> impl Iterator<Item = PortRef> + '_ {
        self.ports
            .iter()
            .map(|port| PortRef::new(self.box_id, port.port_id))
    }
}

/// A link between two endpoints. Each endpoint is a port id or a net id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    pub from: Id,
    pub to: Id,
}

impl Connection {
    pub fn new(from: impl Into<Id>, to: impl Into<Id>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Returns the endpoint opposite to `endpoint`, or `None` if `endpoint`
    /// is not part of this connection.
    pub fn other_end(&self, endpoint: Id) -> Option<Id> {
        if self.from == endpoint {
            Some(self.to)
        } else if self.to == endpoint {
            Some(self.from)
        } else {
            None
        }
    }

    /// Returns the connection with `old` replaced by `new` on whichever end holds it.
    pub fn replace_endpoint(self, old: Id, new: Id) -> Self {
        Self {
            from: if self.from == old { new } else { self.from },
            to: if self.to == old { new } else { self.to },
        }
    }
}

/// A named group of electrically equivalent connection points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Net {
    pub net_id: Id,
}

impl Net {
    pub fn new(net_id: impl Into<Id>) -> Self {
        Self {
            net_id: net_id.into(),
        }
    }
}

/// The top-level unit of placement work.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub boxes: Vec<SchematicBox>,
    #[serde(default)]
    pub connections: Vec<Connection>,
    #[serde(default)]
    pub nets: Vec<Net>,
}

impl Scene {
    pub fn new(boxes: Vec<SchematicBox>, connections: Vec<Connection>, nets: Vec<Net>) -> Self {
        Self {
            boxes,
            connections,
            nets,
        }
    }

    /// Looks a box up by identifier.
    pub fn find_box(&self, box_id: impl Into<Id>) -> Option<&SchematicBox> {
        let box_id = box_id.into();
        self.boxes.iter().find(|b| b.box_id == box_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_from_offset() {
        assert_eq!(Side::from_offset(-1.0), Some(Side::Left));
        assert_eq!(Side::from_offset(1.0), Some(Side::Right));
        assert_eq!(Side::from_offset(0.0), None);
        assert_eq!(Side::from_offset(-0.0), None);
        assert_eq!(Side::Left.sign(), -1.0);
        assert_eq!(Side::Right.sign(), 1.0);
    }

    #[test]
    fn test_connection_other_end() {
        let conn = Connection::new("R1.1", "U1.3");
        assert_eq!(conn.other_end(Id::new("R1.1")), Some(Id::new("U1.3")));
        assert_eq!(conn.other_end(Id::new("U1.3")), Some(Id::new("R1.1")));
        assert_eq!(conn.other_end(Id::new("R1.2")), None);
    }

    #[test]
    fn test_connection_replace_endpoint() {
        let conn = Connection::new("gnd", "C1.2");
        let rewritten = conn.replace_endpoint(Id::new("gnd"), Id::new("gnd_alias.net"));
        assert_eq!(rewritten, Connection::new("gnd_alias.net", "C1.2"));

        let untouched = conn.replace_endpoint(Id::new("vcc"), Id::new("x"));
        assert_eq!(untouched, conn);
    }

    #[test]
    fn test_port_position() {
        let mut b = SchematicBox::new("U1", vec![Port::new("U1.1", -0.5, 0.25)]);
        b.set_position(Point::new(2.0, 3.0));
        assert_eq!(b.port_position(&b.ports[0]), Point::new(1.5, 3.25));
    }

    #[test]
    fn test_port_refs_resolve_owner() {
        let b = SchematicBox::new("U1", vec![Port::new("U1.A", 0.0, 0.0)]);
        let refs: Vec<PortRef> = b.port_refs().collect();
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].box_id(), "U1");
        assert_eq!(refs[0].name(), "A");
    }

    #[test]
    fn test_scene_deserialize_minimal() {
        let json = r#"{
            "boxes": [
                { "box_id": "U1", "ports": [{ "port_id": "U1.1", "rx": -0.5, "ry": 0.0 }] }
            ],
            "connections": [{ "from": "U1.1", "to": "gnd" }],
            "nets": [{ "net_id": "gnd" }]
        }"#;
        let scene: Scene = serde_json::from_str(json).unwrap();

        assert_eq!(scene.boxes.len(), 1);
        let b = scene.find_box("U1").unwrap();
        assert_eq!(b.x, 0.0);
        assert!(b.placement.is_none());
        assert_eq!(b.ports[0].rx, -0.5);
        assert_eq!(scene.connections[0].to, "gnd");
        assert_eq!(scene.nets[0].net_id, "gnd");
    }

    #[test]
    fn test_scene_serialize_skips_empty_annotations() {
        let scene = Scene::new(vec![SchematicBox::new("R1", Vec::new())], Vec::new(), Vec::new());
        let json = serde_json::to_string(&scene).unwrap();
        assert!(!json.contains("placement"));
        assert!(!json.contains("orientation"));
        assert!(!json.contains("net_alias"));
    }

    #[test]
    fn test_placement_serialize() {
        let mut b = SchematicBox::new("R1", Vec::new());
        b.placement = Some(BoxPlacement {
            side: Side::Right,
            ascending_box_index: 2,
        });
        let json = serde_json::to_string(&b).unwrap();
        assert!(json.contains(r#""placement":{"side":"right","ascending_box_index":2}"#));
    }
}
