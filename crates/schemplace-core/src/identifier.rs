//! Identifier management using string interning for efficient storage and comparison
//!
//! This module provides the [`Id`] type used for box, port and net identifiers,
//! and [`PortRef`], the parsed form of a port identifier that names its owning box
//! explicitly instead of relying on string prefixes.

use std::{
    fmt,
    sync::{Mutex, MutexGuard, OnceLock},
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner for efficient identifier storage.
///
/// # Thread Safety
///
/// This uses `Mutex` for thread-safe access to the string interner.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

/// Separator between a box id and the local name of one of its ports.
pub const PORT_SEPARATOR: char = '.';

fn interner() -> MutexGuard<'static, DefaultStringInterner> {
    INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .expect("Failed to acquire interner lock")
}

/// Efficient identifier type using string interning
///
/// Scenes mention the same box, port and net identifiers many times over
/// (every connection names two of them), so identifiers are interned once and
/// compared as symbols afterwards.
///
/// # Examples
///
/// ```
/// use schemplace_core::identifier::Id;
///
/// let box_id = Id::new("U1");
/// let port_id = box_id.create_port("VCC");
/// assert_eq!(port_id, "U1.VCC");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from &str.
    ///
    /// # Examples
    ///
    /// ```
    /// use schemplace_core::identifier::Id;
    ///
    /// let box_id = Id::new("R1");
    /// let net_id = Id::new("gnd");
    /// ```
    pub fn new(name: &str) -> Self {
        let symbol = interner().get_or_intern(name);
        Self(symbol)
    }

    /// Creates the identifier of a port named `local` on the box identified by `self`,
    /// following the `<box_id>.<local_name>` convention.
    ///
    /// # Examples
    ///
    /// ```
    /// use schemplace_core::identifier::Id;
    ///
    /// let port = Id::new("C3").create_port("1");
    /// assert_eq!(port, "C3.1");
    /// ```
    pub fn create_port(&self, local: &str) -> Self {
        let mut interner = interner();
        let box_str = interner
            .resolve(self.0)
            .expect("Box ID should exist in interner");
        let port_name = format!("{box_str}{PORT_SEPARATOR}{local}");
        let symbol = interner.get_or_intern(&port_name);
        Self(symbol)
    }

    /// Returns an owned copy of the identifier text.
    pub fn as_string(&self) -> String {
        interner()
            .resolve(self.0)
            .expect("Symbol should exist in interner")
            .to_owned()
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let interner = interner();
        let str_value = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        write!(f, "{str_value}")
    }
}

impl std::str::FromStr for Id {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    /// Allows direct comparison with string slices: `id == "string"`
    fn eq(&self, other: &str) -> bool {
        let interner = interner();
        let self_str = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        self_str == other
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_string())
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::new(&name))
    }
}

/// A port identifier resolved against the box that owns it.
///
/// Port identifiers are conventionally written `<box_id>.<local_name>`, but the
/// owner is never inferred from that text: a `PortRef` is built from the box that
/// structurally contains the port, so box `U1` can never claim a port of box `U10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortRef {
    port_id: Id,
    box_id: Id,
    name: Id,
}

impl PortRef {
    /// Builds a reference for `port_id` owned by `box_id`.
    ///
    /// The local name is the port id with the `<box_id>.` prefix removed when
    /// present, otherwise the whole port id.
    ///
    /// # Examples
    ///
    /// ```
    /// use schemplace_core::identifier::{Id, PortRef};
    ///
    /// let port = PortRef::new(Id::new("U1"), Id::new("U1.GND"));
    /// assert_eq!(port.name(), "GND");
    ///
    /// let bare = PortRef::new(Id::new("U1"), Id::new("pin3"));
    /// assert_eq!(bare.name(), "pin3");
    /// ```
    pub fn new(box_id: Id, port_id: Id) -> Self {
        let port_str = port_id.as_string();
        let box_str = box_id.as_string();
        let name = port_str
            .strip_prefix(&box_str)
            .and_then(|rest| rest.strip_prefix(PORT_SEPARATOR))
            .filter(|rest| !rest.is_empty())
            .map_or(port_id, Id::new);

        Self {
            port_id,
            box_id,
            name,
        }
    }

    /// Returns the full port identifier.
    pub fn port_id(&self) -> Id {
        self.port_id
    }

    /// Returns the identifier of the owning box.
    pub fn box_id(&self) -> Id {
        self.box_id
    }

    /// Returns the port name local to its box.
    pub fn name(&self) -> Id {
        self.name
    }
}

impl fmt::Display for PortRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.port_id)
    }
}
