//! Geometric primitives for schematic placement.
//!
//! This module provides the geometric types used by the placement pipeline
//! for box positions, port offsets, vertical spans and box orientations.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in scene space
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - A rectangular bounding box defined by minimum and maximum coordinates
//! - [`Orientation`] - A quarter-turn rotation, optionally mirrored
//!
//! # Coordinate System
//!
//! Scene coordinates follow the screen convention:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! A clockwise [`Orientation`] is clockwise as seen on screen.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A 2D point representing a position in scene coordinate space.
///
/// # Examples
///
/// ```
/// # use schemplace_core::geometry::Point;
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::new(5.0, 5.0);
///
/// let sum = p1.add_point(p2);
/// assert_eq!(sum.x(), 15.0);
/// assert_eq!(sum.y(), 25.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Adds another point to this point, returning a new point.
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Calculates the hypotenuse (Euclidean distance from origin)
    pub fn hypot(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Euclidean distance between two points
    pub fn distance(self, other: Point) -> f32 {
        self.sub_point(other).hypot()
    }

    /// Multiplies both coordinates by the given factor.
    pub fn scale(self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    /// Returns the arithmetic mean of the given points, or `None` when empty.
    ///
    /// # Examples
    ///
    /// ```
    /// # use schemplace_core::geometry::Point;
    /// let mean = Point::mean([Point::new(0.0, 0.0), Point::new(2.0, 4.0)]).unwrap();
    /// assert_eq!(mean, Point::new(1.0, 2.0));
    /// assert!(Point::mean(std::iter::empty()).is_none());
    /// ```
    pub fn mean(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        let (sum, count) = points
            .into_iter()
            .fold((Point::default(), 0usize), |(sum, count), p| {
                (sum.add_point(p), count + 1)
            });
        (count > 0).then(|| sum.scale(1.0 / count as f32))
    }
}

/// Represents the dimensions of an element with width and height
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f32 {
        self.height
    }
}

/// Represents a rectangular bounding box with minimum and maximum coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates zero-sized bounds located at a single point
    pub fn from_point(point: Point) -> Self {
        Self {
            min_x: point.x,
            min_y: point.y,
            max_x: point.x,
            max_y: point.y,
        }
    }

    /// Creates the smallest bounds containing every point, or `None` when empty
    pub fn enclosing(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        points.into_iter().fold(None, |bounds, point| {
            Some(match bounds {
                Some(bounds) => bounds.include_point(point),
                None => Self::from_point(point),
            })
        })
    }

    /// Returns the center point of the bounds
    pub fn center(self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Returns the height of the bounds
    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// Grows the bounds so that it contains `point`
    pub fn include_point(self, point: Point) -> Self {
        Self {
            min_x: self.min_x.min(point.x),
            min_y: self.min_y.min(point.y),
            max_x: self.max_x.max(point.x),
            max_y: self.max_y.max(point.y),
        }
    }
}

/// Error returned when a rotation angle is not a multiple of 90 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("rotation must be one of 0, 90, 180 or 270 degrees, got {0}")]
pub struct InvalidRotation(pub u16);

/// A box orientation: an optional mirror about the vertical axis followed by a
/// clockwise rotation in quarter turns.
///
/// Serialized as `{ "rotation": <degrees>, "mirrored": <bool> }`.
///
/// # Examples
///
/// ```
/// # use schemplace_core::geometry::{Orientation, Point};
/// let quarter = Orientation::new(90, false).unwrap();
/// // A point to the right of the origin ends up below it.
/// assert_eq!(quarter.apply(Point::new(1.0, 0.0)), Point::new(0.0, 1.0));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "OrientationRepr", into = "OrientationRepr")]
pub struct Orientation {
    quarter_turns: u8,
    mirrored: bool,
}

#[derive(Serialize, Deserialize)]
struct OrientationRepr {
    rotation: u16,
    #[serde(default)]
    mirrored: bool,
}

impl TryFrom<OrientationRepr> for Orientation {
    type Error = InvalidRotation;

    fn try_from(repr: OrientationRepr) -> Result<Self, Self::Error> {
        Self::new(repr.rotation, repr.mirrored)
    }
}

impl From<Orientation> for OrientationRepr {
    fn from(orientation: Orientation) -> Self {
        Self {
            rotation: orientation.degrees(),
            mirrored: orientation.mirrored,
        }
    }
}

impl Orientation {
    /// The identity orientation.
    pub const IDENTITY: Self = Self {
        quarter_turns: 0,
        mirrored: false,
    };

    /// Every distinct orientation, plain rotations first, identity first.
    pub const ALL: [Self; 8] = [
        Self::from_parts(0, false),
        Self::from_parts(1, false),
        Self::from_parts(2, false),
        Self::from_parts(3, false),
        Self::from_parts(0, true),
        Self::from_parts(1, true),
        Self::from_parts(2, true),
        Self::from_parts(3, true),
    ];

    const fn from_parts(quarter_turns: u8, mirrored: bool) -> Self {
        Self {
            quarter_turns,
            mirrored,
        }
    }

    /// Creates an orientation from a clockwise rotation in degrees.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidRotation`] unless `degrees` is 0, 90, 180 or 270.
    pub fn new(degrees: u16, mirrored: bool) -> Result<Self, InvalidRotation> {
        match degrees {
            0 | 90 | 180 | 270 => Ok(Self::from_parts((degrees / 90) as u8, mirrored)),
            other => Err(InvalidRotation(other)),
        }
    }

    /// Returns the clockwise rotation in degrees
    pub fn degrees(self) -> u16 {
        u16::from(self.quarter_turns) * 90
    }

    /// Returns whether the orientation mirrors about the vertical axis
    pub fn is_mirrored(self) -> bool {
        self.mirrored
    }

    /// Returns true for the identity orientation
    pub fn is_identity(self) -> bool {
        self == Self::IDENTITY
    }

    /// Applies this orientation to an offset relative to the box origin.
    pub fn apply(self, point: Point) -> Point {
        let mut p = if self.mirrored {
            Point::new(-point.x, point.y)
        } else {
            point
        };
        for _ in 0..self.quarter_turns {
            p = Point::new(-p.y, p.x);
        }
        p
    }

    /// Returns the orientation equivalent to applying `self` and then `next`.
    pub fn then(self, next: Self) -> Self {
        // Quarter turns and mirrors map integer probes exactly, so the
        // composition is the unique candidate agreeing on an asymmetric probe.
        let probe = Point::new(1.0, 2.0);
        let expected = next.apply(self.apply(probe));
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.apply(probe) == expected)
            .unwrap_or(Self::IDENTITY)
    }
}
