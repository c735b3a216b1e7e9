//! Schemplace Core Types and Definitions
//!
//! This crate provides the foundational types shared by the schematic
//! placement pipeline and its callers. It includes:
//!
//! - **Identifiers**: String-interned identifiers ([`identifier::Id`]) and
//!   parsed port references ([`identifier::PortRef`])
//! - **Geometry**: Basic geometric types and box orientations ([`geometry`] module)
//! - **Scene**: The serializable scene model of boxes, ports, connections and
//!   nets ([`scene`] module)

pub mod geometry;
pub mod identifier;
pub mod scene;
