//! APOTHENEUM: structured addressing over the cube + cylinder light installation.
//!
//! The physical fixture is an arbitrary point cloud. This crate turns it into a
//! stable coordinate system and gives effects a handful of composable regions
//! instead of thousands of individually indexed points.
//!
//! Structure (leaves first):
//!   Column       : fixed-length vertical run of points, index 0 at the top
//!   Ring / Row   : the point at one height index taken from every column
//!   Face         : one of the four 50-column planar sides of the cube
//!   Orientation  : exterior or interior layer of a shape (columns + rings)
//!   Component    : a shape (Cube, Cylinder) with exterior and optional interior
//!   Topology     : Cube + Cylinder built from one fixture model
//!
//! Addressing:
//!   (shape, side, ring index, circumferential position) -> Option<&Point>
//!   positions wrap with a Euclidean remainder over the ring length, fractional
//!   positions are rounded half-up. Door windows sit in the bottom
//!   `door_height` rows and repeat every face (cube) or every cycle (cylinder).
//!
//! Transfer:
//!   copy / mirror_copy between regions of one shared color buffer, with a
//!   `copy_within` fast path for regions laid out as one contiguous index run.
//!
//! Lifecycle:
//!   `TopologyContext::rebuild` builds a complete new topology off to the side
//!   and swaps it in under one write lock. A failed build leaves the context
//!   empty; frames rendered while empty come out black.

pub mod address;
pub mod context;
pub mod error;
pub mod fixture;
pub mod geometry;
pub mod synth;
pub mod topology;
pub mod transfer;

pub use address::{round_position, wrap};
pub use context::TopologyContext;
pub use error::{BuildError, GeometryError};
pub use fixture::{FixtureModel, FixtureNode, Point};
pub use geometry::{DoorWindows, Geometry, Shape, ShapeGeometry};
pub use topology::{Column, Component, Face, FaceId, Orientation, Ring, Row, Side, Topology};
pub use transfer::{Color, Region, BLACK};
