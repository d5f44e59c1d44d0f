//! Construction errors.
//!
//! Only topology construction is fallible. Misuse at render time (querying an
//! absent topology, copying between regions of different sizes) is a caller
//! bug and panics instead.

use thiserror::Error;

use crate::geometry::Shape;

/// Inconsistent geometry constants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("geometry field `{0}` must be non-zero")]
    Zero(&'static str),

    #[error("{shape} door window [{start}, {start}+{width}) does not fit in its period of {period}")]
    DoorOutsidePeriod {
        shape: Shape,
        start: usize,
        width: usize,
        period: usize,
    },

    #[error("{shape} door height {door_height} exceeds column height {height}")]
    DoorTooTall {
        shape: Shape,
        door_height: usize,
        height: usize,
    },

    #[error("cylinder door period {period} does not divide ring length {ring_length}")]
    PeriodMismatch { period: usize, ring_length: usize },
}

/// Why a fixture model could not be turned into a [`Topology`](crate::Topology).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("invalid geometry: {0}")]
    Geometry(#[from] GeometryError),

    #[error("Apotheneum fixture is missing sub-group `{tag}`")]
    MissingGroup { tag: String },

    #[error("Apotheneum {group} expects {expected} columns, found {found}")]
    ColumnCount {
        group: String,
        expected: usize,
        found: usize,
    },

    #[error("Apotheneum {group} column {column} expects {expected} points, found {found}")]
    ColumnLength {
        group: String,
        column: usize,
        expected: usize,
        found: usize,
    },

    #[error("Apotheneum {group} references point {index}, model only has {point_count} points")]
    PointOutOfRange {
        group: String,
        index: usize,
        point_count: usize,
    },
}

impl BuildError {
    pub(crate) fn missing(tag: impl Into<String>) -> Self {
        Self::MissingGroup { tag: tag.into() }
    }

    /// Message surfaced to the host when a detected installation fails to build.
    pub fn report_message(&self) -> String {
        format!(
            "Apotheneum detected but contains errors. Fixture files may be out of date or multiple instances loaded?\n{self}"
        )
    }
}
