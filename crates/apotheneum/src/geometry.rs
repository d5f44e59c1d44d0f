//! Fixed geometry of the installation.
//!
//! These values are not derived from the fixture model. They describe the
//! physical build and must be kept in sync with the fixture files; every build
//! validates the model against them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::address::{round_position, wrap};
use crate::error::GeometryError;

pub const FACE_WIDTH: usize = 50;
pub const CUBE_HEIGHT: usize = 45;
pub const CYLINDER_COLUMNS: usize = 120;
pub const CYLINDER_HEIGHT: usize = 43;
pub const DOOR_WIDTH: usize = 10;
pub const DOOR_HEIGHT: usize = 11;
pub const CUBE_DOOR_START: usize = 20;
pub const CYLINDER_DOOR_START: usize = 10;
pub const CYLINDER_DOOR_PERIOD: usize = 30;

/// Number of faces around the cube.
pub const CUBE_FACES: usize = 4;

/// The two shapes of the installation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Cube,
    Cylinder,
}

impl Shape {
    pub const ALL: [Shape; 2] = [Shape::Cube, Shape::Cylinder];
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Shape::Cube => "cube",
            Shape::Cylinder => "cylinder",
        })
    }
}

/// Geometry constants. Missing fields in a serialized override fall back to
/// the installation defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Geometry {
    /// Columns per cube face.
    pub face_width: usize,
    /// Points per cube column.
    pub cube_height: usize,
    /// Columns around the cylinder (its ring length).
    pub cylinder_columns: usize,
    /// Points per cylinder column.
    pub cylinder_height: usize,
    pub door_width: usize,
    /// Door height in rows, counted up from the bottom.
    pub door_height: usize,
    /// First door column relative to the start of each cube face.
    pub cube_door_start: usize,
    pub cylinder_door_start: usize,
    /// Cylinder doors repeat every `cylinder_door_period` columns.
    pub cylinder_door_period: usize,
}

impl Default for Geometry {
    fn default() -> Self {
        Self::APOTHENEUM
    }
}

impl Geometry {
    pub const APOTHENEUM: Geometry = Geometry {
        face_width: FACE_WIDTH,
        cube_height: CUBE_HEIGHT,
        cylinder_columns: CYLINDER_COLUMNS,
        cylinder_height: CYLINDER_HEIGHT,
        door_width: DOOR_WIDTH,
        door_height: DOOR_HEIGHT,
        cube_door_start: CUBE_DOOR_START,
        cylinder_door_start: CYLINDER_DOOR_START,
        cylinder_door_period: CYLINDER_DOOR_PERIOD,
    };

    /// Ring length of the cube: all four faces side by side.
    #[inline]
    pub fn cube_ring_length(&self) -> usize {
        CUBE_FACES * self.face_width
    }

    /// Parse geometry overrides from JSON.
    pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }

    /// Ring-addressing descriptor for one shape.
    pub fn shape(&self, shape: Shape) -> ShapeGeometry {
        match shape {
            Shape::Cube => ShapeGeometry {
                shape,
                ring_length: self.cube_ring_length(),
                ring_height: self.cube_height,
                door: DoorWindows {
                    start: self.cube_door_start,
                    width: self.door_width,
                    height: self.door_height,
                    period: self.face_width,
                },
            },
            Shape::Cylinder => ShapeGeometry {
                shape,
                ring_length: self.cylinder_columns,
                ring_height: self.cylinder_height,
                door: DoorWindows {
                    start: self.cylinder_door_start,
                    width: self.door_width,
                    height: self.door_height,
                    period: self.cylinder_door_period,
                },
            },
        }
    }

    pub fn validate(&self) -> Result<(), GeometryError> {
        let fields = [
            ("face_width", self.face_width),
            ("cube_height", self.cube_height),
            ("cylinder_columns", self.cylinder_columns),
            ("cylinder_height", self.cylinder_height),
            ("door_width", self.door_width),
            ("door_height", self.door_height),
            ("cylinder_door_period", self.cylinder_door_period),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, v)| *v == 0) {
            return Err(GeometryError::Zero(*name));
        }

        if self.cylinder_columns % self.cylinder_door_period != 0 {
            return Err(GeometryError::PeriodMismatch {
                period: self.cylinder_door_period,
                ring_length: self.cylinder_columns,
            });
        }

        for shape in Shape::ALL {
            let g = self.shape(shape);
            if g.door.start + g.door.width > g.door.period {
                return Err(GeometryError::DoorOutsidePeriod {
                    shape,
                    start: g.door.start,
                    width: g.door.width,
                    period: g.door.period,
                });
            }
            if g.door.height > g.ring_height {
                return Err(GeometryError::DoorTooTall {
                    shape,
                    door_height: g.door.height,
                    height: g.ring_height,
                });
            }
        }

        Ok(())
    }
}

/// Door windows along a ring: `width` columns starting at `start`, repeated
/// every `period` columns, covering the bottom `height` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoorWindows {
    pub start: usize,
    pub width: usize,
    pub height: usize,
    pub period: usize,
}

impl DoorWindows {
    /// Whether a wrapped circumferential position lies inside any window.
    #[inline]
    pub fn covers_column(&self, column: usize) -> bool {
        let offset = column % self.period;
        offset >= self.start && offset < self.start + self.width
    }

    /// Starting columns of every window on a ring of `ring_length`.
    pub fn starts(&self, ring_length: usize) -> impl Iterator<Item = usize> + '_ {
        (0..ring_length)
            .step_by(self.period)
            .map(move |base| base + self.start)
            .filter(move |&c| c < ring_length)
    }
}

/// Per-shape ring addressing constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeGeometry {
    pub shape: Shape,
    /// Circumference in points.
    pub ring_length: usize,
    /// Points per column, i.e. number of rings.
    pub ring_height: usize,
    pub door: DoorWindows,
}

impl ShapeGeometry {
    #[inline]
    pub fn wrap(&self, pos: i64) -> usize {
        wrap(pos, self.ring_length)
    }

    #[inline]
    pub fn contains_ring(&self, ring: i64) -> bool {
        ring >= 0 && (ring as u64) < self.ring_height as u64
    }

    /// First ring index of the door band.
    #[inline]
    pub fn door_band_start(&self) -> usize {
        self.ring_height - self.door.height
    }

    /// Door predicate on integer coordinates. Rings outside the shape are never
    /// doors; positions wrap around the ring.
    #[inline]
    pub fn is_door(&self, ring: i64, pos: i64) -> bool {
        if !self.contains_ring(ring) || (ring as usize) < self.door_band_start() {
            return false;
        }
        self.door.covers_column(self.wrap(pos))
    }

    /// Door predicate on fractional ring coordinates (`x` around, `y` down).
    #[inline]
    pub fn is_door_at(&self, x: f32, y: f32) -> bool {
        self.is_door(round_position(y), round_position(x))
    }

    /// Rows usable in `column` above any door below it.
    #[inline]
    pub fn available(&self, column: usize) -> usize {
        if self.door.covers_column(column) {
            self.ring_height - self.door.height
        } else {
            self.ring_height
        }
    }
}
