use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use super::column::{contiguous_columns, Column, Ring};
use super::face::{Face, FaceId};
use super::check_column;
use crate::address::{round_position, wrap};
use crate::error::BuildError;
use crate::fixture::{tags, FixtureModel, Point};
use crate::geometry::{Geometry, Shape, ShapeGeometry};

/// Which layer of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Exterior,
    Interior,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Exterior, Side::Interior];

    pub(crate) fn tag_suffix(self) -> &'static str {
        match self {
            Side::Exterior => tags::EXTERIOR_SUFFIX,
            Side::Interior => tags::INTERIOR_SUFFIX,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::Exterior => "exterior",
            Side::Interior => "interior",
        })
    }
}

/// One complete, independently addressable surface: the exterior or the
/// interior of the cube or the cylinder.
///
/// Columns run around the shape in ring order. For the cube they are the four
/// faces' columns concatenated front, right, back, left.
#[derive(Debug, Clone)]
pub struct Orientation {
    geometry: ShapeGeometry,
    side: Side,
    columns: Vec<Column>,
    faces: Vec<Face>,
    size: usize,
    span: Option<Range<usize>>,
}

impl Orientation {
    pub(crate) fn cube(
        model: &dyn FixtureModel,
        side: Side,
        geometry: &Geometry,
        point_count: usize,
    ) -> Result<Self, BuildError> {
        let faces = FaceId::ALL
            .into_iter()
            .map(|id| Face::build(model, id, side, geometry, point_count))
            .collect::<Result<Vec<_>, _>>()?;

        let columns = faces
            .iter()
            .flat_map(|f| f.columns().iter().cloned())
            .collect();

        Ok(Self::assemble(geometry.shape(Shape::Cube), side, columns, faces))
    }

    pub(crate) fn cylinder(
        model: &dyn FixtureModel,
        side: Side,
        geometry: &Geometry,
        point_count: usize,
    ) -> Result<Self, BuildError> {
        let tag = format!("{}{}", tags::CYLINDER, side.tag_suffix());
        let nodes = model.sub(&tag);
        if nodes.is_empty() {
            return Err(BuildError::missing(tag));
        }
        if nodes.len() != geometry.cylinder_columns {
            return Err(BuildError::ColumnCount {
                group: tag,
                expected: geometry.cylinder_columns,
                found: nodes.len(),
            });
        }

        let mut columns = Vec::with_capacity(nodes.len());
        for (i, node) in nodes.into_iter().enumerate() {
            check_column(&tag, i, node.points(), geometry.cylinder_height, point_count)?;
            columns.push(Column::new(node.points()));
        }

        Ok(Self::assemble(geometry.shape(Shape::Cylinder), side, columns, Vec::new()))
    }

    fn assemble(geometry: ShapeGeometry, side: Side, columns: Vec<Column>, faces: Vec<Face>) -> Self {
        debug_assert_eq!(columns.len(), geometry.ring_length);
        Self {
            geometry,
            side,
            size: columns.iter().map(Column::len).sum(),
            span: contiguous_columns(&columns),
            columns,
            faces,
        }
    }

    #[inline]
    pub fn shape(&self) -> Shape {
        self.geometry.shape
    }

    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    /// Ring addressing constants for this shape.
    #[inline]
    pub fn geometry(&self) -> &ShapeGeometry {
        &self.geometry
    }

    /// Number of columns, i.e. ring length.
    #[inline]
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Points per column, i.e. number of rings.
    #[inline]
    pub fn height(&self) -> usize {
        self.columns[0].len()
    }

    #[inline]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    #[inline]
    pub fn column(&self, x: usize) -> &Column {
        &self.columns[x]
    }

    #[inline]
    pub fn point(&self, x: usize, y: usize) -> &Point {
        self.columns[x].point(y)
    }

    #[inline]
    pub fn ring(&self, y: usize) -> Ring<'_> {
        assert!(y < self.height(), "ring {y} out of range for {} {}", self.side, self.shape());
        Ring::new(y, &self.columns)
    }

    pub fn rings(&self) -> impl Iterator<Item = Ring<'_>> + '_ {
        (0..self.height()).map(move |y| Ring::new(y, &self.columns))
    }

    /// Cube faces in ring order; empty for the cylinder.
    #[inline]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    #[inline]
    pub fn face(&self, id: FaceId) -> Option<&Face> {
        self.faces.get(id.ordinal())
    }

    /// Rows usable in a column above any door below it.
    #[inline]
    pub fn available(&self, column: usize) -> usize {
        self.geometry.available(column % self.width())
    }

    /// Total number of points on this surface.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn span(&self) -> Option<Range<usize>> {
        self.span.clone()
    }

    /// Point at ring `ring`, circumferential position `pos` (wrapped). `None`
    /// when the ring index is off the surface.
    #[inline]
    pub fn resolve(&self, ring: i64, pos: i64) -> Option<&Point> {
        if !self.geometry.contains_ring(ring) {
            return None;
        }
        let x = wrap(pos, self.columns.len());
        self.columns[x].get(ring as usize)
    }

    /// [`resolve`](Self::resolve) on fractional ring coordinates, `x` around
    /// and `y` down, both snapped to the nearest pixel.
    #[inline]
    pub fn resolve_at(&self, x: f32, y: f32) -> Option<&Point> {
        self.resolve(round_position(y), round_position(x))
    }

    #[inline]
    pub fn is_door(&self, ring: i64, pos: i64) -> bool {
        self.geometry.is_door(ring, pos)
    }
}
