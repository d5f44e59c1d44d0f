use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use super::column::{contiguous_columns, Column, Row};
use super::{check_column, Side};
use crate::error::BuildError;
use crate::fixture::{tags, FixtureModel};
use crate::geometry::Geometry;

/// The four sides of the cube, in ring order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaceId {
    Front,
    Right,
    Back,
    Left,
}

impl FaceId {
    pub const ALL: [FaceId; 4] = [FaceId::Front, FaceId::Right, FaceId::Back, FaceId::Left];

    /// Position of this face around the cube ring.
    #[inline]
    pub fn ordinal(self) -> usize {
        self as usize
    }

    fn tag_prefix(self) -> &'static str {
        match self {
            FaceId::Front => tags::CUBE_FRONT,
            FaceId::Right => tags::CUBE_RIGHT,
            FaceId::Back => tags::CUBE_BACK,
            FaceId::Left => tags::CUBE_LEFT,
        }
    }

    /// Fixture tag of this face on the given side, e.g. `cubeFrontExterior`.
    pub fn tag(self, side: Side) -> String {
        format!("{}{}", self.tag_prefix(), side.tag_suffix())
    }
}

impl fmt::Display for FaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FaceId::Front => "front",
            FaceId::Right => "right",
            FaceId::Back => "back",
            FaceId::Left => "left",
        })
    }
}

/// One planar side of the cube: `face_width` columns of `cube_height` points.
#[derive(Debug, Clone)]
pub struct Face {
    id: FaceId,
    side: Side,
    columns: Vec<Column>,
    size: usize,
    span: Option<Range<usize>>,
}

impl Face {
    pub(crate) fn build(
        model: &dyn FixtureModel,
        id: FaceId,
        side: Side,
        geometry: &Geometry,
        point_count: usize,
    ) -> Result<Self, BuildError> {
        let tag = id.tag(side);
        let group = model
            .sub(&tag)
            .into_iter()
            .next()
            .ok_or_else(|| BuildError::missing(tag.as_str()))?;

        let children = group.children();
        if children.len() != geometry.face_width {
            return Err(BuildError::ColumnCount {
                group: tag,
                expected: geometry.face_width,
                found: children.len(),
            });
        }

        let mut columns = Vec::with_capacity(children.len());
        for (i, child) in children.into_iter().enumerate() {
            check_column(&tag, i, child.points(), geometry.cube_height, point_count)?;
            columns.push(Column::new(child.points()));
        }

        Ok(Self {
            id,
            side,
            size: columns.iter().map(Column::len).sum(),
            span: contiguous_columns(&columns),
            columns,
        })
    }

    #[inline]
    pub fn id(&self) -> FaceId {
        self.id
    }

    #[inline]
    pub fn side(&self) -> Side {
        self.side
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
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.columns[0].len()
    }

    #[inline]
    pub fn point(&self, x: usize, y: usize) -> &crate::Point {
        self.columns[x].point(y)
    }

    #[inline]
    pub fn row(&self, y: usize) -> Row<'_> {
        assert!(y < self.height(), "row {y} out of range for {} face", self.id);
        Row::new(y, &self.columns)
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> + '_ {
        (0..self.height()).map(move |y| Row::new(y, &self.columns))
    }

    /// Total number of points on the face.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn span(&self) -> Option<Range<usize>> {
        self.span.clone()
    }
}
