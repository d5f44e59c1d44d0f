use std::ops::Range;
use std::sync::Arc;

use crate::address::wrap;
use crate::fixture::Point;

/// A vertical run of points, index 0 at the top.
///
/// Points are shared: a cube face and the cube orientation that concatenates
/// the faces hold the same allocation.
#[derive(Debug, Clone)]
pub struct Column {
    points: Arc<[Point]>,
    span: Option<Range<usize>>,
}

impl Column {
    pub(crate) fn new(points: &[Point]) -> Self {
        Self {
            span: contiguous(points.iter()),
            points: points.into(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Point at row `y`. Panics when `y` is past the bottom.
    #[inline]
    pub fn point(&self, y: usize) -> &Point {
        &self.points[y]
    }

    #[inline]
    pub fn get(&self, y: usize) -> Option<&Point> {
        self.points.get(y)
    }

    /// Global buffer range, if the column is laid out as one unbroken run.
    #[inline]
    pub fn span(&self) -> Option<Range<usize>> {
        self.span.clone()
    }
}

/// Range covered by `points` when their indices increase by exactly one.
pub(crate) fn contiguous<'a>(mut points: impl Iterator<Item = &'a Point>) -> Option<Range<usize>> {
    let first = points.next()?.index;
    let mut end = first + 1;
    for p in points {
        if p.index != end {
            return None;
        }
        end += 1;
    }
    Some(first..end)
}

/// Range covered by a sequence of columns laid end to end.
pub(crate) fn contiguous_columns(columns: &[Column]) -> Option<Range<usize>> {
    let mut spans = columns.iter().map(Column::span);
    let mut range = spans.next()??;
    for span in spans {
        let span = span?;
        if span.start != range.end {
            return None;
        }
        range.end = span.end;
    }
    Some(range)
}

/// Horizontal slice: the point at one height index from every column, in
/// column order. A view over its owner's columns, never materialized.
#[derive(Debug, Clone, Copy)]
pub struct Ring<'a> {
    index: usize,
    columns: &'a [Column],
}

/// A ring restricted to the columns of a single cube face.
pub type Row<'a> = Ring<'a>;

impl<'a> Ring<'a> {
    pub(crate) fn new(index: usize, columns: &'a [Column]) -> Self {
        Self { index, columns }
    }

    /// Height index of this ring, 0 at the top.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    #[inline]
    pub fn point(&self, i: usize) -> &'a Point {
        self.columns[i].point(self.index)
    }

    #[inline]
    pub fn get(&self, i: usize) -> Option<&'a Point> {
        self.columns.get(i).map(|c| c.point(self.index))
    }

    /// Point at any circumferential position, wrapping around the ring.
    #[inline]
    pub fn wrapped(&self, pos: i64) -> &'a Point {
        self.point(wrap(pos, self.columns.len()))
    }

    pub fn points(&self) -> impl Iterator<Item = &'a Point> + 'a {
        let index = self.index;
        self.columns.iter().map(move |c| c.point(index))
    }
}
