//! Color-buffer transfer primitives.
//!
//! Effects usually render one canonical region (a face, an exterior) and
//! propagate it to its symmetric counterparts. Every primitive here borrows
//! the frame's color buffer for the duration of the call only.
//!
//! Regions laid out as one contiguous index run are moved with a single
//! `copy_within`; anything else falls back to a point-by-point loop with the
//! same result, provided source and destination do not overlap.
//!
//! Size mismatches are caller bugs and panic. Region shapes are fixed when the
//! topology is built, so a mismatch cannot come from the environment.

use std::ops::Range;

use crate::fixture::Point;
use crate::topology::{Column, Component, Face, Orientation, Topology};

/// Packed ARGB color, one per global point index.
pub type Color = u32;

pub const BLACK: Color = 0xFF00_0000;

/// A set of points that can be transferred as a unit.
pub trait Region {
    /// Columns in the order they run around the surface.
    fn columns(&self) -> &[Column];

    /// Total number of points.
    fn size(&self) -> usize;

    /// Global buffer range when the region is one unbroken run.
    fn span(&self) -> Option<Range<usize>>;

    /// Points column by column, top to bottom.
    fn points(&self) -> impl Iterator<Item = &Point> + '_ {
        self.columns().iter().flat_map(|c| c.points().iter())
    }
}

impl Region for Column {
    fn columns(&self) -> &[Column] {
        std::slice::from_ref(self)
    }

    fn size(&self) -> usize {
        self.len()
    }

    fn span(&self) -> Option<Range<usize>> {
        Column::span(self)
    }
}

impl Region for Face {
    fn columns(&self) -> &[Column] {
        Face::columns(self)
    }

    fn size(&self) -> usize {
        Face::size(self)
    }

    fn span(&self) -> Option<Range<usize>> {
        Face::span(self)
    }
}

impl Region for Orientation {
    fn columns(&self) -> &[Column] {
        Orientation::columns(self)
    }

    fn size(&self) -> usize {
        Orientation::size(self)
    }

    fn span(&self) -> Option<Range<usize>> {
        Orientation::span(self)
    }
}

/// Copy every color of `from` onto `to`, point for point in column order.
/// A no-op when either side is absent, e.g. a missing interior.
pub fn copy<A, B>(buffer: &mut [Color], from: Option<&A>, to: Option<&B>)
where
    A: Region + ?Sized,
    B: Region + ?Sized,
{
    let (Some(from), Some(to)) = (from, to) else {
        return;
    };
    assert_eq!(
        from.size(),
        to.size(),
        "copy between regions of different sizes"
    );

    match (from.span(), to.span()) {
        (Some(src), Some(dst)) => {
            if src.start != dst.start {
                buffer.copy_within(src, dst.start);
            }
        }
        _ => {
            for (src, dst) in from.points().zip(to.points()) {
                buffer[dst.index] = buffer[src.index];
            }
        }
    }
}

/// Copy `from` onto `to` with the column order reversed: the first source
/// column lands on the last destination column. Points within a column keep
/// their order. Used for surfaces that face the other way.
pub fn mirror_copy<A, B>(buffer: &mut [Color], from: Option<&A>, to: Option<&B>)
where
    A: Region + ?Sized,
    B: Region + ?Sized,
{
    let (Some(from), Some(to)) = (from, to) else {
        return;
    };
    let (src, dst) = (from.columns(), to.columns());
    assert_eq!(
        src.len(),
        dst.len(),
        "mirror copy between regions with different column counts"
    );

    for (column, target) in src.iter().zip(dst.iter().rev()) {
        copy(buffer, Some(column), Some(target));
    }
}

/// Set every point of `region` to `color`.
pub fn fill<R: Region + ?Sized>(buffer: &mut [Color], region: &R, color: Color) {
    match region.span() {
        Some(span) => buffer[span].fill(color),
        None => {
            for p in region.points() {
                buffer[p.index] = color;
            }
        }
    }
}

/// Set both layers of a shape to `color`.
pub fn fill_component(buffer: &mut [Color], component: &Component, color: Color) {
    for orientation in component.orientations() {
        fill(buffer, orientation, color);
    }
}

/// Set every point of the installation, both shapes and layers, to `color`.
/// Points of the fixture model outside the installation are left alone.
pub fn fill_all(buffer: &mut [Color], topology: &Topology, color: Color) {
    for component in [topology.cube(), topology.cylinder()] {
        fill_component(buffer, component, color);
    }
}

/// Propagate one cube face to every other face of the cube, exterior and
/// interior.
pub fn copy_face_to_all(buffer: &mut [Color], cube: &Component, from: &Face) {
    for face in cube.faces() {
        if face.id() != from.id() || face.side() != from.side() {
            copy(buffer, Some(from), Some(face));
        }
    }
}

/// Mirror each shape's exterior onto its interior. No-op without an interior.
pub fn copy_exterior(buffer: &mut [Color], topology: &Topology) {
    for component in [topology.cube(), topology.cylinder()] {
        copy(buffer, Some(component.exterior()), component.interior());
    }
}

/// Black out the door band under every door window of every surface.
pub fn mute_doors(buffer: &mut [Color], topology: &Topology) {
    for orientation in topology.orientations() {
        let geometry = orientation.geometry();
        let band = geometry.door_band_start()..orientation.height();
        for start in geometry.door.starts(orientation.width()) {
            for column in &orientation.columns()[start..start + geometry.door.width] {
                for p in &column.points()[band.clone()] {
                    buffer[p.index] = BLACK;
                }
            }
        }
    }
}

/// Write a row-major raster of `face.width() x face.height()` pixels onto a
/// face: `pixels[x + width * y]` lands on column `x`, row `y`.
pub fn write_raster(buffer: &mut [Color], face: &Face, pixels: &[Color]) {
    let width = face.width();
    assert_eq!(
        pixels.len(),
        width * face.height(),
        "raster size does not match {} face",
        face.id()
    );
    for (x, column) in face.columns().iter().enumerate() {
        for (y, p) in column.points().iter().enumerate() {
            buffer[p.index] = pixels[x + width * y];
        }
    }
}
