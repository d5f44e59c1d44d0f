//! Topology model: Cube and Cylinder built from one fixture model.
//!
//! Construction is all-or-nothing. Either both shapes come out fully
//! validated against the [`Geometry`] or the build returns a [`BuildError`]
//! and nothing is kept. A built topology is immutable; a fixture change
//! produces a new one.

mod column;
mod component;
mod face;
mod orientation;

pub use column::{Column, Ring, Row};
pub use component::Component;
pub use face::{Face, FaceId};
pub use orientation::{Orientation, Side};

use log::{debug, info};

use crate::address::round_position;
use crate::error::BuildError;
use crate::fixture::{tags, FixtureModel, Point};
use crate::geometry::{Geometry, Shape, ShapeGeometry};

/// The validated structure of the whole installation at one point in time.
#[derive(Debug, Clone)]
pub struct Topology {
    geometry: Geometry,
    cube: Component,
    cylinder: Component,
    point_count: usize,
}

impl Topology {
    /// Build the topology for a freshly loaded fixture model.
    ///
    /// Returns `Ok(None)` when the model holds no installation group: that is
    /// the idle state, not an error, whatever the geometry. `point_count` is
    /// the size of the global color buffer; every point must index into it.
    pub fn build(
        geometry: &Geometry,
        model: &dyn FixtureModel,
        point_count: usize,
    ) -> Result<Option<Self>, BuildError> {
        if !model.has_tag(tags::INSTALLATION) && !model.has_sub(tags::INSTALLATION) {
            debug!("No {} group in fixture model", tags::INSTALLATION);
            return Ok(None);
        }

        geometry.validate()?;

        let has_interior = model.has_sub(tags::INTERIOR);
        debug!("Building topology, interior: {has_interior}, points: {point_count}");

        let cube = Component::build(model, Shape::Cube, geometry, has_interior, point_count)?;
        let cylinder = Component::build(model, Shape::Cylinder, geometry, has_interior, point_count)?;

        info!(
            "Detected Apotheneum fixtures, has_interior: {} num_points: {}",
            has_interior, point_count
        );

        Ok(Some(Self {
            geometry: *geometry,
            cube,
            cylinder,
            point_count,
        }))
    }

    #[inline]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    #[inline]
    pub fn cube(&self) -> &Component {
        &self.cube
    }

    #[inline]
    pub fn cylinder(&self) -> &Component {
        &self.cylinder
    }

    #[inline]
    pub fn component(&self, shape: Shape) -> &Component {
        match shape {
            Shape::Cube => &self.cube,
            Shape::Cylinder => &self.cylinder,
        }
    }

    #[inline]
    pub fn orientation(&self, shape: Shape, side: Side) -> Option<&Orientation> {
        self.component(shape).orientation(side)
    }

    /// Every orientation of both shapes: cube exterior, cube interior,
    /// cylinder exterior, cylinder interior (interiors only when present).
    pub fn orientations(&self) -> impl Iterator<Item = &Orientation> + '_ {
        self.cube.orientations().chain(self.cylinder.orientations())
    }

    #[inline]
    pub fn has_interior(&self) -> bool {
        self.cube.interior().is_some()
    }

    /// Size of the global color buffer the topology was built against.
    #[inline]
    pub fn point_count(&self) -> usize {
        self.point_count
    }

    #[inline]
    pub fn shape_geometry(&self, shape: Shape) -> ShapeGeometry {
        self.geometry.shape(shape)
    }

    /// Point at (`ring`, `pos`) on one surface; positions wrap, rings do not.
    /// `None` for an off-surface ring or a missing interior.
    #[inline]
    pub fn resolve(&self, shape: Shape, side: Side, ring: i64, pos: i64) -> Option<&Point> {
        self.orientation(shape, side)?.resolve(ring, pos)
    }

    /// [`resolve`](Self::resolve) for fractional ring coordinates.
    #[inline]
    pub fn resolve_at(&self, shape: Shape, side: Side, x: f32, y: f32) -> Option<&Point> {
        self.resolve(shape, side, round_position(y), round_position(x))
    }

    /// Door predicate. Pure geometry: does not consult or alter the buffer.
    #[inline]
    pub fn is_door(&self, shape: Shape, ring: i64, pos: i64) -> bool {
        self.geometry.shape(shape).is_door(ring, pos)
    }

    #[inline]
    pub fn is_door_at(&self, shape: Shape, x: f32, y: f32) -> bool {
        self.geometry.shape(shape).is_door_at(x, y)
    }
}

/// Validate one column's length and point indices.
pub(crate) fn check_column(
    group: &str,
    column: usize,
    points: &[Point],
    expected: usize,
    point_count: usize,
) -> Result<(), BuildError> {
    if points.len() != expected {
        return Err(BuildError::ColumnLength {
            group: group.to_owned(),
            column,
            expected,
            found: points.len(),
        });
    }
    if let Some(p) = points.iter().find(|p| p.index >= point_count) {
        return Err(BuildError::PointOutOfRange {
            group: group.to_owned(),
            index: p.index,
            point_count,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::FixtureNode;
    use crate::synth::{self, SynthOptions};

    fn build(options: &SynthOptions) -> Result<Option<Topology>, BuildError> {
        let geometry = Geometry::default();
        let model = synth::installation(&geometry, options);
        Topology::build(&geometry, &model, model.point_count())
    }

    #[test]
    fn builds_full_installation() {
        let topo = build(&SynthOptions::default()).unwrap().unwrap();
        assert!(topo.has_interior());

        let cube = topo.cube();
        assert_eq!(cube.width(), 200);
        assert_eq!(cube.height(), 45);
        assert_eq!(cube.exterior().size(), 200 * 45);
        assert_eq!(cube.faces().count(), 8);

        let cyl = topo.cylinder();
        assert_eq!(cyl.width(), 120);
        assert_eq!(cyl.height(), 43);
        assert!(cyl.exterior().faces().is_empty());
        assert_eq!(topo.orientations().count(), 4);
    }

    #[test]
    fn cube_columns_concatenate_faces_in_ring_order() {
        let topo = build(&SynthOptions::default()).unwrap().unwrap();
        let ext = topo.cube().exterior();
        for id in FaceId::ALL {
            let face = ext.face(id).unwrap();
            assert_eq!(face.id(), id);
            let first = ext.column(id.ordinal() * 50);
            assert_eq!(first.point(0).index, face.point(0, 0).index);
        }
        assert_eq!(ext.span(), Some(0..9000));
    }

    #[test]
    fn rings_take_one_point_per_column() {
        let topo = build(&SynthOptions::default()).unwrap().unwrap();
        let ext = topo.cylinder().exterior();
        let ring = ext.ring(5);
        assert_eq!(ring.len(), 120);
        for (x, p) in ring.points().enumerate() {
            assert_eq!(p.index, ext.point(x, 5).index);
        }
        assert_eq!(ext.rings().count(), 43);

        let front = topo.cube().exterior().face(FaceId::Front).unwrap();
        let row = front.row(44);
        assert_eq!(row.len(), 50);
        assert_eq!(row.point(49).index, front.point(49, 44).index);
    }

    #[test]
    fn absent_installation_is_not_an_error() {
        let geometry = Geometry::default();
        let model = FixtureNode::group(["somethingElse"], vec![]);
        assert!(Topology::build(&geometry, &model, 0).unwrap().is_none());
    }

    #[test]
    fn interior_is_optional() {
        let topo = build(&SynthOptions {
            interior: false,
            ..SynthOptions::default()
        })
        .unwrap()
        .unwrap();
        assert!(!topo.has_interior());
        assert!(topo.cube().interior().is_none());
        assert!(topo.cylinder().interior().is_none());
        assert!(topo.resolve(Shape::Cube, Side::Interior, 0, 0).is_none());
        assert_eq!(topo.orientations().count(), 2);
    }

    #[test]
    fn both_shapes_are_required() {
        let err = build(&SynthOptions {
            cylinder: false,
            ..SynthOptions::default()
        })
        .unwrap_err();
        assert_eq!(err, BuildError::missing("cylinderExterior"));

        let err = build(&SynthOptions {
            cube: false,
            ..SynthOptions::default()
        })
        .unwrap_err();
        assert_eq!(err, BuildError::missing("cubeFrontExterior"));
    }

    #[test]
    fn rejects_wrong_column_count() {
        let geometry = Geometry::default();
        let mut model = synth::installation(&geometry, &SynthOptions::default());
        model.find_mut("cubeRightExterior").unwrap().children.pop();
        let err = Topology::build(&geometry, &model, model.point_count()).unwrap_err();
        assert_eq!(
            err,
            BuildError::ColumnCount {
                group: "cubeRightExterior".into(),
                expected: 50,
                found: 49,
            }
        );
        assert_eq!(err.to_string(), "Apotheneum cubeRightExterior expects 50 columns, found 49");
    }

    #[test]
    fn rejects_short_column() {
        let geometry = Geometry::default();
        let mut model = synth::installation(&geometry, &SynthOptions::default());
        model.find_mut("cubeBackInterior").unwrap().children[7].points.pop();
        let err = Topology::build(&geometry, &model, model.point_count()).unwrap_err();
        assert!(matches!(
            err,
            BuildError::ColumnLength { column: 7, expected: 45, found: 44, .. }
        ));
    }

    #[test]
    fn rejects_points_beyond_buffer() {
        let geometry = Geometry::default();
        let model = synth::installation(&geometry, &SynthOptions::default());
        let err = Topology::build(&geometry, &model, model.point_count() - 1).unwrap_err();
        assert!(matches!(err, BuildError::PointOutOfRange { .. }));
    }

    #[test]
    fn invalid_geometry_fails_only_detected_installations() {
        let geometry = Geometry {
            door_height: 50,
            ..Geometry::default()
        };
        let absent = FixtureNode::group(["lights"], vec![]);
        assert!(Topology::build(&geometry, &absent, 0).unwrap().is_none());

        let model = synth::installation(&Geometry::default(), &SynthOptions::default());
        assert!(matches!(
            Topology::build(&geometry, &model, model.point_count()),
            Err(BuildError::Geometry(_))
        ));
    }

    #[test]
    fn rejects_wrong_cylinder_column_count() {
        let geometry = Geometry::default();
        let mut model = synth::installation(&geometry, &SynthOptions::default());
        let interior = model.find_mut(tags::INTERIOR).unwrap();
        let first = interior
            .children
            .iter()
            .position(|c| c.has_tag("cylinderInterior"))
            .unwrap();
        interior.children.remove(first);

        let err = Topology::build(&geometry, &model, model.point_count()).unwrap_err();
        assert_eq!(
            err,
            BuildError::ColumnCount {
                group: "cylinderInterior".into(),
                expected: 120,
                found: 119,
            }
        );
    }

    #[test]
    fn rejects_short_cylinder_column() {
        let geometry = Geometry::default();
        let mut model = synth::installation(&geometry, &SynthOptions::default());
        model.find_mut("cylinderExterior").unwrap().points.pop();

        let err = Topology::build(&geometry, &model, model.point_count()).unwrap_err();
        assert_eq!(
            err,
            BuildError::ColumnLength {
                group: "cylinderExterior".into(),
                column: 0,
                expected: 43,
                found: 42,
            }
        );
    }

    #[test]
    fn interior_layers_match_exterior_dimensions() {
        let topo = build(&SynthOptions::default()).unwrap().unwrap();
        for component in [topo.cube(), topo.cylinder()] {
            let (ext, int) = (component.exterior(), component.interior().unwrap());
            assert_eq!((ext.width(), ext.height(), ext.size()), (int.width(), int.height(), int.size()));
        }
    }

    #[test]
    fn resolve_wraps_position_but_not_ring() {
        let topo = build(&SynthOptions::default()).unwrap().unwrap();
        let ext = topo.cube().exterior();

        let p = topo.resolve(Shape::Cube, Side::Exterior, 10, -1).unwrap();
        assert_eq!(p.index, ext.point(199, 10).index);
        let p = topo.resolve(Shape::Cube, Side::Exterior, 10, 200).unwrap();
        assert_eq!(p.index, ext.point(0, 10).index);

        assert!(topo.resolve(Shape::Cube, Side::Exterior, -1, 0).is_none());
        assert!(topo.resolve(Shape::Cube, Side::Exterior, 45, 0).is_none());
        assert!(topo.resolve(Shape::Cylinder, Side::Interior, 42, 0).is_some());
        assert!(topo.resolve(Shape::Cylinder, Side::Interior, 43, 0).is_none());

        let p = topo.resolve_at(Shape::Cylinder, Side::Exterior, 119.6, 2.4).unwrap();
        assert_eq!(p.index, topo.cylinder().exterior().point(0, 2).index);
    }

    #[test]
    fn door_predicate_matches_face_windows() {
        let topo = build(&SynthOptions::default()).unwrap().unwrap();
        for face in 0..4i64 {
            let door = face * 50 + 20;
            for ring in 34..45 {
                assert!(topo.is_door(Shape::Cube, ring, door));
                assert!(topo.is_door(Shape::Cube, ring, door + 9));
                assert!(!topo.is_door(Shape::Cube, ring, door - 1));
                assert!(!topo.is_door(Shape::Cube, ring, door + 10));
            }
            assert!(!topo.is_door(Shape::Cube, 33, door));
        }
        assert!(topo.is_door(Shape::Cube, 40, 20 - 200));
        assert!(topo.is_door_at(Shape::Cylinder, 69.6, 41.7));
        assert!(!topo.is_door_at(Shape::Cylinder, 69.4, 41.7));
    }

    #[test]
    fn available_rows_follow_doors() {
        let topo = build(&SynthOptions::default()).unwrap().unwrap();
        let cyl = topo.cylinder().exterior();
        assert_eq!(cyl.available(10), 32);
        assert_eq!(cyl.available(9), 43);
        assert_eq!(cyl.available(130), 32);
    }
}
