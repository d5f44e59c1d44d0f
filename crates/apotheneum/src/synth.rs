//! Synthetic installation fixtures.
//!
//! Produces a complete fixture tree matching a [`Geometry`], with the same
//! group tags the real fixture files use and one contiguous index run per
//! surface, laid out in this order:
//!
//!   cube exterior (front, right, back, left) | cube interior | cylinder exterior | cylinder interior
//!
//! Points are placed on a unit pitch: the cube is centred on `origin`, faces
//! one unit apart, the cylinder inside it. Row 0 is the top of each column.

use std::f32::consts::TAU;

use glam::Vec3;

use crate::fixture::{tags, FixtureNode, Point};
use crate::geometry::Geometry;
use crate::topology::{FaceId, Side};

/// Distance between the exterior and interior layers.
const LAYER_GAP: f32 = 0.5;

/// Which parts of the installation to generate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthOptions {
    pub cube: bool,
    pub cylinder: bool,
    pub interior: bool,
    pub origin: Vec3,
}

impl Default for SynthOptions {
    fn default() -> Self {
        Self {
            cube: true,
            cylinder: true,
            interior: true,
            origin: Vec3::ZERO,
        }
    }
}

/// Hands out consecutive global indices.
struct Allocator {
    next: usize,
}

impl Allocator {
    fn column(&mut self, tag: Option<&str>, positions: impl Iterator<Item = Vec3>) -> FixtureNode {
        let points = positions
            .map(|position| {
                let p = Point::new(self.next, position);
                self.next += 1;
                p
            })
            .collect();
        FixtureNode::leaf(tag, points)
    }
}

/// Generate a fixture tree. The returned root is untagged; the installation
/// group sits beneath it the way the fixture loader nests it.
pub fn installation(geometry: &Geometry, options: &SynthOptions) -> FixtureNode {
    let mut alloc = Allocator { next: 0 };

    let mut exterior_groups = Vec::new();
    let mut interior_groups = Vec::new();

    if options.cube {
        let faces = cube_faces(&mut alloc, geometry, options.origin, Side::Exterior);
        exterior_groups.push(FixtureNode::group(["cube"], faces));
        if options.interior {
            interior_groups.extend(cube_faces(&mut alloc, geometry, options.origin, Side::Interior));
        }
    }

    if options.cylinder {
        let columns = cylinder_columns(&mut alloc, geometry, options.origin, Side::Exterior);
        exterior_groups.push(FixtureNode::group(["cylinder"], columns));
        if options.interior {
            interior_groups.extend(cylinder_columns(&mut alloc, geometry, options.origin, Side::Interior));
        }
    }

    if options.interior {
        exterior_groups.push(FixtureNode::group([tags::INTERIOR], interior_groups));
    }

    FixtureNode::group(
        Vec::<String>::new(),
        vec![FixtureNode::group([tags::INSTALLATION], exterior_groups)],
    )
}

fn cube_faces(alloc: &mut Allocator, geometry: &Geometry, origin: Vec3, side: Side) -> Vec<FixtureNode> {
    let width = geometry.face_width;
    let height = geometry.cube_height;
    let half = width as f32 * 0.5
        - match side {
            Side::Exterior => 0.0,
            Side::Interior => LAYER_GAP,
        };

    FaceId::ALL
        .into_iter()
        .map(|id| {
            // Corner where the face starts and the direction its columns run,
            // walking clockwise seen from above.
            let (start, along) = match id {
                FaceId::Front => (Vec3::new(-half, 0.0, half), Vec3::X),
                FaceId::Right => (Vec3::new(half, 0.0, half), Vec3::NEG_Z),
                FaceId::Back => (Vec3::new(half, 0.0, -half), Vec3::NEG_X),
                FaceId::Left => (Vec3::new(-half, 0.0, -half), Vec3::Z),
            };
            let pitch = 2.0 * half / width as f32;
            let columns = (0..width)
                .map(|x| {
                    let base = origin + start + along * (pitch * (x as f32 + 0.5));
                    alloc.column(None, column_positions(base, height))
                })
                .collect();
            FixtureNode::group([id.tag(side)], columns)
        })
        .collect()
}

fn cylinder_columns(alloc: &mut Allocator, geometry: &Geometry, origin: Vec3, side: Side) -> Vec<FixtureNode> {
    let count = geometry.cylinder_columns;
    let radius = count as f32 / TAU
        - match side {
            Side::Exterior => 0.0,
            Side::Interior => LAYER_GAP,
        };
    let tag = format!("{}{}", tags::CYLINDER, side.tag_suffix());

    (0..count)
        .map(|x| {
            let theta = TAU * x as f32 / count as f32;
            let base = origin + Vec3::new(radius * theta.sin(), 0.0, radius * theta.cos());
            alloc.column(Some(&tag), column_positions(base, geometry.cylinder_height))
        })
        .collect()
}

fn column_positions(base: Vec3, height: usize) -> impl Iterator<Item = Vec3> {
    (0..height).map(move |y| base + Vec3::Y * (height - 1 - y) as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::FixtureModel;

    #[test]
    fn indices_are_dense_and_ordered() {
        let g = Geometry::default();
        let model = installation(&g, &SynthOptions::default());
        let cube = 4 * g.face_width * g.cube_height;
        let cyl = g.cylinder_columns * g.cylinder_height;
        assert_eq!(model.point_count(), 2 * cube + 2 * cyl);

        let front = model.sub("cubeFrontInterior");
        assert_eq!(front[0].children()[0].points()[0].index, cube);
        let cyl_ext = model.sub("cylinderExterior");
        assert_eq!(cyl_ext.len(), g.cylinder_columns);
        assert_eq!(cyl_ext[0].points()[0].index, 2 * cube);
    }

    #[test]
    fn omits_requested_parts() {
        let g = Geometry::default();
        let model = installation(
            &g,
            &SynthOptions {
                cube: false,
                interior: false,
                ..SynthOptions::default()
            },
        );
        assert!(model.has_sub(tags::INSTALLATION));
        assert!(!model.has_sub("cubeFrontExterior"));
        assert!(!model.has_sub(tags::INTERIOR));
        assert_eq!(model.point_count(), g.cylinder_columns * g.cylinder_height);
    }

    #[test]
    fn rows_descend_from_the_top() {
        let g = Geometry::default();
        let model = installation(&g, &SynthOptions::default());
        let columns = model.sub("cylinderExterior");
        let col = columns[0].points();
        assert!(col[0].position.y > col[g.cylinder_height - 1].position.y);
        assert_eq!(col[g.cylinder_height - 1].position.y, 0.0);
    }
}
