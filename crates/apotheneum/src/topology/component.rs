use super::face::{Face, FaceId};
use super::orientation::{Orientation, Side};
use crate::error::BuildError;
use crate::fixture::FixtureModel;
use crate::geometry::{Geometry, Shape};

/// A shape of the installation: its exterior layer and, when installed, its
/// interior layer. Both layers are validated against the same geometry, so
/// they always have identical dimensions.
#[derive(Debug, Clone)]
pub struct Component {
    shape: Shape,
    exterior: Orientation,
    interior: Option<Orientation>,
}

impl Component {
    pub(crate) fn build(
        model: &dyn FixtureModel,
        shape: Shape,
        geometry: &Geometry,
        has_interior: bool,
        point_count: usize,
    ) -> Result<Self, BuildError> {
        let build = |side| match shape {
            Shape::Cube => Orientation::cube(model, side, geometry, point_count),
            Shape::Cylinder => Orientation::cylinder(model, side, geometry, point_count),
        };

        let exterior = build(Side::Exterior)?;
        let interior = if has_interior {
            Some(build(Side::Interior)?)
        } else {
            None
        };

        Ok(Self {
            shape,
            exterior,
            interior,
        })
    }

    #[inline]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    #[inline]
    pub fn exterior(&self) -> &Orientation {
        &self.exterior
    }

    #[inline]
    pub fn interior(&self) -> Option<&Orientation> {
        self.interior.as_ref()
    }

    #[inline]
    pub fn orientation(&self, side: Side) -> Option<&Orientation> {
        match side {
            Side::Exterior => Some(&self.exterior),
            Side::Interior => self.interior.as_ref(),
        }
    }

    /// Exterior, then interior if present.
    pub fn orientations(&self) -> impl Iterator<Item = &Orientation> + '_ {
        std::iter::once(&self.exterior).chain(self.interior.as_ref())
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.exterior.width()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.exterior.height()
    }

    /// Every cube face, exterior first. Empty for the cylinder.
    pub fn faces(&self) -> impl Iterator<Item = &Face> + '_ {
        self.orientations().flat_map(Orientation::faces)
    }

    #[inline]
    pub fn face(&self, side: Side, id: FaceId) -> Option<&Face> {
        self.orientation(side)?.face(id)
    }
}
