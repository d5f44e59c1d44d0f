//! Fixture model: the tree of named point groups produced by the fixture loader.
//!
//! The topology only needs two operations from a fixture: find descendant
//! groups by tag, and enumerate a group's children. [`FixtureModel`] captures
//! that; [`FixtureNode`] is an owned tree implementing it, serializable as JSON:
//!
//! ```json
//! { "tags": ["Apotheneum"], "children": [
//!     { "tags": ["cubeFrontExterior"], "children": [
//!         { "points": [ { "index": 0, "position": [0.0, 4.4, 0.0] }, ... ] },
//!         ...
//! ] } ] }
//! ```

use std::fs::File;
use std::io::{self, BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Tags the topology looks for in a fixture model.
pub mod tags {
    /// Root group of the installation. Its absence means "no installation".
    pub const INSTALLATION: &str = "Apotheneum";
    /// Present anywhere in the model when the interior layer is installed.
    pub const INTERIOR: &str = "interior";

    pub const EXTERIOR_SUFFIX: &str = "Exterior";
    pub const INTERIOR_SUFFIX: &str = "Interior";

    pub const CUBE_FRONT: &str = "cubeFront";
    pub const CUBE_RIGHT: &str = "cubeRight";
    pub const CUBE_BACK: &str = "cubeBack";
    pub const CUBE_LEFT: &str = "cubeLeft";
    pub const CYLINDER: &str = "cylinder";
}

/// One addressable pixel: its slot in the global color buffer and where it is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub index: usize,
    pub position: Vec3,
}

impl Point {
    #[inline]
    pub fn new(index: usize, position: Vec3) -> Self {
        Self { index, position }
    }
}

/// Read-only view of a loaded fixture tree.
pub trait FixtureModel {
    fn tags(&self) -> &[String];

    /// Points declared directly on this node.
    fn points(&self) -> &[Point];

    fn children(&self) -> Vec<&dyn FixtureModel>;

    /// All descendants carrying `tag`, depth-first in declaration order. A
    /// matching node is returned without searching beneath it.
    fn sub(&self, tag: &str) -> Vec<&dyn FixtureModel> {
        let mut found = Vec::new();
        for child in self.children() {
            collect_tagged(child, tag, &mut found);
        }
        found
    }

    fn has_sub(&self, tag: &str) -> bool {
        !self.sub(tag).is_empty()
    }

    fn has_tag(&self, tag: &str) -> bool {
        self.tags().iter().any(|t| t == tag)
    }
}

fn collect_tagged<'a>(node: &'a dyn FixtureModel, tag: &str, found: &mut Vec<&'a dyn FixtureModel>) {
    if node.has_tag(tag) {
        found.push(node);
        return;
    }
    for child in node.children() {
        collect_tagged(child, tag, found);
    }
}

/// Owned fixture tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixtureNode {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub points: Vec<Point>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<FixtureNode>,
}

impl FixtureNode {
    pub fn group<T: Into<String>>(tags: impl IntoIterator<Item = T>, children: Vec<FixtureNode>) -> Self {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
            points: Vec::new(),
            children,
        }
    }

    pub fn leaf<T: Into<String>>(tags: impl IntoIterator<Item = T>, points: Vec<Point>) -> Self {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
            points,
            children: Vec::new(),
        }
    }

    /// Size of the color buffer this model needs: one past the highest index.
    pub fn point_count(&self) -> usize {
        let own = self.points.iter().map(|p| p.index + 1).max().unwrap_or(0);
        self.children
            .iter()
            .map(FixtureNode::point_count)
            .fold(own, usize::max)
    }

    /// Find the first node with `tag` anywhere in the tree, itself included.
    pub fn find_mut(&mut self, tag: &str) -> Option<&mut FixtureNode> {
        if self.tags.iter().any(|t| t == tag) {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_mut(tag))
    }

    /// Remove every descendant carrying `tag`. Returns how many were removed.
    pub fn remove_tagged(&mut self, tag: &str) -> usize {
        let before = self.children.len();
        self.children.retain(|c| !c.tags.iter().any(|t| t == tag));
        let removed = before - self.children.len();
        removed
            + self
                .children
                .iter_mut()
                .map(|c| c.remove_tagged(tag))
                .sum::<usize>()
    }

    /// Shift every point position by `offset`.
    pub fn translate(&mut self, offset: Vec3) {
        for p in &mut self.points {
            p.position += offset;
        }
        for child in &mut self.children {
            child.translate(offset);
        }
    }

    pub fn from_json_str(s: &str) -> io::Result<Self> {
        serde_json::from_str(s).map_err(|e| bad(&format!("invalid fixture JSON: {e}")))
    }

    pub fn read_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        serde_json::from_reader(reader).map_err(|e| bad(&format!("invalid fixture JSON: {e}")))
    }

    pub fn write_file<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut writer, self).map_err(|e| bad(&e.to_string()))?;
        writer.flush()
    }
}

impl FixtureModel for FixtureNode {
    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn points(&self) -> &[Point] {
        &self.points
    }

    fn children(&self) -> Vec<&dyn FixtureModel> {
        self.children.iter().map(|c| c as &dyn FixtureModel).collect()
    }
}

#[cold]
fn bad(msg: &str) -> io::Error {
    io::Error::new(ErrorKind::InvalidData, msg)
}
