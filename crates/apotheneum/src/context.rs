//! Render-loop ownership of the current topology.
//!
//! The render loop owns one [`TopologyContext`] and hands it to every effect.
//! Fixture reloads may arrive from another thread: a rebuild constructs the
//! new topology without holding the read lock and then swaps it in with a
//! single write, so a frame in flight keeps whichever `Arc<Topology>` it
//! started with. Rebuilds are serialised by a separate mutex and never
//! interleave.

use std::sync::Arc;

use log::{debug, error};
use parking_lot::{Mutex, RwLock};

use crate::error::BuildError;
use crate::fixture::FixtureModel;
use crate::geometry::Geometry;
use crate::topology::Topology;
use crate::transfer::{Color, BLACK};

pub struct TopologyContext {
    geometry: Geometry,
    current: RwLock<Option<Arc<Topology>>>,
    rebuild_lock: Mutex<()>,
}

impl Default for TopologyContext {
    fn default() -> Self {
        Self::new(Geometry::default())
    }
}

impl TopologyContext {
    /// Empty context: no topology until the first successful rebuild.
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            current: RwLock::new(None),
            rebuild_lock: Mutex::new(()),
        }
    }

    #[inline]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Rebuild from a newly loaded fixture model.
    ///
    /// `Ok(true)` when an installation was found and swapped in, `Ok(false)`
    /// when the model has none. On error the previous topology is discarded,
    /// since it may no longer match the physical install.
    pub fn rebuild(&self, model: &dyn FixtureModel, point_count: usize) -> Result<bool, BuildError> {
        let _guard = self.rebuild_lock.lock();
        debug!("Rebuilding topology for {point_count} points");

        match Topology::build(&self.geometry, model, point_count) {
            Ok(built) => {
                let present = built.is_some();
                *self.current.write() = built.map(Arc::new);
                Ok(present)
            }
            Err(err) => {
                *self.current.write() = None;
                error!("Error building Apotheneum topology: {err}");
                Err(err)
            }
        }
    }

    /// [`rebuild`](Self::rebuild), forwarding a failure to the host's error
    /// surface as one human-readable message.
    pub fn rebuild_reporting(
        &self,
        model: &dyn FixtureModel,
        point_count: usize,
        report: impl FnOnce(String),
    ) -> bool {
        match self.rebuild(model, point_count) {
            Ok(present) => present,
            Err(err) => {
                report(err.report_message());
                false
            }
        }
    }

    /// Drop the current topology, e.g. when the fixture model is unloaded.
    pub fn clear(&self) {
        let _guard = self.rebuild_lock.lock();
        *self.current.write() = None;
    }

    /// The topology a frame should render against, if any. Take it once per
    /// frame and use it throughout.
    #[inline]
    pub fn snapshot(&self) -> Option<Arc<Topology>> {
        self.current.read().clone()
    }

    #[inline]
    pub fn is_present(&self) -> bool {
        self.current.read().is_some()
    }

    /// The current topology. Calling this without checking
    /// [`is_present`](Self::is_present) first is a caller bug.
    #[track_caller]
    pub fn topology(&self) -> Arc<Topology> {
        match self.snapshot() {
            Some(topology) => topology,
            None => panic!("Apotheneum topology not present"),
        }
    }

    /// Run one frame. Without a topology the buffer is blanked instead, so a
    /// missing installation renders as black rather than failing.
    pub fn render<F>(&self, buffer: &mut [Color], frame: F)
    where
        F: FnOnce(&Topology, &mut [Color]),
    {
        match self.snapshot() {
            Some(topology) => {
                debug_assert!(
                    buffer.len() >= topology.point_count(),
                    "color buffer smaller than the fixture model"
                );
                frame(&topology, buffer)
            }
            None => buffer.fill(BLACK),
        }
    }
}
