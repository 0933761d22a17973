//! Collaborator seams consumed by the collision checker.
//!
//! Every provider hands out an owned or reference-counted snapshot. A snapshot
//! stays valid and unchanged for the whole scoring pass, even while a newer one is
//! being published.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tracing::warn;

use crate::grid::Costmap;
use crate::types::{Footprint, Pose2, PoseLookupError, ProviderError};

/// Source of costmap snapshots.
pub trait CostmapProvider: Send + Sync {
    fn current_costmap(&self) -> Result<Arc<Costmap>, ProviderError>;
}

/// Source of the robot footprint, already placed at the current robot pose.
pub trait FootprintProvider: Send + Sync {
    fn current_footprint(&self) -> Option<Footprint>;
}

/// Resolves the robot pose in the global frame.
pub trait PoseProvider: Send + Sync {
    fn current_global_pose(&self) -> Result<Pose2, PoseLookupError>;
}

impl<P: CostmapProvider + ?Sized> CostmapProvider for Arc<P> {
    fn current_costmap(&self) -> Result<Arc<Costmap>, ProviderError> {
        (**self).current_costmap()
    }
}

impl<P: FootprintProvider + ?Sized> FootprintProvider for Arc<P> {
    fn current_footprint(&self) -> Option<Footprint> {
        (**self).current_footprint()
    }
}

impl<P: PoseProvider + ?Sized> PoseProvider for Arc<P> {
    fn current_global_pose(&self) -> Result<Pose2, PoseLookupError> {
        (**self).current_global_pose()
    }
}

/// Costmap that never changes, e.g. one loaded from a map file.
#[derive(Debug, Clone)]
pub struct StaticCostmap(Arc<Costmap>);

impl StaticCostmap {
    pub fn new(costmap: Costmap) -> Self {
        Self(Arc::new(costmap))
    }
}

impl From<Costmap> for StaticCostmap {
    fn from(costmap: Costmap) -> Self {
        Self::new(costmap)
    }
}

impl CostmapProvider for StaticCostmap {
    fn current_costmap(&self) -> Result<Arc<Costmap>, ProviderError> {
        Ok(Arc::clone(&self.0))
    }
}

/// Holds the most recently published costmap.
#[derive(Debug, Default)]
pub struct LatestCostmap {
    latest: RwLock<Option<Arc<Costmap>>>,
}

impl LatestCostmap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current snapshot. Callers holding the old one keep it.
    pub fn publish(&self, costmap: Costmap) {
        *self.latest.write() = Some(Arc::new(costmap));
    }

    pub fn clear(&self) {
        *self.latest.write() = None;
    }
}

impl CostmapProvider for LatestCostmap {
    fn current_costmap(&self) -> Result<Arc<Costmap>, ProviderError> {
        self.latest.read().clone().ok_or(ProviderError::NotReceived)
    }
}

/// Holds the most recently published oriented footprint.
#[derive(Debug, Default)]
pub struct LatestFootprint {
    latest: RwLock<Option<Footprint>>,
}

impl LatestFootprint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_footprint(footprint: Footprint) -> Self {
        Self {
            latest: RwLock::new(Some(footprint)),
        }
    }

    pub fn publish(&self, footprint: Footprint) {
        *self.latest.write() = Some(footprint);
    }

    pub fn clear(&self) {
        *self.latest.write() = None;
    }
}

impl FootprintProvider for LatestFootprint {
    fn current_footprint(&self) -> Option<Footprint> {
        self.latest.read().clone()
    }
}

/// Pose that never changes. Handy for simulation and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticPose(pub Pose2);

impl PoseProvider for StaticPose {
    fn current_global_pose(&self) -> Result<Pose2, PoseLookupError> {
        Ok(self.0)
    }
}

/// Robot pose expressed as a transform from `parent_frame` to `child_frame`.
#[derive(Debug, Clone, PartialEq)]
pub struct StampedTransform {
    pub parent_frame: String,
    pub child_frame: String,
    pub stamp: Instant,
    pub pose: Pose2,
}

/// Latest `global_frame -> robot_base_frame` transform with a staleness check.
#[derive(Debug)]
pub struct PoseBuffer {
    global_frame: String,
    robot_base_frame: String,
    tolerance: Duration,
    latest: RwLock<Option<StampedTransform>>,
}

impl PoseBuffer {
    pub fn new(
        global_frame: impl Into<String>,
        robot_base_frame: impl Into<String>,
        tolerance: Duration,
    ) -> Self {
        Self {
            global_frame: global_frame.into(),
            robot_base_frame: robot_base_frame.into(),
            tolerance,
            latest: RwLock::new(None),
        }
    }

    pub fn set_transform(&self, transform: StampedTransform) {
        *self.latest.write() = Some(transform);
    }

    /// Resolve the robot pose as of `now`.
    pub fn lookup_at(&self, now: Instant) -> Result<Pose2, PoseLookupError> {
        let guard = self.latest.read();
        let Some(transform) = guard.as_ref() else {
            return Err(PoseLookupError::Lookup(format!(
                "\"{}\" passed to lookup does not exist",
                self.robot_base_frame
            )));
        };

        if transform.child_frame != self.robot_base_frame {
            return Err(PoseLookupError::Lookup(format!(
                "\"{}\" passed to lookup does not exist",
                self.robot_base_frame
            )));
        }

        if transform.parent_frame != self.global_frame {
            return Err(PoseLookupError::Connectivity(format!(
                "could not find a connection between \"{}\" and \"{}\"",
                self.global_frame, self.robot_base_frame
            )));
        }

        let age = now.saturating_duration_since(transform.stamp);
        if age > self.tolerance {
            warn!(
                age_s = age.as_secs_f64(),
                tolerance_s = self.tolerance.as_secs_f64(),
                "robot pose transform is stale"
            );
            return Err(PoseLookupError::Extrapolation(format!(
                "transform is {:.3}s old, tolerance is {:.3}s",
                age.as_secs_f64(),
                self.tolerance.as_secs_f64()
            )));
        }

        Ok(transform.pose)
    }
}

impl PoseProvider for PoseBuffer {
    fn current_global_pose(&self) -> Result<Pose2, PoseLookupError> {
        self.lookup_at(Instant::now())
    }
}
