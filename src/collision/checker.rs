//! Footprint collision checking against a costmap.
//!
//! The checker takes the robot footprint as currently published (already placed
//! at the robot pose), removes the robot pose from it, places the result at the
//! candidate pose and walks every boundary edge through the costmap. The score is
//! the worst cost seen on the boundary.
//!
//! # Boundary-only scoring
//!
//! Only the polygon boundary is rasterized, never the interior. For convex or
//! star-shaped footprints this is enough once the whole boundary is clear. A concave
//! footprint can enclose an obstacle without its boundary touching it, and that
//! obstacle will not be seen.

use std::sync::Arc;

use glam::{IVec2, UVec2, Vec2};
use tracing::debug;

use super::providers::{CostmapProvider, FootprintProvider, PoseProvider};
use super::report::{FailureReport, FailureSink, TracingSink};
use crate::config::CheckerConfig;
use crate::grid::Costmap;
use crate::iterators::GridLineIterator;
use crate::types::{
    COST_LETHAL, COST_UNKNOWN, CollisionError, Footprint, IllegalTrajectoryKind, PlannerFailure,
    Pose2,
};

/// Cell that stopped a boundary walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockedCell {
    pub cell: IVec2,
    pub reason: IllegalTrajectoryKind,
}

/// Cost of a single cell. Lethal and unknown cells are never a number.
pub fn point_cost(costmap: &Costmap, cell: IVec2) -> Result<u8, BlockedCell> {
    let cost = (cell.x >= 0 && cell.y >= 0)
        .then(|| costmap.get(cell.as_uvec2()).copied())
        .flatten();
    let Some(cost) = cost else {
        debug!(x = cell.x, y = cell.y, "rasterized cell outside the costmap");
        return Err(BlockedCell {
            cell,
            reason: IllegalTrajectoryKind::FootprintOffGrid,
        });
    };
    graded_cost(cell, cost)
}

fn graded_cost(cell: IVec2, cost: u8) -> Result<u8, BlockedCell> {
    match cost {
        COST_LETHAL => {
            debug!(x = cell.x, y = cell.y, "Map Cell: lethal");
            Err(BlockedCell {
                cell,
                reason: IllegalTrajectoryKind::HitsObstacle,
            })
        }
        COST_UNKNOWN => {
            debug!(x = cell.x, y = cell.y, "Map Cell: unknown");
            Err(BlockedCell {
                cell,
                reason: IllegalTrajectoryKind::HitsUnknown,
            })
        }
        cost => Ok(cost),
    }
}

/// Worst cost on the rasterized line between two cells, both included.
///
/// Both cells must lie on the grid. Every rasterized cell then does too.
pub fn line_cost(costmap: &Costmap, start: UVec2, end: UVec2) -> Result<u8, BlockedCell> {
    for endpoint in [start, end] {
        if costmap.get(endpoint).is_none() {
            let cell = endpoint.as_ivec2();
            debug!(x = cell.x, y = cell.y, "line endpoint outside the costmap");
            return Err(BlockedCell {
                cell,
                reason: IllegalTrajectoryKind::FootprintOffGrid,
            });
        }
    }

    let mut worst = 0;
    for (cell, &cost) in costmap.line_value(start, end) {
        worst = worst.max(graded_cost(cell.as_ivec2(), cost)?);
    }
    Ok(worst)
}

/// Worst cost along the boundary of a footprint given in world coordinates.
///
/// Edges are walked in order, closing edge last. Both endpoints of an edge must
/// map onto the grid before it is rasterized.
pub fn footprint_cost(costmap: &Costmap, footprint: &Footprint) -> Result<f32, BlockedCell> {
    let mut worst = 0u8;
    for (a, b) in footprint.edges() {
        let start = vertex_cell(costmap, a)?;
        let end = vertex_cell(costmap, b)?;
        worst = worst.max(line_cost(costmap, start, end)?);
    }
    Ok(worst as f32)
}

fn vertex_cell(costmap: &Costmap, vertex: Vec2) -> Result<UVec2, BlockedCell> {
    costmap.world_to_cell(&vertex).ok_or_else(|| {
        let cell = costmap.world_to_cell_unbounded(&vertex);
        debug!(x = cell.x, y = cell.y, "footprint vertex off grid");
        BlockedCell {
            cell,
            reason: IllegalTrajectoryKind::FootprintOffGrid,
        }
    })
}

/// Scores candidate poses by the worst costmap cell under the footprint boundary.
pub struct CollisionChecker {
    config: CheckerConfig,
    costmaps: Box<dyn CostmapProvider>,
    footprints: Box<dyn FootprintProvider>,
    poses: Box<dyn PoseProvider>,
    sink: Box<dyn FailureSink>,
}

impl CollisionChecker {
    pub fn new(
        config: CheckerConfig,
        costmaps: impl CostmapProvider + 'static,
        footprints: impl FootprintProvider + 'static,
        poses: impl PoseProvider + 'static,
    ) -> Self {
        Self {
            config,
            costmaps: Box::new(costmaps),
            footprints: Box::new(footprints),
            poses: Box::new(poses),
            sink: Box::new(TracingSink),
        }
    }

    /// Replace the sink that receives failures swallowed by [`Self::is_collision_free`].
    pub fn with_sink(mut self, sink: impl FailureSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    /// True when the footprint at `pose` touches neither obstacles nor unknown space.
    ///
    /// Illegal-trajectory and planner failures are reported to the sink and turn
    /// into `Ok(false)`. Anything else is a configuration defect and is returned.
    pub fn is_collision_free(&self, pose: Pose2) -> Result<bool, CollisionError> {
        match self.score_pose(pose) {
            Ok(score) => Ok(score >= 0.0),
            Err(err) => match FailureReport::from_error(&err) {
                Some(report) => {
                    self.sink.report(&report);
                    Ok(false)
                }
                None => Err(err),
            },
        }
    }

    /// Worst boundary cost of the robot footprint placed at `pose`.
    pub fn score_pose(&self, pose: Pose2) -> Result<f32, CollisionError> {
        let costmap = self.current_costmap()?;
        check_pose_on_grid(self.name(), &costmap, pose)?;
        let canonical = self.canonical_footprint()?;

        let pass = ScoringPass {
            checker: self.name(),
            costmap,
            canonical,
        };
        pass.score_footprint_at(pose)
    }

    /// Worst score over all poses of a trajectory. The first failing pose aborts.
    ///
    /// All poses are scored against one snapshot of the costmap, footprint and robot
    /// pose. An empty trajectory scores 0.
    pub fn score_trajectory<I>(&self, poses: I) -> Result<f32, CollisionError>
    where
        I: IntoIterator<Item = Pose2>,
    {
        let pass = self.prepare()?;
        poses
            .into_iter()
            .try_fold(0.0f32, |worst, pose| Ok(worst.max(pass.score_pose(pose)?)))
    }

    /// Fetch the costmap, footprint and robot pose once for scoring many poses.
    pub fn prepare(&self) -> Result<ScoringPass<'_>, CollisionError> {
        let costmap = self.current_costmap()?;
        let canonical = self.canonical_footprint()?;
        Ok(ScoringPass {
            checker: self.name(),
            costmap,
            canonical,
        })
    }

    fn current_costmap(&self) -> Result<Arc<Costmap>, CollisionError> {
        self.costmaps
            .current_costmap()
            .map_err(|err| CollisionError::Planner {
                checker: self.config.name.clone(),
                reason: PlannerFailure::CostmapUnavailable(err.to_string()),
            })
    }

    /// Current footprint with the current robot pose removed.
    fn canonical_footprint(&self) -> Result<Footprint, CollisionError> {
        let footprint =
            self.footprints
                .current_footprint()
                .ok_or_else(|| CollisionError::Planner {
                    checker: self.config.name.clone(),
                    reason: PlannerFailure::FootprintUnavailable,
                })?;
        if !footprint.is_valid() {
            return Err(CollisionError::InvalidFootprint {
                vertices: footprint.len(),
            });
        }

        let robot_pose =
            self.poses
                .current_global_pose()
                .map_err(|err| CollisionError::Planner {
                    checker: self.config.name.clone(),
                    reason: PlannerFailure::PoseUnavailable(err),
                })?;

        Ok(footprint.deorient(robot_pose))
    }
}

/// Snapshot of everything needed to score poses without further lookups.
#[derive(Debug, Clone)]
pub struct ScoringPass<'a> {
    checker: &'a str,
    costmap: Arc<Costmap>,
    canonical: Footprint,
}

impl ScoringPass<'_> {
    pub fn costmap(&self) -> &Costmap {
        &self.costmap
    }

    /// Footprint relative to (0, 0, 0).
    pub fn canonical_footprint(&self) -> &Footprint {
        &self.canonical
    }

    pub fn score_pose(&self, pose: Pose2) -> Result<f32, CollisionError> {
        check_pose_on_grid(self.checker, &self.costmap, pose)?;
        self.score_footprint_at(pose)
    }

    fn score_footprint_at(&self, pose: Pose2) -> Result<f32, CollisionError> {
        let oriented = self.canonical.project(pose);
        footprint_cost(&self.costmap, &oriented).map_err(|blocked| {
            CollisionError::IllegalTrajectory {
                checker: self.checker.to_string(),
                reason: blocked.reason,
                cell: Some(blocked.cell),
            }
        })
    }
}

fn check_pose_on_grid(checker: &str, costmap: &Costmap, pose: Pose2) -> Result<(), CollisionError> {
    if costmap.world_to_cell(&pose.position).is_some() {
        return Ok(());
    }
    let cell = costmap.world_to_cell_unbounded(&pose.position);
    debug!(checker, x = cell.x, y = cell.y, "pose off grid");
    Err(CollisionError::IllegalTrajectory {
        checker: checker.to_string(),
        reason: IllegalTrajectoryKind::PoseOffGrid,
        cell: Some(cell),
    })
}
