//! Structured reports for failures caught by the checker.

use glam::IVec2;
use tracing::error;

use crate::types::{CollisionError, IllegalTrajectoryKind, PlannerFailure};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    PoseOffGrid,
    FootprintOffGrid,
    HitsObstacle,
    HitsUnknown,
    CostmapUnavailable,
    FootprintUnavailable,
    PoseUnavailable,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PoseOffGrid => "pose_off_grid",
            Self::FootprintOffGrid => "footprint_off_grid",
            Self::HitsObstacle => "hits_obstacle",
            Self::HitsUnknown => "hits_unknown",
            Self::CostmapUnavailable => "costmap_unavailable",
            Self::FootprintUnavailable => "footprint_unavailable",
            Self::PoseUnavailable => "pose_unavailable",
        }
    }

    /// True for failures that say something about the pose itself rather than
    /// about missing upstream data.
    pub fn is_illegal_trajectory(&self) -> bool {
        matches!(
            self,
            Self::PoseOffGrid | Self::FootprintOffGrid | Self::HitsObstacle | Self::HitsUnknown
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FailureReport {
    pub checker: String,
    pub kind: FailureKind,
    /// Map cell involved, if any. May be outside the grid for off-grid failures.
    pub cell: Option<IVec2>,
    pub message: String,
}

impl FailureReport {
    /// Build a report for a recoverable error. Returns `None` for defects.
    pub fn from_error(err: &CollisionError) -> Option<Self> {
        match err {
            CollisionError::IllegalTrajectory {
                checker,
                reason,
                cell,
            } => {
                let kind = match reason {
                    IllegalTrajectoryKind::PoseOffGrid => FailureKind::PoseOffGrid,
                    IllegalTrajectoryKind::FootprintOffGrid => FailureKind::FootprintOffGrid,
                    IllegalTrajectoryKind::HitsObstacle => FailureKind::HitsObstacle,
                    IllegalTrajectoryKind::HitsUnknown => FailureKind::HitsUnknown,
                };
                Some(Self {
                    checker: checker.clone(),
                    kind,
                    cell: *cell,
                    message: reason.to_string(),
                })
            }
            CollisionError::Planner { checker, reason } => {
                let kind = match reason {
                    PlannerFailure::CostmapUnavailable(_) => FailureKind::CostmapUnavailable,
                    PlannerFailure::FootprintUnavailable => FailureKind::FootprintUnavailable,
                    PlannerFailure::PoseUnavailable(_) => FailureKind::PoseUnavailable,
                };
                Some(Self {
                    checker: checker.clone(),
                    kind,
                    cell: None,
                    message: reason.to_string(),
                })
            }
            CollisionError::InvalidFootprint { .. } => None,
        }
    }
}

/// Receives reports for failures that `is_collision_free` swallows.
pub trait FailureSink: Send + Sync {
    fn report(&self, report: &FailureReport);
}

/// Emits reports through `tracing` at error level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl FailureSink for TracingSink {
    fn report(&self, report: &FailureReport) {
        let cell = report.cell.map(|c| (c.x, c.y));
        error!(
            checker = %report.checker,
            kind = report.kind.as_str(),
            cell = ?cell,
            "{}",
            report.message
        );
    }
}

/// Discards every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl FailureSink for NullSink {
    fn report(&self, _report: &FailureReport) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PoseLookupError;

    #[test]
    fn obstacle_report_keeps_cell_and_message() {
        let err = CollisionError::IllegalTrajectory {
            checker: "collision_checker".to_string(),
            reason: IllegalTrajectoryKind::HitsObstacle,
            cell: Some(IVec2::new(5, 5)),
        };
        let report = FailureReport::from_error(&err).unwrap();
        assert_eq!(report.kind, FailureKind::HitsObstacle);
        assert_eq!(report.cell, Some(IVec2::new(5, 5)));
        assert_eq!(report.message, "Trajectory Hits Obstacle.");
        assert!(report.kind.is_illegal_trajectory());
    }

    #[test]
    fn planner_report_is_distinct_from_illegal_trajectory() {
        let err = CollisionError::Planner {
            checker: "collision_checker".to_string(),
            reason: PlannerFailure::PoseUnavailable(PoseLookupError::Extrapolation(
                "stale".to_string(),
            )),
        };
        let report = FailureReport::from_error(&err).unwrap();
        assert_eq!(report.kind, FailureKind::PoseUnavailable);
        assert!(!report.kind.is_illegal_trajectory());
        assert!(report.message.starts_with("Robot pose unavailable."));
    }

    #[test]
    fn defects_are_not_reported() {
        let err = CollisionError::InvalidFootprint { vertices: 1 };
        assert!(FailureReport::from_error(&err).is_none());
    }
}
