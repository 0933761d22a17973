use glam::IVec2;
use thiserror::Error;

/// Errors raised while loading maps and configuration.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("invalid metadata: {0}")]
    InvalidMetadata(String),
    #[error("out of bounds: {0}")]
    OutOfBounds(String),
}

/// Why a pose was judged geometrically illegal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IllegalTrajectoryKind {
    /// The candidate pose itself is outside the costmap.
    PoseOffGrid,
    /// A footprint vertex lands outside the costmap.
    FootprintOffGrid,
    /// A boundary cell is lethal.
    HitsObstacle,
    /// A boundary cell has no information.
    HitsUnknown,
}

impl std::fmt::Display for IllegalTrajectoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            Self::PoseOffGrid => "Trajectory Goes Off Grid.",
            Self::FootprintOffGrid => "Footprint Goes Off Grid.",
            Self::HitsObstacle => "Trajectory Hits Obstacle.",
            Self::HitsUnknown => "Trajectory Hits Unknown Region.",
        };
        f.write_str(message)
    }
}

/// Upstream data the checker needed but could not get.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannerFailure {
    CostmapUnavailable(String),
    FootprintUnavailable,
    PoseUnavailable(PoseLookupError),
}

impl std::fmt::Display for PlannerFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CostmapUnavailable(reason) => write!(f, "Costmap not available: {reason}"),
            Self::FootprintUnavailable => f.write_str("Footprint not available."),
            Self::PoseUnavailable(err) => write!(f, "Robot pose unavailable. ({err})"),
        }
    }
}

/// Outcome of a failed scoring pass.
///
/// `IllegalTrajectory` is a fact about the pose; `Planner` means the pose could
/// not be evaluated. Both are recoverable. Anything else is a configuration
/// defect and must reach the caller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CollisionError {
    #[error("{checker}: {reason}")]
    IllegalTrajectory {
        checker: String,
        reason: IllegalTrajectoryKind,
        /// Map cell involved, when one is known. May lie outside the grid.
        cell: Option<IVec2>,
    },
    #[error("{checker}: {reason}")]
    Planner {
        checker: String,
        reason: PlannerFailure,
    },
    #[error("footprint needs at least 2 vertices, got {vertices}")]
    InvalidFootprint { vertices: usize },
}

impl CollisionError {
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::IllegalTrajectory { .. } | Self::Planner { .. })
    }

    pub fn cell(&self) -> Option<IVec2> {
        match self {
            Self::IllegalTrajectory { cell, .. } => *cell,
            _ => None,
        }
    }
}

/// Failure to hand out a costmap snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("no costmap has been received yet")]
    NotReceived,
    #[error("costmap unavailable: {0}")]
    Unavailable(String),
}

/// Failure to resolve the robot pose in the global frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoseLookupError {
    #[error("No Transform available Error looking up robot pose: {0}")]
    Lookup(String),
    #[error("Connectivity Error looking up robot pose: {0}")]
    Connectivity(String),
    #[error("Extrapolation Error looking up robot pose: {0}")]
    Extrapolation(String),
}
