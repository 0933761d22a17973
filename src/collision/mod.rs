pub mod checker;
pub mod providers;
pub mod report;

pub use checker::{
    BlockedCell, CollisionChecker, ScoringPass, footprint_cost, line_cost, point_cost,
};
pub use providers::{
    CostmapProvider, FootprintProvider, LatestCostmap, LatestFootprint, PoseBuffer, PoseProvider,
    StampedTransform, StaticCostmap, StaticPose,
};
pub use report::{FailureKind, FailureReport, FailureSink, NullSink, TracingSink};
