pub mod constants;
pub mod error;
pub mod geometry;
pub mod info;

pub use constants::*;
pub use error::{
    CollisionError, IllegalTrajectoryKind, MapError, PlannerFailure, PoseLookupError,
    ProviderError,
};
pub use geometry::{Footprint, Pose2};
pub use info::MapInfo;
