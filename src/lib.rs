//! Footprint-based collision scoring against 2D costmaps.
//!
//! [`CollisionChecker`] places a robot footprint at a candidate pose, walks its
//! boundary through the costmap and reports the worst cost it touched, or why the
//! pose is not allowed.

pub mod collision;
pub mod config;
pub mod grid;
pub mod iterators;
pub mod loaders;
pub mod types;

pub use collision::{CollisionChecker, ScoringPass};
pub use config::CheckerConfig;
pub use grid::{Costmap, Grid2d};
pub use loaders::load_costmap;
pub use types::{CollisionError, Footprint, MapError, MapInfo, Pose2};
