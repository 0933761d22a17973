pub mod grid2d;

pub use grid2d::Grid2d;

/// Costmap with `COST_*` values per cell.
pub type Costmap = Grid2d<u8>;
