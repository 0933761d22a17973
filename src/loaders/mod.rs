pub mod ros2;

pub use ros2::load_costmap;
