pub mod line;

pub use line::{GridLineIterator, LineValueIterator};
