//! Point to point routing on street graphs

pub mod astar;
mod distance;
mod resolver;
mod state;

pub use astar::{SearchOutcome, astar_path_length};
pub use distance::RouteCalculator;
pub use resolver::NodeResolver;
