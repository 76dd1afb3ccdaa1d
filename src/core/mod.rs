// Core algorithm exports
pub mod distance;
pub mod ranker;
pub mod scoring;

pub use distance::{distance_between, haversine_distance, Coordinates};
pub use ranker::{rank, Ranker};
pub use scoring::calculate_compatibility;
