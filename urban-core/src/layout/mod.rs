pub mod plan;
pub mod sizing;
