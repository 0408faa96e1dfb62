pub mod maintenance;
pub mod pacing;
pub mod refresh;
