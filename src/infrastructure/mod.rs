pub mod feeds;
pub mod fs;
