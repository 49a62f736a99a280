pub mod ask;
pub mod discover;
pub mod version;
pub mod workflow;
