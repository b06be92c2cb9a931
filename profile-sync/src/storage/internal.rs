pub mod follower;
pub mod profile;
pub mod story;
