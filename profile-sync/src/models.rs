pub mod color;
pub mod external_user;
pub mod follower;
pub mod profile;
pub mod story;

pub use color::{AvatarColor, FOLLOWER_PALETTE, STORY_PALETTE};
pub use external_user::ExternalUser;
pub use follower::Follower;
pub use profile::Profile;
pub use story::Story;
