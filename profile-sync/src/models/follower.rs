use serde::{Deserialize, Serialize};

use super::AvatarColor;

/// Another account following the profile owner. `is_following_back` is a
/// local-only flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Follower {
    pub id: i64,
    pub name: String,
    pub username: String,
    #[serde(default)]
    pub is_following_back: bool,
    #[serde(default)]
    pub avatar_color: AvatarColor,
}
