use serde::{Deserialize, Serialize};

pub const DEFAULT_BIO: &str = "Android learner";
pub const DEFAULT_ADDITIONAL_INFO: &str = "3rd year student at SDU university";

/// The profile owner. At most one exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub additional_info: String,
    #[serde(default)]
    pub follower_count: u32,
    #[serde(default)]
    pub is_following: bool,
}

impl Profile {
    /// The profile inserted on first start.
    pub fn seed() -> Self {
        Self {
            id: 1,
            name: "Ramazan A.".into(),
            username: "ramazan".into(),
            email: "ramazan@example.com".into(),
            bio: DEFAULT_BIO.into(),
            additional_info: DEFAULT_ADDITIONAL_INFO.into(),
            follower_count: 1247,
            is_following: false,
        }
    }

    /// Flips `is_following` and moves `follower_count` by one in the same
    /// direction. Unfollowing at zero keeps the count at zero.
    pub fn toggle_follow(&mut self) {
        self.is_following = !self.is_following;
        self.follower_count = if self.is_following {
            self.follower_count.saturating_add(1)
        } else {
            self.follower_count.saturating_sub(1)
        };
    }

    /// Copy meant for display: empty bio and additional info show the
    /// seed texts.
    pub fn with_display_defaults(mut self) -> Self {
        if self.bio.is_empty() {
            self.bio = DEFAULT_BIO.into();
        }
        if self.additional_info.is_empty() {
            self.additional_info = DEFAULT_ADDITIONAL_INFO.into();
        }
        self
    }
}
