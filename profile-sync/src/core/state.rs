use crate::models::{Follower, Profile, Story};
use crate::storage::Snapshot;

/// Everything the presentation layer renders, published as one snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileState {
    pub profile: Option<Profile>,
    pub followers: Snapshot<Follower>,
    pub stories: Snapshot<Story>,
    pub is_loading: bool,
    pub last_error: Option<String>,
}

impl ProfileState {
    pub fn follower(&self, id: i64) -> Option<&Follower> {
        self.followers.iter().find(|f| f.id == id)
    }

    pub fn story(&self, id: i64) -> Option<&Story> {
        self.stories.iter().find(|s| s.id == id)
    }
}
