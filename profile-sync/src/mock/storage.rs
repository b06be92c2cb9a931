//! Test mock for storage
use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
};

use tokio::sync::watch;

use crate::{
    error::Result,
    models::{Follower, Profile, Story},
    storage::{Snapshot, SnapshotChannels, Storage},
};

#[derive(Debug, Clone)]
pub struct MockStorage {
    inner: Arc<Mutex<Inner>>,
    channels: Arc<SnapshotChannels>,
}

#[derive(Debug, Default)]
struct Inner {
    profile: Option<Profile>,
    followers: BTreeMap<i64, Follower>,
    stories: BTreeMap<i64, Story>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self {
            inner: Default::default(),
            channels: Arc::new(SnapshotChannels::new(None, vec![], vec![])),
        }
    }

    fn publish_followers(&self, inner: &Inner) {
        self.channels
            .publish_followers(inner.followers.values().cloned().collect());
    }

    fn publish_stories(&self, inner: &Inner) {
        self.channels
            .publish_stories(inner.stories.values().cloned().collect());
    }
}

impl Default for MockStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for MockStorage {
    async fn get_profile(&self) -> Result<Option<Profile>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.profile.clone())
    }

    async fn upsert_profile(&self, profile: &Profile) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.profile = Some(profile.clone());
        self.channels.publish_profile(inner.profile.clone());
        Ok(())
    }

    fn subscribe_profile(&self) -> watch::Receiver<Option<Profile>> {
        self.channels.subscribe_profile()
    }

    async fn list_followers(&self) -> Result<Vec<Follower>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.followers.values().cloned().collect())
    }

    fn subscribe_followers(&self) -> watch::Receiver<Snapshot<Follower>> {
        self.channels.subscribe_followers()
    }

    async fn insert_followers(&self, followers: &[Follower]) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        for f in followers {
            inner.followers.insert(f.id, f.clone());
        }
        self.publish_followers(&inner);
        Ok(())
    }

    async fn update_follower(&self, follower: &Follower) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(f) = inner.followers.get_mut(&follower.id) {
            *f = follower.clone();
            self.publish_followers(&inner);
        }
        Ok(())
    }

    async fn delete_follower(&self, id: i64) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if inner.followers.remove(&id).is_some() {
            self.publish_followers(&inner);
        }
        Ok(())
    }

    async fn delete_all_followers(&self) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.followers.clear();
        self.publish_followers(&inner);
        Ok(())
    }

    async fn replace_followers(&self, followers: &[Follower]) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.followers = followers.iter().map(|f| (f.id, f.clone())).collect();
        self.publish_followers(&inner);
        Ok(())
    }

    async fn list_stories(&self) -> Result<Vec<Story>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.stories.values().cloned().collect())
    }

    fn subscribe_stories(&self) -> watch::Receiver<Snapshot<Story>> {
        self.channels.subscribe_stories()
    }

    async fn insert_stories(&self, stories: &[Story]) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        for s in stories {
            inner.stories.insert(s.id, s.clone());
        }
        self.publish_stories(&inner);
        Ok(())
    }

    async fn update_story(&self, story: &Story) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(s) = inner.stories.get_mut(&story.id) {
            *s = story.clone();
            self.publish_stories(&inner);
        }
        Ok(())
    }

    async fn delete_all_stories(&self) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.stories.clear();
        self.publish_stories(&inner);
        Ok(())
    }

    async fn replace_stories(&self, stories: &[Story]) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.stories = stories.iter().map(|s| (s.id, s.clone())).collect();
        self.publish_stories(&inner);
        Ok(())
    }
}

#[cfg(test)]
mod local_tests {
    use super::*;

    #[tokio::test]
    async fn test_followers_are_kept_in_id_order() {
        let storage = MockStorage::new();
        let follower = |id| Follower {
            id,
            name: format!("F{id}"),
            username: format!("@f{id}"),
            is_following_back: false,
            avatar_color: Default::default(),
        };
        storage
            .insert_followers(&[follower(5), follower(2)])
            .await
            .unwrap();
        let ids: Vec<_> = storage
            .subscribe_followers()
            .borrow()
            .iter()
            .map(|f| f.id)
            .collect();
        assert_eq!(ids, vec![2, 5]);
    }
}
