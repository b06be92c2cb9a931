pub mod merge;
pub mod refresh;
pub mod state;
pub mod undo;

use log::{debug, error, info, warn};
use tokio::sync::{Mutex, watch};

use crate::api::{ApiClient, ApiClientImpl};
use crate::error::Result;
use crate::models::{ExternalUser, Follower, Profile, Story};
use crate::storage::{Snapshot, Storage, StorageImpl};
pub use merge::{merge_followers, merge_stories};
use refresh::RefreshManager;
pub use state::ProfileState;
pub use undo::UndoWindow;

pub type DefaultCore = Core<ApiClientImpl, StorageImpl>;

/// The single writer over the profile, followers and stories.
///
/// Intents that read and then write a collection are serialized by one
/// lock. `refresh` fetches outside that lock and only takes it to apply the
/// result. Every change is published as a new `ProfileState`.
pub struct Core<A: ApiClient, S: Storage> {
    api_client: A,
    storage: S,
    writer: Mutex<()>,
    refresh_manager: RefreshManager,
    profile: watch::Receiver<Option<Profile>>,
    followers: watch::Receiver<Snapshot<Follower>>,
    stories: watch::Receiver<Snapshot<Story>>,
    state: watch::Sender<ProfileState>,
}

impl<A: ApiClient, S: Storage> Core<A, S> {
    pub fn new(api_client: A, storage: S) -> Self {
        let profile = storage.subscribe_profile();
        let followers = storage.subscribe_followers();
        let stories = storage.subscribe_stories();
        let core = Self {
            api_client,
            storage,
            writer: Mutex::new(()),
            refresh_manager: RefreshManager::new(),
            profile,
            followers,
            stories,
            state: watch::Sender::new(ProfileState::default()),
        };
        core.publish();
        core
    }

    /// Current snapshot of the whole state.
    pub fn state(&self) -> ProfileState {
        self.state.borrow().clone()
    }

    /// A handle that sees a new snapshot after every change.
    pub fn subscribe(&self) -> watch::Receiver<ProfileState> {
        self.state.subscribe()
    }

    fn publish(&self) {
        let profile = self
            .profile
            .borrow()
            .clone()
            .map(Profile::with_display_defaults);
        let followers = self.followers.borrow().clone();
        let stories = self.stories.borrow().clone();
        self.state.send_modify(|state| {
            state.profile = profile;
            state.followers = followers;
            state.stories = stories;
        });
    }

    fn current_follower(&self, id: i64) -> Option<Follower> {
        self.followers.borrow().iter().find(|f| f.id == id).cloned()
    }

    fn current_story(&self, id: i64) -> Option<Story> {
        self.stories.borrow().iter().find(|s| s.id == id).cloned()
    }

    // ========================= profile =========================

    /// Seeds the default profile and stories when no profile exists yet.
    pub async fn initialize(&self) -> Result<()> {
        let _guard = self.writer.lock().await;
        if self.storage.get_profile().await?.is_some() {
            debug!("profile already exists, skipping seed");
            return Ok(());
        }
        info!("No profile found, inserting default data");
        self.storage.upsert_profile(&Profile::seed()).await?;
        self.storage.insert_stories(&Story::seeds()).await?;
        self.publish();
        Ok(())
    }

    pub async fn update_profile(
        &self,
        name: String,
        bio: String,
        additional_info: String,
    ) -> Result<()> {
        let _guard = self.writer.lock().await;
        let Some(mut profile) = self.storage.get_profile().await? else {
            warn!("update_profile called without a profile, ignored");
            return Ok(());
        };
        profile.name = name;
        profile.bio = bio;
        profile.additional_info = additional_info;
        self.storage.upsert_profile(&profile).await?;
        info!("profile {} updated", profile.id);
        self.publish();
        Ok(())
    }

    pub async fn toggle_follow(&self) -> Result<()> {
        let _guard = self.writer.lock().await;
        let Some(mut profile) = self.storage.get_profile().await? else {
            warn!("toggle_follow called without a profile, ignored");
            return Ok(());
        };
        profile.toggle_follow();
        self.storage.upsert_profile(&profile).await?;
        info!(
            "following: {}, follower count: {}",
            profile.is_following, profile.follower_count
        );
        self.publish();
        Ok(())
    }

    // ========================= stories =========================

    pub async fn mark_story_viewed(&self, story_id: i64) -> Result<()> {
        let _guard = self.writer.lock().await;
        match self.current_story(story_id) {
            Some(story) if !story.is_viewed => {
                self.storage
                    .update_story(&Story {
                        is_viewed: true,
                        ..story
                    })
                    .await?;
                debug!("story {story_id} marked as viewed");
                self.publish();
            }
            Some(_) => debug!("story {story_id} already viewed"),
            None => debug!("story {story_id} not found"),
        }
        Ok(())
    }

    // ========================= followers =========================

    pub async fn toggle_follower_back(&self, follower_id: i64) -> Result<()> {
        let _guard = self.writer.lock().await;
        let Some(mut follower) = self.current_follower(follower_id) else {
            debug!("follower {follower_id} not found");
            return Ok(());
        };
        follower.is_following_back = !follower.is_following_back;
        self.storage.update_follower(&follower).await?;
        self.publish();
        Ok(())
    }

    /// Deletes the follower and hands back the removed record so it can be
    /// restored later. `None` when no follower has that id.
    pub async fn remove_follower(&self, follower_id: i64) -> Result<Option<Follower>> {
        let _guard = self.writer.lock().await;
        let Some(follower) = self.current_follower(follower_id) else {
            debug!("follower {follower_id} not found");
            return Ok(None);
        };
        self.storage.delete_follower(follower_id).await?;
        info!("follower {follower_id} removed");
        self.publish();
        Ok(Some(follower))
    }

    /// Puts a removed follower back exactly as it was.
    pub async fn restore_follower(&self, follower: Follower) -> Result<()> {
        let _guard = self.writer.lock().await;
        let id = follower.id;
        self.storage.insert_followers(&[follower]).await?;
        info!("follower {id} restored");
        self.publish();
        Ok(())
    }

    // ========================= remote refresh =========================

    /// Replaces followers and stories with data from the remote endpoint.
    ///
    /// Remote failures are reported through `last_error` and leave the
    /// collections untouched; storage failures and any other local error are
    /// returned. A newer `refresh` or `cancel_refresh` supersedes this one,
    /// whose result is then dropped. Dropping the returned future also ends
    /// the refresh and clears `is_loading` once nothing else is running.
    pub async fn refresh(&self) -> Result<()> {
        let guard = self.refresh_manager.start(&self.state);
        let generation = guard.generation();
        info!("refresh {generation} started");

        let outcome = tokio::select! {
            res = self.api_client.fetch_users() => Some(res),
            _ = self.refresh_manager.superseded(generation) => None,
        };
        match outcome {
            Some(fetched) => self.complete_refresh(generation, fetched).await,
            None => {
                info!("refresh {generation} superseded while fetching");
                Ok(())
            }
        }
    }

    /// Supersedes every in-flight refresh.
    pub fn cancel_refresh(&self) {
        let generation = self.refresh_manager.cancel();
        info!("refreshes before generation {generation} cancelled");
    }

    async fn complete_refresh(
        &self,
        generation: u64,
        fetched: Result<Vec<ExternalUser>>,
    ) -> Result<()> {
        let _guard = self.writer.lock().await;
        if !self.refresh_manager.is_current(generation) {
            info!("refresh {generation} superseded, result dropped");
            return Ok(());
        }
        match fetched {
            Ok(users) if users.is_empty() => {
                warn!("refresh {generation} got no users, keeping local data");
                Ok(())
            }
            Ok(users) => {
                let existing = self.followers.borrow().clone();
                let followers = merge_followers(&existing, &users);
                let stories = merge_stories(&users);
                self.storage.replace_followers(&followers).await?;
                self.storage.replace_stories(&stories).await?;
                info!(
                    "refresh {generation} done: {} followers, {} stories",
                    followers.len(),
                    stories.len()
                );
                self.publish();
                Ok(())
            }
            Err(e) if e.is_network() => {
                error!("refresh {generation} failed: {e}");
                let message = format!("Failed to refresh: {e}");
                self.state
                    .send_modify(|state| state.last_error = Some(message));
                Ok(())
            }
            Err(e) => {
                error!("refresh {generation} hit a local error: {e}");
                Err(e)
            }
        }
    }
}
