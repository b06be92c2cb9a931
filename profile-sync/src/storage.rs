#![allow(async_fn_in_trait)]
pub mod database;
pub mod internal;

use std::sync::Arc;

use log::{debug, info};
use sqlx::SqlitePool;
use tokio::sync::watch;

use crate::error::Result;
use crate::models::{Follower, Profile, Story};
use internal::{follower, profile, story};

const VALID_DB_VERSION: i64 = 1;

/// An immutable copy of a whole table, ordered by ascending id.
pub type Snapshot<T> = Arc<Vec<T>>;

/// Local persistence for the profile, followers and stories.
///
/// Every write is durable once its future resolves, and the matching
/// `subscribe_*` channel has already received the new snapshot by then.
pub trait Storage: Send + Sync + Clone + 'static {
    async fn get_profile(&self) -> Result<Option<Profile>>;
    async fn upsert_profile(&self, profile: &Profile) -> Result<()>;
    fn subscribe_profile(&self) -> watch::Receiver<Option<Profile>>;

    async fn list_followers(&self) -> Result<Vec<Follower>>;
    fn subscribe_followers(&self) -> watch::Receiver<Snapshot<Follower>>;
    async fn insert_followers(&self, followers: &[Follower]) -> Result<()>;
    async fn update_follower(&self, follower: &Follower) -> Result<()>;
    async fn delete_follower(&self, id: i64) -> Result<()>;
    async fn delete_all_followers(&self) -> Result<()>;
    /// Delete-all plus insert as one atomic write.
    async fn replace_followers(&self, followers: &[Follower]) -> Result<()>;

    async fn list_stories(&self) -> Result<Vec<Story>>;
    fn subscribe_stories(&self) -> watch::Receiver<Snapshot<Story>>;
    async fn insert_stories(&self, stories: &[Story]) -> Result<()>;
    async fn update_story(&self, story: &Story) -> Result<()>;
    async fn delete_all_stories(&self) -> Result<()>;
    /// Delete-all plus insert as one atomic write.
    async fn replace_stories(&self, stories: &[Story]) -> Result<()>;
}

/// Publishing side of the table subscriptions, shared by the storage
/// implementations.
#[derive(Debug)]
pub struct SnapshotChannels {
    profile: watch::Sender<Option<Profile>>,
    followers: watch::Sender<Snapshot<Follower>>,
    stories: watch::Sender<Snapshot<Story>>,
}

impl SnapshotChannels {
    pub fn new(profile: Option<Profile>, followers: Vec<Follower>, stories: Vec<Story>) -> Self {
        Self {
            profile: watch::Sender::new(profile),
            followers: watch::Sender::new(Arc::new(followers)),
            stories: watch::Sender::new(Arc::new(stories)),
        }
    }

    pub fn publish_profile(&self, profile: Option<Profile>) {
        self.profile.send_replace(profile);
    }

    pub fn publish_followers(&self, followers: Vec<Follower>) {
        debug!("publishing {} followers", followers.len());
        self.followers.send_replace(Arc::new(followers));
    }

    pub fn publish_stories(&self, stories: Vec<Story>) {
        debug!("publishing {} stories", stories.len());
        self.stories.send_replace(Arc::new(stories));
    }

    pub fn subscribe_profile(&self) -> watch::Receiver<Option<Profile>> {
        self.profile.subscribe()
    }

    pub fn subscribe_followers(&self) -> watch::Receiver<Snapshot<Follower>> {
        self.followers.subscribe()
    }

    pub fn subscribe_stories(&self) -> watch::Receiver<Snapshot<Story>> {
        self.stories.subscribe()
    }
}

#[derive(Debug, Clone)]
pub struct StorageImpl {
    db_pool: SqlitePool,
    channels: Arc<SnapshotChannels>,
}

impl StorageImpl {
    /// Wraps an opened pool whose tables already exist and loads the
    /// initial snapshots.
    pub async fn new(db_pool: SqlitePool) -> Result<Self> {
        info!("Initializing storage...");
        let channels = SnapshotChannels::new(
            profile::get_profile(&db_pool).await?,
            follower::list_followers(&db_pool).await?,
            story::list_stories(&db_pool).await?,
        );
        info!("Storage initialized successfully.");
        Ok(Self {
            db_pool,
            channels: Arc::new(channels),
        })
    }

    async fn refresh_followers(&self) -> Result<()> {
        let followers = follower::list_followers(&self.db_pool).await?;
        self.channels.publish_followers(followers);
        Ok(())
    }

    async fn refresh_stories(&self) -> Result<()> {
        let stories = story::list_stories(&self.db_pool).await?;
        self.channels.publish_stories(stories);
        Ok(())
    }
}

impl Storage for StorageImpl {
    async fn get_profile(&self) -> Result<Option<Profile>> {
        profile::get_profile(&self.db_pool).await
    }

    async fn upsert_profile(&self, p: &Profile) -> Result<()> {
        let mut tx = self.db_pool.begin().await?;
        profile::upsert_profile(&mut tx, p).await?;
        tx.commit().await?;
        debug!("profile {} saved", p.id);
        self.channels.publish_profile(Some(p.clone()));
        Ok(())
    }

    fn subscribe_profile(&self) -> watch::Receiver<Option<Profile>> {
        self.channels.subscribe_profile()
    }

    async fn list_followers(&self) -> Result<Vec<Follower>> {
        follower::list_followers(&self.db_pool).await
    }

    fn subscribe_followers(&self) -> watch::Receiver<Snapshot<Follower>> {
        self.channels.subscribe_followers()
    }

    async fn insert_followers(&self, followers: &[Follower]) -> Result<()> {
        let mut tx = self.db_pool.begin().await?;
        follower::insert_followers(&mut tx, followers).await?;
        tx.commit().await?;
        debug!("inserted {} followers", followers.len());
        self.refresh_followers().await
    }

    async fn update_follower(&self, f: &Follower) -> Result<()> {
        if follower::update_follower(&self.db_pool, f).await? {
            self.refresh_followers().await?;
        } else {
            debug!("follower {} not found, nothing updated", f.id);
        }
        Ok(())
    }

    async fn delete_follower(&self, id: i64) -> Result<()> {
        if follower::delete_follower(&self.db_pool, id).await? {
            self.refresh_followers().await?;
        } else {
            debug!("follower {id} not found, nothing deleted");
        }
        Ok(())
    }

    async fn delete_all_followers(&self) -> Result<()> {
        follower::delete_all_followers(&self.db_pool).await?;
        self.refresh_followers().await
    }

    async fn replace_followers(&self, followers: &[Follower]) -> Result<()> {
        let mut tx = self.db_pool.begin().await?;
        follower::delete_all_followers(&mut *tx).await?;
        follower::insert_followers(&mut tx, followers).await?;
        tx.commit().await?;
        debug!("replaced followers with {} records", followers.len());
        self.refresh_followers().await
    }

    async fn list_stories(&self) -> Result<Vec<Story>> {
        story::list_stories(&self.db_pool).await
    }

    fn subscribe_stories(&self) -> watch::Receiver<Snapshot<Story>> {
        self.channels.subscribe_stories()
    }

    async fn insert_stories(&self, stories: &[Story]) -> Result<()> {
        let mut tx = self.db_pool.begin().await?;
        story::insert_stories(&mut tx, stories).await?;
        tx.commit().await?;
        debug!("inserted {} stories", stories.len());
        self.refresh_stories().await
    }

    async fn update_story(&self, s: &Story) -> Result<()> {
        if story::update_story(&self.db_pool, s).await? {
            self.refresh_stories().await?;
        } else {
            debug!("story {} not found, nothing updated", s.id);
        }
        Ok(())
    }

    async fn delete_all_stories(&self) -> Result<()> {
        story::delete_all_stories(&self.db_pool).await?;
        self.refresh_stories().await
    }

    async fn replace_stories(&self, stories: &[Story]) -> Result<()> {
        let mut tx = self.db_pool.begin().await?;
        story::delete_all_stories(&mut *tx).await?;
        story::insert_stories(&mut tx, stories).await?;
        tx.commit().await?;
        debug!("replaced stories with {} records", stories.len());
        self.refresh_stories().await
    }
}
