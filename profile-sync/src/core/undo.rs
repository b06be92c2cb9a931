use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use log::{debug, info};
use tokio::task::JoinHandle;

use super::Core;
use crate::api::ApiClient;
use crate::error::Result;
use crate::models::Follower;
use crate::storage::Storage;

struct PendingRemoval {
    follower: Follower,
    timer: JoinHandle<()>,
    token: u64,
}

#[derive(Default)]
struct Pending {
    removals: HashMap<i64, PendingRemoval>,
    next_token: u64,
}

/// Keeps removed followers around for a while so the removal can be undone.
///
/// Each removal arms a timer. Once it fires the follower is forgotten and
/// `undo` becomes a no-op for that id.
pub struct UndoWindow<A: ApiClient, S: Storage> {
    core: Arc<Core<A, S>>,
    window: Duration,
    pending: Arc<Mutex<Pending>>,
}

impl<A: ApiClient, S: Storage> UndoWindow<A, S> {
    pub fn new(core: Arc<Core<A, S>>, window: Duration) -> Self {
        Self {
            core,
            window,
            pending: Default::default(),
        }
    }

    pub fn core(&self) -> &Arc<Core<A, S>> {
        &self.core
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Removes the follower and keeps it restorable until the window
    /// closes. Removing an id that is already pending restarts its window.
    pub async fn remove(&self, follower_id: i64) -> Result<Option<Follower>> {
        let Some(follower) = self.core.remove_follower(follower_id).await? else {
            return Ok(None);
        };

        let mut pending = self.pending.lock()?;
        pending.next_token += 1;
        let token = pending.next_token;
        let timer = self.spawn_expiry(follower_id, token);
        let previous = pending.removals.insert(
            follower_id,
            PendingRemoval {
                follower: follower.clone(),
                timer,
                token,
            },
        );
        if let Some(previous) = previous {
            previous.timer.abort();
        }
        debug!("follower {follower_id} restorable for {:?}", self.window);
        Ok(Some(follower))
    }

    fn spawn_expiry(&self, follower_id: i64, token: u64) -> JoinHandle<()> {
        let pending = Arc::clone(&self.pending);
        let window = self.window;
        tokio::spawn(async move {
            tokio::time::sleep(window).await;
            let Ok(mut pending) = pending.lock() else {
                return;
            };
            // a newer removal of the same id owns the entry now
            if pending
                .removals
                .get(&follower_id)
                .is_some_and(|p| p.token == token)
            {
                pending.removals.remove(&follower_id);
                debug!("undo window for follower {follower_id} expired");
            }
        })
    }

    /// Restores the follower if its window is still open. Returns whether
    /// anything was restored.
    pub async fn undo(&self, follower_id: i64) -> Result<bool> {
        let removal = self.pending.lock()?.removals.remove(&follower_id);
        let Some(PendingRemoval {
            follower, timer, ..
        }) = removal
        else {
            debug!("nothing to undo for follower {follower_id}");
            return Ok(false);
        };
        timer.abort();
        self.core.restore_follower(follower).await?;
        info!("removal of follower {follower_id} undone");
        Ok(true)
    }

    /// Ids whose removal can still be undone, ascending.
    pub fn pending(&self) -> Result<Vec<i64>> {
        let mut ids: Vec<_> = self.pending.lock()?.removals.keys().copied().collect();
        ids.sort_unstable();
        Ok(ids)
    }
}

impl<A: ApiClient, S: Storage> Drop for UndoWindow<A, S> {
    fn drop(&mut self) {
        if let Ok(pending) = self.pending.lock() {
            for removal in pending.removals.values() {
                removal.timer.abort();
            }
        }
    }
}
