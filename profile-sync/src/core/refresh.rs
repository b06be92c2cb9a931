use std::sync::atomic::{AtomicUsize, Ordering};

use log::debug;
use tokio::sync::watch;

use super::state::ProfileState;

/// Tracks overlapping refreshes.
///
/// Every started refresh gets a generation number. Only the newest
/// generation may write its result; starting another refresh or cancelling
/// bumps the generation and supersedes everything in flight.
#[derive(Debug)]
pub struct RefreshManager {
    latest: watch::Sender<u64>,
    in_flight: AtomicUsize,
}

/// One running refresh. Dropping it, whether the refresh completed or its
/// future was dropped mid-fetch, takes it out of the in-flight count and
/// republishes `is_loading`.
#[must_use = "the refresh counts as running until the guard is dropped"]
pub struct RefreshGuard<'a> {
    manager: &'a RefreshManager,
    state: &'a watch::Sender<ProfileState>,
    generation: u64,
}

impl RefreshManager {
    pub fn new() -> Self {
        Self {
            latest: watch::Sender::new(0),
            in_flight: AtomicUsize::new(0),
        }
    }

    /// Registers a new refresh, marks `state` as loading and clears the
    /// previous error.
    pub fn start<'a>(&'a self, state: &'a watch::Sender<ProfileState>) -> RefreshGuard<'a> {
        // counter and flag change together under the state's write lock
        state.send_modify(|state| {
            self.in_flight.fetch_add(1, Ordering::SeqCst);
            state.is_loading = true;
            state.last_error = None;
        });
        RefreshGuard {
            manager: self,
            state,
            generation: self.bump(),
        }
    }

    /// Supersedes in-flight refreshes without starting a new one.
    pub fn cancel(&self) -> u64 {
        self.bump()
    }

    fn bump(&self) -> u64 {
        let mut generation = 0;
        self.latest.send_modify(|latest| {
            *latest += 1;
            generation = *latest;
        });
        generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        *self.latest.borrow() == generation
    }

    /// Resolves once `generation` is no longer the newest.
    pub async fn superseded(&self, generation: u64) {
        let mut rx = self.latest.subscribe();
        // the sender lives as long as self, so this cannot fail while awaited
        let _ = rx.wait_for(|latest| *latest != generation).await;
    }

    /// Marks one refresh as done and reports whether others are still
    /// running.
    fn finish(&self) -> bool {
        let previous = self
            .in_flight
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| Some(n.saturating_sub(1)))
            .unwrap_or_default();
        previous > 1
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}

impl Default for RefreshManager {
    fn default() -> Self {
        Self::new()
    }
}

impl RefreshGuard<'_> {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        let manager = self.manager;
        self.state
            .send_modify(|state| state.is_loading = manager.finish());
        debug!(
            "refresh {} left, {} still running",
            self.generation,
            manager.in_flight()
        );
    }
}
