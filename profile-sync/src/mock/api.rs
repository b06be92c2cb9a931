use std::{
    collections::VecDeque,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use crate::{
    api::{ApiClient, UsersApi},
    error::{Error, Result},
    models::ExternalUser,
};

type Response = (Duration, Result<Vec<ExternalUser>>);

/// Replays scripted responses in call order. An exhausted script answers
/// with an empty list.
#[derive(Debug, Clone, Default)]
pub struct MockApi {
    responses: Arc<Mutex<VecDeque<Response>>>,
    calls: Arc<AtomicUsize>,
}

impl MockApi {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn push_users(&self, users: Vec<ExternalUser>) {
        self.push_delayed(Duration::ZERO, Ok(users));
    }

    pub fn push_failure(&self, status: u16) {
        self.push_delayed(
            Duration::ZERO,
            Err(Error::Status {
                status,
                url: "mock://users".to_string(),
            }),
        );
    }

    pub fn push_delayed(&self, delay: Duration, response: Result<Vec<ExternalUser>>) {
        self.responses.lock().unwrap().push_back((delay, response));
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl UsersApi for MockApi {
    async fn fetch_users(&self) -> Result<Vec<ExternalUser>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.responses.lock().unwrap().pop_front();
        let (delay, response) = next.unwrap_or((Duration::ZERO, Ok(vec![])));
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        response
    }
}

impl ApiClient for MockApi {}

#[cfg(test)]
mod local_tests {
    use super::*;

    #[tokio::test]
    async fn test_responses_replay_in_order() {
        let api = MockApi::new();
        api.push_users(vec![ExternalUser::new(1, "A", "a")]);
        api.push_failure(503);

        assert_eq!(api.fetch_users().await.unwrap().len(), 1);
        let err = api.fetch_users().await.unwrap_err();
        assert!(err.is_network());
        assert!(api.fetch_users().await.unwrap().is_empty());
        assert_eq!(api.calls(), 3);
    }
}
