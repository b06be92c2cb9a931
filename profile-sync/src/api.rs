pub mod users;

use std::time::Duration;

use log::debug;
use reqwest::Client;
use url::Url;

use crate::error::Result;

pub use users::UsersApi;

pub trait ApiClient: users::UsersApi + Send + Sync + Clone {}

/// HTTP client for the remote user directory.
#[derive(Debug, Clone)]
pub struct ApiClientImpl {
    client: Client,
    base_url: Url,
}

impl ApiClientImpl {
    pub fn new(client: Client, mut base_url: Url) -> Self {
        // join() drops the last path segment unless the base ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        debug!("api client base url: {base_url}");
        Self { client, base_url }
    }

    pub fn with_timeout(base_url: Url, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::new(client, base_url))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }
}

impl ApiClient for ApiClientImpl {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let api = ApiClientImpl::new(
            Client::new(),
            Url::parse("https://example.com/api").unwrap(),
        );
        assert_eq!(api.base_url().as_str(), "https://example.com/api/");
        assert_eq!(
            api.endpoint("users").unwrap().as_str(),
            "https://example.com/api/users"
        );
    }

    #[test]
    fn test_root_base_url() {
        let api = ApiClientImpl::new(
            Client::new(),
            Url::parse("https://jsonplaceholder.typicode.com/").unwrap(),
        );
        assert_eq!(
            api.endpoint("users").unwrap().as_str(),
            "https://jsonplaceholder.typicode.com/users"
        );
    }
}
