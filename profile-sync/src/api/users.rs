#![allow(async_fn_in_trait)]
use log::{debug, error, info};

use super::ApiClientImpl;
use crate::error::{Error, Result};
use crate::models::ExternalUser;

pub trait UsersApi {
    /// `GET /users`, in the order the server returns them.
    async fn fetch_users(&self) -> Result<Vec<ExternalUser>>;
}

impl UsersApi for ApiClientImpl {
    async fn fetch_users(&self) -> Result<Vec<ExternalUser>> {
        let url = self.endpoint("users")?;
        info!("fetching users from {url}");
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            error!("fetching users failed with status {status}");
            return Err(Error::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = response.text().await?;
        let users = serde_json::from_str::<Vec<ExternalUser>>(&body).map_err(|e| {
            error!("malformed users payload: {e}");
            e
        })?;
        debug!("got {} users", users.len());
        Ok(users)
    }
}
