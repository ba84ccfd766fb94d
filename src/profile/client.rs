use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, Response};
use tracing::{debug, error};

use crate::profile::dto::{ProfileUpdate, RemoteProfileResponse, UpdateResponse};
use crate::storage::{keys, KeyValueStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum ProfileApiError {
    #[error("no access token stored")]
    Unauthenticated,
    #[error("profile request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("profile endpoint returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("profile endpoint rejected the request: {0}")]
    Rejected(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Remote read/write of the authoritative profile.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileApi: Send + Sync {
    async fn fetch_profile(&self) -> Result<RemoteProfileResponse, ProfileApiError>;
    async fn update_profile(&self, update: ProfileUpdate)
        -> Result<UpdateResponse, ProfileApiError>;
}

/// REST client that signs every call with the stored access token.
pub struct HttpProfileApi {
    client: Client,
    profile_url: String,
    store: Arc<dyn KeyValueStore>,
}

impl HttpProfileApi {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        store: Arc<dyn KeyValueStore>,
    ) -> Result<Self, ProfileApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            profile_url: format!("{}/profile", base_url.trim_end_matches('/')),
            store,
        })
    }

    async fn bearer(&self) -> Result<String, ProfileApiError> {
        self.store
            .get(keys::AUTH_TOKEN)
            .await?
            .filter(|t| !t.is_empty())
            .ok_or(ProfileApiError::Unauthenticated)
    }

    async fn ensure_ok(response: Response) -> Result<Response, ProfileApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        error!(%status, %body, "profile endpoint error");
        Err(ProfileApiError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl ProfileApi for HttpProfileApi {
    async fn fetch_profile(&self) -> Result<RemoteProfileResponse, ProfileApiError> {
        let token = self.bearer().await?;
        let response = self
            .client
            .get(&self.profile_url)
            .bearer_auth(token)
            .send()
            .await?;
        let body = Self::ensure_ok(response)
            .await?
            .json::<RemoteProfileResponse>()
            .await?;
        debug!(success = body.success, "remote profile fetched");
        Ok(body)
    }

    async fn update_profile(
        &self,
        update: ProfileUpdate,
    ) -> Result<UpdateResponse, ProfileApiError> {
        let token = self.bearer().await?;
        let response = self
            .client
            .put(&self.profile_url)
            .bearer_auth(token)
            .json(&update)
            .send()
            .await?;
        let body = Self::ensure_ok(response)
            .await?
            .json::<UpdateResponse>()
            .await?;
        debug!(success = body.success, "remote profile updated");
        Ok(body)
    }
}
