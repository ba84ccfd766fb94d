use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::profile::client::{ProfileApi, ProfileApiError};
use crate::profile::dto::{ProfileUpdate, RawProfile, RemoteProfile};
use crate::profile::repo;
use crate::storage::{KeyValueStore, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteState {
    Empty,
    NonEmpty,
}

impl RemoteState {
    pub fn of(profile: Option<&RemoteProfile>) -> Self {
        match profile {
            Some(p) if !p.is_empty() => Self::NonEmpty,
            _ => Self::Empty,
        }
    }
}

/// Steps of one reconciliation run, in order. Errors report the last step
/// that completed, so a partial run can be told apart from a clean one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileStage {
    Started,
    Fetched,
    Evaluated(RemoteState),
    DraftLoaded,
    CacheWritten,
    ServerUpdated,
    DraftCleared,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileOutcome {
    pub did_promote_draft: bool,
    pub did_update_server: bool,
    pub stage: ReconcileStage,
    /// Server profile that was kept over the draft. Nothing is cached here;
    /// the caller decides where it goes.
    #[serde(skip)]
    pub server_profile: Option<RawProfile>,
}

impl ReconcileOutcome {
    fn untouched(stage: ReconcileStage) -> Self {
        Self {
            did_promote_draft: false,
            did_update_server: false,
            stage,
            server_profile: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReconcileFailure {
    #[error(transparent)]
    Api(#[from] ProfileApiError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, thiserror::Error)]
#[error("profile reconciliation failed after {stage:?}: {source}")]
pub struct ReconcileError {
    pub stage: ReconcileStage,
    pub source: ReconcileFailure,
}

fn failed_after<E: Into<ReconcileFailure>>(stage: ReconcileStage) -> impl FnOnce(E) -> ReconcileError {
    move |e| ReconcileError {
        stage,
        source: e.into(),
    }
}

/// Decides, once per login, whether a guest draft becomes the server profile.
pub struct ProfileReconciler<'a> {
    api: &'a dyn ProfileApi,
    store: &'a dyn KeyValueStore,
}

impl<'a> ProfileReconciler<'a> {
    pub fn new(api: &'a dyn ProfileApi, store: &'a dyn KeyValueStore) -> Self {
        Self { api, store }
    }

    /// Server data always wins. The draft is promoted only when the server
    /// profile is empty, and removed only after the server accepted it.
    #[instrument(skip(self))]
    pub async fn reconcile(&self) -> Result<ReconcileOutcome, ReconcileError> {
        let remote = self
            .api
            .fetch_profile()
            .await
            .map_err(failed_after(ReconcileStage::Started))?;
        if !remote.success {
            let message = remote
                .message
                .unwrap_or_else(|| "profile fetch unsuccessful".into());
            return Err(failed_after(ReconcileStage::Fetched)(ProfileApiError::Rejected(message)));
        }

        let state = RemoteState::of(remote.data.as_ref());
        let evaluated = ReconcileStage::Evaluated(state);
        debug!(?state, "remote profile evaluated");
        if let (RemoteState::NonEmpty, Some(server)) = (state, remote.data.as_ref()) {
            return Ok(ReconcileOutcome {
                server_profile: Some(server.to_raw()),
                ..ReconcileOutcome::untouched(evaluated)
            });
        }

        let Some(draft) = repo::load_draft(self.store)
            .await
            .map_err(failed_after(evaluated))?
        else {
            debug!("no draft profile to promote");
            return Ok(ReconcileOutcome::untouched(evaluated));
        };

        repo::save_cached(self.store, &draft)
            .await
            .map_err(failed_after(ReconcileStage::DraftLoaded))?;

        let response = self
            .api
            .update_profile(ProfileUpdate::from_draft(&draft))
            .await
            .map_err(failed_after(ReconcileStage::CacheWritten))?;
        if !response.success {
            let message = response
                .message
                .unwrap_or_else(|| "profile update unsuccessful".into());
            warn!(%message, "server refused draft profile; keeping draft");
            return Err(failed_after(ReconcileStage::CacheWritten)(ProfileApiError::Rejected(message)));
        }

        repo::clear_draft(self.store)
            .await
            .map_err(failed_after(ReconcileStage::ServerUpdated))?;

        info!("draft profile promoted to server");
        Ok(ReconcileOutcome {
            did_promote_draft: true,
            did_update_server: true,
            stage: ReconcileStage::DraftCleared,
            server_profile: None,
        })
    }
}
