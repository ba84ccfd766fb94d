use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::dto::{LoginRequest, LoginResponse},
    profile::{repo, services::ProfileReconciler},
    state::AppState,
    storage::keys,
};

pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/session/login", post(login))
        .route("/session/logout", post(logout))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, (StatusCode, String)> {
    let access_token = payload.access_token.trim().to_string();
    if access_token.is_empty() {
        warn!("login without access token");
        return Err((StatusCode::BAD_REQUEST, "access_token is required".into()));
    }

    let store = state.store.as_ref();
    let saved = async {
        store.set(keys::AUTH_TOKEN, access_token).await?;
        match payload.refresh_token {
            Some(refresh) => store.set(keys::REFRESH_TOKEN, refresh).await,
            None => store.remove(keys::REFRESH_TOKEN).await,
        }
    };
    if let Err(e) = saved.await {
        error!(error = %e, "store tokens failed");
        return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
    }

    if !state.session.try_claim() {
        info!("session already reconciled");
        return Ok(Json(LoginResponse {
            reconciled: None,
            reconcile_error: None,
        }));
    }

    let reconciler = ProfileReconciler::new(state.profile_api.as_ref(), store);
    let response = match reconciler.reconcile().await {
        Ok(outcome) => {
            if let Some(server) = &outcome.server_profile {
                // server data wins over a local draft for what the app shows
                if let Err(e) = repo::save_cached(store, server).await {
                    warn!(error = %e, "caching server profile failed");
                }
            }
            info!(
                did_promote_draft = outcome.did_promote_draft,
                did_update_server = outcome.did_update_server,
                "profile reconciled"
            );
            LoginResponse {
                reconciled: Some(outcome),
                reconcile_error: None,
            }
        }
        Err(e) => {
            // login stays usable; the draft survives for the next attempt
            error!(error = %e, stage = ?e.stage, "profile reconciliation failed");
            LoginResponse {
                reconciled: None,
                reconcile_error: Some(e.to_string()),
            }
        }
    };
    Ok(Json(response))
}

#[instrument(skip(state))]
pub async fn logout(State(state): State<AppState>) -> Result<StatusCode, (StatusCode, String)> {
    let store = state.store.as_ref();
    let cleared = async {
        store.remove(keys::AUTH_TOKEN).await?;
        store.remove(keys::REFRESH_TOKEN).await
    };
    cleared.await.map_err(|e| {
        error!(error = %e, "clear tokens failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;
    state.session.reset();
    info!("logged out");
    Ok(StatusCode::NO_CONTENT)
}
