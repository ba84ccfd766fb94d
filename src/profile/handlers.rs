use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::{error, info, instrument};

use crate::{
    profile::{dto::RawProfile, repo},
    state::AppState,
};

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile))
        .route("/profile/draft", put(save_draft))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
) -> Result<Json<Option<RawProfile>>, (StatusCode, String)> {
    let profile = repo::load_current(state.store.as_ref()).await.map_err(|e| {
        error!(error = %e, "load profile failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;
    Ok(Json(profile))
}

/// Stores a guest profile; it is promoted after the next login if the server has none.
#[instrument(skip(state, payload))]
pub async fn save_draft(
    State(state): State<AppState>,
    Json(payload): Json<RawProfile>,
) -> Result<StatusCode, (StatusCode, String)> {
    repo::save_draft(state.store.as_ref(), &payload)
        .await
        .map_err(|e| {
            error!(error = %e, "save draft failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;
    info!("draft profile saved");
    Ok(StatusCode::NO_CONTENT)
}
