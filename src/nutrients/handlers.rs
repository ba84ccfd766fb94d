use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{error, instrument};

use crate::{
    food_log::dto::DayQuery,
    intake::services::goals_for_raw,
    nutrients::{
        dto::SummaryResponse,
        services::{aggregate, progress},
    },
    profile::repo::load_current,
    state::AppState,
};

pub fn summary_routes() -> Router<AppState> {
    Router::new().route("/summary", get(daily_summary))
}

/// Consumed totals for one day against the current profile's goals.
#[instrument(skip(state))]
pub async fn daily_summary(
    State(state): State<AppState>,
    Query(q): Query<DayQuery>,
) -> Result<Json<SummaryResponse>, (StatusCode, String)> {
    let day = q
        .day()
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("invalid date: {e}")))?;

    let entries = state.food_log
        .entries_on(day)
        .await
        .map_err(|e| {
            error!(error = %e, "load food log failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;
    let profile = load_current(state.store.as_ref()).await.map_err(|e| {
        error!(error = %e, "load profile failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    let consumed = aggregate(&entries);
    let goals = goals_for_raw(profile.as_ref());
    let progress = progress(&consumed, &goals);

    Ok(Json(SummaryResponse {
        date: day.to_string(),
        consumed,
        goals,
        progress,
    }))
}
