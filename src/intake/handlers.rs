use axum::{routing::post, Json, Router};
use tracing::instrument;

use crate::{
    intake::{dto::IntakeTable, services::goals_for_raw},
    profile::dto::RawProfile,
    state::AppState,
};

pub fn intake_routes() -> Router<AppState> {
    Router::new().route("/intake", post(compute_intake))
}

/// Accepts a profile or `null`; never fails on bad field values.
#[instrument]
pub async fn compute_intake(Json(profile): Json<Option<RawProfile>>) -> Json<IntakeTable> {
    Json(goals_for_raw(profile.as_ref()))
}

#[cfg(test)]
mod tests {
    use crate::app::test_support::{fake_app, send};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn derives_goals_from_posted_profile() {
        let app = fake_app();
        let body = json!({ "age": "45", "sex": "Female", "height": "160", "weight": "60" });
        let (status, table) = send(&app, Method::POST, "/api/v1/intake", Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(table["Calories"]["amount"], 1870.0);
        assert_eq!(table["Protein"]["amount"], 70.0);
        assert_eq!(table["Carbohydrate"]["amount"], 281.0);
        assert_eq!(table["Fat"]["amount"], 52.0);
        assert_eq!(table["Iron"]["unit"], "mg");
    }

    #[tokio::test]
    async fn null_or_invalid_profile_gets_defaults() {
        let app = fake_app();
        let (_, table) = send(&app, Method::POST, "/api/v1/intake", Some(json!(null))).await;
        assert_eq!(table["Calories"]["amount"], 2000.0);

        let body = json!({ "age": "25", "sex": "Male", "weight": "0" });
        let (status, table) = send(&app, Method::POST, "/api/v1/intake", Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(table["Calories"]["amount"], 2000.0);
    }
}
