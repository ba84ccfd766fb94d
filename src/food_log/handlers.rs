use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, put},
    Json, Router,
};
use tracing::{error, info, instrument};

use crate::{
    food_log::{
        dto::{DayQuery, FoodLogEntry, NewEntryRequest, SyncUpdateRequest},
        repo::FoodLogError,
    },
    state::AppState,
};

pub fn log_routes() -> Router<AppState> {
    Router::new()
        .route("/log", get(list_entries).post(add_entry).delete(clear_log))
        .route("/log/:local_id", delete(delete_entry))
        .route("/log/:local_id/sync", put(update_sync))
}

fn reject(e: FoodLogError) -> (StatusCode, String) {
    match e {
        FoodLogError::NotFound(_) => (StatusCode::NOT_FOUND, e.to_string()),
        FoodLogError::InvalidQuantity(_) => (StatusCode::BAD_REQUEST, e.to_string()),
        FoodLogError::Store(_) => {
            error!(error = %e, "food log storage failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

#[instrument(skip(state))]
pub async fn list_entries(
    State(state): State<AppState>,
    Query(q): Query<DayQuery>,
) -> Result<Json<Vec<FoodLogEntry>>, (StatusCode, String)> {
    let day = q
        .day()
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("invalid date: {e}")))?;
    let entries = state.food_log
        .entries_on(day)
        .await
        .map_err(reject)?;
    Ok(Json(entries))
}

#[instrument(skip(state, payload))]
pub async fn add_entry(
    State(state): State<AppState>,
    Json(payload): Json<NewEntryRequest>,
) -> Result<(StatusCode, Json<FoodLogEntry>), (StatusCode, String)> {
    let entry = state.food_log
        .add(payload)
        .await
        .map_err(reject)?;
    info!(local_id = %entry.local_id, "entry logged");
    Ok((StatusCode::CREATED, Json(entry)))
}

#[instrument(skip(state))]
pub async fn delete_entry(
    State(state): State<AppState>,
    Path(local_id): Path<String>,
) -> Result<StatusCode, (StatusCode, String)> {
    state.food_log
        .remove(&local_id)
        .await
        .map_err(reject)?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn clear_log(State(state): State<AppState>) -> Result<StatusCode, (StatusCode, String)> {
    state.food_log
        .clear()
        .await
        .map_err(reject)?;
    info!("food log cleared");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, payload))]
pub async fn update_sync(
    State(state): State<AppState>,
    Path(local_id): Path<String>,
    Json(payload): Json<SyncUpdateRequest>,
) -> Result<Json<FoodLogEntry>, (StatusCode, String)> {
    let entry = state.food_log
        .mark_sync(&local_id, payload)
        .await
        .map_err(reject)?;
    Ok(Json(entry))
}

#[cfg(test)]
mod tests {
    use crate::app::test_support::{fake_app, send};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    fn oats() -> serde_json::Value {
        json!({
            "food": {
                "id": "oats",
                "name": "Oats",
                "servingSize": "40 g",
                "nutrients": [{ "name": "Calories", "unit": "kcal", "amount": 150.0 }]
            },
            "quantity": 1,
            "mealType": 1,
            "timestamp": "2026-10-18T07:30:00Z"
        })
    }

    #[tokio::test]
    async fn log_lifecycle_over_http() {
        let app = fake_app();

        let (status, created) = send(&app, Method::POST, "/api/v1/log", Some(oats())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["syncStatus"], "pending");
        let id = created["localId"].as_str().unwrap().to_string();

        let (status, listed) = send(&app, Method::GET, "/api/v1/log?date=2026-10-18", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed.as_array().unwrap().len(), 1);

        let (status, synced) = send(
            &app,
            Method::PUT,
            &format!("/api/v1/log/{id}/sync"),
            Some(json!({ "syncStatus": "synced", "serverId": 12 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(synced["serverId"], 12);

        let (status, _) = send(&app, Method::DELETE, &format!("/api/v1/log/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, Method::DELETE, &format!("/api/v1/log/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn rejects_bad_quantity_and_date() {
        let app = fake_app();
        let mut body = oats();
        body["quantity"] = json!(-2);
        let (status, _) = send(&app, Method::POST, "/api/v1/log", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, Method::GET, "/api/v1/log?date=yesterday", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn parallel_posts_are_all_listed() {
        let app = fake_app();
        let posts: Vec<_> = (0..40)
            .map(|_| {
                let app = app.clone();
                tokio::spawn(async move { send(&app, Method::POST, "/api/v1/log", Some(oats())).await.0 })
            })
            .collect();
        for post in posts {
            assert_eq!(post.await.unwrap(), StatusCode::CREATED);
        }

        let (_, listed) = send(&app, Method::GET, "/api/v1/log?date=2026-10-18", None).await;
        assert_eq!(listed.as_array().unwrap().len(), 40);
    }
}
