use crate::state::AppState;
use axum::Router;

mod dto;
pub mod handlers;
pub mod session;

pub fn router() -> Router<AppState> {
    handlers::session_routes()
}
