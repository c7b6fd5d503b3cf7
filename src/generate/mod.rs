pub mod dto;
pub mod fallback;
pub mod handlers;
pub mod services;
pub mod templates;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::json_routes())
        .merge(handlers::upload_routes())
}
