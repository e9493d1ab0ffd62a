use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/dashboard", get(handlers::dashboard::get_dashboard))
        .route("/api/items", post(handlers::dashboard::create_item))
        .route("/api/items", get(handlers::dashboard::list_items))
        .route("/api/items/:id", get(handlers::dashboard::get_item))
        .route("/api/items/:id", put(handlers::dashboard::update_item))
        .route("/api/items/:id", delete(handlers::dashboard::delete_item))
}
