use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/classes/:id/schedule",
            post(handlers::schedule::add_slot),
        )
        .route(
            "/api/classes/:id/schedule",
            get(handlers::schedule::list_slots),
        )
        .route(
            "/api/classes/:id/schedule/:slot_id",
            delete(handlers::schedule::delete_slot),
        )
}
