use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/classes/:id/assignments",
            post(handlers::assignment::create_assignment),
        )
        .route(
            "/api/classes/:id/assignments",
            get(handlers::assignment::list_assignments),
        )
        .route(
            "/api/assignments/:id/status",
            put(handlers::assignment::set_assignment_status),
        )
        .route(
            "/api/assignments/:id/submissions",
            post(handlers::assignment::submit_assignment),
        )
        .route(
            "/api/submissions/:id/grade",
            post(handlers::assignment::grade_submission),
        )
}
