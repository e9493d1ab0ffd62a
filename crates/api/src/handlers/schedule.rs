use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use classboard_core::{
    access::{authorize, Action, Target},
    errors::BoardError,
    models::class::{CreateScheduleSlotRequest, ScheduleSlotResponse, Weekday},
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    handlers::class_scope_for,
    middleware::{auth, error_handling::AppError},
    ApiState,
};

#[axum::debug_handler]
pub async fn add_slot(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    Path(class_id): Path<Uuid>,
    Json(payload): Json<CreateScheduleSlotRequest>,
) -> Result<Json<ScheduleSlotResponse>, AppError> {
    let actor = auth::require_actor(&state.db_pool, &headers).await?;
    let db_class = crate::handlers::class::fetch_class(&state, class_id).await?;

    let scope = class_scope_for(&state.db_pool, &actor, &db_class).await?;
    authorize(Some(&actor), Action::Update, &Target::Class(scope))
        .require(&format!("schedule for class {}", class_id))?;

    if payload.end_time <= payload.start_time {
        return Err(AppError(BoardError::Validation(
            "end_time must be after start_time".to_string(),
        )));
    }

    let slot = classboard_db::repositories::schedule_slot::create_slot(
        &state.db_pool,
        class_id,
        payload.day.as_str(),
        payload.start_time,
        payload.end_time,
    )
    .await
    .map_err(BoardError::Database)?;

    tracing::info!("Added schedule slot: id={}, class_id={}", slot.id, class_id);

    Ok(Json(slot_response(slot)?))
}

#[axum::debug_handler]
pub async fn list_slots(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    Path(class_id): Path<Uuid>,
) -> Result<Json<Vec<ScheduleSlotResponse>>, AppError> {
    let actor = auth::require_actor(&state.db_pool, &headers).await?;
    let db_class = crate::handlers::class::fetch_class(&state, class_id).await?;

    let scope = class_scope_for(&state.db_pool, &actor, &db_class).await?;
    authorize(Some(&actor), Action::Read, &Target::Class(scope))
        .require(&format!("schedule for class {}", class_id))?;

    let slots =
        classboard_db::repositories::schedule_slot::list_slots_by_class(&state.db_pool, class_id)
            .await
            .map_err(BoardError::Database)?
            .into_iter()
            .map(slot_response)
            .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(slots))
}

#[axum::debug_handler]
pub async fn delete_slot(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    Path((class_id, slot_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let actor = auth::require_actor(&state.db_pool, &headers).await?;
    let db_class = crate::handlers::class::fetch_class(&state, class_id).await?;

    let scope = class_scope_for(&state.db_pool, &actor, &db_class).await?;
    authorize(Some(&actor), Action::Delete, &Target::Class(scope))
        .require(&format!("schedule for class {}", class_id))?;

    // Deleting an absent slot succeeds; a slot under another class is a
    // NotFound rather than a cross-class delete.
    let slot = classboard_db::repositories::schedule_slot::get_slot_by_id(&state.db_pool, slot_id)
        .await
        .map_err(BoardError::Database)?;
    if let Some(slot) = slot {
        if slot.class_id != class_id {
            return Err(AppError(BoardError::NotFound(format!(
                "schedule slot {} not found",
                slot_id
            ))));
        }
        classboard_db::repositories::schedule_slot::delete_slot(&state.db_pool, slot.id)
            .await
            .map_err(BoardError::Database)?;
    }

    Ok(Json(serde_json::json!({ "deleted": slot_id })))
}

pub(crate) fn slot_response(
    slot: classboard_db::models::DbScheduleSlot,
) -> Result<ScheduleSlotResponse, AppError> {
    let day = Weekday::parse(&slot.day_of_week).ok_or_else(|| {
        AppError(BoardError::Validation(format!(
            "unknown weekday: {}",
            slot.day_of_week
        )))
    })?;

    Ok(ScheduleSlotResponse {
        id: slot.id,
        class_id: slot.class_id,
        day,
        start_time: slot.start_time,
        end_time: slot.end_time,
    })
}
