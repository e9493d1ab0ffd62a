use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use chrono::Utc;
use classboard_core::{
    access::{authorize, Action, Actor, Target},
    errors::BoardError,
    models::class::ClassResponse,
    models::dashboard::{
        default_due_date, is_overdue, CreateDashboardItemRequest, DashboardItemResponse,
        DashboardResponse, ItemStatus, ItemType, Priority, UpdateDashboardItemRequest,
    },
    models::user::Role,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    handlers::{assignment::assignment_response, schedule::slot_response},
    middleware::{auth, error_handling::AppError},
    ApiState,
};

/// How many soonest-due assignments the home view shows.
const UPCOMING_LIMIT: i64 = 5;
/// How many personal items the home view shows.
const ITEMS_LIMIT: i64 = 5;

/// The aggregated home view. Each section is read independently and a
/// failing section degrades to empty rather than failing the whole view.
#[axum::debug_handler]
pub async fn get_dashboard(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
) -> Result<Json<DashboardResponse>, AppError> {
    let actor = auth::require_actor(&state.db_pool, &headers).await?;

    let classes = fetch_classes(&state, &actor).await;
    let class_ids: Vec<Uuid> = classes.iter().map(|c| c.id).collect();

    let upcoming_assignments = fetch_upcoming(&state, &actor).await;
    let schedule = fetch_schedule(&state, &class_ids).await;
    let items = fetch_items(&state, &actor).await;

    Ok(Json(DashboardResponse {
        classes,
        upcoming_assignments,
        schedule,
        items,
    }))
}

async fn fetch_classes(state: &Arc<ApiState>, actor: &Actor) -> Vec<ClassResponse> {
    let result = match actor.role {
        Role::Teacher => {
            classboard_db::repositories::class::list_classes_by_teacher(
                &state.db_pool,
                actor.user_id,
            )
            .await
            .map(|classes| {
                classes
                    .into_iter()
                    .map(|c| ClassResponse {
                        id: c.id,
                        name: c.name,
                        description: c.description,
                        teacher_id: c.teacher_id,
                        created_at: c.created_at,
                    })
                    .collect()
            })
        }
        Role::Student => {
            classboard_db::repositories::class::list_classes_by_student(
                &state.db_pool,
                actor.user_id,
            )
            .await
            .map(|classes| {
                classes
                    .into_iter()
                    .map(crate::handlers::class::class_response)
                    .collect()
            })
        }
    };

    result.unwrap_or_else(|e| {
        tracing::warn!("Dashboard class section failed: {}", e);
        Vec::new()
    })
}

async fn fetch_upcoming(
    state: &Arc<ApiState>,
    actor: &Actor,
) -> Vec<classboard_core::models::assignment::AssignmentResponse> {
    let result = match actor.role {
        Role::Teacher => {
            classboard_db::repositories::assignment::upcoming_for_teacher(
                &state.db_pool,
                actor.user_id,
                UPCOMING_LIMIT,
            )
            .await
        }
        Role::Student => {
            classboard_db::repositories::assignment::upcoming_for_student(
                &state.db_pool,
                actor.user_id,
                UPCOMING_LIMIT,
            )
            .await
        }
    };

    match result {
        Ok(assignments) => assignments
            .into_iter()
            .filter_map(|a| assignment_response(a).ok())
            .collect(),
        Err(e) => {
            tracing::warn!("Dashboard assignment section failed: {}", e);
            Vec::new()
        }
    }
}

async fn fetch_schedule(
    state: &Arc<ApiState>,
    class_ids: &[Uuid],
) -> Vec<classboard_core::models::class::ScheduleSlotResponse> {
    match classboard_db::repositories::schedule_slot::list_slots_for_classes(
        &state.db_pool,
        class_ids,
    )
    .await
    {
        Ok(slots) => slots.into_iter().filter_map(|s| slot_response(s).ok()).collect(),
        Err(e) => {
            tracing::warn!("Dashboard schedule section failed: {}", e);
            Vec::new()
        }
    }
}

async fn fetch_items(state: &Arc<ApiState>, actor: &Actor) -> Vec<DashboardItemResponse> {
    match classboard_db::repositories::dashboard_item::list_items_by_owner(
        &state.db_pool,
        actor.user_id,
        Some(ITEMS_LIMIT),
    )
    .await
    {
        Ok(items) => items.into_iter().filter_map(|i| item_response(i).ok()).collect(),
        Err(e) => {
            tracing::warn!("Dashboard item section failed: {}", e);
            Vec::new()
        }
    }
}

#[axum::debug_handler]
pub async fn create_item(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    Json(payload): Json<CreateDashboardItemRequest>,
) -> Result<Json<DashboardItemResponse>, AppError> {
    let actor = auth::require_actor(&state.db_pool, &headers).await?;

    if payload.title.trim().is_empty() {
        return Err(AppError(BoardError::Validation(
            "item title is required".to_string(),
        )));
    }

    let status = payload.status.unwrap_or(ItemStatus::Pending);
    let priority = payload.priority.unwrap_or(Priority::Medium);
    let item_type = payload.item_type.unwrap_or(ItemType::Task);
    let due_date = payload.due_date.unwrap_or_else(|| default_due_date(Utc::now()));

    let item = classboard_db::repositories::dashboard_item::create_item(
        &state.db_pool,
        actor.user_id,
        payload.title.trim(),
        &payload.description,
        status.as_str(),
        priority.as_str(),
        item_type.as_str(),
        due_date,
    )
    .await
    .map_err(BoardError::Database)?;

    Ok(Json(item_response(item)?))
}

#[axum::debug_handler]
pub async fn list_items(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<DashboardItemResponse>>, AppError> {
    let actor = auth::require_actor(&state.db_pool, &headers).await?;

    let items = classboard_db::repositories::dashboard_item::list_items_by_owner(
        &state.db_pool,
        actor.user_id,
        None,
    )
    .await
    .map_err(BoardError::Database)?
    .into_iter()
    .map(item_response)
    .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(items))
}

#[axum::debug_handler]
pub async fn get_item(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    Path(item_id): Path<Uuid>,
) -> Result<Json<DashboardItemResponse>, AppError> {
    let actor = auth::require_actor(&state.db_pool, &headers).await?;
    let item = fetch_item(&state, item_id).await?;

    authorize(
        Some(&actor),
        Action::Read,
        &Target::OwnedItem {
            owner_id: item.owner_id,
        },
    )
    .require(&format!("item {}", item_id))?;

    Ok(Json(item_response(item)?))
}

#[axum::debug_handler]
pub async fn update_item(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    Path(item_id): Path<Uuid>,
    Json(payload): Json<UpdateDashboardItemRequest>,
) -> Result<Json<DashboardItemResponse>, AppError> {
    let actor = auth::require_actor(&state.db_pool, &headers).await?;
    let item = fetch_item(&state, item_id).await?;

    authorize(
        Some(&actor),
        Action::Update,
        &Target::OwnedItem {
            owner_id: item.owner_id,
        },
    )
    .require(&format!("item {}", item_id))?;

    let status = match payload.status {
        Some(s) => s,
        None => ItemStatus::parse(&item.status)
            .ok_or_else(|| BoardError::Validation(format!("unknown item status: {}", item.status)))?,
    };
    let priority = match payload.priority {
        Some(p) => p,
        None => Priority::parse(&item.priority).ok_or_else(|| {
            BoardError::Validation(format!("unknown item priority: {}", item.priority))
        })?,
    };
    let item_type = match payload.item_type {
        Some(t) => t,
        None => ItemType::parse(&item.item_type).ok_or_else(|| {
            BoardError::Validation(format!("unknown item type: {}", item.item_type))
        })?,
    };

    let title = payload.title.as_deref().unwrap_or(&item.title);
    if title.trim().is_empty() {
        return Err(AppError(BoardError::Validation(
            "item title is required".to_string(),
        )));
    }
    let description = payload.description.as_deref().unwrap_or(&item.description);
    let due_date = payload.due_date.unwrap_or(item.due_date);

    let updated = classboard_db::repositories::dashboard_item::update_item(
        &state.db_pool,
        item_id,
        title.trim(),
        description,
        status.as_str(),
        priority.as_str(),
        item_type.as_str(),
        due_date,
    )
    .await
    .map_err(BoardError::Database)?;

    Ok(Json(item_response(updated)?))
}

#[axum::debug_handler]
pub async fn delete_item(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    Path(item_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let actor = auth::require_actor(&state.db_pool, &headers).await?;
    let item = fetch_item(&state, item_id).await?;

    authorize(
        Some(&actor),
        Action::Delete,
        &Target::OwnedItem {
            owner_id: item.owner_id,
        },
    )
    .require(&format!("item {}", item_id))?;

    classboard_db::repositories::dashboard_item::delete_item(&state.db_pool, item_id)
        .await
        .map_err(BoardError::Database)?;

    Ok(Json(serde_json::json!({ "deleted": item_id })))
}

async fn fetch_item(
    state: &Arc<ApiState>,
    item_id: Uuid,
) -> Result<classboard_db::models::DbDashboardItem, AppError> {
    let item = classboard_db::repositories::dashboard_item::get_item_by_id(&state.db_pool, item_id)
        .await
        .map_err(BoardError::Database)?
        .ok_or_else(|| BoardError::NotFound(format!("item {} not found", item_id)))?;
    Ok(item)
}

fn item_response(
    item: classboard_db::models::DbDashboardItem,
) -> Result<DashboardItemResponse, AppError> {
    let status = ItemStatus::parse(&item.status).ok_or_else(|| {
        AppError(BoardError::Validation(format!(
            "unknown item status: {}",
            item.status
        )))
    })?;
    let priority = Priority::parse(&item.priority).ok_or_else(|| {
        AppError(BoardError::Validation(format!(
            "unknown item priority: {}",
            item.priority
        )))
    })?;
    let item_type = ItemType::parse(&item.item_type).ok_or_else(|| {
        AppError(BoardError::Validation(format!(
            "unknown item type: {}",
            item.item_type
        )))
    })?;

    Ok(DashboardItemResponse {
        id: item.id,
        title: item.title,
        description: item.description,
        status,
        priority,
        item_type,
        due_date: item.due_date,
        is_overdue: is_overdue(item.due_date, status, Utc::now()),
        created_at: item.created_at,
    })
}
