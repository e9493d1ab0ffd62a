use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use classboard_core::{
    access::{authorize, Action, Target},
    errors::BoardError,
    models::class::{
        ClassListEntry, ClassResponse, CreateClassRequest, EnrollRequest, EnrollResponse,
        UpdateClassRequest,
    },
    models::user::{Role, StudentResponse},
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    handlers::class_scope_for,
    middleware::{auth, error_handling::AppError},
    ApiState,
};

#[axum::debug_handler]
pub async fn create_class(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    Json(payload): Json<CreateClassRequest>,
) -> Result<Json<ClassResponse>, AppError> {
    let actor = auth::resolve_actor(&state.db_pool, &headers).await?;
    authorize(actor.as_ref(), Action::Create, &Target::NewClass).require("create class")?;
    let Some(actor) = actor else {
        return Err(AppError(BoardError::Unauthenticated));
    };

    if payload.name.trim().is_empty() {
        return Err(AppError(BoardError::Validation(
            "class name is required".to_string(),
        )));
    }

    let db_class = classboard_db::repositories::class::create_class(
        &state.db_pool,
        payload.name.trim(),
        &payload.description,
        actor.user_id,
    )
    .await
    .map_err(BoardError::Database)?;

    tracing::info!("Created class: id={}, teacher_id={}", db_class.id, actor.user_id);

    Ok(Json(class_response(db_class)))
}

#[axum::debug_handler]
pub async fn list_classes(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<ClassListEntry>>, AppError> {
    let actor = auth::require_actor(&state.db_pool, &headers).await?;

    let entries = match actor.role {
        Role::Teacher => {
            classboard_db::repositories::class::list_classes_by_teacher(
                &state.db_pool,
                actor.user_id,
            )
            .await
            .map_err(BoardError::Database)?
            .into_iter()
            .map(|c| ClassListEntry {
                id: c.id,
                name: c.name,
                description: c.description,
                teacher_id: c.teacher_id,
                created_at: c.created_at,
                student_count: Some(c.student_count),
            })
            .collect()
        }
        Role::Student => {
            classboard_db::repositories::class::list_classes_by_student(
                &state.db_pool,
                actor.user_id,
            )
            .await
            .map_err(BoardError::Database)?
            .into_iter()
            .map(|c| ClassListEntry {
                id: c.id,
                name: c.name,
                description: c.description,
                teacher_id: c.teacher_id,
                created_at: c.created_at,
                student_count: None,
            })
            .collect()
        }
    };

    Ok(Json(entries))
}

#[axum::debug_handler]
pub async fn get_class(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    Path(class_id): Path<Uuid>,
) -> Result<Json<ClassResponse>, AppError> {
    let actor = auth::require_actor(&state.db_pool, &headers).await?;
    let db_class = fetch_class(&state, class_id).await?;

    let scope = class_scope_for(&state.db_pool, &actor, &db_class).await?;
    authorize(Some(&actor), Action::Read, &Target::Class(scope))
        .require(&format!("class {}", class_id))?;

    Ok(Json(class_response(db_class)))
}

#[axum::debug_handler]
pub async fn update_class(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    Path(class_id): Path<Uuid>,
    Json(payload): Json<UpdateClassRequest>,
) -> Result<Json<ClassResponse>, AppError> {
    let actor = auth::require_actor(&state.db_pool, &headers).await?;
    let db_class = fetch_class(&state, class_id).await?;

    let scope = class_scope_for(&state.db_pool, &actor, &db_class).await?;
    authorize(Some(&actor), Action::Update, &Target::Class(scope))
        .require(&format!("class {}", class_id))?;

    let name = payload.name.as_deref().unwrap_or(&db_class.name);
    if name.trim().is_empty() {
        return Err(AppError(BoardError::Validation(
            "class name is required".to_string(),
        )));
    }
    let description = payload
        .description
        .as_deref()
        .unwrap_or(&db_class.description);

    let updated = classboard_db::repositories::class::update_class(
        &state.db_pool,
        class_id,
        name.trim(),
        description,
    )
    .await
    .map_err(BoardError::Database)?;

    Ok(Json(class_response(updated)))
}

#[axum::debug_handler]
pub async fn delete_class(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    Path(class_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let actor = auth::require_actor(&state.db_pool, &headers).await?;
    let db_class = fetch_class(&state, class_id).await?;

    let scope = class_scope_for(&state.db_pool, &actor, &db_class).await?;
    authorize(Some(&actor), Action::Delete, &Target::Class(scope))
        .require(&format!("class {}", class_id))?;

    classboard_db::repositories::class::delete_class(&state.db_pool, class_id)
        .await
        .map_err(BoardError::Database)?;

    tracing::info!("Deleted class: id={}", class_id);

    Ok(Json(serde_json::json!({ "deleted": class_id })))
}

#[axum::debug_handler]
pub async fn list_students(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    Path(class_id): Path<Uuid>,
) -> Result<Json<Vec<StudentResponse>>, AppError> {
    let actor = auth::require_actor(&state.db_pool, &headers).await?;
    let db_class = fetch_class(&state, class_id).await?;

    // The roster is owner-only: students never list each other, so their
    // read access to the class does not extend here.
    if actor.role != Role::Teacher {
        return Err(AppError(BoardError::RoleForbidden(
            "roster listing".to_string(),
        )));
    }
    let scope = class_scope_for(&state.db_pool, &actor, &db_class).await?;
    authorize(Some(&actor), Action::Read, &Target::Class(scope))
        .require(&format!("class {} roster", class_id))?;

    let students = classboard_db::repositories::enrollment::list_students(&state.db_pool, class_id)
        .await
        .map_err(BoardError::Database)?
        .into_iter()
        .map(|s| StudentResponse {
            id: s.id,
            username: s.username,
            email: s.email,
            enrolled_at: s.enrolled_at,
        })
        .collect();

    Ok(Json(students))
}

#[axum::debug_handler]
pub async fn enroll_student(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    Path(class_id): Path<Uuid>,
    Json(payload): Json<EnrollRequest>,
) -> Result<Json<EnrollResponse>, AppError> {
    let actor = auth::require_actor(&state.db_pool, &headers).await?;
    let db_class = fetch_class(&state, class_id).await?;

    let scope = class_scope_for(&state.db_pool, &actor, &db_class).await?;
    authorize(Some(&actor), Action::Create, &Target::Class(scope))
        .require(&format!("enroll into class {}", class_id))?;

    // Resolve the student by email; a missing user and a non-student user
    // are the same NotFound to the caller.
    let student =
        classboard_db::repositories::user::get_user_by_email(&state.db_pool, &payload.email)
            .await
            .map_err(BoardError::Database)?
            .filter(|u| Role::parse(&u.role) == Some(Role::Student))
            .ok_or_else(|| {
                BoardError::NotFound(format!("no student with email {}", payload.email))
            })?;

    // A duplicate pair is a reported conflict, decided by the store's
    // uniqueness constraint, not by a prior existence check.
    let enrollment =
        classboard_db::repositories::enrollment::enroll(&state.db_pool, class_id, student.id)
            .await
            .map_err(BoardError::Database)?
            .ok_or_else(|| {
                BoardError::AlreadyExists(format!("{} is already enrolled", payload.email))
            })?;

    tracing::info!("Enrolled student: class_id={}, student_id={}", class_id, student.id);

    Ok(Json(EnrollResponse {
        class_id: enrollment.class_id,
        student_id: enrollment.student_id,
        enrolled_at: enrollment.created_at,
    }))
}

#[axum::debug_handler]
pub async fn unenroll_student(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    Path((class_id, student_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let actor = auth::require_actor(&state.db_pool, &headers).await?;
    let db_class = fetch_class(&state, class_id).await?;

    let scope = class_scope_for(&state.db_pool, &actor, &db_class).await?;
    authorize(Some(&actor), Action::Delete, &Target::Class(scope))
        .require(&format!("unenroll from class {}", class_id))?;

    // Removing an absent pair succeeds; delete is idempotent.
    classboard_db::repositories::enrollment::unenroll(&state.db_pool, class_id, student_id)
        .await
        .map_err(BoardError::Database)?;

    Ok(Json(serde_json::json!({ "unenrolled": student_id })))
}

pub(crate) async fn fetch_class(
    state: &Arc<ApiState>,
    class_id: Uuid,
) -> Result<classboard_db::models::DbClass, AppError> {
    let class = classboard_db::repositories::class::get_class_by_id(&state.db_pool, class_id)
        .await
        .map_err(BoardError::Database)?
        .ok_or_else(|| BoardError::NotFound(format!("class {} not found", class_id)))?;
    Ok(class)
}

pub(crate) fn class_response(db_class: classboard_db::models::DbClass) -> ClassResponse {
    ClassResponse {
        id: db_class.id,
        name: db_class.name,
        description: db_class.description,
        teacher_id: db_class.teacher_id,
        created_at: db_class.created_at,
    }
}
