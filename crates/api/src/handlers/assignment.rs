use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use classboard_core::{
    access::{authorize, Action, Target},
    errors::BoardError,
    models::assignment::{
        AssignmentResponse, AssignmentStatus, CreateAssignmentRequest, GradeRequest,
        StudentAssignmentView, SubmissionResponse, SubmitRequest, TeacherAssignmentView,
        UpdateAssignmentStatusRequest,
    },
    models::user::Role,
};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    handlers::{class::fetch_class, class_scope_for},
    middleware::{auth, error_handling::AppError},
    ApiState,
};

/// Either shape of the assignment list, decided by the caller's role.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum AssignmentListResponse {
    Teacher(Vec<TeacherAssignmentView>),
    Student(Vec<StudentAssignmentView>),
}

#[axum::debug_handler]
pub async fn create_assignment(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    Path(class_id): Path<Uuid>,
    Json(payload): Json<CreateAssignmentRequest>,
) -> Result<Json<AssignmentResponse>, AppError> {
    let actor = auth::require_actor(&state.db_pool, &headers).await?;
    let db_class = fetch_class(&state, class_id).await?;

    let scope = class_scope_for(&state.db_pool, &actor, &db_class).await?;
    authorize(Some(&actor), Action::Create, &Target::Class(scope))
        .require(&format!("assignments for class {}", class_id))?;

    if payload.title.trim().is_empty() {
        return Err(AppError(BoardError::Validation(
            "assignment title is required".to_string(),
        )));
    }
    let Some(due_date) = payload.due_date else {
        return Err(AppError(BoardError::Validation(
            "due_date is required".to_string(),
        )));
    };

    // New assignments always start as drafts, invisible to students until
    // the teacher publishes them.
    let assignment = classboard_db::repositories::assignment::create_assignment(
        &state.db_pool,
        class_id,
        payload.title.trim(),
        &payload.description,
        due_date,
        AssignmentStatus::Draft.as_str(),
    )
    .await
    .map_err(BoardError::Database)?;

    tracing::info!("Created assignment: id={}, class_id={}", assignment.id, class_id);

    Ok(Json(assignment_response(assignment)?))
}

#[axum::debug_handler]
pub async fn set_assignment_status(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    Path(assignment_id): Path<Uuid>,
    Json(payload): Json<UpdateAssignmentStatusRequest>,
) -> Result<Json<AssignmentResponse>, AppError> {
    let actor = auth::require_actor(&state.db_pool, &headers).await?;
    let assignment = fetch_assignment(&state, assignment_id).await?;
    let db_class = fetch_class(&state, assignment.class_id).await?;

    let scope = class_scope_for(&state.db_pool, &actor, &db_class).await?;
    authorize(Some(&actor), Action::Update, &Target::Class(scope))
        .require(&format!("assignment {}", assignment_id))?;

    let updated = classboard_db::repositories::assignment::set_status(
        &state.db_pool,
        assignment_id,
        payload.status.as_str(),
    )
    .await
    .map_err(BoardError::Database)?;

    tracing::info!(
        "Assignment status change: id={}, status={}",
        assignment_id,
        updated.status
    );

    Ok(Json(assignment_response(updated)?))
}

#[axum::debug_handler]
pub async fn list_assignments(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    Path(class_id): Path<Uuid>,
) -> Result<Json<AssignmentListResponse>, AppError> {
    let actor = auth::require_actor(&state.db_pool, &headers).await?;
    let db_class = fetch_class(&state, class_id).await?;

    let scope = class_scope_for(&state.db_pool, &actor, &db_class).await?;
    authorize(Some(&actor), Action::Read, &Target::Class(scope))
        .require(&format!("assignments for class {}", class_id))?;

    let response = match actor.role {
        Role::Teacher => {
            let views = classboard_db::repositories::assignment::list_for_class_teacher(
                &state.db_pool,
                class_id,
            )
            .await
            .map_err(BoardError::Database)?
            .into_iter()
            .map(|a| {
                let status = AssignmentStatus::parse(&a.status).ok_or_else(|| {
                    BoardError::Validation(format!("unknown assignment status: {}", a.status))
                })?;
                Ok(TeacherAssignmentView {
                    id: a.id,
                    title: a.title,
                    due_date: a.due_date,
                    status,
                    submission_count: a.submission_count,
                    graded_count: a.graded_count,
                })
            })
            .collect::<Result<Vec<_>, BoardError>>()?;
            AssignmentListResponse::Teacher(views)
        }
        Role::Student => {
            let views = classboard_db::repositories::assignment::list_for_class_student(
                &state.db_pool,
                class_id,
                actor.user_id,
            )
            .await
            .map_err(BoardError::Database)?
            .into_iter()
            .map(|a| StudentAssignmentView {
                id: a.id,
                title: a.title,
                description: a.description,
                due_date: a.due_date,
                submitted: a.submitted,
                grade: a.grade,
            })
            .collect();
            AssignmentListResponse::Student(views)
        }
    };

    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn submit_assignment(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    Path(assignment_id): Path<Uuid>,
    Json(payload): Json<SubmitRequest>,
) -> Result<Json<SubmissionResponse>, AppError> {
    let actor = auth::require_actor(&state.db_pool, &headers).await?;
    let assignment = fetch_assignment(&state, assignment_id).await?;
    let db_class = fetch_class(&state, assignment.class_id).await?;

    let scope = class_scope_for(&state.db_pool, &actor, &db_class).await?;
    authorize(Some(&actor), Action::Create, &Target::Submission(scope))
        .require(&format!("submission for assignment {}", assignment_id))?;

    // A draft is invisible to students, so it reads as absent rather than
    // forbidden. An archived assignment no longer accepts work.
    match AssignmentStatus::parse(&assignment.status) {
        Some(AssignmentStatus::Published) => {}
        Some(AssignmentStatus::Draft) | None => {
            return Err(AppError(BoardError::NotFound(format!(
                "assignment {} not found",
                assignment_id
            ))));
        }
        Some(AssignmentStatus::Archived) => {
            return Err(AppError(BoardError::Validation(
                "assignment is archived".to_string(),
            )));
        }
    }

    if payload.content.trim().is_empty() {
        return Err(AppError(BoardError::Validation(
            "submission content is required".to_string(),
        )));
    }

    // Resubmission lands on the same row: content and timestamp refresh,
    // an existing grade stays put.
    let submission = classboard_db::repositories::submission::upsert_submission(
        &state.db_pool,
        assignment_id,
        actor.user_id,
        &payload.content,
    )
    .await
    .map_err(BoardError::Database)?;

    tracing::info!(
        "Submission: assignment_id={}, student_id={}",
        assignment_id,
        actor.user_id
    );

    Ok(Json(submission_response(submission)))
}

#[axum::debug_handler]
pub async fn grade_submission(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    Path(submission_id): Path<Uuid>,
    Json(payload): Json<GradeRequest>,
) -> Result<Json<SubmissionResponse>, AppError> {
    let actor = auth::require_actor(&state.db_pool, &headers).await?;

    let submission =
        classboard_db::repositories::submission::get_submission_by_id(&state.db_pool, submission_id)
            .await
            .map_err(BoardError::Database)?
            .ok_or_else(|| BoardError::NotFound(format!("submission {} not found", submission_id)))?;

    let assignment = fetch_assignment(&state, submission.assignment_id).await?;
    let db_class = fetch_class(&state, assignment.class_id).await?;

    let scope = class_scope_for(&state.db_pool, &actor, &db_class).await?;
    authorize(Some(&actor), Action::Grade, &Target::Submission(scope))
        .require(&format!("grade submission {}", submission_id))?;

    if !(0.0..=100.0).contains(&payload.score) {
        return Err(AppError(BoardError::Validation(
            "score must be between 0 and 100".to_string(),
        )));
    }

    let graded = classboard_db::repositories::submission::grade_submission(
        &state.db_pool,
        submission_id,
        payload.score,
        payload.feedback.as_deref(),
    )
    .await
    .map_err(BoardError::Database)?;

    tracing::info!("Graded submission: id={}, score={}", submission_id, payload.score);

    Ok(Json(submission_response(graded)))
}

async fn fetch_assignment(
    state: &Arc<ApiState>,
    assignment_id: Uuid,
) -> Result<classboard_db::models::DbAssignment, AppError> {
    let assignment = classboard_db::repositories::assignment::get_assignment_by_id(
        &state.db_pool,
        assignment_id,
    )
    .await
    .map_err(BoardError::Database)?
    .ok_or_else(|| BoardError::NotFound(format!("assignment {} not found", assignment_id)))?;
    Ok(assignment)
}

pub(crate) fn assignment_response(
    assignment: classboard_db::models::DbAssignment,
) -> Result<AssignmentResponse, AppError> {
    let status = AssignmentStatus::parse(&assignment.status).ok_or_else(|| {
        AppError(BoardError::Validation(format!(
            "unknown assignment status: {}",
            assignment.status
        )))
    })?;

    Ok(AssignmentResponse {
        id: assignment.id,
        class_id: assignment.class_id,
        title: assignment.title,
        description: assignment.description,
        due_date: assignment.due_date,
        status,
        created_at: assignment.created_at,
    })
}

fn submission_response(submission: classboard_db::models::DbSubmission) -> SubmissionResponse {
    SubmissionResponse {
        id: submission.id,
        assignment_id: submission.assignment_id,
        student_id: submission.student_id,
        submitted_at: submission.submitted_at,
        grade: submission.grade,
        feedback: submission.feedback,
    }
}
