use crate::models::DbSubmission;
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// Inserts or refreshes the one submission a student has for an
/// assignment. On conflict with the (assignment, student) constraint the
/// content and timestamp are overwritten in place; grade and feedback are
/// left untouched. A single statement, so concurrent submits cannot
/// duplicate the row.
pub async fn upsert_submission(
    pool: &Pool<Postgres>,
    assignment_id: Uuid,
    student_id: Uuid,
    content: &str,
) -> Result<DbSubmission> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Upserting submission: assignment_id={}, student_id={}",
        assignment_id,
        student_id
    );

    let submission = sqlx::query_as::<_, DbSubmission>(
        r#"
        INSERT INTO submissions (id, assignment_id, student_id, content, submitted_at)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (assignment_id, student_id) DO UPDATE
        SET content = EXCLUDED.content,
            submitted_at = EXCLUDED.submitted_at
        RETURNING id, assignment_id, student_id, content, submitted_at, grade, feedback
        "#,
    )
    .bind(id)
    .bind(assignment_id)
    .bind(student_id)
    .bind(content)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(submission)
}

pub async fn get_submission_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbSubmission>> {
    let submission = sqlx::query_as::<_, DbSubmission>(
        r#"
        SELECT id, assignment_id, student_id, content, submitted_at, grade, feedback
        FROM submissions
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(submission)
}

pub async fn get_submission_for_student(
    pool: &Pool<Postgres>,
    assignment_id: Uuid,
    student_id: Uuid,
) -> Result<Option<DbSubmission>> {
    let submission = sqlx::query_as::<_, DbSubmission>(
        r#"
        SELECT id, assignment_id, student_id, content, submitted_at, grade, feedback
        FROM submissions
        WHERE assignment_id = $1 AND student_id = $2
        "#,
    )
    .bind(assignment_id)
    .bind(student_id)
    .fetch_optional(pool)
    .await?;

    Ok(submission)
}

/// Sets score and feedback. The submitted timestamp is not touched;
/// grading is decoupled from the submission upsert.
pub async fn grade_submission(
    pool: &Pool<Postgres>,
    id: Uuid,
    score: f64,
    feedback: Option<&str>,
) -> Result<DbSubmission> {
    let submission = sqlx::query_as::<_, DbSubmission>(
        r#"
        UPDATE submissions
        SET grade = $2, feedback = $3
        WHERE id = $1
        RETURNING id, assignment_id, student_id, content, submitted_at, grade, feedback
        "#,
    )
    .bind(id)
    .bind(score)
    .bind(feedback)
    .fetch_one(pool)
    .await?;

    Ok(submission)
}
