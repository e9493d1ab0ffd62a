use crate::models::{DbAssignment, DbAssignmentForStudent, DbAssignmentWithStats};
use chrono::{DateTime, Utc};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_assignment(
    pool: &Pool<Postgres>,
    class_id: Uuid,
    title: &str,
    description: &str,
    due_date: DateTime<Utc>,
    status: &str,
) -> Result<DbAssignment> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!("Creating assignment: id={}, class_id={}, title={}", id, class_id, title);

    let assignment = sqlx::query_as::<_, DbAssignment>(
        r#"
        INSERT INTO assignments (id, class_id, title, description, due_date, status, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, class_id, title, description, due_date, status, created_at
        "#,
    )
    .bind(id)
    .bind(class_id)
    .bind(title)
    .bind(description)
    .bind(due_date)
    .bind(status)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(assignment)
}

pub async fn get_assignment_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbAssignment>> {
    let assignment = sqlx::query_as::<_, DbAssignment>(
        r#"
        SELECT id, class_id, title, description, due_date, status, created_at
        FROM assignments
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(assignment)
}

pub async fn set_status(pool: &Pool<Postgres>, id: Uuid, status: &str) -> Result<DbAssignment> {
    let assignment = sqlx::query_as::<_, DbAssignment>(
        r#"
        UPDATE assignments
        SET status = $2
        WHERE id = $1
        RETURNING id, class_id, title, description, due_date, status, created_at
        "#,
    )
    .bind(id)
    .bind(status)
    .fetch_one(pool)
    .await?;

    Ok(assignment)
}

/// Teacher view of a class's assignments: every status, with submission
/// and graded counts aggregated in.
pub async fn list_for_class_teacher(
    pool: &Pool<Postgres>,
    class_id: Uuid,
) -> Result<Vec<DbAssignmentWithStats>> {
    let assignments = sqlx::query_as::<_, DbAssignmentWithStats>(
        r#"
        SELECT a.id, a.class_id, a.title, a.due_date, a.status,
               COUNT(s.id) AS submission_count,
               COUNT(s.grade) AS graded_count
        FROM assignments a
        LEFT JOIN submissions s ON a.id = s.assignment_id
        WHERE a.class_id = $1
        GROUP BY a.id
        ORDER BY a.due_date DESC
        "#,
    )
    .bind(class_id)
    .fetch_all(pool)
    .await?;

    Ok(assignments)
}

/// Student view of a class's assignments: published only, joined with
/// the calling student's own submission state and nothing else.
pub async fn list_for_class_student(
    pool: &Pool<Postgres>,
    class_id: Uuid,
    student_id: Uuid,
) -> Result<Vec<DbAssignmentForStudent>> {
    let assignments = sqlx::query_as::<_, DbAssignmentForStudent>(
        r#"
        SELECT a.id, a.class_id, a.title, a.description, a.due_date,
               s.submitted_at IS NOT NULL AS submitted,
               s.grade
        FROM assignments a
        LEFT JOIN submissions s
            ON a.id = s.assignment_id AND s.student_id = $2
        WHERE a.class_id = $1 AND a.status = 'published'
        ORDER BY a.due_date DESC
        "#,
    )
    .bind(class_id)
    .bind(student_id)
    .fetch_all(pool)
    .await?;

    Ok(assignments)
}

/// The soonest-due assignments across every class a teacher owns.
pub async fn upcoming_for_teacher(
    pool: &Pool<Postgres>,
    teacher_id: Uuid,
    limit: i64,
) -> Result<Vec<DbAssignment>> {
    let assignments = sqlx::query_as::<_, DbAssignment>(
        r#"
        SELECT a.id, a.class_id, a.title, a.description, a.due_date, a.status, a.created_at
        FROM assignments a
        JOIN classes c ON a.class_id = c.id
        WHERE c.teacher_id = $1
        ORDER BY a.due_date ASC
        LIMIT $2
        "#,
    )
    .bind(teacher_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(assignments)
}

/// The soonest-due published assignments across a student's enrolled
/// classes.
pub async fn upcoming_for_student(
    pool: &Pool<Postgres>,
    student_id: Uuid,
    limit: i64,
) -> Result<Vec<DbAssignment>> {
    let assignments = sqlx::query_as::<_, DbAssignment>(
        r#"
        SELECT a.id, a.class_id, a.title, a.description, a.due_date, a.status, a.created_at
        FROM assignments a
        JOIN enrollments e ON a.class_id = e.class_id
        WHERE e.student_id = $1 AND a.status = 'published'
        ORDER BY a.due_date ASC
        LIMIT $2
        "#,
    )
    .bind(student_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(assignments)
}
