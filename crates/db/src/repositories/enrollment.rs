use crate::models::{DbEnrolledStudent, DbEnrollment};
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// Inserts an enrollment row. Returns `Ok(None)` when the (class,
/// student) pair already exists: the insert and the conflict check are a
/// single statement, so two racing enrolls cannot both succeed.
pub async fn enroll(
    pool: &Pool<Postgres>,
    class_id: Uuid,
    student_id: Uuid,
) -> Result<Option<DbEnrollment>> {
    let now = Utc::now();

    tracing::debug!("Enrolling student: class_id={}, student_id={}", class_id, student_id);

    let enrollment = sqlx::query_as::<_, DbEnrollment>(
        r#"
        INSERT INTO enrollments (class_id, student_id, created_at)
        VALUES ($1, $2, $3)
        ON CONFLICT (class_id, student_id) DO NOTHING
        RETURNING class_id, student_id, created_at
        "#,
    )
    .bind(class_id)
    .bind(student_id)
    .bind(now)
    .fetch_optional(pool)
    .await?;

    Ok(enrollment)
}

/// Removes the enrollment row if present. Removing an absent pair is a
/// no-op, not an error.
pub async fn unenroll(pool: &Pool<Postgres>, class_id: Uuid, student_id: Uuid) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM enrollments
        WHERE class_id = $1 AND student_id = $2
        "#,
    )
    .bind(class_id)
    .bind(student_id)
    .execute(pool)
    .await?;

    tracing::debug!(
        "Unenrolled student: class_id={}, student_id={}, removed={}",
        class_id,
        student_id,
        result.rows_affected()
    );

    Ok(())
}

pub async fn is_enrolled(pool: &Pool<Postgres>, class_id: Uuid, student_id: Uuid) -> Result<bool> {
    let enrolled = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM enrollments
            WHERE class_id = $1 AND student_id = $2
        )
        "#,
    )
    .bind(class_id)
    .bind(student_id)
    .fetch_one(pool)
    .await?;

    Ok(enrolled)
}

/// The class roster, ordered by username.
pub async fn list_students(
    pool: &Pool<Postgres>,
    class_id: Uuid,
) -> Result<Vec<DbEnrolledStudent>> {
    let students = sqlx::query_as::<_, DbEnrolledStudent>(
        r#"
        SELECT u.id, u.username, u.email, e.created_at AS enrolled_at
        FROM users u
        JOIN enrollments e ON u.id = e.student_id
        WHERE e.class_id = $1
        ORDER BY u.username ASC
        "#,
    )
    .bind(class_id)
    .fetch_all(pool)
    .await?;

    Ok(students)
}

pub async fn count_students(pool: &Pool<Postgres>, class_id: Uuid) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM enrollments WHERE class_id = $1
        "#,
    )
    .bind(class_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}
