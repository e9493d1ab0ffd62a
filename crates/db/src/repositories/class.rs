use crate::models::{DbClass, DbClassSummary};
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_class(
    pool: &Pool<Postgres>,
    name: &str,
    description: &str,
    teacher_id: Uuid,
) -> Result<DbClass> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!("Creating class: id={}, name={}, teacher_id={}", id, name, teacher_id);

    let class = sqlx::query_as::<_, DbClass>(
        r#"
        INSERT INTO classes (id, name, description, teacher_id, created_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, name, description, teacher_id, created_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(description)
    .bind(teacher_id)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(class)
}

pub async fn get_class_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbClass>> {
    let class = sqlx::query_as::<_, DbClass>(
        r#"
        SELECT id, name, description, teacher_id, created_at
        FROM classes
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(class)
}

pub async fn update_class(
    pool: &Pool<Postgres>,
    id: Uuid,
    name: &str,
    description: &str,
) -> Result<DbClass> {
    let class = sqlx::query_as::<_, DbClass>(
        r#"
        UPDATE classes
        SET name = $2, description = $3
        WHERE id = $1
        RETURNING id, name, description, teacher_id, created_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(description)
    .fetch_one(pool)
    .await?;

    Ok(class)
}

/// Deletes a class and everything under it. The child deletes and the
/// class delete commit together or not at all.
pub async fn delete_class(pool: &Pool<Postgres>, id: Uuid) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        DELETE FROM submissions
        WHERE assignment_id IN (SELECT id FROM assignments WHERE class_id = $1)
        "#,
    )
    .bind(id)
    .execute(&mut *tx)
    .await?;

    sqlx::query("DELETE FROM assignments WHERE class_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM schedule_slots WHERE class_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM enrollments WHERE class_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM classes WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::debug!("Deleted class and children: id={}", id);
    Ok(())
}

/// All classes a teacher owns, most recently created first, with the
/// roster size joined in.
pub async fn list_classes_by_teacher(
    pool: &Pool<Postgres>,
    teacher_id: Uuid,
) -> Result<Vec<DbClassSummary>> {
    let classes = sqlx::query_as::<_, DbClassSummary>(
        r#"
        SELECT c.id, c.name, c.description, c.teacher_id, c.created_at,
               COUNT(e.student_id) AS student_count
        FROM classes c
        LEFT JOIN enrollments e ON c.id = e.class_id
        WHERE c.teacher_id = $1
        GROUP BY c.id
        ORDER BY c.created_at DESC
        "#,
    )
    .bind(teacher_id)
    .fetch_all(pool)
    .await?;

    Ok(classes)
}

/// All classes a student is enrolled in, most recently created first.
pub async fn list_classes_by_student(
    pool: &Pool<Postgres>,
    student_id: Uuid,
) -> Result<Vec<DbClass>> {
    let classes = sqlx::query_as::<_, DbClass>(
        r#"
        SELECT c.id, c.name, c.description, c.teacher_id, c.created_at
        FROM classes c
        JOIN enrollments e ON c.id = e.class_id
        WHERE e.student_id = $1
        ORDER BY c.created_at DESC
        "#,
    )
    .bind(student_id)
    .fetch_all(pool)
    .await?;

    Ok(classes)
}
