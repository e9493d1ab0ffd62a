use crate::models::DbScheduleSlot;
use chrono::{NaiveTime, Utc};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

// Display order is weekday-index then start time; multiple slots per day
// may coexist, overlap is not the store's concern.
const SLOT_ORDERING: &str = r#"
    ORDER BY CASE day_of_week
        WHEN 'monday' THEN 1
        WHEN 'tuesday' THEN 2
        WHEN 'wednesday' THEN 3
        WHEN 'thursday' THEN 4
        WHEN 'friday' THEN 5
        ELSE 6
    END, start_time ASC
"#;

pub async fn create_slot(
    pool: &Pool<Postgres>,
    class_id: Uuid,
    day_of_week: &str,
    start_time: NaiveTime,
    end_time: NaiveTime,
) -> Result<DbScheduleSlot> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let slot = sqlx::query_as::<_, DbScheduleSlot>(
        r#"
        INSERT INTO schedule_slots (id, class_id, day_of_week, start_time, end_time, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, class_id, day_of_week, start_time, end_time, created_at
        "#,
    )
    .bind(id)
    .bind(class_id)
    .bind(day_of_week)
    .bind(start_time)
    .bind(end_time)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(slot)
}

pub async fn get_slot_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbScheduleSlot>> {
    let slot = sqlx::query_as::<_, DbScheduleSlot>(
        r#"
        SELECT id, class_id, day_of_week, start_time, end_time, created_at
        FROM schedule_slots
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(slot)
}

pub async fn list_slots_by_class(
    pool: &Pool<Postgres>,
    class_id: Uuid,
) -> Result<Vec<DbScheduleSlot>> {
    let query = format!(
        r#"
        SELECT id, class_id, day_of_week, start_time, end_time, created_at
        FROM schedule_slots
        WHERE class_id = $1
        {SLOT_ORDERING}
        "#
    );

    let slots = sqlx::query_as::<_, DbScheduleSlot>(&query)
        .bind(class_id)
        .fetch_all(pool)
        .await?;

    Ok(slots)
}

/// Slots across a set of classes, for the dashboard view.
pub async fn list_slots_for_classes(
    pool: &Pool<Postgres>,
    class_ids: &[Uuid],
) -> Result<Vec<DbScheduleSlot>> {
    if class_ids.is_empty() {
        return Ok(Vec::new());
    }

    let query = format!(
        r#"
        SELECT id, class_id, day_of_week, start_time, end_time, created_at
        FROM schedule_slots
        WHERE class_id = ANY($1)
        {SLOT_ORDERING}
        "#
    );

    let slots = sqlx::query_as::<_, DbScheduleSlot>(&query)
        .bind(class_ids)
        .fetch_all(pool)
        .await?;

    Ok(slots)
}

pub async fn delete_slot(pool: &Pool<Postgres>, id: Uuid) -> Result<()> {
    sqlx::query(
        r#"
        DELETE FROM schedule_slots
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}
