use crate::models::DbDashboardItem;
use chrono::{DateTime, Utc};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_item(
    pool: &Pool<Postgres>,
    owner_id: Uuid,
    title: &str,
    description: &str,
    status: &str,
    priority: &str,
    item_type: &str,
    due_date: DateTime<Utc>,
) -> Result<DbDashboardItem> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let item = sqlx::query_as::<_, DbDashboardItem>(
        r#"
        INSERT INTO dashboard_items
            (id, owner_id, title, description, status, priority, item_type, due_date, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
        RETURNING id, owner_id, title, description, status, priority, item_type,
                  due_date, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(owner_id)
    .bind(title)
    .bind(description)
    .bind(status)
    .bind(priority)
    .bind(item_type)
    .bind(due_date)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(item)
}

pub async fn get_item_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbDashboardItem>> {
    let item = sqlx::query_as::<_, DbDashboardItem>(
        r#"
        SELECT id, owner_id, title, description, status, priority, item_type,
               due_date, created_at, updated_at
        FROM dashboard_items
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(item)
}

/// An owner's items, most recent first. `limit` caps the dashboard
/// excerpt; pass `None` for the full list.
pub async fn list_items_by_owner(
    pool: &Pool<Postgres>,
    owner_id: Uuid,
    limit: Option<i64>,
) -> Result<Vec<DbDashboardItem>> {
    let items = sqlx::query_as::<_, DbDashboardItem>(
        r#"
        SELECT id, owner_id, title, description, status, priority, item_type,
               due_date, created_at, updated_at
        FROM dashboard_items
        WHERE owner_id = $1
        ORDER BY created_at DESC
        LIMIT $2
        "#,
    )
    .bind(owner_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(items)
}

pub async fn update_item(
    pool: &Pool<Postgres>,
    id: Uuid,
    title: &str,
    description: &str,
    status: &str,
    priority: &str,
    item_type: &str,
    due_date: DateTime<Utc>,
) -> Result<DbDashboardItem> {
    let now = Utc::now();

    let item = sqlx::query_as::<_, DbDashboardItem>(
        r#"
        UPDATE dashboard_items
        SET title = $2, description = $3, status = $4, priority = $5,
            item_type = $6, due_date = $7, updated_at = $8
        WHERE id = $1
        RETURNING id, owner_id, title, description, status, priority, item_type,
                  due_date, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(title)
    .bind(description)
    .bind(status)
    .bind(priority)
    .bind(item_type)
    .bind(due_date)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(item)
}

pub async fn delete_item(pool: &Pool<Postgres>, id: Uuid) -> Result<()> {
    sqlx::query(
        r#"
        DELETE FROM dashboard_items
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}
