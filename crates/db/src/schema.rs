use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create users table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            username VARCHAR(64) NOT NULL UNIQUE,
            email VARCHAR(120) NOT NULL UNIQUE,
            password_hash VARCHAR(256) NOT NULL,
            role VARCHAR(20) NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create classes table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS classes (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(100) NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            teacher_id UUID NOT NULL REFERENCES users(id),
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create enrollments table; the pair is the primary key so a duplicate
    // enroll is rejected by the store itself, not by application checks.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS enrollments (
            class_id UUID NOT NULL REFERENCES classes(id),
            student_id UUID NOT NULL REFERENCES users(id),
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            PRIMARY KEY (class_id, student_id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create schedule_slots table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schedule_slots (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            class_id UUID NOT NULL REFERENCES classes(id),
            day_of_week VARCHAR(10) NOT NULL,
            start_time TIME NOT NULL,
            end_time TIME NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_time_range CHECK (end_time > start_time)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create assignments table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS assignments (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            class_id UUID NOT NULL REFERENCES classes(id),
            title VARCHAR(200) NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            due_date TIMESTAMP WITH TIME ZONE NOT NULL,
            status VARCHAR(10) NOT NULL DEFAULT 'draft',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create submissions table; one row per (assignment, student), the
    // upsert in the repository leans on this constraint.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS submissions (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            assignment_id UUID NOT NULL REFERENCES assignments(id),
            student_id UUID NOT NULL REFERENCES users(id),
            content TEXT NOT NULL,
            submitted_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            grade DOUBLE PRECISION NULL,
            feedback TEXT NULL,
            UNIQUE (assignment_id, student_id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create dashboard_items table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS dashboard_items (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            owner_id UUID NOT NULL REFERENCES users(id),
            title VARCHAR(200) NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            status VARCHAR(20) NOT NULL DEFAULT 'pending',
            priority VARCHAR(10) NOT NULL DEFAULT 'medium',
            item_type VARCHAR(20) NOT NULL DEFAULT 'task',
            due_date TIMESTAMP WITH TIME ZONE NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_classes_teacher_id ON classes(teacher_id);
        CREATE INDEX IF NOT EXISTS idx_enrollments_student_id ON enrollments(student_id);
        CREATE INDEX IF NOT EXISTS idx_schedule_slots_class_id ON schedule_slots(class_id);
        CREATE INDEX IF NOT EXISTS idx_assignments_class_id ON assignments(class_id);
        CREATE INDEX IF NOT EXISTS idx_assignments_due_date ON assignments(due_date);
        CREATE INDEX IF NOT EXISTS idx_submissions_assignment_id ON submissions(assignment_id);
        CREATE INDEX IF NOT EXISTS idx_submissions_student_id ON submissions(student_id);
        CREATE INDEX IF NOT EXISTS idx_dashboard_items_owner_id ON dashboard_items(owner_id);
        "#,
    )
    .execute(pool)
    .await?;

    info!("Database schema initialized successfully.");
    Ok(())
}
