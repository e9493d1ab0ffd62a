use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbClass {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub teacher_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Teacher-facing class row with the roster size aggregated in.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbClassSummary {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub teacher_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub student_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbEnrollment {
    pub class_id: Uuid,
    pub student_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Roster row: the student joined with their enrollment timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbEnrolledStudent {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub enrolled_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbScheduleSlot {
    pub id: Uuid,
    pub class_id: Uuid,
    pub day_of_week: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAssignment {
    pub id: Uuid,
    pub class_id: Uuid,
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Teacher list row: assignment plus aggregate submission progress.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAssignmentWithStats {
    pub id: Uuid,
    pub class_id: Uuid,
    pub title: String,
    pub due_date: DateTime<Utc>,
    pub status: String,
    pub submission_count: i64,
    pub graded_count: i64,
}

/// Student list row: assignment plus only the caller's own submission
/// state.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAssignmentForStudent {
    pub id: Uuid,
    pub class_id: Uuid,
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub submitted: bool,
    pub grade: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSubmission {
    pub id: Uuid,
    pub assignment_id: Uuid,
    pub student_id: Uuid,
    pub content: String,
    pub submitted_at: DateTime<Utc>,
    pub grade: Option<f64>,
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbDashboardItem {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    pub item_type: String,
    pub due_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
