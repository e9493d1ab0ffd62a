use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Assignment lifecycle. New assignments start as drafts and stay hidden
/// from students until the owning teacher publishes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentStatus {
    Draft,
    Published,
    Archived,
}

impl AssignmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentStatus::Draft => "draft",
            AssignmentStatus::Published => "published",
            AssignmentStatus::Archived => "archived",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(AssignmentStatus::Draft),
            "published" => Some(AssignmentStatus::Published),
            "archived" => Some(AssignmentStatus::Archived),
            _ => None,
        }
    }
}

impl Default for AssignmentStatus {
    fn default() -> Self {
        AssignmentStatus::Draft
    }
}

/// Per-student submission lifecycle. Resubmission refreshes the content
/// and timestamp but never moves a graded submission back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    NotSubmitted,
    Submitted,
    Graded,
}

impl SubmissionState {
    pub fn from_parts(submitted: bool, graded: bool) -> Self {
        match (submitted, graded) {
            (false, _) => SubmissionState::NotSubmitted,
            (true, false) => SubmissionState::Submitted,
            (true, true) => SubmissionState::Graded,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAssignmentRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentResponse {
    pub id: Uuid,
    pub class_id: Uuid,
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub status: AssignmentStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAssignmentStatusRequest {
    pub status: AssignmentStatus,
}

/// Teacher-facing list entry: aggregate submission progress, no per-student
/// content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeacherAssignmentView {
    pub id: Uuid,
    pub title: String,
    pub due_date: DateTime<Utc>,
    pub status: AssignmentStatus,
    pub submission_count: i64,
    pub graded_count: i64,
}

/// Student-facing list entry: only the caller's own submission state is
/// joined in. Other students' submissions are never exposed here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentAssignmentView {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub submitted: bool,
    pub grade: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitRequest {
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionResponse {
    pub id: Uuid,
    pub assignment_id: Uuid,
    pub student_id: Uuid,
    pub submitted_at: DateTime<Utc>,
    pub grade: Option<f64>,
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeRequest {
    pub score: f64,
    #[serde(default)]
    pub feedback: Option<String>,
}
