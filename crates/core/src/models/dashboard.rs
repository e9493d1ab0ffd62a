use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::assignment::AssignmentResponse;
use crate::models::class::{ClassResponse, ScheduleSlotResponse};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Pending,
    InProgress,
    Completed,
    Archived,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Pending => "pending",
            ItemStatus::InProgress => "in_progress",
            ItemStatus::Completed => "completed",
            ItemStatus::Archived => "archived",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ItemStatus::Pending),
            "in_progress" => Some(ItemStatus::InProgress),
            "completed" => Some(ItemStatus::Completed),
            "archived" => Some(ItemStatus::Archived),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Task,
    Note,
    Project,
    Reminder,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Task => "task",
            ItemType::Note => "note",
            ItemType::Project => "project",
            ItemType::Reminder => "reminder",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "task" => Some(ItemType::Task),
            "note" => Some(ItemType::Note),
            "project" => Some(ItemType::Project),
            "reminder" => Some(ItemType::Reminder),
        _ => None,
        }
    }
}

/// Due date applied when an item is created without one.
pub fn default_due_date(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::days(7)
}

/// An item is overdue once its due date has passed and it was never
/// completed. Archived items can still be overdue.
pub fn is_overdue(due_date: DateTime<Utc>, status: ItemStatus, now: DateTime<Utc>) -> bool {
    due_date < now && status != ItemStatus::Completed
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDashboardItemRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: Option<ItemStatus>,
    pub priority: Option<Priority>,
    pub item_type: Option<ItemType>,
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateDashboardItemRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<ItemStatus>,
    pub priority: Option<Priority>,
    pub item_type: Option<ItemType>,
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardItemResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: ItemStatus,
    pub priority: Priority,
    pub item_type: ItemType,
    pub due_date: DateTime<Utc>,
    pub is_overdue: bool,
    pub created_at: DateTime<Utc>,
}

/// The role-shaped home view. Composed read-only from the other
/// components; an empty class set yields empty collections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub classes: Vec<ClassResponse>,
    pub upcoming_assignments: Vec<AssignmentResponse>,
    pub schedule: Vec<ScheduleSlotResponse>,
    pub items: Vec<DashboardItemResponse>,
}
