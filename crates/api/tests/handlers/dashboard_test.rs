use chrono::{Duration, Utc};
use classboard_api::middleware::error_handling::AppError;
use classboard_core::access::{authorize, Action, Actor, Target};
use classboard_core::errors::BoardError;
use classboard_core::models::dashboard::{
    default_due_date, is_overdue, DashboardItemResponse, ItemStatus, ItemType, Priority,
};
use classboard_core::models::user::Role;
use mockall::predicate;
use uuid::Uuid;

use crate::test_utils::TestContext;

// Wrapper mirroring the dashboard aggregation for a student: each
// section degrades to empty on failure instead of failing the view.
async fn test_student_dashboard_wrapper(
    ctx: &mut TestContext,
    student_id: Uuid,
) -> (usize, usize, usize, usize) {
    let classes = ctx
        .class_repo
        .list_classes_by_student(student_id)
        .await
        .unwrap_or_default();
    let class_ids: Vec<Uuid> = classes.iter().map(|c| c.id).collect();

    let upcoming = ctx
        .assignment_repo
        .upcoming_for_student(student_id, 5)
        .await
        .unwrap_or_default();

    let schedule = if class_ids.is_empty() {
        Vec::new()
    } else {
        ctx.schedule_slot_repo
            .list_slots_for_classes(class_ids)
            .await
            .unwrap_or_default()
    };

    let items = ctx
        .dashboard_item_repo
        .list_items_by_owner(student_id, Some(5))
        .await
        .unwrap_or_default();

    (classes.len(), upcoming.len(), schedule.len(), items.len())
}

// Wrapper mirroring the create-item handler's defaults.
async fn test_create_item_wrapper(
    ctx: &mut TestContext,
    owner_id: Uuid,
    title: &'static str,
    status: Option<ItemStatus>,
    priority: Option<Priority>,
    item_type: Option<ItemType>,
    due_date: Option<chrono::DateTime<Utc>>,
) -> Result<DashboardItemResponse, AppError> {
    if title.trim().is_empty() {
        return Err(AppError(BoardError::Validation(
            "item title is required".to_string(),
        )));
    }

    let status = status.unwrap_or(ItemStatus::Pending);
    let priority = priority.unwrap_or(Priority::Medium);
    let item_type = item_type.unwrap_or(ItemType::Task);
    let due_date = due_date.unwrap_or_else(|| default_due_date(Utc::now()));

    let item = ctx
        .dashboard_item_repo
        .create_item(
            owner_id,
            title,
            "",
            status.as_str(),
            priority.as_str(),
            item_type.as_str(),
            due_date,
        )
        .await
        .map_err(BoardError::Database)?;

    let status = ItemStatus::parse(&item.status).unwrap();
    Ok(DashboardItemResponse {
        id: item.id,
        title: item.title,
        description: item.description,
        status,
        priority: Priority::parse(&item.priority).unwrap(),
        item_type: ItemType::parse(&item.item_type).unwrap(),
        due_date: item.due_date,
        is_overdue: is_overdue(item.due_date, status, Utc::now()),
        created_at: item.created_at,
    })
}

fn db_item(
    owner_id: Uuid,
    status: &str,
    priority: &str,
    item_type: &str,
    due_date: chrono::DateTime<Utc>,
) -> classboard_db::models::DbDashboardItem {
    let now = Utc::now();
    classboard_db::models::DbDashboardItem {
        id: Uuid::new_v4(),
        owner_id,
        title: "Prepare quiz".to_string(),
        description: String::new(),
        status: status.to_string(),
        priority: priority.to_string(),
        item_type: item_type.to_string(),
        due_date,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn test_dashboard_empty_for_new_student() {
    let mut ctx = TestContext::new();
    let student_id = Uuid::new_v4();

    ctx.class_repo
        .expect_list_classes_by_student()
        .with(predicate::eq(student_id))
        .returning(|_| Ok(Vec::new()));
    ctx.assignment_repo
        .expect_upcoming_for_student()
        .returning(|_, _| Ok(Vec::new()));
    // No classes, so the schedule query never runs.
    ctx.schedule_slot_repo.expect_list_slots_for_classes().times(0);
    ctx.dashboard_item_repo
        .expect_list_items_by_owner()
        .returning(|_, _| Ok(Vec::new()));

    let (classes, upcoming, schedule, items) =
        test_student_dashboard_wrapper(&mut ctx, student_id).await;

    assert_eq!((classes, upcoming, schedule, items), (0, 0, 0, 0));
}

#[tokio::test]
async fn test_dashboard_degrades_on_section_failure() {
    let mut ctx = TestContext::new();
    let student_id = Uuid::new_v4();

    // The class section fails outright; the rest of the view still
    // renders with what it can get.
    ctx.class_repo
        .expect_list_classes_by_student()
        .returning(|_| Err(eyre::eyre!("connection reset")));
    ctx.assignment_repo
        .expect_upcoming_for_student()
        .returning(|_, _| Err(eyre::eyre!("connection reset")));
    ctx.schedule_slot_repo.expect_list_slots_for_classes().times(0);
    ctx.dashboard_item_repo
        .expect_list_items_by_owner()
        .returning(|owner_id, _| {
            Ok(vec![db_item(
                owner_id,
                "pending",
                "medium",
                "task",
                Utc::now() + Duration::days(3),
            )])
        });

    let (classes, upcoming, schedule, items) =
        test_student_dashboard_wrapper(&mut ctx, student_id).await;

    assert_eq!((classes, upcoming, schedule), (0, 0, 0));
    assert_eq!(items, 1);
}

#[tokio::test]
async fn test_create_item_applies_defaults() {
    let mut ctx = TestContext::new();
    let owner_id = Uuid::new_v4();
    let before = Utc::now();

    ctx.dashboard_item_repo
        .expect_create_item()
        .withf(move |owner, _, _, status, priority, item_type, due_date| {
            owner == &owner_id
                && status == "pending"
                && priority == "medium"
                && item_type == "task"
                // An unspecified due date lands a week out.
                && *due_date >= before + Duration::days(7)
                && *due_date <= Utc::now() + Duration::days(7)
        })
        .returning(|owner_id, _, _, status, priority, item_type, due_date| {
            Ok(db_item(owner_id, status, priority, item_type, due_date))
        });

    let response =
        test_create_item_wrapper(&mut ctx, owner_id, "Prepare quiz", None, None, None, None)
            .await
            .unwrap();

    assert_eq!(response.status, ItemStatus::Pending);
    assert_eq!(response.priority, Priority::Medium);
    assert_eq!(response.item_type, ItemType::Task);
    assert!(!response.is_overdue);
}

#[tokio::test]
async fn test_create_item_requires_title() {
    let mut ctx = TestContext::new();
    let owner_id = Uuid::new_v4();

    ctx.dashboard_item_repo.expect_create_item().times(0);

    let result = test_create_item_wrapper(&mut ctx, owner_id, "  ", None, None, None, None).await;

    match result.unwrap_err().0 {
        BoardError::Validation(_) => {}
        e => panic!("Expected Validation error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_overdue_item_flagged_in_response() {
    let mut ctx = TestContext::new();
    let owner_id = Uuid::new_v4();
    let past = Utc::now() - Duration::days(2);

    ctx.dashboard_item_repo
        .expect_create_item()
        .returning(|owner_id, _, _, status, priority, item_type, due_date| {
            Ok(db_item(owner_id, status, priority, item_type, due_date))
        });

    let response = test_create_item_wrapper(
        &mut ctx,
        owner_id,
        "Late report",
        Some(ItemStatus::InProgress),
        None,
        None,
        Some(past),
    )
    .await
    .unwrap();

    assert!(response.is_overdue);
}

#[tokio::test]
async fn test_items_are_owner_scoped() {
    let owner_id = Uuid::new_v4();
    let stranger = Actor {
        user_id: Uuid::new_v4(),
        role: Role::Teacher,
    };

    // Personal items are gated on ownership alone, role is irrelevant.
    let decision = authorize(
        Some(&stranger),
        Action::Delete,
        &Target::OwnedItem { owner_id },
    );

    match decision.require("item").unwrap_err() {
        BoardError::NotOwner(_) => {}
        e => panic!("Expected NotOwner error, got: {:?}", e),
    }
}
