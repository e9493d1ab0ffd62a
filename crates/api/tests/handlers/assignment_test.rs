use chrono::{DateTime, Utc};
use classboard_api::middleware::error_handling::AppError;
use classboard_core::access::{authorize, Action, Actor, ClassScope, Target};
use classboard_core::errors::BoardError;
use classboard_core::models::assignment::{AssignmentResponse, AssignmentStatus, SubmissionResponse};
use classboard_core::models::user::Role;
use mockall::predicate;
use uuid::Uuid;

use crate::test_utils::{db_assignment, db_submission, TestContext};

// Wrapper mirroring the submit handler's flow against the mocks: gate,
// then assignment visibility, then the upsert.
async fn test_submit_wrapper(
    ctx: &mut TestContext,
    actor: &Actor,
    scope: ClassScope,
    assignment_id: Uuid,
    content: &'static str,
) -> Result<SubmissionResponse, AppError> {
    authorize(Some(actor), Action::Create, &Target::Submission(scope))
        .require(&format!("submission for assignment {}", assignment_id))?;

    let assignment = ctx
        .assignment_repo
        .get_assignment_by_id(assignment_id)
        .await
        .map_err(BoardError::Database)?
        .ok_or_else(|| BoardError::NotFound(format!("assignment {} not found", assignment_id)))?;

    match AssignmentStatus::parse(&assignment.status) {
        Some(AssignmentStatus::Published) => {}
        Some(AssignmentStatus::Draft) | None => {
            return Err(AppError(BoardError::NotFound(format!(
                "assignment {} not found",
                assignment_id
            ))));
        }
        Some(AssignmentStatus::Archived) => {
            return Err(AppError(BoardError::Validation(
                "assignment is archived".to_string(),
            )));
        }
    }

    let submission = ctx
        .submission_repo
        .upsert_submission(assignment_id, actor.user_id, content)
        .await
        .map_err(BoardError::Database)?;

    Ok(SubmissionResponse {
        id: submission.id,
        assignment_id: submission.assignment_id,
        student_id: submission.student_id,
        submitted_at: submission.submitted_at,
        grade: submission.grade,
        feedback: submission.feedback,
    })
}

// Wrapper mirroring the create-assignment handler's validation and the
// draft default.
async fn test_create_assignment_wrapper(
    ctx: &mut TestContext,
    class_id: Uuid,
    title: &'static str,
    due_date: Option<DateTime<Utc>>,
) -> Result<AssignmentResponse, AppError> {
    if title.trim().is_empty() {
        return Err(AppError(BoardError::Validation(
            "assignment title is required".to_string(),
        )));
    }
    let Some(due_date) = due_date else {
        return Err(AppError(BoardError::Validation(
            "due_date is required".to_string(),
        )));
    };

    let assignment = ctx
        .assignment_repo
        .create_assignment(
            class_id,
            title,
            "",
            due_date,
            AssignmentStatus::Draft.as_str(),
        )
        .await
        .map_err(BoardError::Database)?;

    let status = AssignmentStatus::parse(&assignment.status).ok_or_else(|| {
        BoardError::Validation(format!("unknown assignment status: {}", assignment.status))
    })?;

    Ok(AssignmentResponse {
        id: assignment.id,
        class_id: assignment.class_id,
        title: assignment.title,
        description: assignment.description,
        due_date: assignment.due_date,
        status,
        created_at: assignment.created_at,
    })
}

fn student() -> Actor {
    Actor {
        user_id: Uuid::new_v4(),
        role: Role::Student,
    }
}

#[tokio::test]
async fn test_create_assignment_defaults_to_draft() {
    let mut ctx = TestContext::new();
    let class_id = Uuid::new_v4();
    let due = Utc::now() + chrono::Duration::days(14);

    ctx.assignment_repo
        .expect_create_assignment()
        .with(
            predicate::eq(class_id),
            predicate::eq("Problem set 1"),
            predicate::always(),
            predicate::eq(due),
            predicate::eq("draft"),
        )
        .returning(|class_id, title, _, due_date, status| {
            let mut assignment = db_assignment(Uuid::new_v4(), class_id, status);
            assignment.title = title.to_string();
            assignment.due_date = due_date;
            Ok(assignment)
        });

    let response = test_create_assignment_wrapper(&mut ctx, class_id, "Problem set 1", Some(due))
        .await
        .unwrap();

    assert_eq!(response.status, AssignmentStatus::Draft);
    assert_eq!(response.due_date, due);
}

#[tokio::test]
async fn test_create_assignment_requires_title_and_due_date() {
    let mut ctx = TestContext::new();
    let class_id = Uuid::new_v4();

    ctx.assignment_repo.expect_create_assignment().times(0);

    let missing_title = test_create_assignment_wrapper(&mut ctx, class_id, " ", Some(Utc::now()))
        .await;
    match missing_title.unwrap_err().0 {
        BoardError::Validation(_) => {}
        e => panic!("Expected Validation error, got: {:?}", e),
    }

    let missing_due = test_create_assignment_wrapper(&mut ctx, class_id, "Problem set 1", None).await;
    match missing_due.unwrap_err().0 {
        BoardError::Validation(_) => {}
        e => panic!("Expected Validation error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_submit_success() {
    let mut ctx = TestContext::new();
    let actor = student();
    let owner_id = Uuid::new_v4();
    let assignment_id = Uuid::new_v4();
    let class_id = Uuid::new_v4();
    let now = Utc::now();

    ctx.assignment_repo
        .expect_get_assignment_by_id()
        .with(predicate::eq(assignment_id))
        .returning(move |id| Ok(Some(db_assignment(id, class_id, "published"))));

    let student_id = actor.user_id;
    ctx.submission_repo
        .expect_upsert_submission()
        .with(
            predicate::eq(assignment_id),
            predicate::eq(student_id),
            predicate::eq("my answers"),
        )
        .returning(move |assignment_id, student_id, _| {
            Ok(db_submission(assignment_id, student_id, now, None))
        });

    let scope = ClassScope {
        owner_id,
        enrolled: true,
    };
    let response = test_submit_wrapper(&mut ctx, &actor, scope, assignment_id, "my answers")
        .await
        .unwrap();

    assert_eq!(response.student_id, actor.user_id);
    assert_eq!(response.grade, None);
}

#[tokio::test]
async fn test_submit_requires_enrollment() {
    let mut ctx = TestContext::new();
    let actor = student();
    let assignment_id = Uuid::new_v4();

    // Denied at the gate; the store is never consulted.
    ctx.assignment_repo.expect_get_assignment_by_id().times(0);
    ctx.submission_repo.expect_upsert_submission().times(0);

    let scope = ClassScope {
        owner_id: Uuid::new_v4(),
        enrolled: false,
    };
    let result = test_submit_wrapper(&mut ctx, &actor, scope, assignment_id, "my answers").await;

    match result.unwrap_err().0 {
        BoardError::NotEnrolled(_) => {}
        e => panic!("Expected NotEnrolled error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_teacher_cannot_submit() {
    let mut ctx = TestContext::new();
    let owner_id = Uuid::new_v4();
    let teacher = Actor {
        user_id: owner_id,
        role: Role::Teacher,
    };
    let assignment_id = Uuid::new_v4();

    ctx.submission_repo.expect_upsert_submission().times(0);

    // Even the owning teacher cannot author submissions.
    let scope = ClassScope {
        owner_id,
        enrolled: false,
    };
    let result = test_submit_wrapper(&mut ctx, &teacher, scope, assignment_id, "answers").await;

    match result.unwrap_err().0 {
        BoardError::RoleForbidden(_) => {}
        e => panic!("Expected RoleForbidden error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_submit_to_draft_reads_as_missing() {
    let mut ctx = TestContext::new();
    let actor = student();
    let assignment_id = Uuid::new_v4();
    let class_id = Uuid::new_v4();

    ctx.assignment_repo
        .expect_get_assignment_by_id()
        .returning(move |id| Ok(Some(db_assignment(id, class_id, "draft"))));
    ctx.submission_repo.expect_upsert_submission().times(0);

    let scope = ClassScope {
        owner_id: Uuid::new_v4(),
        enrolled: true,
    };
    let result = test_submit_wrapper(&mut ctx, &actor, scope, assignment_id, "answers").await;

    match result.unwrap_err().0 {
        BoardError::NotFound(_) => {}
        e => panic!("Expected NotFound error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_submit_to_archived_rejected() {
    let mut ctx = TestContext::new();
    let actor = student();
    let assignment_id = Uuid::new_v4();
    let class_id = Uuid::new_v4();

    ctx.assignment_repo
        .expect_get_assignment_by_id()
        .returning(move |id| Ok(Some(db_assignment(id, class_id, "archived"))));
    ctx.submission_repo.expect_upsert_submission().times(0);

    let scope = ClassScope {
        owner_id: Uuid::new_v4(),
        enrolled: true,
    };
    let result = test_submit_wrapper(&mut ctx, &actor, scope, assignment_id, "answers").await;

    match result.unwrap_err().0 {
        BoardError::Validation(_) => {}
        e => panic!("Expected Validation error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_resubmit_preserves_grade() {
    let mut ctx = TestContext::new();
    let actor = student();
    let assignment_id = Uuid::new_v4();
    let class_id = Uuid::new_v4();
    let now = Utc::now();

    ctx.assignment_repo
        .expect_get_assignment_by_id()
        .returning(move |id| Ok(Some(db_assignment(id, class_id, "published"))));

    // The upsert only touches content and timestamp; an earlier grade
    // rides along unchanged.
    ctx.submission_repo
        .expect_upsert_submission()
        .returning(move |assignment_id, student_id, _| {
            Ok(db_submission(assignment_id, student_id, now, Some(88.0)))
        });

    let scope = ClassScope {
        owner_id: Uuid::new_v4(),
        enrolled: true,
    };
    let response = test_submit_wrapper(&mut ctx, &actor, scope, assignment_id, "revised answers")
        .await
        .unwrap();

    assert_eq!(response.grade, Some(88.0));
}

// Wrapper mirroring the grade handler's validation and store call.
async fn test_grade_wrapper(
    ctx: &mut TestContext,
    submission_id: Uuid,
    score: f64,
    feedback: Option<&'static str>,
) -> Result<SubmissionResponse, AppError> {
    if !(0.0..=100.0).contains(&score) {
        return Err(AppError(BoardError::Validation(
            "score must be between 0 and 100".to_string(),
        )));
    }

    let graded = ctx
        .submission_repo
        .grade_submission(submission_id, score, feedback)
        .await
        .map_err(BoardError::Database)?;

    Ok(SubmissionResponse {
        id: graded.id,
        assignment_id: graded.assignment_id,
        student_id: graded.student_id,
        submitted_at: graded.submitted_at,
        grade: graded.grade,
        feedback: graded.feedback,
    })
}

#[tokio::test]
async fn test_grade_success() {
    let mut ctx = TestContext::new();
    let submission_id = Uuid::new_v4();
    let now = Utc::now();

    ctx.submission_repo
        .expect_grade_submission()
        .with(
            predicate::eq(submission_id),
            predicate::eq(92.5),
            predicate::eq(Some("well done")),
        )
        .returning(move |id, score, feedback| {
            let mut submission = db_submission(Uuid::new_v4(), Uuid::new_v4(), now, Some(score));
            submission.id = id;
            submission.feedback = feedback.map(str::to_string);
            Ok(submission)
        });

    let response = test_grade_wrapper(&mut ctx, submission_id, 92.5, Some("well done"))
        .await
        .unwrap();

    assert_eq!(response.grade, Some(92.5));
    assert_eq!(response.feedback.as_deref(), Some("well done"));
}

#[tokio::test]
async fn test_grade_score_range_enforced() {
    let mut ctx = TestContext::new();
    let submission_id = Uuid::new_v4();

    ctx.submission_repo.expect_grade_submission().times(0);

    for score in [-1.0, 100.5] {
        let result = test_grade_wrapper(&mut ctx, submission_id, score, None).await;
        match result.unwrap_err().0 {
            BoardError::Validation(_) => {}
            e => panic!("Expected Validation error, got: {:?}", e),
        }
    }
}

#[tokio::test]
async fn test_grading_is_owner_only() {
    let owner_id = Uuid::new_v4();
    let other_teacher = Actor {
        user_id: Uuid::new_v4(),
        role: Role::Teacher,
    };
    let scope = ClassScope {
        owner_id,
        enrolled: false,
    };

    // Ownership is checked before role, so a foreign teacher is a
    // NotOwner rather than a RoleForbidden.
    let decision = authorize(Some(&other_teacher), Action::Grade, &Target::Submission(scope));

    match decision.require("grade submission").unwrap_err() {
        BoardError::NotOwner(_) => {}
        e => panic!("Expected NotOwner error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_student_list_carries_only_own_submission_state() {
    let mut ctx = TestContext::new();
    let class_id = Uuid::new_v4();
    let student_id = Uuid::new_v4();
    let assignment_id = Uuid::new_v4();
    let now = Utc::now();

    // The row shape has no space for other students' work: one submitted
    // flag and one optional grade, both the caller's own.
    ctx.assignment_repo
        .expect_list_for_class_student()
        .with(predicate::eq(class_id), predicate::eq(student_id))
        .returning(move |class_id, _| {
            Ok(vec![classboard_db::models::DbAssignmentForStudent {
                id: assignment_id,
                class_id,
                title: "Problem set 1".to_string(),
                description: "Chapters 1-2".to_string(),
                due_date: now,
                submitted: true,
                grade: None,
            }])
        });

    let rows = ctx
        .assignment_repo
        .list_for_class_student(class_id, student_id)
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert!(rows[0].submitted);
    assert_eq!(rows[0].grade, None);
}

#[tokio::test]
async fn test_teacher_list_aggregates_counts() {
    let mut ctx = TestContext::new();
    let class_id = Uuid::new_v4();
    let now = Utc::now();

    ctx.assignment_repo
        .expect_list_for_class_teacher()
        .with(predicate::eq(class_id))
        .returning(move |class_id| {
            Ok(vec![classboard_db::models::DbAssignmentWithStats {
                id: Uuid::new_v4(),
                class_id,
                title: "Problem set 1".to_string(),
                due_date: now,
                status: "published".to_string(),
                submission_count: 12,
                graded_count: 5,
            }])
        });

    let rows = ctx
        .assignment_repo
        .list_for_class_teacher(class_id)
        .await
        .unwrap();

    assert_eq!(rows[0].submission_count, 12);
    assert_eq!(rows[0].graded_count, 5);
}
