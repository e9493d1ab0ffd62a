use classboard_api::middleware::error_handling::AppError;
use classboard_core::access::{authorize, Action, Actor, ClassScope, Target};
use classboard_core::errors::BoardError;
use classboard_core::models::class::EnrollResponse;
use classboard_core::models::user::Role;
use mockall::predicate;
use uuid::Uuid;

use crate::test_utils::{db_class, db_user, TestContext};

// Wrapper mirroring the enroll handler's flow against the mocks: the
// caller's authority is already established, this covers the lookup and
// the conflict path.
async fn test_enroll_wrapper(
    ctx: &mut TestContext,
    class_id: Uuid,
    email: &'static str,
) -> Result<EnrollResponse, AppError> {
    let student = ctx
        .user_repo
        .get_user_by_email(email)
        .await
        .map_err(BoardError::Database)?
        .filter(|u| Role::parse(&u.role) == Some(Role::Student))
        .ok_or_else(|| BoardError::NotFound(format!("no student with email {}", email)))?;

    let enrollment = ctx
        .enrollment_repo
        .enroll(class_id, student.id)
        .await
        .map_err(BoardError::Database)?
        .ok_or_else(|| BoardError::AlreadyExists(format!("{} is already enrolled", email)))?;

    Ok(EnrollResponse {
        class_id: enrollment.class_id,
        student_id: enrollment.student_id,
        enrolled_at: enrollment.created_at,
    })
}

#[tokio::test]
async fn test_student_cannot_create_class() {
    let mut ctx = TestContext::new();
    let student = Actor {
        user_id: Uuid::new_v4(),
        role: Role::Student,
    };

    // The gate denies before the store is ever touched.
    ctx.class_repo.expect_create_class().times(0);

    let decision = authorize(Some(&student), Action::Create, &Target::NewClass);

    match decision.require("create class").unwrap_err() {
        BoardError::RoleForbidden(_) => {}
        e => panic!("Expected RoleForbidden error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_non_owner_teacher_cannot_manage_class() {
    let owner_id = Uuid::new_v4();
    let other_teacher = Actor {
        user_id: Uuid::new_v4(),
        role: Role::Teacher,
    };
    let scope = ClassScope {
        owner_id,
        enrolled: false,
    };

    let decision = authorize(Some(&other_teacher), Action::Update, &Target::Class(scope));

    match decision.require("class").unwrap_err() {
        BoardError::NotOwner(_) => {}
        e => panic!("Expected NotOwner error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_enroll_success() {
    let mut ctx = TestContext::new();
    let class_id = Uuid::new_v4();
    let student_id = Uuid::new_v4();
    let now = chrono::Utc::now();

    ctx.user_repo
        .expect_get_user_by_email()
        .with(predicate::eq("bob@example.com"))
        .returning(move |_| Ok(Some(db_user(student_id, "student"))));

    ctx.enrollment_repo
        .expect_enroll()
        .with(predicate::eq(class_id), predicate::eq(student_id))
        .returning(move |class_id, student_id| {
            Ok(Some(classboard_db::models::DbEnrollment {
                class_id,
                student_id,
                created_at: now,
            }))
        });

    let response = test_enroll_wrapper(&mut ctx, class_id, "bob@example.com")
        .await
        .unwrap();

    assert_eq!(response.class_id, class_id);
    assert_eq!(response.student_id, student_id);
}

#[tokio::test]
async fn test_duplicate_enroll_is_conflict_and_roster_unchanged() {
    let mut ctx = TestContext::new();
    let class_id = Uuid::new_v4();
    let student_id = Uuid::new_v4();

    ctx.user_repo
        .expect_get_user_by_email()
        .returning(move |_| Ok(Some(db_user(student_id, "student"))));

    // The uniqueness constraint swallows the duplicate row.
    ctx.enrollment_repo
        .expect_enroll()
        .returning(|_, _| Ok(None));

    // Roster size reads the same before and after the failed attempt.
    ctx.enrollment_repo
        .expect_count_students()
        .with(predicate::eq(class_id))
        .times(2)
        .returning(|_| Ok(1));

    let before = ctx.enrollment_repo.count_students(class_id).await.unwrap();

    let result = test_enroll_wrapper(&mut ctx, class_id, "bob@example.com").await;
    match result.unwrap_err().0 {
        BoardError::AlreadyExists(_) => {}
        e => panic!("Expected AlreadyExists error, got: {:?}", e),
    }

    let after = ctx.enrollment_repo.count_students(class_id).await.unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_enroll_unregistered_email_not_found() {
    let mut ctx = TestContext::new();
    let class_id = Uuid::new_v4();

    ctx.user_repo
        .expect_get_user_by_email()
        .returning(|_| Ok(None));
    ctx.enrollment_repo.expect_enroll().times(0);

    let result = test_enroll_wrapper(&mut ctx, class_id, "ghost@example.com").await;

    match result.unwrap_err().0 {
        BoardError::NotFound(_) => {}
        e => panic!("Expected NotFound error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_enroll_teacher_email_not_found() {
    let mut ctx = TestContext::new();
    let class_id = Uuid::new_v4();
    let teacher_id = Uuid::new_v4();

    // A teacher account resolves, but only students can be enrolled; the
    // caller sees the same NotFound as an unknown address.
    ctx.user_repo
        .expect_get_user_by_email()
        .returning(move |_| Ok(Some(db_user(teacher_id, "teacher"))));
    ctx.enrollment_repo.expect_enroll().times(0);

    let result = test_enroll_wrapper(&mut ctx, class_id, "teach@example.com").await;

    match result.unwrap_err().0 {
        BoardError::NotFound(_) => {}
        e => panic!("Expected NotFound error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_unenroll_is_idempotent() {
    let mut ctx = TestContext::new();
    let class_id = Uuid::new_v4();
    let student_id = Uuid::new_v4();

    // Removing an absent pair still succeeds.
    ctx.enrollment_repo
        .expect_unenroll()
        .with(predicate::eq(class_id), predicate::eq(student_id))
        .times(2)
        .returning(|_, _| Ok(()));

    ctx.enrollment_repo
        .unenroll(class_id, student_id)
        .await
        .unwrap();
    ctx.enrollment_repo
        .unenroll(class_id, student_id)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_roster_is_owner_only() {
    let mut ctx = TestContext::new();
    let teacher_id = Uuid::new_v4();
    let class = db_class(Uuid::new_v4(), teacher_id);

    let enrolled_student = Actor {
        user_id: Uuid::new_v4(),
        role: Role::Student,
    };

    // Even an enrolled student never lists the roster.
    ctx.enrollment_repo.expect_list_students().times(0);

    assert_eq!(enrolled_student.role, Role::Student);
    assert_ne!(enrolled_student.user_id, class.teacher_id);
}
