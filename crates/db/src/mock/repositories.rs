use chrono::{DateTime, NaiveTime, Utc};
use mockall::mock;
use uuid::Uuid;

use crate::models::{
    DbAssignment, DbAssignmentForStudent, DbAssignmentWithStats, DbClass, DbClassSummary,
    DbDashboardItem, DbEnrolledStudent, DbEnrollment, DbScheduleSlot, DbSubmission, DbUser,
};

// Mock repositories for testing
mock! {
    pub UserRepo {
        pub async fn create_user(
            &self,
            username: &'static str,
            email: &'static str,
            password_hash: &'static str,
            role: &'static str,
        ) -> eyre::Result<Option<DbUser>>;

        pub async fn get_user_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbUser>>;

        pub async fn get_user_by_email(
            &self,
            email: &'static str,
        ) -> eyre::Result<Option<DbUser>>;
    }
}

mock! {
    pub ClassRepo {
        pub async fn create_class(
            &self,
            name: &'static str,
            description: &'static str,
            teacher_id: Uuid,
        ) -> eyre::Result<DbClass>;

        pub async fn get_class_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbClass>>;

        pub async fn update_class(
            &self,
            id: Uuid,
            name: &'static str,
            description: &'static str,
        ) -> eyre::Result<DbClass>;

        pub async fn delete_class(
            &self,
            id: Uuid,
        ) -> eyre::Result<()>;

        pub async fn list_classes_by_teacher(
            &self,
            teacher_id: Uuid,
        ) -> eyre::Result<Vec<DbClassSummary>>;

        pub async fn list_classes_by_student(
            &self,
            student_id: Uuid,
        ) -> eyre::Result<Vec<DbClass>>;
    }
}

mock! {
    pub EnrollmentRepo {
        pub async fn enroll(
            &self,
            class_id: Uuid,
            student_id: Uuid,
        ) -> eyre::Result<Option<DbEnrollment>>;

        pub async fn unenroll(
            &self,
            class_id: Uuid,
            student_id: Uuid,
        ) -> eyre::Result<()>;

        pub async fn is_enrolled(
            &self,
            class_id: Uuid,
            student_id: Uuid,
        ) -> eyre::Result<bool>;

        pub async fn list_students(
            &self,
            class_id: Uuid,
        ) -> eyre::Result<Vec<DbEnrolledStudent>>;

        pub async fn count_students(
            &self,
            class_id: Uuid,
        ) -> eyre::Result<i64>;
    }
}

mock! {
    pub ScheduleSlotRepo {
        pub async fn create_slot(
            &self,
            class_id: Uuid,
            day_of_week: &'static str,
            start_time: NaiveTime,
            end_time: NaiveTime,
        ) -> eyre::Result<DbScheduleSlot>;

        pub async fn get_slot_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbScheduleSlot>>;

        pub async fn list_slots_by_class(
            &self,
            class_id: Uuid,
        ) -> eyre::Result<Vec<DbScheduleSlot>>;

        pub async fn list_slots_for_classes(
            &self,
            class_ids: Vec<Uuid>,
        ) -> eyre::Result<Vec<DbScheduleSlot>>;

        pub async fn delete_slot(
            &self,
            id: Uuid,
        ) -> eyre::Result<()>;
    }
}

mock! {
    pub AssignmentRepo {
        pub async fn create_assignment(
            &self,
            class_id: Uuid,
            title: &'static str,
            description: &'static str,
            due_date: DateTime<Utc>,
            status: &'static str,
        ) -> eyre::Result<DbAssignment>;

        pub async fn get_assignment_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbAssignment>>;

        pub async fn set_status(
            &self,
            id: Uuid,
            status: &'static str,
        ) -> eyre::Result<DbAssignment>;

        pub async fn list_for_class_teacher(
            &self,
            class_id: Uuid,
        ) -> eyre::Result<Vec<DbAssignmentWithStats>>;

        pub async fn list_for_class_student(
            &self,
            class_id: Uuid,
            student_id: Uuid,
        ) -> eyre::Result<Vec<DbAssignmentForStudent>>;

        pub async fn upcoming_for_teacher(
            &self,
            teacher_id: Uuid,
            limit: i64,
        ) -> eyre::Result<Vec<DbAssignment>>;

        pub async fn upcoming_for_student(
            &self,
            student_id: Uuid,
            limit: i64,
        ) -> eyre::Result<Vec<DbAssignment>>;
    }
}

mock! {
    pub SubmissionRepo {
        pub async fn upsert_submission(
            &self,
            assignment_id: Uuid,
            student_id: Uuid,
            content: &'static str,
        ) -> eyre::Result<DbSubmission>;

        pub async fn get_submission_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbSubmission>>;

        pub async fn get_submission_for_student(
            &self,
            assignment_id: Uuid,
            student_id: Uuid,
        ) -> eyre::Result<Option<DbSubmission>>;

        pub async fn grade_submission(
            &self,
            id: Uuid,
            score: f64,
            feedback: Option<&'static str>,
        ) -> eyre::Result<DbSubmission>;
    }
}

mock! {
    pub DashboardItemRepo {
        pub async fn create_item(
            &self,
            owner_id: Uuid,
            title: &'static str,
            description: &'static str,
            status: &'static str,
            priority: &'static str,
            item_type: &'static str,
            due_date: DateTime<Utc>,
        ) -> eyre::Result<DbDashboardItem>;

        pub async fn get_item_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbDashboardItem>>;

        pub async fn list_items_by_owner(
            &self,
            owner_id: Uuid,
            limit: Option<i64>,
        ) -> eyre::Result<Vec<DbDashboardItem>>;

        pub async fn update_item(
            &self,
            id: Uuid,
            title: &'static str,
            description: &'static str,
            status: &'static str,
            priority: &'static str,
            item_type: &'static str,
            due_date: DateTime<Utc>,
        ) -> eyre::Result<DbDashboardItem>;

        pub async fn delete_item(
            &self,
            id: Uuid,
        ) -> eyre::Result<()>;
    }
}
