pub mod assignment;
pub mod class;
pub mod dashboard_item;
pub mod enrollment;
pub mod schedule_slot;
pub mod submission;
pub mod user;
