pub mod assignment;
pub mod class;
pub mod dashboard;
pub mod user;
