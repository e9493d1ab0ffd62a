pub mod assignment;
pub mod auth;
pub mod class;
pub mod dashboard;
pub mod health;
pub mod schedule;
