mod assignment_test;
mod class_test;
mod dashboard_test;
