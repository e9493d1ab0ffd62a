//! # Classboard Core
//!
//! Domain types shared across the Classboard service: the error taxonomy,
//! the access-control gate, and the request/response models for classes,
//! enrollments, assignments, submissions, and dashboards.
//!
//! This crate is deliberately free of any persistence or transport concern:
//! the access-control gate is a pure function over facts the caller has
//! already fetched, which keeps authorization decisions deterministic and
//! testable without a database.

/// Role- and ownership-based authorization gate
pub mod access;
/// Error taxonomy and result alias
pub mod errors;
/// Request/response models per aggregate
pub mod models;
