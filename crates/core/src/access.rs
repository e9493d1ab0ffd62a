//! Role- and ownership-based authorization.
//!
//! Every role-scoped read or mutation in the service funnels through
//! [`authorize`] before touching the store. The gate is a pure function:
//! callers fetch the facts (who owns the class, whether the actor is
//! enrolled) and the gate only decides. Rules are evaluated in a fixed
//! order and the first match wins.

use uuid::Uuid;

use crate::errors::{BoardError, BoardResult};
use crate::models::user::Role;

/// The authenticated identity a request acts as.
///
/// Built once per request from the session carrier and passed explicitly
/// into every operation; there is no ambient current-user state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: Uuid,
    pub role: Role,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Create,
    Update,
    Delete,
    Grade,
}

/// Ownership and membership facts for the class a target lives under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassScope {
    /// The one teacher who owns the class.
    pub owner_id: Uuid,
    /// Whether the acting user has an enrollment row for the class.
    /// Only meaningful for student actors.
    pub enrolled: bool,
}

impl ClassScope {
    pub fn owned_by(owner_id: Uuid) -> Self {
        Self {
            owner_id,
            enrolled: false,
        }
    }
}

/// What an action is aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// A class or anything that belongs to one: assignments, schedule
    /// slots, enrollment rows.
    Class(ClassScope),
    /// A class that does not exist yet (create-class).
    NewClass,
    /// A student's own submission under a class.
    Submission(ClassScope),
    /// A personal dashboard item.
    OwnedItem { owner_id: Uuid },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    Unauthenticated,
    RoleForbidden,
    NotOwner,
    NotEnrolled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// Turns a denial into the matching typed error, tagging it with a
    /// short description of the target.
    pub fn require(self, detail: &str) -> BoardResult<()> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(DenyReason::Unauthenticated) => Err(BoardError::Unauthenticated),
            Decision::Deny(DenyReason::RoleForbidden) => {
                Err(BoardError::RoleForbidden(detail.to_string()))
            }
            Decision::Deny(DenyReason::NotOwner) => Err(BoardError::NotOwner(detail.to_string())),
            Decision::Deny(DenyReason::NotEnrolled) => {
                Err(BoardError::NotEnrolled(detail.to_string()))
            }
        }
    }
}

/// Decides whether `actor` may perform `action` on `target`.
///
/// Rule order, first match wins:
///
/// 1. no actor: deny `Unauthenticated`;
/// 2. ownership: a teacher acting inside a class scope they do not own is
///    denied `NotOwner`; a user acting on someone else's personal item is
///    denied `NotOwner`;
/// 3. role: class-scoped writes and grading are teacher-only, submitting
///    is student-only; the wrong role is denied `RoleForbidden`;
/// 4. membership: a student reading class-scoped data, or submitting,
///    without an enrollment row is denied `NotEnrolled`;
/// 5. otherwise allow.
pub fn authorize(actor: Option<&Actor>, action: Action, target: &Target) -> Decision {
    let Some(actor) = actor else {
        return Decision::Deny(DenyReason::Unauthenticated);
    };

    // Ownership gates.
    match target {
        Target::Class(scope) | Target::Submission(scope) => {
            if actor.role == Role::Teacher && actor.user_id != scope.owner_id {
                return Decision::Deny(DenyReason::NotOwner);
            }
        }
        Target::OwnedItem { owner_id } => {
            if actor.user_id != *owner_id {
                return Decision::Deny(DenyReason::NotOwner);
            }
        }
        Target::NewClass => {}
    }

    // Role gates.
    match target {
        Target::NewClass => {
            if actor.role != Role::Teacher {
                return Decision::Deny(DenyReason::RoleForbidden);
            }
        }
        Target::Class(_) => {
            let teacher_only = matches!(
                action,
                Action::Create | Action::Update | Action::Delete | Action::Grade
            );
            if teacher_only && actor.role != Role::Teacher {
                return Decision::Deny(DenyReason::RoleForbidden);
            }
        }
        Target::Submission(_) => {
            if matches!(action, Action::Create | Action::Update) && actor.role != Role::Student {
                return Decision::Deny(DenyReason::RoleForbidden);
            }
            if matches!(action, Action::Grade | Action::Delete) && actor.role != Role::Teacher {
                return Decision::Deny(DenyReason::RoleForbidden);
            }
        }
        Target::OwnedItem { .. } => {}
    }

    // Membership gates.
    if actor.role == Role::Student {
        match target {
            Target::Class(scope) if action == Action::Read && !scope.enrolled => {
                return Decision::Deny(DenyReason::NotEnrolled);
            }
            Target::Submission(scope) if !scope.enrolled => {
                return Decision::Deny(DenyReason::NotEnrolled);
            }
            _ => {}
        }
    }

    Decision::Allow
}
