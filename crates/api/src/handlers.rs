pub mod assignment;
pub mod auth;
pub mod class;
pub mod dashboard;
pub mod schedule;

use classboard_core::access::{Actor, ClassScope};
use classboard_core::errors::BoardResult;
use classboard_core::models::user::Role;
use classboard_db::models::DbClass;
use sqlx::PgPool;

/// Builds the authorization facts for a class: who owns it and, for
/// student actors, whether an enrollment row exists.
pub(crate) async fn class_scope_for(
    pool: &PgPool,
    actor: &Actor,
    class: &DbClass,
) -> BoardResult<ClassScope> {
    let enrolled = match actor.role {
        Role::Student => {
            classboard_db::repositories::enrollment::is_enrolled(pool, class.id, actor.user_id)
                .await?
        }
        Role::Teacher => false,
    };

    Ok(ClassScope {
        owner_id: class.teacher_id,
        enrolled,
    })
}
