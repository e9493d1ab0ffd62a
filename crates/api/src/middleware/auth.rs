//! # Authentication Module
//!
//! Credential hashing/verification (Argon2) and per-request actor
//! resolution.
//!
//! Session transport is not this service's concern: login hands back the
//! user id and the fronting layer carries it opaquely (here as the
//! `X-User-Id` header). The role is always re-read from the identity
//! store, never trusted from the client, so a forged role header cannot
//! widen access.

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHasher, PasswordVerifier,
};
use axum::http::HeaderMap;
use classboard_core::access::Actor;
use classboard_core::errors::{BoardError, BoardResult};
use classboard_core::models::user::Role;
use eyre::Result;
use sqlx::PgPool;
use uuid::Uuid;

/// Header carrying the opaque identity established at login.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Hashes a password with Argon2 and a fresh random salt, returning the
/// PHC-format string for storage. The plaintext is never stored or
/// logged.
pub fn hash_password(password: &str) -> Result<String> {
    // Generate a fresh, random salt
    let salt = SaltString::generate(&mut OsRng);

    // Create default Argon2 instance
    let argon2 = Argon2::default();

    // Hash the password with salt
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| eyre::eyre!("Error hashing password: {}", e))?
        .to_string();

    Ok(password_hash)
}

/// Verifies a plaintext password against a stored PHC-format hash.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool> {
    let parsed_hash = argon2::PasswordHash::new(stored_hash)
        .map_err(|e| eyre::eyre!("Invalid password hash: {}", e))?;
    let is_valid = Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok();
    Ok(is_valid)
}

/// Resolves the acting identity for a request, if any.
///
/// Returns `Ok(None)` when no identity header is present or it does not
/// name a known user; the access gate then denies `Unauthenticated`.
pub async fn resolve_actor(pool: &PgPool, headers: &HeaderMap) -> BoardResult<Option<Actor>> {
    let Some(raw) = headers.get(USER_ID_HEADER) else {
        return Ok(None);
    };

    let Ok(user_id) = raw.to_str().unwrap_or_default().parse::<Uuid>() else {
        return Ok(None);
    };

    let Some(user) = classboard_db::repositories::user::get_user_by_id(pool, user_id).await? else {
        return Ok(None);
    };

    let role = Role::parse(&user.role)
        .ok_or_else(|| BoardError::Validation(format!("unknown role: {}", user.role)))?;

    Ok(Some(Actor {
        user_id: user.id,
        role,
    }))
}

/// Like [`resolve_actor`] but requires an identity, for the handlers
/// that never serve anonymous callers.
pub async fn require_actor(pool: &PgPool, headers: &HeaderMap) -> BoardResult<Actor> {
    resolve_actor(pool, headers)
        .await?
        .ok_or(BoardError::Unauthenticated)
}
