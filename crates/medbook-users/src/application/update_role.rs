//! Role update with an audit trail.
//!
//! The role change is persisted first, then recorded on the user's audit
//! stream, and only after both durable writes does the cached snapshot get
//! invalidated — never before, so a racing reader cannot repopulate the
//! cache with the pre-change role.

use medbook_cache::{CacheAside, keys};
use medbook_core::clock::Clock;
use medbook_core::error::DomainError;
use medbook_core::retry;
use medbook_core::store::{EventStore, ExpectedRevision, StreamId};

use crate::domain::commands::UpdateUserRole;
use crate::domain::events::{UserEventKind, UserRoleChanged};

use super::get_user::UserView;
use super::repository::UserRepository;

/// Handles the `UpdateUserRole` command.
///
/// # Errors
///
/// Returns [`DomainError::NotFound`] when the user does not exist and
/// [`DomainError::TransientIo`] when persisting the change or the audit
/// event fails after retries.
pub async fn update_user_role(
    command: &UpdateUserRole,
    clock: &dyn Clock,
    repository: &dyn UserRepository,
    store: &dyn EventStore,
    cache: &CacheAside,
) -> Result<UserView, DomainError> {
    let before = repository
        .get_by_id(command.user_id)
        .await?
        .ok_or(DomainError::NotFound {
            entity: "user",
            id: command.user_id.to_string(),
        })?;

    let updated = repository.update_role(command.user_id, &command.new_role).await?;

    // Audit streams are append-only logs with no cross-writer consistency
    // requirement, so the concurrency check is skipped.
    let stream_id = StreamId::user_updates(command.user_id);
    let event = UserEventKind::UserRoleChanged(UserRoleChanged {
        user_id: command.user_id,
        username: updated.username.clone(),
        email: updated.email.clone(),
        old_role: before.role,
        new_role: updated.role.clone(),
    })
    .into_new_event(clock.now(), command.correlation_id, command.correlation_id);

    retry::with_backoff("append user.role_changed", || {
        store.append(&stream_id, ExpectedRevision::Any, vec![event.clone()])
    })
    .await?;

    let cache_key = keys::user_by_id(command.user_id);
    if let Err(err) = cache.invalidate(&cache_key).await {
        tracing::warn!(key = %cache_key, error = %err, "cache invalidation failed, entry expires by ttl");
    }

    tracing::info!(
        correlation_id = %command.correlation_id,
        user_id = %command.user_id,
        new_role = %command.new_role,
        "user role updated"
    );

    Ok(UserView {
        id: updated.id,
        username: updated.username,
        email: updated.email,
        role: updated.role,
    })
}
