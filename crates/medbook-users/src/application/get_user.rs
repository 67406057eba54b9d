//! Cache-aside user lookup.

use std::time::Duration;

use medbook_cache::{CacheAside, keys};
use medbook_core::error::DomainError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repository::UserRepository;

/// How long a user snapshot may be served from cache.
pub const USER_CACHE_TTL: Duration = Duration::from_secs(30 * 60);

/// The cached user snapshot served to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserView {
    /// The user's id.
    pub id: Uuid,
    /// Display name.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Current role.
    pub role: String,
}

/// Looks a user up through the cache-aside layer.
///
/// Misses load from the repository and populate the cache; a missing user is
/// reported as [`DomainError::NotFound`] and never cached.
///
/// # Errors
///
/// Returns [`DomainError::NotFound`] when no such user exists, or
/// [`DomainError::TransientIo`] when the repository is unreachable on a miss.
pub async fn get_user(
    user_id: Uuid,
    cache: &CacheAside,
    repository: &dyn UserRepository,
) -> Result<UserView, DomainError> {
    cache
        .get_or_load(&keys::user_by_id(user_id), USER_CACHE_TTL, || async {
            let user = repository
                .get_by_id(user_id)
                .await?
                .ok_or(DomainError::NotFound {
                    entity: "user",
                    id: user_id.to_string(),
                })?;
            Ok(UserView {
                id: user.id,
                username: user.username,
                email: user.email,
                role: user.role,
            })
        })
        .await
}
