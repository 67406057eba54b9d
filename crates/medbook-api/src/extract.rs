//! Authorized-actor extraction.
//!
//! The gateway in front of this service verifies the caller's token and
//! forwards the verified claims as headers. This extractor turns them into a
//! typed [`AuthorizedActor`] exactly once per request; nothing downstream
//! re-reads ambient identity.

use std::collections::HashSet;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use medbook_core::actor::AuthorizedActor;
use uuid::Uuid;

use crate::error::ApiError;

/// Header carrying the verified user id.
pub const ACTOR_ID_HEADER: &str = "x-actor-id";

/// Header carrying the verified display name.
pub const ACTOR_NAME_HEADER: &str = "x-actor-name";

/// Header carrying the verified email address.
pub const ACTOR_EMAIL_HEADER: &str = "x-actor-email";

/// Header carrying the comma-separated facility memberships.
pub const ACTOR_FACILITIES_HEADER: &str = "x-actor-facilities";

/// Extractor wrapper around [`AuthorizedActor`].
#[derive(Debug, Clone)]
pub struct Actor(pub AuthorizedActor);

fn header<'a>(parts: &'a Parts, name: &'static str) -> Result<&'a str, ApiError> {
    parts
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| ApiError::unauthorized(format!("missing or invalid {name} header")))
}

impl<S: Send + Sync> FromRequestParts<S> for Actor {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = header(parts, ACTOR_ID_HEADER)?
            .parse::<Uuid>()
            .map_err(|_| {
                ApiError::unauthorized(format!("{ACTOR_ID_HEADER} header is not a uuid"))
            })?;
        let name = header(parts, ACTOR_NAME_HEADER)?.to_owned();
        let email = header(parts, ACTOR_EMAIL_HEADER)?.to_owned();
        let facilities: HashSet<String> = header(parts, ACTOR_FACILITIES_HEADER)?
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToOwned::to_owned)
            .collect();

        Ok(Self(AuthorizedActor {
            id,
            name,
            email,
            facilities,
        }))
    }
}
