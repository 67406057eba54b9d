//! Authorized actor capability.

use std::collections::HashSet;

use uuid::Uuid;

/// The identity and capabilities of the caller, established once at the
/// boundary from gateway-verified claims.
///
/// Core code receives this value instead of re-reading ambient request
/// context; a handler checks facility membership with [`Self::belongs_to`]
/// before invoking a command.
#[derive(Debug, Clone)]
pub struct AuthorizedActor {
    /// The actor's user id.
    pub id: Uuid,
    /// Display name (doctor name on appointment events).
    pub name: String,
    /// Verified email address.
    pub email: String,
    /// Facilities the actor belongs to.
    pub facilities: HashSet<String>,
}

impl AuthorizedActor {
    /// Whether the actor belongs to `facility_name`.
    #[must_use]
    pub fn belongs_to(&self, facility_name: &str) -> bool {
        self.facilities.contains(facility_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_belongs_to_checks_facility_membership() {
        let actor = AuthorizedActor {
            id: Uuid::new_v4(),
            name: "Dr. Acula".to_owned(),
            email: "dracula@example.test".to_owned(),
            facilities: ["northside".to_owned()].into_iter().collect(),
        };

        assert!(actor.belongs_to("northside"));
        assert!(!actor.belongs_to("southside"));
    }
}
