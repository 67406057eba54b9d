//! Calendar oracle placeholder.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use medbook_appointments::application::calendar::{CalendarOracle, SlotAvailability};
use medbook_core::error::DomainError;

/// Oracle that accepts every slot and mints a deterministic reference from
/// the slot start.
// TODO: replace with the scheduling-provider client once its API contract is
// settled; availability checks then go over the wire.
#[derive(Debug, Clone, Copy)]
pub struct PermissiveCalendar;

#[async_trait]
impl CalendarOracle for PermissiveCalendar {
    async fn check_slot(&self, start: DateTime<Utc>) -> Result<SlotAvailability, DomainError> {
        Ok(SlotAvailability::Available {
            calendar_ref: format!("slot-{}", start.timestamp()),
        })
    }
}
