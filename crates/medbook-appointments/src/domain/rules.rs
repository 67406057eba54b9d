//! Business rules for appointment creation.
//!
//! Each rule captures the values it judges at construction time, so the
//! predicate is pure and the whole set evaluates against one authoritative
//! clock reading.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use medbook_core::rules::BusinessRule;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\w.+-]+@[\w-]+(\.[\w-]{2,})+$").expect("email pattern is valid")
});

/// The appointment must start strictly in the future.
#[derive(Debug)]
pub struct StartsInFuture {
    /// Requested slot start.
    pub start: DateTime<Utc>,
    /// The clock reading the command is evaluated against.
    pub now: DateTime<Utc>,
}

impl BusinessRule for StartsInFuture {
    fn name(&self) -> &'static str {
        "appointment_starts_in_future"
    }

    fn is_met(&self) -> bool {
        self.start > self.now
    }

    fn error(&self) -> String {
        "The appointment start date cannot be in the past.".to_owned()
    }
}

/// The patient's email must be present and syntactically valid.
#[derive(Debug)]
pub struct PatientEmailValid<'a> {
    /// The email address under judgment.
    pub email: &'a str,
}

impl BusinessRule for PatientEmailValid<'_> {
    fn name(&self) -> &'static str {
        "patient_email_valid"
    }

    fn is_met(&self) -> bool {
        !self.email.trim().is_empty() && EMAIL_PATTERN.is_match(self.email)
    }

    fn error(&self) -> String {
        "Patient email is not valid.".to_owned()
    }
}

/// The facility name must be non-empty.
#[derive(Debug)]
pub struct FacilityProvided<'a> {
    /// The facility name under judgment.
    pub facility_name: &'a str,
}

impl BusinessRule for FacilityProvided<'_> {
    fn name(&self) -> &'static str {
        "facility_provided"
    }

    fn is_met(&self) -> bool {
        !self.facility_name.trim().is_empty()
    }

    fn error(&self) -> String {
        "Facility name is required.".to_owned()
    }
}

/// The doctor's display name must be non-empty.
#[derive(Debug)]
pub struct DoctorProvided<'a> {
    /// The doctor name under judgment.
    pub doctor_name: &'a str,
}

impl BusinessRule for DoctorProvided<'_> {
    fn name(&self) -> &'static str {
        "doctor_provided"
    }

    fn is_met(&self) -> bool {
        !self.doctor_name.trim().is_empty()
    }

    fn error(&self) -> String {
        "Doctor name is required.".to_owned()
    }
}
