//! Appointment repository port (reminder pipeline read/write side).
//!
//! # Design
//!
//! - **Date-scoped queries**: the reminder run asks for appointments on a
//!   calendar date; only `scheduled` appointments that have not yet been
//!   reminded are returned
//! - **Exactly-once guard**: `mark_reminder_sent` flips the guard flag
//!   after a successful delivery

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::foundation::{AppointmentId, DomainError};
use crate::domain::scheduling::Appointment;

/// Repository port for appointment persistence.
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Find all appointments on `date` that still need a reminder:
    /// status `scheduled` and `reminder_sent = false`.
    async fn find_scheduled_for_date(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>, DomainError>;

    /// Find an appointment by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &AppointmentId) -> Result<Option<Appointment>, DomainError>;

    /// Record that the reminder for this appointment has been delivered.
    ///
    /// # Errors
    ///
    /// - `AppointmentNotFound` if the appointment doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn mark_reminder_sent(&self, id: &AppointmentId) -> Result<(), DomainError>;
}
