//! ResendReminderHandler - Command handler for manual reminder resends.
//!
//! Operator-triggered. Sends regardless of the `reminder_sent` flag
//! (that guard protects the automatic run, not a deliberate resend) and
//! sets the flag afterwards so the automatic run skips the appointment.

use std::sync::Arc;

use crate::domain::foundation::{AppointmentId, DomainError, ErrorCode};
use crate::ports::{AppointmentRepository, Mailer};

/// Command to resend the reminder for one appointment.
#[derive(Debug, Clone, Copy)]
pub struct ResendReminderCommand {
    pub appointment_id: AppointmentId,
}

/// Result of a manual resend.
#[derive(Debug, Clone, PartialEq)]
pub struct ResendReminderResult {
    pub appointment_id: AppointmentId,
}

/// Handler for manual reminder resends.
pub struct ResendReminderHandler {
    appointments: Arc<dyn AppointmentRepository>,
    mailer: Arc<dyn Mailer>,
}

impl ResendReminderHandler {
    pub fn new(appointments: Arc<dyn AppointmentRepository>, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            appointments,
            mailer,
        }
    }

    pub async fn handle(
        &self,
        cmd: ResendReminderCommand,
    ) -> Result<ResendReminderResult, DomainError> {
        let appointment = self
            .appointments
            .find_by_id(&cmd.appointment_id)
            .await?
            .ok_or_else(|| {
                DomainError::new(ErrorCode::AppointmentNotFound, "appointment not found")
            })?;

        self.mailer.send_appointment_reminder(&appointment).await?;
        self.appointments
            .mark_reminder_sent(&appointment.id)
            .await?;

        tracing::info!(appointment_id = %appointment.id, "reminder resent");
        Ok(ResendReminderResult {
            appointment_id: appointment.id,
        })
    }
}
