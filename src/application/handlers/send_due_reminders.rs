//! SendDueRemindersHandler - Command handler for the daily reminder run.
//!
//! Fans out over every appointment due on the target date with bounded
//! concurrency. One failed item never stops the run; it is counted and
//! the rest proceed. The `reminder_sent` flag is set only after a
//! successful send, so a failed item is retried on the next run.

use std::sync::Arc;

use chrono::NaiveDate;
use futures::stream::{self, StreamExt};

use crate::domain::foundation::DomainError;
use crate::domain::scheduling::Appointment;
use crate::ports::{AppointmentRepository, Mailer};

/// How many reminder sends may be in flight at once.
const REMINDER_CONCURRENCY: usize = 8;

/// Command to send reminders for every appointment due on a date.
#[derive(Debug, Clone, Copy)]
pub struct SendDueRemindersCommand {
    pub date: NaiveDate,
}

/// Summary of one reminder run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReminderRunSummary {
    pub sent: usize,
    pub failed: usize,
}

/// Handler for the daily reminder fan-out.
pub struct SendDueRemindersHandler {
    appointments: Arc<dyn AppointmentRepository>,
    mailer: Arc<dyn Mailer>,
}

impl SendDueRemindersHandler {
    pub fn new(appointments: Arc<dyn AppointmentRepository>, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            appointments,
            mailer,
        }
    }

    pub async fn handle(
        &self,
        cmd: SendDueRemindersCommand,
    ) -> Result<ReminderRunSummary, DomainError> {
        let due = self.appointments.find_scheduled_for_date(cmd.date).await?;

        if due.is_empty() {
            tracing::debug!(date = %cmd.date, "no reminders due");
            return Ok(ReminderRunSummary::default());
        }

        tracing::info!(date = %cmd.date, count = due.len(), "starting reminder run");

        let results: Vec<bool> = stream::iter(due)
            .map(|appointment| self.deliver(appointment))
            .buffer_unordered(REMINDER_CONCURRENCY)
            .collect()
            .await;

        let sent = results.iter().filter(|ok| **ok).count();
        let summary = ReminderRunSummary {
            sent,
            failed: results.len() - sent,
        };

        tracing::info!(
            date = %cmd.date,
            sent = summary.sent,
            failed = summary.failed,
            "reminder run finished"
        );
        Ok(summary)
    }

    /// Sends one reminder and flips the guard flag. Send comes first:
    /// a crash between the two leaves the flag unset and the reminder
    /// is retried, never silently dropped.
    async fn deliver(&self, appointment: Appointment) -> bool {
        if let Err(e) = self.mailer.send_appointment_reminder(&appointment).await {
            tracing::error!(
                appointment_id = %appointment.id,
                error = %e,
                "failed to send appointment reminder"
            );
            return false;
        }

        if let Err(e) = self.appointments.mark_reminder_sent(&appointment.id).await {
            tracing::error!(
                appointment_id = %appointment.id,
                error = %e,
                "reminder sent but guard flag not persisted"
            );
            return false;
        }

        true
    }
}
