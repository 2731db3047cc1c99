//! Appointments and reminder eligibility.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AccountId, AppointmentId, Timestamp};

/// Lifecycle state of an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Cancelled,
    Done,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::Done => "done",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "scheduled" => Some(AppointmentStatus::Scheduled),
            "cancelled" => Some(AppointmentStatus::Cancelled),
            "done" => Some(AppointmentStatus::Done),
            _ => None,
        }
    }
}

/// A scheduled session between a professional's patient and the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub account_id: AccountId,
    pub patient_name: String,
    pub patient_email: String,
    pub scheduled_at: Timestamp,
    pub status: AppointmentStatus,
    /// Exactly-once guard for the reminder pipeline. Set after a
    /// successful send, never cleared by the scheduler.
    pub reminder_sent: bool,
}

impl Appointment {
    /// Whether the daily reminder run should pick this appointment up.
    pub fn needs_reminder(&self) -> bool {
        self.status == AppointmentStatus::Scheduled && !self.reminder_sent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn appointment(status: AppointmentStatus, reminder_sent: bool) -> Appointment {
        Appointment {
            id: AppointmentId::new(),
            account_id: AccountId::new(),
            patient_name: "Paciente".to_string(),
            patient_email: "paciente@example.com".to_string(),
            scheduled_at: Timestamp::now(),
            status,
            reminder_sent,
        }
    }

    #[test]
    fn scheduled_unsent_needs_reminder() {
        assert!(appointment(AppointmentStatus::Scheduled, false).needs_reminder());
    }

    #[test]
    fn already_sent_does_not_need_reminder() {
        assert!(!appointment(AppointmentStatus::Scheduled, true).needs_reminder());
    }

    #[test]
    fn cancelled_and_done_never_need_reminders() {
        assert!(!appointment(AppointmentStatus::Cancelled, false).needs_reminder());
        assert!(!appointment(AppointmentStatus::Done, false).needs_reminder());
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            AppointmentStatus::Scheduled,
            AppointmentStatus::Cancelled,
            AppointmentStatus::Done,
        ] {
            assert_eq!(AppointmentStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(AppointmentStatus::parse("unknown"), None);
    }
}
