//! Reminder endpoints (operator-facing).

use axum::extract::{Json, Path, Query, State};
use axum::response::IntoResponse;
use chrono::{Days, Local};
use uuid::Uuid;

use crate::application::handlers::{ResendReminderCommand, SendDueRemindersCommand};
use crate::domain::foundation::{AppointmentId, DomainError, ErrorCode};

use super::dto::{AppointmentIdResponse, ReminderRunResponse, RunRemindersQuery};
use super::{ApiError, AppState};

/// GET /api/reminders/run - Trigger a reminder run.
///
/// Without an explicit `date` query parameter the run targets tomorrow,
/// matching the scheduled daily job.
pub async fn run_reminders(
    State(state): State<AppState>,
    Query(query): Query<RunRemindersQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let date = query.date.map_or_else(tomorrow, Ok)?;

    let summary = state
        .send_due_reminders_handler()
        .handle(SendDueRemindersCommand { date })
        .await?;

    Ok(Json(ReminderRunResponse {
        sent: summary.sent,
        failed: summary.failed,
    }))
}

/// POST /api/appointments/:id/reminder - Resend one reminder.
pub async fn resend_reminder(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .resend_reminder_handler()
        .handle(ResendReminderCommand {
            appointment_id: AppointmentId::from_uuid(id),
        })
        .await?;

    Ok(Json(AppointmentIdResponse {
        appointment_id: result.appointment_id.to_string(),
    }))
}

fn tomorrow() -> Result<chrono::NaiveDate, DomainError> {
    Local::now()
        .date_naive()
        .checked_add_days(Days::new(1))
        .ok_or_else(|| DomainError::new(ErrorCode::InternalError, "date overflow"))
}
