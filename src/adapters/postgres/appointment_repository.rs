//! PostgreSQL implementation of AppointmentRepository.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{
    AccountId, AppointmentId, DomainError, ErrorCode, Timestamp,
};
use crate::domain::scheduling::{Appointment, AppointmentStatus};
use crate::ports::AppointmentRepository;

/// PostgreSQL implementation of the AppointmentRepository port.
pub struct PostgresAppointmentRepository {
    pool: PgPool,
}

impl PostgresAppointmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AppointmentRow {
    id: Uuid,
    account_id: Uuid,
    patient_name: String,
    patient_email: String,
    scheduled_at: DateTime<Utc>,
    status: String,
    reminder_sent: bool,
}

impl TryFrom<AppointmentRow> for Appointment {
    type Error = DomainError;

    fn try_from(row: AppointmentRow) -> Result<Self, Self::Error> {
        let status = AppointmentStatus::parse(&row.status).ok_or_else(|| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid appointment status: {}", row.status),
            )
        })?;

        Ok(Appointment {
            id: AppointmentId::from_uuid(row.id),
            account_id: AccountId::from_uuid(row.account_id),
            patient_name: row.patient_name,
            patient_email: row.patient_email,
            scheduled_at: Timestamp::from_datetime(row.scheduled_at),
            status,
            reminder_sent: row.reminder_sent,
        })
    }
}

const SELECT_APPOINTMENT: &str = r#"
    SELECT id, account_id, patient_name, patient_email,
           scheduled_at, status, reminder_sent
    FROM appointments
"#;

#[async_trait]
impl AppointmentRepository for PostgresAppointmentRepository {
    async fn find_scheduled_for_date(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>, DomainError> {
        let rows: Vec<AppointmentRow> = sqlx::query_as(&format!(
            r#"{}
            WHERE scheduled_at::date = $1
              AND status = 'scheduled'
              AND reminder_sent = false
            ORDER BY scheduled_at ASC
            "#,
            SELECT_APPOINTMENT
        ))
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to find appointments: {}", e))
        })?;

        rows.into_iter().map(Appointment::try_from).collect()
    }

    async fn find_by_id(&self, id: &AppointmentId) -> Result<Option<Appointment>, DomainError> {
        let row: Option<AppointmentRow> =
            sqlx::query_as(&format!("{} WHERE id = $1", SELECT_APPOINTMENT))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::new(
                        ErrorCode::DatabaseError,
                        format!("Failed to find appointment: {}", e),
                    )
                })?;

        row.map(Appointment::try_from).transpose()
    }

    async fn mark_reminder_sent(&self, id: &AppointmentId) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE appointments SET reminder_sent = true WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to mark reminder sent: {}", e),
                )
            })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::AppointmentNotFound,
                "Appointment not found",
            ));
        }

        Ok(())
    }
}
