//! Background jobs.
//!
//! One scheduled job: the daily reminder run. It targets appointments
//! for the next local calendar day, so a reminder lands roughly one day
//! before the session. The run itself is idempotent (the guard flag in
//! each appointment), so overlapping manual and scheduled runs are safe.

use std::sync::Arc;

use chrono::{Days, Local};
use tokio::time::{interval, Duration};
use tracing::{error, info};

use crate::application::handlers::{SendDueRemindersCommand, SendDueRemindersHandler};

/// How often the reminder job wakes up.
const RUN_EVERY_SECS: u64 = 86400;

/// Daily reminder job.
pub struct ReminderJob {
    handler: Arc<SendDueRemindersHandler>,
}

impl ReminderJob {
    pub fn new(handler: Arc<SendDueRemindersHandler>) -> Self {
        Self { handler }
    }

    /// Start the job loop. Runs until the process exits.
    pub fn start(self) {
        info!("Starting reminder job (daily)");
        tokio::spawn(self.run_loop());
    }

    async fn run_loop(self) {
        let mut interval = interval(Duration::from_secs(RUN_EVERY_SECS));

        loop {
            interval.tick().await;

            let Some(date) = Local::now().date_naive().checked_add_days(Days::new(1)) else {
                error!("Reminder job: date overflow computing tomorrow");
                continue;
            };

            match self.handler.handle(SendDueRemindersCommand { date }).await {
                Ok(summary) => {
                    info!(
                        %date,
                        sent = summary.sent,
                        failed = summary.failed,
                        "reminder run completed"
                    );
                }
                Err(e) => error!(%date, error = %e, "reminder run failed"),
            }
        }
    }
}
