//! Outbound email port.
//!
//! # Design
//!
//! - **Fire-and-report**: callers decide what a send failure means.
//!   Provisioning keeps the account and logs; the reminder run counts
//!   the item as failed and moves on
//! - **Templated sends**: one method per message kind keeps template
//!   knowledge inside the adapter

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EmailAddress};
use crate::domain::scheduling::Appointment;

/// Port for sending transactional email.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send the welcome message with temporary login credentials to a
    /// freshly provisioned account.
    ///
    /// # Errors
    ///
    /// - `MailError` if the message could not be handed to the relay
    async fn send_welcome_credentials(
        &self,
        to: &EmailAddress,
        display_name: &str,
        temp_password: &str,
    ) -> Result<(), DomainError>;

    /// Send a password reset link.
    ///
    /// # Errors
    ///
    /// - `MailError` if the message could not be handed to the relay
    async fn send_password_reset(
        &self,
        to: &EmailAddress,
        display_name: &str,
        reset_link: &str,
    ) -> Result<(), DomainError>;

    /// Send an appointment reminder to the patient.
    ///
    /// # Errors
    ///
    /// - `MailError` if the message could not be handed to the relay
    async fn send_appointment_reminder(&self, appointment: &Appointment)
        -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mailer_is_object_safe() {
        fn _accepts_dyn(_mailer: &dyn Mailer) {}
    }
}
