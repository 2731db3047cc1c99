//! Command handlers.
//!
//! Each handler is a Command/Handler/Result triple wired to ports via
//! `Arc<dyn Trait>`. Handlers own the use-case orchestration; the domain
//! owns the rules; adapters own the IO.

mod complete_password_reset;
mod create_account;
mod process_purchase;
mod request_password_reset;
mod resend_reminder;
mod send_due_reminders;
mod update_account;

#[cfg(test)]
pub(crate) mod mocks;

pub use complete_password_reset::{
    CompletePasswordResetCommand, CompletePasswordResetHandler, CompletePasswordResetResult,
};
pub use create_account::{CreateAccountCommand, CreateAccountHandler, CreateAccountResult};
pub use process_purchase::{ProcessPurchaseCommand, ProcessPurchaseHandler, ProcessPurchaseResult};
pub use request_password_reset::{
    RequestPasswordResetCommand, RequestPasswordResetHandler, RequestPasswordResetResult,
};
pub use resend_reminder::{ResendReminderCommand, ResendReminderHandler, ResendReminderResult};
pub use send_due_reminders::{
    ReminderRunSummary, SendDueRemindersCommand, SendDueRemindersHandler,
};
pub use update_account::{UpdateAccountCommand, UpdateAccountHandler, UpdateAccountResult};
