//! Email adapters implementing the Mailer port.

mod smtp_mailer;

pub use smtp_mailer::SmtpMailer;
