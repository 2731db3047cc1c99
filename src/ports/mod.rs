//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Persistence Ports
//!
//! - `AccountRepository` - Account profile and premium entitlement
//! - `IdentityStore` - Authentication records (email + credential hash)
//! - `ResetTokenRepository` - Single-use password reset tokens
//! - `AppointmentRepository` - Appointments and the reminder guard flag
//!
//! ## Delivery Ports
//!
//! - `Mailer` - Transactional email (welcome, reset, reminders)

mod account_repository;
mod appointment_repository;
mod identity_store;
mod mailer;
mod reset_token_repository;

pub use account_repository::{AccountRepository, CreateOutcome};
pub use appointment_repository::AppointmentRepository;
pub use identity_store::{IdentityStore, NewIdentity};
pub use mailer::Mailer;
pub use reset_token_repository::ResetTokenRepository;
