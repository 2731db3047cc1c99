//! PostgreSQL adapters implementing the persistence ports with sqlx.

mod account_repository;
mod appointment_repository;
mod identity_store;
mod reset_token_repository;

pub use account_repository::PostgresAccountRepository;
pub use appointment_repository::PostgresAppointmentRepository;
pub use identity_store::PostgresIdentityStore;
pub use reset_token_repository::PostgresResetTokenRepository;
