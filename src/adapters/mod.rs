//! Adapters - concrete implementations of the ports.
//!
//! - `http` - axum REST API
//! - `postgres` - sqlx persistence
//! - `email` - lettre SMTP mailer
//! - `jobs` - background job loops

pub mod email;
pub mod http;
pub mod jobs;
pub mod postgres;
