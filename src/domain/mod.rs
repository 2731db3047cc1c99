//! Core domain model.
//!
//! Pure business types and rules. Nothing in here performs IO; effects
//! are reached through the traits in [`crate::ports`].

pub mod account;
pub mod foundation;
pub mod provisioning;
pub mod scheduling;
