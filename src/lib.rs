//! Amparo - Mental Health Companion Backend
//!
//! This crate implements the purchase-to-provisioning pipeline, account
//! lifecycle and appointment reminder delivery for the Amparo platform.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
