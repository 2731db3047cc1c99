//! Scheduling domain: appointments and reminder eligibility.

mod appointment;

pub use appointment::{Appointment, AppointmentStatus};
