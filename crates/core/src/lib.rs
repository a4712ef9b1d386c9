//! # Agenda Core
//!
//! Domain types and the booking rules of the Agenda platform: the
//! availability calculator, the appointment status policy and the booking
//! coordinator that turns a chosen slot into a persisted appointment.
//!
//! Storage and notification are reached through the traits in [`store`] and
//! [`notify`], implemented by the `agenda-db` and `agenda-notify` crates.

pub mod availability;
pub mod booking;
pub mod errors;
pub mod models;
pub mod notify;
pub mod policy;
pub mod store;
