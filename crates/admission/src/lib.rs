//! Domain library for the university admission service.
//!
//! The catalog module owns faculties, exam-date slots, and their many-to-many
//! linkage; the intake module owns submitted applications and administrator
//! reassignment; the selection module models the dependent program → faculty
//! → exam-date choice both selection surfaces share.

pub mod catalog;
pub mod config;
pub mod context;
pub mod error;
pub mod intake;
pub mod selection;
pub mod telemetry;

#[cfg(test)]
pub(crate) mod testing;
