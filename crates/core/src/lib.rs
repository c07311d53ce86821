//! # SeniorCare Core
//!
//! Shared domain types for the SeniorCare client: alarms, friendship
//! requests, messages and the error taxonomy every other crate reports in.

/// Error taxonomy shared by all crates
pub mod errors;
/// Domain models and input validation
pub mod models;
