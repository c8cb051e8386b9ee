//! Patient-insight scoring engine behind the trial complexity dashboard.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod telemetry;
