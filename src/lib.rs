//! libre-probe - a smoke test for the LibreLinkUp glucose API.
//!
//! Logs in (following one region redirect), picks the first patient
//! connection and reports its most recent glucose measurement.

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod flow;
pub mod models;
