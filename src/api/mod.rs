//! REST API client module for the LibreLinkUp service.
//!
//! This module provides the `ApiClient` for logging in, listing patient
//! connections and reading the latest glucose measurement.
//!
//! Every response is wrapped in a `{status, data}` envelope; a non-zero
//! `status` is an application-level failure even when HTTP says 200.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
