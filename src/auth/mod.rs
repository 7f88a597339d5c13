//! Authentication state for one run.
//!
//! `SessionData` holds the bearer token, the user id, the derived
//! `Account-Id` hash and the base URL that login settled on. Nothing is
//! written to disk; the session ends with the process.

pub mod session;

pub use session::{account_id_for, SessionData};
