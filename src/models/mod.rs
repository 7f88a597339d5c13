//! Data models for LibreLinkUp responses.
//!
//! - `Connection`, `GraphData`: patient connections and the graph payload
//! - `GlucoseItem`: a raw measurement as the API sends it
//! - `Reading`, `TrendArrow`: the domain view printed to the user

pub mod connection;
pub mod measurement;

pub use connection::{Connection, GraphData};
pub use measurement::{GlucoseItem, Reading, TrendArrow};
