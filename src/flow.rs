//! The smoke-test sequence: login, first connection, latest measurement.
//!
//! Each step is a single request awaited in turn. Any failure aborts the
//! run; nothing is retried.

use std::io::Write;

use anyhow::Result;
use tracing::{debug, info};

use crate::api::{ApiClient, ApiError};
use crate::config::Credentials;
use crate::models::Reading;

#[derive(Debug, Clone, Copy, Default)]
pub struct FlowOptions {
    /// Use a measurement embedded in the connection instead of calling the
    /// graph endpoint, when one with a value is present
    pub skip_graph: bool,
}

/// Run the sequence and write progress lines to `out`.
pub async fn run<W: Write>(
    client: &ApiClient,
    credentials: &Credentials,
    options: FlowOptions,
    out: &mut W,
) -> Result<Reading> {
    let base_url = client.base_url_for_region(&credentials.region);
    writeln!(out, "Using base URL: {}", base_url)?;

    let session = client
        .authenticate(&base_url, &credentials.email, &credentials.password)
        .await?;
    info!(base_url = %session.base_url, "Logged in");
    writeln!(out, "Login ok; token obtained")?;

    let connection = client.fetch_connection(&session).await?;
    let patient_id = connection.patient_id.clone().ok_or_else(|| {
        ApiError::InvalidResponse("Connection is missing a patient id".to_string())
    })?;
    debug!(patient = %patient_id, name = %connection.full_name(), "Using first connection");
    writeln!(out, "Connections ok; patient: {}", patient_id)?;

    let embedded = connection
        .latest_measurement()
        .filter(|m| options.skip_graph && m.has_value());
    let measurement = match embedded {
        Some(measurement) => {
            info!("Using measurement from connections payload");
            measurement.clone()
        }
        None => {
            client
                .fetch_latest_measurement(&session, &patient_id)
                .await?
        }
    };

    let reading = Reading::from(&measurement);
    if let Some(observed_at) = reading.observed_at() {
        debug!(%observed_at, "Measurement time");
    }
    writeln!(out, "Latest: {}", reading)?;
    Ok(reading)
}
