use serde::Deserialize;

use super::GlucoseItem;

/// A patient the logged-in account follows.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Connection {
    #[serde(rename = "patientId")]
    pub patient_id: Option<String>,
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName")]
    pub last_name: Option<String>,
    #[serde(rename = "glucoseMeasurement")]
    pub glucose_measurement: Option<GlucoseItem>,
    #[serde(rename = "glucoseItem")]
    pub glucose_item: Option<GlucoseItem>,
    #[serde(rename = "measurementData")]
    pub measurement_data: Option<Vec<GlucoseItem>>,
}

impl Connection {
    pub fn full_name(&self) -> String {
        format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or(""),
            self.last_name.as_deref().unwrap_or("")
        )
        .trim()
        .to_string()
    }

    /// The single embedded measurement object, `glucoseMeasurement` first.
    /// An empty object counts as absent.
    pub fn embedded_measurement(&self) -> Option<&GlucoseItem> {
        self.glucose_measurement
            .as_ref()
            .filter(|m| !m.is_empty())
            .or(self.glucose_item.as_ref())
    }

    /// Most recent measurement: the last element of a non-empty series,
    /// otherwise the embedded measurement. Series order is trusted as-is.
    pub fn latest_measurement(&self) -> Option<&GlucoseItem> {
        let embedded = self.embedded_measurement();
        embedded
            .and_then(GlucoseItem::latest_in_series)
            .or_else(|| self.measurement_data.as_deref().and_then(|s| s.last()))
            .or(embedded)
    }
}

/// `data` of the graph endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphData {
    pub connection: Option<Connection>,
    #[serde(rename = "graphData")]
    pub graph_data: Option<Vec<serde_json::Value>>,
}

impl GraphData {
    pub fn point_count(&self) -> usize {
        self.graph_data.as_ref().map_or(0, Vec::len)
    }
}
