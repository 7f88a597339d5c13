//! Glucose measurement types.
//!
//! `GlucoseItem` mirrors the API's PascalCase measurement object. `Reading`
//! is the domain view printed at the end of a run.

use std::fmt;

use chrono::NaiveDateTime;
use serde::Deserialize;

/// Timestamp layout used by LibreLinkUp, e.g. `1/19/2024 3:21:03 PM`.
const API_TIMESTAMP_FORMAT: &str = "%m/%d/%Y %I:%M:%S %p";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GlucoseItem {
    #[serde(rename = "ValueInMgPerDl")]
    pub value_in_mg_per_dl: Option<f64>,
    #[serde(rename = "Value")]
    pub value: Option<f64>,
    #[serde(rename = "TrendArrow")]
    pub trend_arrow: Option<i64>,
    #[serde(rename = "Trend")]
    pub trend: Option<i64>,
    #[serde(rename = "Timestamp")]
    pub timestamp: Option<String>,
    #[serde(rename = "FactoryTimestamp")]
    pub factory_timestamp: Option<String>,
    #[serde(rename = "measurementData")]
    pub measurement_data: Option<Vec<GlucoseItem>>,
}

impl GlucoseItem {
    /// Last element of the nested series, if any
    pub fn latest_in_series(&self) -> Option<&GlucoseItem> {
        self.measurement_data.as_deref().and_then(|s| s.last())
    }

    pub fn has_value(&self) -> bool {
        self.value_in_mg_per_dl.is_some() || self.value.is_some()
    }

    /// An object such as `{}` that carries nothing to report
    pub fn is_empty(&self) -> bool {
        !self.has_value()
            && self.trend_arrow.is_none()
            && self.trend.is_none()
            && self.timestamp.is_none()
            && self.factory_timestamp.is_none()
            && self.measurement_data.as_ref().map_or(true, Vec::is_empty)
    }
}

/// Direction of the glucose trend as reported in `TrendArrow`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendArrow {
    FallingQuickly,
    Falling,
    Stable,
    Rising,
    RisingQuickly,
    Unknown,
}

impl TrendArrow {
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => TrendArrow::FallingQuickly,
            2 => TrendArrow::Falling,
            3 => TrendArrow::Stable,
            4 => TrendArrow::Rising,
            5 => TrendArrow::RisingQuickly,
            _ => TrendArrow::Unknown,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            TrendArrow::FallingQuickly => "↓",
            TrendArrow::Falling => "↘",
            TrendArrow::Stable => "→",
            TrendArrow::Rising => "↗",
            TrendArrow::RisingQuickly => "↑",
            TrendArrow::Unknown => "?",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            TrendArrow::FallingQuickly => "falling quickly",
            TrendArrow::Falling => "falling",
            TrendArrow::Stable => "stable",
            TrendArrow::Rising => "rising",
            TrendArrow::RisingQuickly => "rising quickly",
            TrendArrow::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TrendArrow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.symbol(), self.description())
    }
}

/// The reading reported to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    /// mg/dL
    pub value: Option<f64>,
    pub trend: Option<i64>,
    pub timestamp: Option<String>,
}

impl Reading {
    pub fn trend_arrow(&self) -> Option<TrendArrow> {
        self.trend.map(TrendArrow::from_code)
    }

    /// Parse the API timestamp. Returns None for missing or unrecognised formats.
    pub fn observed_at(&self) -> Option<NaiveDateTime> {
        let raw = self.timestamp.as_deref()?;
        NaiveDateTime::parse_from_str(raw.trim(), API_TIMESTAMP_FORMAT).ok()
    }
}

impl From<&GlucoseItem> for Reading {
    fn from(item: &GlucoseItem) -> Self {
        Self {
            // A zero mg/dL value is not a reading; fall through to `Value`
            value: item
                .value_in_mg_per_dl
                .filter(|v| *v != 0.0)
                .or(item.value),
            trend: item.trend_arrow.or(item.trend),
            timestamp: item
                .timestamp
                .clone()
                .or_else(|| item.factory_timestamp.clone()),
        }
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Some(v) => write!(f, "value={}", v)?,
            None => write!(f, "value=none")?,
        }
        match (self.trend, self.trend_arrow()) {
            (Some(code), Some(arrow)) => write!(f, ", trend={} ({})", code, arrow)?,
            _ => write!(f, ", trend=none")?,
        }
        write!(f, ", timestamp={}", self.timestamp.as_deref().unwrap_or("none"))
    }
}
