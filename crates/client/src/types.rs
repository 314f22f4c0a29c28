//! Request and response types for the Brix API.

use std::ops::RangeInclusive;

use serde::{Deserialize, Deserializer, Serialize};

/// A stored Brix measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub id: String,
    pub plant_name: String,
    #[serde(deserialize_with = "lenient_number")]
    pub brix_value: f64,
    pub reading_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// Body of `POST /brix/readings`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewReading {
    pub plant_name: String,
    pub brix_value: f64,
    pub reading_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Partial body of `PUT /brix/readings/{id}`. Unset fields are left out.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReadingUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plant_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brix_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reading_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ReadingUpdate {
    pub fn is_empty(&self) -> bool {
        self.plant_name.is_none()
            && self.brix_value.is_none()
            && self.reading_date.is_none()
            && self.notes.is_none()
    }
}

/// Filters for `GET /brix/readings`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadingsQuery {
    pub plant_name: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl ReadingsQuery {
    /// Query parameters; empty names and zero limits/offsets are omitted.
    pub(crate) fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(name) = self.plant_name.as_deref().filter(|n| !n.is_empty()) {
            params.push(("plant_name", name.to_owned()));
        }
        if let Some(limit) = self.limit.filter(|&l| l > 0) {
            params.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset.filter(|&o| o > 0) {
            params.push(("offset", offset.to_string()));
        }
        params
    }
}

/// One page of readings with the server-reported count.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReadingPage {
    #[serde(rename = "data")]
    pub readings: Vec<Reading>,
    #[serde(default)]
    pub count: u64,
}

/// Reference data about a plant and its healthy Brix range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantReference {
    pub id: String,
    pub plant_name: String,
    #[serde(default)]
    pub category: String,
    #[serde(deserialize_with = "lenient_number")]
    pub healthy_brix_min: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub healthy_brix_max: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub created_at: String,
}

impl PlantReference {
    pub fn healthy_range(&self) -> RangeInclusive<f64> {
        self.healthy_brix_min..=self.healthy_brix_max
    }

    pub fn is_healthy(&self, brix: f64) -> bool {
        self.healthy_range().contains(&brix)
    }
}

/// Aggregates from `GET /brix/stats`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrixStats {
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_readings: u64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub average_brix: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub min_brix: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub max_brix: f64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub unique_plants: u64,
}

/// Response of `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub environment: String,
}

/// `{success, data}` envelope (internal).
#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse<T> {
    #[serde(default = "default_success")]
    pub success: bool,
    pub data: T,
}

/// `{success, message}` envelope of `DELETE` (internal).
#[derive(Debug, Deserialize)]
pub(crate) struct MessageResponse {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

/// Error body of a non-2xx response (internal).
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

fn default_success() -> bool {
    true
}

/// Numbers may arrive as JSON numbers, numeric strings (SQL `NUMERIC`) or null.
#[derive(Deserialize)]
#[serde(untagged)]
enum LenientNumber {
    Number(f64),
    Text(String),
    Null,
}

fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match LenientNumber::deserialize(deserializer)? {
        LenientNumber::Number(n) => Ok(n),
        LenientNumber::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid number {s:?}"))),
        LenientNumber::Null => Ok(0.0),
    }
}

fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let n = lenient_number(deserializer)?;
    if n < 0.0 || n.fract() != 0.0 {
        return Err(serde::de::Error::custom(format!("invalid count {n}")));
    }
    Ok(n as u64)
}
